use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::*;

use crate::app::AngelTracker;
use crate::cli::output::success;
use crate::export::{ExportLayout, export_to_path};
use crate::model::Status;
use crate::store::Filter;

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Destination CSV file
    pub path: PathBuf,

    /// Only export angels with this status
    #[arg(long)]
    pub status: Option<Status>,

    /// Column layout of the file
    #[arg(long, value_enum, default_value_t = ExportLayout::Full)]
    pub layout: ExportLayout,
}

pub async fn export_command(args: &ExportArgs, tracker: &AngelTracker) -> Result<()> {
    let filter = match args.status {
        Some(status) => Filter::status(status),
        None => Filter::all(),
    };
    let angels = tracker
        .store()
        .query(&filter)
        .await
        .context("Failed to load angels for export")?;

    let rows = export_to_path(&args.path, &angels, args.layout)?;
    success(format!(
        "Exported {} angels to {}",
        rows.to_string().bright_green().bold(),
        args.path.display()
    ));
    Ok(())
}
