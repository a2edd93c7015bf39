use anyhow::{Context, Result};
use clap::Args;
use colored::*;

use crate::app::AngelTracker;
use crate::cli::output::{print_angels, success};
use crate::store::actions::{available, lend};

#[derive(Args, Debug)]
pub struct LendArgs {
    /// How many NOT_STARTED angels to hand over
    pub count: usize,

    /// Person or organisation taking the angels
    #[arg(long = "to", value_name = "NAME")]
    pub requestee: String,
}

pub async fn lend_command(args: &LendArgs, tracker: &AngelTracker) -> Result<()> {
    let store = tracker.store();
    let batch = available(store.as_ref(), args.count)
        .await
        .context("Failed to list angels to lend")?;
    if batch.is_empty() {
        println!("  {}", "No angels are waiting to be started".bright_yellow().bold());
        return Ok(());
    }

    let ids: Vec<String> = batch.iter().map(|angel| angel.id().to_string()).collect();
    let lent = lend(store.as_ref(), &ids, &args.requestee)
        .await
        .with_context(|| format!("Failed to lend angels to {}", args.requestee))?;

    print_angels(&lent);
    success(format!(
        "Lent {} angels to {}",
        lent.len().to_string().bright_green().bold(),
        args.requestee.trim().bright_white().bold()
    ));
    Ok(())
}
