use anyhow::{Context, Result, bail};
use clap::Args;
use colored::*;
use log::info;

use crate::app::AngelTracker;
use crate::cli::output::{status_tag, success};
use crate::model::{Attribute, Status};

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Angel id, e.g. 12A
    pub id: String,

    /// New status: not_started, awaiting, hold, complete, pull or out
    pub status: Status,

    /// Confirm changing an angel that is marked for pulling
    #[arg(short, long)]
    pub force: bool,
}

pub async fn status_command(args: &StatusArgs, tracker: &AngelTracker) -> Result<()> {
    let store = tracker.store();
    let id = args.id.trim();

    if !store
        .exists(id)
        .await
        .with_context(|| format!("Failed to look up angel {}", id))?
    {
        bail!("Angel '{}' not found", id);
    }

    let angel = store.get(id).await?;
    let current = angel.status().unwrap_or(Status::NotStarted);
    current.check_transition(args.status)?;
    if current.requires_confirmation() && !args.force {
        bail!(
            "Angel {} is marked {}; re-run with --force to change it",
            id,
            current
        );
    }

    store
        .update(id, Attribute::Status, args.status.as_str())
        .await
        .with_context(|| format!("Failed to update angel {}", id))?;
    info!("Angel {} moved from {} to {}", id, current, args.status);
    success(format!(
        "Angel {} {} → {}",
        id.bright_white().bold(),
        status_tag(Some(current)),
        status_tag(Some(args.status))
    ));
    Ok(())
}
