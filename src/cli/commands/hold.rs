use anyhow::{Context, Result, bail};
use clap::Args;
use colored::*;

use crate::app::AngelTracker;
use crate::cli::output::{status_tag, success};
use crate::model::Status;
use crate::store::actions::put_on_hold;

#[derive(Args, Debug)]
pub struct HoldArgs {
    /// Angel id, e.g. 12A
    pub id: String,

    /// Item still missing from the bag; repeat for several. Without any the
    /// angel is marked COMPLETE
    #[arg(short, long = "missing", value_name = "ITEM")]
    pub missing: Vec<String>,

    /// Confirm changing an angel that is marked for pulling
    #[arg(short, long)]
    pub force: bool,
}

pub async fn hold_command(args: &HoldArgs, tracker: &AngelTracker) -> Result<()> {
    let store = tracker.store();
    let id = args.id.trim();

    let angel = store
        .get(id)
        .await
        .with_context(|| format!("Failed to look up angel {}", id))?;
    let current = angel.status().unwrap_or(Status::NotStarted);
    if current.requires_confirmation() && !args.force {
        bail!(
            "Angel {} is marked {}; re-run with --force to change it",
            id,
            current
        );
    }

    let missing: Vec<String> = args
        .missing
        .iter()
        .map(|item| item.trim().to_uppercase())
        .filter(|item| !item.is_empty())
        .collect();
    let angel = put_on_hold(store.as_ref(), id, &missing)
        .await
        .with_context(|| format!("Failed to update angel {}", id))?;

    success(format!(
        "Angel {} {} → {}",
        id.bright_white().bold(),
        status_tag(Some(current)),
        status_tag(angel.status())
    ));
    for item in angel.missing() {
        println!("    {} {}", "missing:".dimmed(), item);
    }
    Ok(())
}
