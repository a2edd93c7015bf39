pub mod add;
pub mod export;
pub mod hold;
pub mod lend;
pub mod search;
pub mod status;
pub mod tui;

use anyhow::Result;

use super::app::Commands;
use crate::app::AngelTracker;

pub use tui::tui_command;

/// Run one subcommand against a started tracker.
pub async fn run_command(command: &Commands, tracker: &mut AngelTracker) -> Result<()> {
    match command {
        Commands::Tui => tui_command(tracker).await,
        Commands::Search(args) => search::search_command(args, tracker).await,
        Commands::Add(args) => add::add_command(args, tracker).await,
        Commands::Status(args) => status::status_command(args, tracker).await,
        Commands::Export(args) => export::export_command(args, tracker).await,
        Commands::Hold(args) => hold::hold_command(args, tracker).await,
        Commands::Lend(args) => lend::lend_command(args, tracker).await,
    }
}
