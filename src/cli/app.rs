use std::path::PathBuf;

use super::commands::add::AddArgs;
use super::commands::export::ExportArgs;
use super::commands::hold::HoldArgs;
use super::commands::lend::LendArgs;
use super::commands::search::SearchArgs;
use super::commands::status::StatusArgs;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "angel-tracker")]
#[command(about = "Track charity angels through gift distribution")]
pub struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Launch interactive TUI interface (default)
    Tui,
    /// List the angels of a family
    Search(SearchArgs),
    /// Add a new angel
    Add(AddArgs),
    /// Change the status of an angel
    Status(StatusArgs),
    /// Put an angel on hold with the items it is missing
    Hold(HoldArgs),
    /// Lend unstarted angels to a requestee
    Lend(LendArgs),
    /// Export angels to a CSV file
    Export(ExportArgs),
}
