use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};

use angel_tracker::app::AngelTracker;
use angel_tracker::cli::commands::run_command;
use angel_tracker::cli::{Cli, Commands};
use angel_tracker::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    // Initialize logger to file (truncate on each run) so the TUI stays clean
    let log_path = config.log_file();
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file: {:?}", log_path))?;
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();

    info!("Starting angel-tracker");
    let mut tracker = AngelTracker::startup(&config).await?;

    let command = cli.command.unwrap_or(Commands::Tui);
    let result = run_command(&command, &mut tracker).await;
    if let Err(err) = &result {
        error!("Command failed: {:#}", err);
    }

    tracker.shutdown().await?;
    result
}
