use anyhow::{Context, Result, bail};
use clap::Args;
use colored::*;

use crate::app::AngelTracker;
use crate::cli::output::success;
use crate::model::{Angel, Attribute, Status};

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Angel id: family number followed by a member letter, e.g. 12A
    #[arg(long)]
    pub id: String,

    /// Attribute to set, as NAME=VALUE (repeatable)
    #[arg(long = "attr", value_name = "NAME=VALUE", value_parser = parse_attribute)]
    pub attributes: Vec<(Attribute, String)>,
}

pub fn parse_attribute(raw: &str) -> Result<(Attribute, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{raw}'"))?;
    let attribute: Attribute = name.parse().map_err(|err| format!("{err}"))?;
    Ok((attribute, value.trim().to_string()))
}

pub(crate) fn build_angel(args: &AddArgs) -> Result<Angel> {
    let id = args.id.trim();
    if id.len() < 2 || !id.chars().last().is_some_and(|c| c.is_ascii_alphabetic()) {
        bail!("Angel id '{}' must be a family number followed by a letter", id);
    }

    let mut angel = Angel::new(id);
    for (attribute, value) in &args.attributes {
        match attribute {
            Attribute::Id => bail!("Use --id to set the angel id"),
            Attribute::Status => {
                let status: Status = value.parse()?;
                angel.set(Attribute::Status, status.as_str());
            }
            _ => angel.set(*attribute, value.as_str()),
        }
    }
    Ok(angel)
}

pub async fn add_command(args: &AddArgs, tracker: &AngelTracker) -> Result<()> {
    let angel = build_angel(args)?;
    let id = angel.id().to_string();
    tracker
        .store()
        .insert(angel)
        .await
        .with_context(|| format!("Failed to add angel {}", id))?;
    success(format!("Angel {} added", id.bright_green().bold()));
    Ok(())
}
