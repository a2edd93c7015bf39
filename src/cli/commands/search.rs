use anyhow::{Context, Result};
use clap::Args;

use crate::app::AngelTracker;
use crate::cli::output::print_angels;
use crate::model::Attribute;
use crate::store::{Criteria, Filter};

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Family number; lists every angel whose id is this number plus one letter
    pub prefix: String,

    /// Only show angels whose attribute contains TEXT, as NAME=TEXT
    #[arg(long = "where", value_name = "NAME=TEXT", value_parser = super::add::parse_attribute)]
    pub keyword: Option<(Attribute, String)>,
}

pub async fn search_command(args: &SearchArgs, tracker: &AngelTracker) -> Result<()> {
    let mut filter = Filter::family(args.prefix.trim());
    if let Some((attribute, needle)) = &args.keyword {
        filter = filter.and(Criteria::Keyword {
            attribute: *attribute,
            needle: needle.clone(),
            exact: false,
        });
    }

    let angels = tracker
        .store()
        .query(&filter)
        .await
        .with_context(|| format!("Failed to search family '{}'", args.prefix))?;
    print_angels(&angels);
    Ok(())
}
