//! Colored console rendering for the non-interactive commands.

use colored::*;

use crate::model::{Angel, Attribute, Status};

pub fn status_tag(status: Option<Status>) -> ColoredString {
    let Some(status) = status else {
        return "UNKNOWN".dimmed();
    };
    let label = status.as_str();
    match status {
        Status::Complete => label.bright_green().bold(),
        Status::Hold => label.bright_yellow().bold(),
        Status::Pull => label.bright_red().bold(),
        Status::Awaiting => label.bright_cyan(),
        Status::Out => label.bright_magenta(),
        Status::NotStarted => label.dimmed(),
    }
}

/// One summary line per angel.
pub fn print_angels(angels: &[Angel]) {
    if angels.is_empty() {
        println!("  {}", "No angels found".bright_yellow().bold());
        return;
    }

    println!();
    for angel in angels {
        println!(
            "  {} {:<8} {:<8} {:<6} {}",
            "●".bright_blue(),
            angel.id().bright_white().bold(),
            angel.get(Attribute::Sex).unwrap_or("-"),
            angel.get(Attribute::Age).unwrap_or("-"),
            status_tag(angel.status())
        );
        if let Some(wish) = angel.get(Attribute::Wish) {
            println!("      {} {}", "wish:".dimmed(), wish);
        }
    }
    println!();
}

pub fn success(message: impl std::fmt::Display) {
    println!("{} {}", "✓".bright_green().bold(), message);
}
