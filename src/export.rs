//! CSV export of angel documents.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use log::info;

use crate::model::{Angel, Attribute, Status};
use crate::store::actions::ON_SITE;

/// Column layout of an export file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ExportLayout {
    /// Every attribute of every angel
    #[default]
    Full,
    /// Id, sex initial, location mark and status letter, for the printed
    /// master list
    Master,
}

const MASTER_HEADER: [&str; 4] = ["ID", "SEX", "LOCATION", "STATUS"];

/// Write one row per angel, one column per attribute, in [`Attribute::ALL`]
/// order. Returns the number of rows written.
pub fn write_csv<W: Write>(writer: W, angels: &[Angel]) -> Result<usize> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(Attribute::ALL.iter().map(|attribute| attribute.as_str()))
        .context("Failed to write CSV header")?;

    for angel in angels {
        csv.write_record(
            Attribute::ALL
                .iter()
                .map(|attribute| angel.get(*attribute).unwrap_or_default()),
        )
        .with_context(|| format!("Failed to write row for angel {}", angel.id()))?;
    }

    csv.flush().context("Failed to flush CSV output")?;
    Ok(angels.len())
}

/// Master-list row of one angel.
///
/// Held and completed bags are marked `X` when on site and `-1` when their
/// location is anything else; pulled angels get `P` in both columns. Other
/// statuses leave both columns blank.
pub fn master_row(angel: &Angel) -> [String; 4] {
    let sex = angel
        .get(Attribute::Sex)
        .and_then(|sex| sex.trim().chars().next())
        .map(|initial| initial.to_uppercase().to_string())
        .unwrap_or_default();

    let (location, status) = match angel.status() {
        Some(status @ (Status::Hold | Status::Complete)) => {
            let location = if angel.get(Attribute::Location) == Some(ON_SITE) {
                "X"
            } else {
                "-1"
            };
            let letter = if status == Status::Hold { "H" } else { "C" };
            (location, letter)
        }
        Some(Status::Pull) => ("P", "P"),
        _ => ("", ""),
    };

    [
        angel.id().to_string(),
        sex,
        location.to_string(),
        status.to_string(),
    ]
}

/// Write the master list, one row per angel in the given order. Returns the
/// number of rows written.
pub fn write_master_csv<W: Write>(writer: W, angels: &[Angel]) -> Result<usize> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(MASTER_HEADER)
        .context("Failed to write CSV header")?;
    for angel in angels {
        csv.write_record(master_row(angel))
            .with_context(|| format!("Failed to write row for angel {}", angel.id()))?;
    }
    csv.flush().context("Failed to flush CSV output")?;
    Ok(angels.len())
}

pub fn export_to_path(path: &Path, angels: &[Angel], layout: ExportLayout) -> Result<usize> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create export file: {:?}", path))?;
    let rows = match layout {
        ExportLayout::Full => write_csv(file, angels)?,
        ExportLayout::Master => write_master_csv(file, angels)?,
    };
    info!("Exported {} angels to {:?} ({:?} layout)", rows, path, layout);
    Ok(rows)
}
