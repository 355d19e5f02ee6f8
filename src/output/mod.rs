//! Output module for presenting the published tank reading
//!
//! This module handles:
//! - Flattening the poll state into the collaborator-facing mapping
//! - Rendering that mapping as human-readable text or one JSON line

mod snapshot;

pub use snapshot::Snapshot;

use crate::WatchError;
use std::str::FromStr;

/// How snapshots are written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown output format '{}', expected text or json", other)),
        }
    }
}

/// Renders a snapshot in the requested format
pub fn render(snapshot: &Snapshot, format: OutputFormat) -> Result<String, WatchError> {
    match format {
        OutputFormat::Text => Ok(snapshot.to_string()),
        OutputFormat::Json => Ok(snapshot.to_json()?),
    }
}

/// Prints a snapshot to stdout
pub fn print_snapshot(snapshot: &Snapshot, format: OutputFormat) -> Result<(), WatchError> {
    println!("{}", render(snapshot, format)?);
    Ok(())
}
