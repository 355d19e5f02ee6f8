//! Output mapping for the published poll state
//!
//! A `Snapshot` is what collaborators see: the availability flag plus one
//! optional value per reading field. Values stay `None` until the first
//! successful cycle and keep their last good value through later failures.

use crate::state::PollState;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Flattened view of a `PollState`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    /// Whether the most recent cycle succeeded
    pub available: bool,

    pub tank_level_percent: Option<f64>,
    pub gallons_remaining: Option<f64>,
    pub tank_capacity: Option<f64>,
    pub fuel_type: Option<String>,
    pub last_delivery_date: Option<String>,
    pub reading_date: Option<String>,
    pub current_price: Option<f64>,

    /// Message of the error that ended the most recent cycle
    pub last_error: Option<String>,

    /// When the cached reading was stored
    pub last_updated: Option<DateTime<Utc>>,
}

impl Snapshot {
    /// Builds the output mapping for a poll state
    pub fn from_state(state: &PollState) -> Self {
        let reading = state.reading.as_ref();

        Self {
            available: state.is_available(),
            tank_level_percent: reading.map(|r| r.tank_level_percent),
            gallons_remaining: reading.map(|r| r.gallons_remaining),
            tank_capacity: reading.map(|r| r.tank_capacity),
            fuel_type: reading.and_then(|r| r.fuel_type.clone()),
            last_delivery_date: reading.and_then(|r| r.last_delivery_date.clone()),
            reading_date: reading.and_then(|r| r.reading_date.clone()),
            current_price: reading.and_then(|r| r.current_price),
            last_error: state.last_error.as_ref().map(ToString::to_string),
            last_updated: state.last_success_at,
        }
    }

    /// Serializes the snapshot as a single JSON line
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

fn or_unknown<T: fmt::Display>(value: &Option<T>) -> String {
    value
        .as_ref()
        .map_or_else(|| "unknown".to_string(), ToString::to_string)
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Tank Reading ===")?;
        writeln!(
            f,
            "  Status: {}",
            if self.available { "available" } else { "unavailable" }
        )?;

        match self.tank_level_percent {
            Some(level) => writeln!(f, "  Tank level: {:.1}%", level)?,
            None => writeln!(f, "  Tank level: unknown")?,
        }
        writeln!(
            f,
            "  Gallons remaining: {}",
            or_unknown(&self.gallons_remaining)
        )?;
        writeln!(f, "  Tank capacity: {}", or_unknown(&self.tank_capacity))?;
        writeln!(f, "  Fuel type: {}", or_unknown(&self.fuel_type))?;
        writeln!(
            f,
            "  Last delivery: {}",
            or_unknown(&self.last_delivery_date)
        )?;
        writeln!(f, "  Reading date: {}", or_unknown(&self.reading_date))?;
        match self.current_price {
            Some(price) => writeln!(f, "  Current price: ${:.2}/gal", price)?,
            None => writeln!(f, "  Current price: unknown")?,
        }

        if let Some(updated) = &self.last_updated {
            writeln!(f, "  Last updated: {}", updated.to_rfc3339())?;
        }
        if let Some(error) = &self.last_error {
            writeln!(f, "  Last error: {}", error)?;
        }
        Ok(())
    }
}
