use serde::{Deserialize, Serialize};

/// A single snapshot of tank telemetry extracted from one tank page
///
/// Only `tank_level_percent` is guaranteed to come from the page. The other
/// fields are best-effort: numeric ones default to `0.0` and textual ones are
/// `None` when the page did not carry them, which callers must read as
/// "unknown".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Fill level of the tank, 0-100
    pub tank_level_percent: f64,

    /// Estimated gallons left in the tank
    pub gallons_remaining: f64,

    /// Nominal tank size in gallons
    pub tank_capacity: f64,

    /// Product stored in the tank (e.g. "Propane")
    pub fuel_type: Option<String>,

    /// Raw date token of the last delivery, as printed by the portal
    pub last_delivery_date: Option<String>,

    /// Raw date token of the reading itself, as printed by the portal
    pub reading_date: Option<String>,

    /// Current price per gallon in dollars
    pub current_price: Option<f64>,
}

impl std::fmt::Display for Reading {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}%", self.tank_level_percent)?;
        if self.gallons_remaining > 0.0 {
            write!(f, ", {} gal remaining", self.gallons_remaining)?;
        }
        if self.tank_capacity > 0.0 {
            write!(f, " of {} gal", self.tank_capacity)?;
        }
        if let Some(price) = self.current_price {
            write!(f, " @ ${:.4}/gal", price)?;
        }
        Ok(())
    }
}
