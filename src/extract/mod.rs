//! Reading extraction from the portal's tank page
//!
//! This module turns the raw HTML of the tank page into a [`Reading`]:
//! - The tank level comes from the progress bar and is mandatory
//! - Every other field is located by an ordered list of strategies and
//!   falls back to a default (or stays absent) when nothing matches

mod page;
mod reading;
mod strategies;

pub use reading::Reading;

use crate::PortalError;
use page::{parse_number, Page};
use strategies::{
    CURRENT_PRICE, FUEL_TYPE, GALLONS_REMAINING, LAST_DELIVERY_DATE, READING_DATE, TANK_CAPACITY,
    TANK_LEVEL,
};

/// Parses a tank page into a reading
///
/// Extraction is deterministic and has no side effects beyond logging.
///
/// # Arguments
///
/// * `html` - The HTML content of the tank page
///
/// # Returns
///
/// * `Ok(Reading)` - The tank level was found; other fields are best-effort
/// * `Err(PortalError::Parsing)` - The progress bar was missing or its value
///   was not a finite number. No partial reading is returned.
///
/// # Example
///
/// ```
/// use propane_watch::extract_reading;
///
/// let html = r#"<div role="progressbar" aria-valuenow="62"></div>"#;
/// let reading = extract_reading(html).unwrap();
/// assert_eq!(reading.tank_level_percent, 62.0);
/// assert_eq!(reading.gallons_remaining, 0.0);
/// ```
pub fn extract_reading(html: &str) -> Result<Reading, PortalError> {
    let page = Page::parse(html);

    let tank_level_percent = extract_tank_level(&page)?;

    let gallons_remaining = GALLONS_REMAINING.resolve(&page).unwrap_or_else(|| {
        tracing::warn!("Could not find gallons remaining in page");
        0.0
    });

    let tank_capacity = TANK_CAPACITY.resolve(&page).unwrap_or_else(|| {
        tracing::warn!("Could not find tank capacity in page");
        0.0
    });

    let fuel_type = FUEL_TYPE.resolve(&page);

    let last_delivery_date = LAST_DELIVERY_DATE.resolve(&page);
    if last_delivery_date.is_none() {
        tracing::debug!("Could not find last delivery date in page");
    }

    let reading_date = READING_DATE.resolve(&page);

    let current_price = CURRENT_PRICE.resolve(&page);
    if current_price.is_none() {
        tracing::debug!("Could not find current price in page");
    }

    let reading = Reading {
        tank_level_percent,
        gallons_remaining,
        tank_capacity,
        fuel_type,
        last_delivery_date,
        reading_date,
        current_price,
    };

    tracing::debug!(
        level = reading.tank_level_percent,
        gallons = reading.gallons_remaining,
        capacity = reading.tank_capacity,
        last_delivery = ?reading.last_delivery_date,
        price = ?reading.current_price,
        "Parsed tank data"
    );

    Ok(reading)
}

/// Locates and converts the mandatory tank level
fn extract_tank_level(page: &Page) -> Result<f64, PortalError> {
    let raw = TANK_LEVEL
        .resolve(page)
        .ok_or_else(|| PortalError::Parsing("Could not find tank level in page".to_string()))?;

    let value = parse_number(&raw).ok_or_else(|| {
        PortalError::Parsing(format!("Invalid tank level value: '{}'", raw.trim()))
    })?;

    if !(0.0..=100.0).contains(&value) {
        tracing::warn!("Tank level {} is outside 0-100, clamping", value);
        return Ok(value.clamp(0.0, 100.0));
    }

    Ok(value)
}
