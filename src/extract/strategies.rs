//! Per-field extraction strategies
//!
//! Each field owns an ordered list of independent strategies. A strategy looks
//! at the page one way and either finds a value or does not; the first strategy
//! that finds something wins. The order of the lists is the fallback policy.

use crate::extract::page::{element_text, enclosing_block, parse_number, Page, BLOCK_TAGS};
use regex::Regex;
use scraper::Selector;
use std::sync::LazyLock;

static RE_GALLONS_IN_TANK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d[\d,]*(?:\.\d+)?)\s*gallons\s+in\s+tank")
        .expect("invalid regex: gallons in tank")
});
static RE_CAPACITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d[\d,]*(?:\.\d+)?)\s*(?:gallons?|gal)\b").expect("invalid regex: capacity")
});
static RE_FUEL_TYPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:fuel\s+type|product)\s*:\s*([A-Za-z][A-Za-z-]*(?:\s[A-Za-z][A-Za-z-]*)?)")
        .expect("invalid regex: fuel type")
});
static RE_LAST_DELIVERY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)last\s+delivery").expect("invalid regex: last delivery"));
static RE_READING_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)reading\s+date|last\s+reading|reading\s+taken")
        .expect("invalid regex: reading label")
});
static RE_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{1,2}[/-]\d{1,2}[/-]\d{2,4}").expect("invalid regex: date"));
static RE_DOLLAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\s*(\d[\d,]*(?:\.\d+)?)").expect("invalid regex: dollar amount")
});
static RE_PRICE_PER_GALLON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\$\s*(\d[\d,]*(?:\.\d+)?)\s*(?:/\s*gal|per\s*gal)")
        .expect("invalid regex: price per gallon")
});

/// Words that mark a dollar amount as the fuel price
const PRICE_KEYWORDS: &[&str] = &["price", "current", "per", "gal", "/"];

/// A single way of locating a field on the page
pub(crate) type Strategy<T> = fn(&Page) -> Option<T>;

/// Ordered fallback list for one field
pub(crate) struct FieldStrategies<T: 'static> {
    pub field: &'static str,
    pub strategies: &'static [(&'static str, Strategy<T>)],
}

impl<T: 'static> FieldStrategies<T> {
    /// Runs the strategies in priority order and returns the first hit
    pub fn resolve(&self, page: &Page) -> Option<T> {
        self.strategies.iter().find_map(|(name, strategy)| {
            let found = strategy(page);
            if found.is_some() {
                tracing::trace!(field = self.field, strategy = *name, "Field located");
            }
            found
        })
    }
}

pub(crate) const TANK_LEVEL: FieldStrategies<String> = FieldStrategies {
    field: "tank_level_percent",
    strategies: &[
        ("progressbar_aria_valuenow", progressbar_value),
        ("progress_element_value", progress_element_value),
    ],
};

pub(crate) const GALLONS_REMAINING: FieldStrategies<f64> = FieldStrategies {
    field: "gallons_remaining",
    strategies: &[("gallons_in_tank_block", gallons_in_block)],
};

pub(crate) const TANK_CAPACITY: FieldStrategies<f64> = FieldStrategies {
    field: "tank_capacity",
    strategies: &[("gallon_token", capacity_in_text_nodes)],
};

pub(crate) const FUEL_TYPE: FieldStrategies<String> = FieldStrategies {
    field: "fuel_type",
    strategies: &[
        ("label_in_parent", fuel_type_in_parent),
        ("label_in_block", fuel_type_in_block),
    ],
};

pub(crate) const LAST_DELIVERY_DATE: FieldStrategies<String> = FieldStrategies {
    field: "last_delivery_date",
    strategies: &[
        ("label_in_parent", delivery_date_in_parent),
        ("label_in_block", delivery_date_in_block),
    ],
};

pub(crate) const READING_DATE: FieldStrategies<String> = FieldStrategies {
    field: "reading_date",
    strategies: &[
        ("label_in_parent", reading_date_in_parent),
        ("label_in_block", reading_date_in_block),
    ],
};

pub(crate) const CURRENT_PRICE: FieldStrategies<f64> = FieldStrategies {
    field: "current_price",
    strategies: &[
        ("dollar_with_price_context", price_with_context),
        ("per_gallon_in_full_text", price_per_gallon_in_full_text),
    ],
};

fn first_attr(page: &Page, selector: &str, attr: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    page.document()
        .select(&selector)
        .next()
        .and_then(|element| element.value().attr(attr))
        .map(str::to_string)
}

fn progressbar_value(page: &Page) -> Option<String> {
    first_attr(page, r#"[role="progressbar"][aria-valuenow]"#, "aria-valuenow")
}

fn progress_element_value(page: &Page) -> Option<String> {
    first_attr(page, "progress[value]", "value")
}

fn gallons_in_block(page: &Page) -> Option<f64> {
    let selector = Selector::parse(&BLOCK_TAGS.join(", ")).ok()?;
    page.document().select(&selector).find_map(|block| {
        let text = element_text(block);
        RE_GALLONS_IN_TANK
            .captures(&text)
            .and_then(|caps| parse_number(&caps[1]))
    })
}

fn capacity_in_text_nodes(page: &Page) -> Option<f64> {
    page.text_nodes().find_map(|(_, text)| {
        RE_CAPACITY.captures_iter(text).find_map(|caps| {
            let number = caps.get(1)?;
            // "$2.50 gal" is a price, not a size
            if text[..number.start()].trim_end().ends_with('$') {
                return None;
            }
            // "41 gallons in tank" is the remaining volume
            let rest = text[caps.get(0)?.end()..].trim_start().to_lowercase();
            if rest.starts_with("in tank") {
                return None;
            }
            parse_number(number.as_str())
        })
    })
}

/// Where to look for a value once its label has been found
#[derive(Clone, Copy)]
enum Scope {
    Parent,
    Block,
}

/// Yields the scoped text around every text node matching `label`, with the
/// part following the label placed first
fn labelled_texts<'a>(
    page: &'a Page,
    label: &'a Regex,
    scope: Scope,
) -> impl Iterator<Item = String> + 'a {
    page.text_nodes().filter_map(move |(parent, text)| {
        if !label.is_match(text) {
            return None;
        }
        let container = match scope {
            Scope::Parent => Some(parent),
            Scope::Block => enclosing_block(parent),
        }?;
        let full = element_text(container);
        // Prefer what follows the label so an earlier date in the same block
        // does not shadow the labelled one
        let after = label
            .find(&full)
            .map(|m| full[m.end()..].to_string())
            .unwrap_or_default();
        Some(format!("{}\u{0}{}", after, full))
    })
}

fn date_near_label(page: &Page, label: &Regex, scope: Scope) -> Option<String> {
    labelled_texts(page, label, scope).find_map(|haystack| {
        RE_DATE
            .find(&haystack)
            .map(|m| m.as_str().to_string())
    })
}

fn delivery_date_in_parent(page: &Page) -> Option<String> {
    date_near_label(page, &RE_LAST_DELIVERY, Scope::Parent)
}

fn delivery_date_in_block(page: &Page) -> Option<String> {
    date_near_label(page, &RE_LAST_DELIVERY, Scope::Block)
}

fn reading_date_in_parent(page: &Page) -> Option<String> {
    date_near_label(page, &RE_READING_LABEL, Scope::Parent)
}

fn reading_date_in_block(page: &Page) -> Option<String> {
    date_near_label(page, &RE_READING_LABEL, Scope::Block)
}

fn fuel_type_near_label(page: &Page, scope: Scope) -> Option<String> {
    let texts: Vec<String> = page
        .text_nodes()
        .filter(|(_, text)| {
            let lower = text.to_lowercase();
            lower.contains("fuel type") || lower.contains("product")
        })
        .filter_map(|(parent, _)| match scope {
            Scope::Parent => Some(element_text(parent)),
            Scope::Block => enclosing_block(parent).map(element_text),
        })
        .collect();

    texts.iter().find_map(|text| {
        RE_FUEL_TYPE
            .captures(text)
            .map(|caps| caps[1].trim().to_string())
    })
}

fn fuel_type_in_parent(page: &Page) -> Option<String> {
    fuel_type_near_label(page, Scope::Parent)
}

fn fuel_type_in_block(page: &Page) -> Option<String> {
    fuel_type_near_label(page, Scope::Block)
}

fn price_with_context(page: &Page) -> Option<f64> {
    page.text_nodes().find_map(|(parent, text)| {
        let caps = RE_DOLLAR.captures(text)?;
        let context = element_text(parent).to_lowercase();
        if !PRICE_KEYWORDS.iter().any(|keyword| context.contains(keyword)) {
            return None;
        }
        parse_number(&caps[1])
    })
}

fn price_per_gallon_in_full_text(page: &Page) -> Option<f64> {
    let text = page.full_text();
    RE_PRICE_PER_GALLON
        .captures(&text)
        .and_then(|caps| parse_number(&caps[1]))
}
