//! Price extraction from store display strings.
//!
//! Stores render prices as free text: `"1,234৳"`, `"BDT 45,500"`,
//! `"Out of stock"`, `"Up Coming"`. Only the first run of digits and
//! thousands separators is read, so a decimal part such as `".50"` is
//! dropped: `"BDT 1,234.50"` parses as `1234`.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::CoreError;

static PRICE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9,]+").expect("valid price regex"));

/// Parses the first digit/comma run in `text`.
///
/// Returns `None` when no run exists or the run holds no digits (a lone
/// `","`). A literal zero parses as `Some(0.0)`. A run too long to fit in an
/// `f64` overflows to infinity and is treated as unreadable too, so every
/// stored price stays finite and serializes as a JSON number.
#[must_use]
pub fn parse_price(text: &str) -> Option<f64> {
    let run = PRICE_RUN.find(text)?;
    let digits: String = run.as_str().chars().filter(|c| *c != ',').collect();
    let value = digits.parse::<f64>().ok()?;
    value.is_finite().then_some(value)
}

/// Parses a display price, treating anything unparseable as `0`.
///
/// Never returns a negative number.
#[must_use]
pub fn extract_price(text: &str) -> f64 {
    parse_price(text).unwrap_or(0.0)
}

/// How records with an unreadable price are treated during normalization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PricePolicy {
    /// Unreadable or missing prices count as `0` and the record is kept as
    /// unavailable.
    #[default]
    Lenient,
    /// Records whose price cannot be read are dropped. An explicit zero is
    /// still kept.
    Strict,
}

impl PricePolicy {
    /// Returns the numeric price to store for a record, or `None` when the
    /// record must be excluded.
    #[must_use]
    pub fn price_for(self, price_display: Option<&str>) -> Option<f64> {
        match self {
            PricePolicy::Lenient => Some(price_display.map_or(0.0, extract_price)),
            PricePolicy::Strict => price_display.and_then(parse_price),
        }
    }
}

impl fmt::Display for PricePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PricePolicy::Lenient => f.write_str("lenient"),
            PricePolicy::Strict => f.write_str("strict"),
        }
    }
}

impl FromStr for PricePolicy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lenient" => Ok(PricePolicy::Lenient),
            "strict" => Ok(PricePolicy::Strict),
            _ => Err(CoreError::UnknownPricePolicy(s.to_owned())),
        }
    }
}
