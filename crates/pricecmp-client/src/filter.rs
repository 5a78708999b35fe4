//! Store/availability filtering and sorting of the working set.
//!
//! [`apply_filters`] is a pure function: the display set is rebuilt from the
//! full working set on every call, never patched.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use pricecmp_core::{Store, UnifiedProduct};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid {selector} \"{value}\" (expected one of: {expected})")]
pub struct FilterParseError {
    selector: &'static str,
    value: String,
    expected: &'static str,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum StoreFilter {
    #[default]
    All,
    Only(Store),
}

impl StoreFilter {
    #[must_use]
    pub fn matches(self, product: &UnifiedProduct) -> bool {
        match self {
            StoreFilter::All => true,
            StoreFilter::Only(store) => product.store == store,
        }
    }
}

impl fmt::Display for StoreFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreFilter::All => f.write_str("all"),
            StoreFilter::Only(store) => f.write_str(store.key()),
        }
    }
}

impl FromStr for StoreFilter {
    type Err = FilterParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim().to_ascii_lowercase();
        if value == "all" {
            return Ok(StoreFilter::All);
        }
        Store::from_key(&value)
            .map(StoreFilter::Only)
            .ok_or_else(|| FilterParseError {
                selector: "store",
                value: s.to_owned(),
                expected: "all, startech, ryans",
            })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AvailabilityFilter {
    #[default]
    All,
    /// Only products with a positive price.
    Available,
}

impl AvailabilityFilter {
    #[must_use]
    pub fn matches(self, product: &UnifiedProduct) -> bool {
        match self {
            AvailabilityFilter::All => true,
            AvailabilityFilter::Available => product.is_available(),
        }
    }
}

impl fmt::Display for AvailabilityFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AvailabilityFilter::All => f.write_str("all"),
            AvailabilityFilter::Available => f.write_str("available"),
        }
    }
}

impl FromStr for AvailabilityFilter {
    type Err = FilterParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(AvailabilityFilter::All),
            "available" => Ok(AvailabilityFilter::Available),
            _ => Err(FilterParseError {
                selector: "availability",
                value: s.to_owned(),
                expected: "all, available",
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    #[default]
    PriceAsc,
    PriceDesc,
    StoreName,
}

impl SortKey {
    fn compare(self, a: &UnifiedProduct, b: &UnifiedProduct) -> Ordering {
        match self {
            SortKey::PriceAsc => a.price_value.total_cmp(&b.price_value),
            SortKey::PriceDesc => b.price_value.total_cmp(&a.price_value),
            SortKey::StoreName => locale_cmp(&a.store_label, &b.store_label),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKey::PriceAsc => f.write_str("price-asc"),
            SortKey::PriceDesc => f.write_str("price-desc"),
            SortKey::StoreName => f.write_str("store-name"),
        }
    }
}

impl FromStr for SortKey {
    type Err = FilterParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "price-asc" => Ok(SortKey::PriceAsc),
            "price-desc" => Ok(SortKey::PriceDesc),
            "store-name" | "store" => Ok(SortKey::StoreName),
            _ => Err(FilterParseError {
                selector: "sort",
                value: s.to_owned(),
                expected: "price-asc, price-desc, store-name",
            }),
        }
    }
}

/// The three selector values that define the display set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FilterState {
    pub store: StoreFilter,
    pub availability: AvailabilityFilter,
    pub sort: SortKey,
}

/// Projects the working set through `filters`.
///
/// Sorting is stable: products that compare equal keep their merge order.
#[must_use]
pub fn apply_filters(products: &[UnifiedProduct], filters: FilterState) -> Vec<UnifiedProduct> {
    let mut projected: Vec<UnifiedProduct> = products
        .iter()
        .filter(|p| filters.store.matches(p) && filters.availability.matches(p))
        .cloned()
        .collect();
    projected.sort_by(|a, b| filters.sort.compare(a, b));
    projected
}

/// Case-insensitive comparison that falls back to ordinal order so the
/// result is total.
fn locale_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
