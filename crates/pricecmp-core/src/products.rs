use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Name shown when a store sent a record without a product name.
pub const NAME_PLACEHOLDER: &str = "Unknown product";

/// Text shown when a store sent a record without a price.
pub const PRICE_PLACEHOLDER: &str = "Price not available";

/// A retail source the comparison backend knows how to search.
///
/// Declaration order is the merge order: results from [`Store::StarTech`]
/// always precede results from [`Store::Ryans`] before any sort is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Store {
    StarTech,
    Ryans,
}

impl Store {
    /// Every recognized store, in merge order.
    pub const ALL: [Store; 2] = [Store::StarTech, Store::Ryans];

    /// Key under which the backend returns this store's results.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Store::StarTech => "startech",
            Store::Ryans => "ryans",
        }
    }

    /// Human-readable name for badges and sorting.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Store::StarTech => "StarTech",
            Store::Ryans => "Ryans",
        }
    }

    /// Looks up a store by its backend key. Returns `None` for keys the
    /// backend may add that we do not know how to display.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Store> {
        Store::ALL.into_iter().find(|s| s.key() == key)
    }
}

impl fmt::Display for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Store {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Store::from_key(&s.trim().to_ascii_lowercase())
            .ok_or_else(|| CoreError::UnknownStore(s.to_owned()))
    }
}

/// A product record from either store, flattened into one shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnifiedProduct {
    pub name: Option<String>,
    /// Price exactly as the store displayed it, e.g. `"1,234৳"`.
    pub price_display: Option<String>,
    /// Numeric price parsed from `price_display`. Never negative; `0.0`
    /// means the store showed no usable price (usually out of stock).
    pub price_value: f64,
    pub store: Store,
    pub store_label: String,
    pub url: Option<String>,
    /// Product summary; the stores send an HTML `<ul>` fragment.
    pub description: Option<String>,
}

impl UnifiedProduct {
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(NAME_PLACEHOLDER)
    }

    #[must_use]
    pub fn display_price(&self) -> &str {
        self.price_display.as_deref().unwrap_or(PRICE_PLACEHOLDER)
    }

    /// Heuristic stock signal: a positive price means the store is selling it.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.price_value > 0.0
    }
}

/// The full normalized result of the most recent successful search.
///
/// Built once per search and never edited afterwards; a new search produces
/// a new `WorkingSet`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkingSet {
    pub query: String,
    pub fetched_at: DateTime<Utc>,
    pub products: Vec<UnifiedProduct>,
}

impl WorkingSet {
    #[must_use]
    pub fn new(query: impl Into<String>, products: Vec<UnifiedProduct>) -> Self {
        Self {
            query: query.into(),
            fetched_at: Utc::now(),
            products,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
