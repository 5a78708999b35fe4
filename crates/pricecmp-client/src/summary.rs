use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use pricecmp_core::WorkingSet;
use serde::Serialize;

/// Aggregate counts for the summary region.
///
/// Derived from the working set only; filter and sort changes never
/// change it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Number of distinct stores with at least one product.
    pub store_count: usize,
    pub product_count: usize,
    pub query: Option<String>,
    pub fetched_at: Option<DateTime<Utc>>,
}

impl Summary {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.product_count == 0
    }
}

#[must_use]
pub fn summarize(set: &WorkingSet) -> Summary {
    let stores: BTreeSet<_> = set.products.iter().map(|p| p.store).collect();
    Summary {
        store_count: stores.len(),
        product_count: set.products.len(),
        query: Some(set.query.clone()),
        fetched_at: Some(set.fetched_at),
    }
}
