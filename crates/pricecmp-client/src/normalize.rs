//! Normalization from per-store comparison results to a [`WorkingSet`].
//!
//! Price parsing is delegated to [`pricecmp_core::price`]; this module
//! handles the merge order and the error short-circuit.

use pricecmp_core::{PricePolicy, Store, UnifiedProduct, WorkingSet};
use serde_json::Value;

use crate::error::SearchError;
use crate::types::{ComparisonResponse, RawProductRecord};

/// Normalizes a comparison response into the working set for `query`.
///
/// Records are merged StarTech first, then Ryans, each in the order the
/// backend returned them. Keys for stores we do not recognize are skipped.
///
/// # Errors
///
/// - [`SearchError::Backend`]: the response carries an `error` field; no
///   records are merged.
/// - [`SearchError::NoResults`]: no recognized store produced a record the
///   price policy accepts.
pub fn normalize_response(
    query: &str,
    response: &ComparisonResponse,
    policy: PricePolicy,
) -> Result<WorkingSet, SearchError> {
    if let Some(message) = response.backend_error() {
        return Err(SearchError::Backend(message));
    }

    for key in response.stores.keys() {
        if Store::from_key(key).is_none() {
            tracing::debug!(key, "ignoring unrecognized store in comparison response");
        }
    }

    let products: Vec<UnifiedProduct> = Store::ALL
        .into_iter()
        .flat_map(|store| normalize_store(store, response.records(store.key()), policy))
        .collect();

    if products.is_empty() {
        return Err(SearchError::NoResults {
            query: query.to_owned(),
        });
    }

    tracing::debug!(query, count = products.len(), "normalized comparison results");
    Ok(WorkingSet::new(query, products))
}

/// Normalizes one store's records, dropping those the price policy rejects.
pub fn normalize_store(
    store: Store,
    records: &[Value],
    policy: PricePolicy,
) -> Vec<UnifiedProduct> {
    records
        .iter()
        .filter_map(|value| normalize_record(store, RawProductRecord::from_value(value), policy))
        .collect()
}

/// Converts one raw record, or returns `None` when its price is rejected.
#[must_use]
pub fn normalize_record(
    store: Store,
    record: RawProductRecord,
    policy: PricePolicy,
) -> Option<UnifiedProduct> {
    // Treat empty strings as absent so placeholders apply.
    let name = record.name.filter(|s| !s.trim().is_empty());
    let price_display = record.price.filter(|s| !s.trim().is_empty());
    let url = record.url.filter(|s| !s.trim().is_empty());
    let description = record
        .description_html
        .filter(|s| !s.trim().is_empty())
        .or_else(|| record.description.filter(|s| !s.trim().is_empty()));

    let Some(price_value) = policy
        .price_for(price_display.as_deref())
        .filter(|p| *p >= 0.0)
    else {
        tracing::debug!(
            store = %store,
            price = price_display.as_deref().unwrap_or_default(),
            "dropping record with unusable price"
        );
        return None;
    };

    Some(UnifiedProduct {
        name,
        price_display,
        price_value,
        store,
        store_label: store.label().to_owned(),
        url,
        description,
    })
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
