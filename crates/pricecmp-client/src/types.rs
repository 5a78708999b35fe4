//! Wire types for `GET /api/product-comparison/`.
//!
//! ## Observed shape
//!
//! ```json
//! { "startech": [ { "url": "...", "name": "...", "price": "45,500৳", "description": "<ul>...</ul>" } ],
//!   "ryans":    [ { "url": "...", "name": "...", "price": "Tk 45,000", "description": "<ul>...</ul>" }, {} ] }
//! ```
//!
//! - Failures come back as `{"error": "..."}`, usually with status 400.
//! - The Ryans scraper emits `{}` for product pages it could not parse, so
//!   every record field is optional.
//! - Store keys are open-ended; unknown keys are kept in [`ComparisonResponse::stores`]
//!   and ignored during normalization.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Top-level body of a comparison response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ComparisonResponse {
    /// Present when the backend failed. Usually a string; `null` means absent.
    #[serde(default)]
    pub error: Option<Value>,

    /// Every other key, by store name. Values are expected to be arrays of
    /// records but are not validated until normalization.
    #[serde(flatten)]
    pub stores: Map<String, Value>,
}

impl ComparisonResponse {
    /// Returns the backend's error message, if the response reports one.
    ///
    /// Empty strings, `false`, `0` and `null` do not count as errors; any
    /// other non-string value is reported via its JSON text.
    #[must_use]
    pub fn backend_error(&self) -> Option<String> {
        match self.error.as_ref()? {
            Value::Null | Value::Bool(false) => None,
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s.clone()),
            Value::Number(n) if n.as_f64() == Some(0.0) => None,
            other => Some(other.to_string()),
        }
    }

    /// Raw records returned under `key`, or an empty slice when the key is
    /// absent or not an array.
    #[must_use]
    pub fn records(&self, key: &str) -> &[Value] {
        self.stores
            .get(key)
            .and_then(Value::as_array)
            .map_or(&[], Vec::as_slice)
    }
}

/// One product record as a store scraper produced it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawProductRecord {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,

    /// Display price, e.g. `"1,234৳"` or `"Out Of Stock"`.
    #[serde(default, deserialize_with = "lenient_text")]
    pub price: Option<String>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub url: Option<String>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub description_html: Option<String>,
}

impl RawProductRecord {
    /// Reads a record from an arbitrary JSON value. Anything that is not an
    /// object becomes an empty record.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(_) => Self::deserialize(value).unwrap_or_default(),
            _ => {
                tracing::debug!(%value, "non-object product record treated as empty");
                Self::default()
            }
        }
    }
}

/// Accepts strings and numbers; every other JSON type is treated as absent.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}
