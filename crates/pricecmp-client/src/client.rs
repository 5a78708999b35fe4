//! HTTP client for the comparison backend's search endpoint.

use std::time::Duration;

use pricecmp_core::AppConfig;
use reqwest::{Client, Url};

use crate::error::SearchError;
use crate::types::ComparisonResponse;

/// Path of the search endpoint, relative to the configured base URL.
pub const SEARCH_PATH: &str = "api/product-comparison/";

/// Client for `GET /api/product-comparison/?product=<query>`.
///
/// Each call issues exactly one request. Failures are not retried; the user
/// searches again instead.
pub struct ComparisonClient {
    client: Client,
    endpoint: Url,
}

impl ComparisonClient {
    /// Creates a client for the backend at `base_url`.
    ///
    /// `timeout_secs` bounds the whole request; `0` disables the bound.
    ///
    /// # Errors
    ///
    /// - [`SearchError::InvalidBaseUrl`] if `base_url` cannot be parsed.
    /// - [`SearchError::Http`] if the underlying `reqwest::Client` cannot be
    ///   constructed.
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, SearchError> {
        let endpoint = Self::endpoint_url(base_url)?;
        let mut builder = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent);
        if timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(timeout_secs));
        }
        Ok(Self {
            client: builder.build()?,
            endpoint,
        })
    }

    /// Creates a client from the loaded application config.
    ///
    /// # Errors
    ///
    /// See [`ComparisonClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, SearchError> {
        Self::new(
            &config.base_url,
            config.request_timeout_secs,
            &config.user_agent,
        )
    }

    /// Fetches comparison results for `query`.
    ///
    /// The query is trimmed first; an empty query fails before any request is
    /// made.
    ///
    /// # Errors
    ///
    /// - [`SearchError::EmptyQuery`]: query is empty or whitespace.
    /// - [`SearchError::Http`]: network, TLS or timeout failure.
    /// - [`SearchError::UnexpectedStatus`]: any non-2xx status.
    /// - [`SearchError::Deserialize`]: body is not a JSON object.
    pub async fn fetch(&self, query: &str) -> Result<ComparisonResponse, SearchError> {
        let query = validate_query(query)?;
        let url = self.search_url(query);
        tracing::debug!(%url, "querying comparison endpoint");

        let response = self
            .client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
                message: error_message_from_body(&body),
            });
        }

        let body = response.text().await?;
        serde_json::from_str::<ComparisonResponse>(&body).map_err(|e| SearchError::Deserialize {
            context: format!("comparison results for \"{query}\""),
            source: e,
        })
    }

    /// Builds the full request URL for a (validated) query.
    #[must_use]
    pub fn search_url(&self, query: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("product", query);
        url
    }

    /// Joins [`SEARCH_PATH`] onto `base_url`, keeping any path prefix.
    fn endpoint_url(base_url: &str) -> Result<Url, SearchError> {
        let base = format!("{}/", base_url.trim().trim_end_matches('/'));
        let invalid = |reason: String| SearchError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason,
        };
        let base = Url::parse(&base).map_err(|e| invalid(e.to_string()))?;
        if base.cannot_be_a_base() || !matches!(base.scheme(), "http" | "https") {
            return Err(invalid("expected an http(s) URL".to_owned()));
        }
        base.join(SEARCH_PATH).map_err(|e| invalid(e.to_string()))
    }
}

/// Trims `query` and rejects it when nothing is left.
///
/// # Errors
///
/// Returns [`SearchError::EmptyQuery`] for empty or whitespace-only input.
pub fn validate_query(query: &str) -> Result<&str, SearchError> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        Err(SearchError::EmptyQuery)
    } else {
        Ok(trimmed)
    }
}

/// Pulls the `error` string out of a failed response body, if there is one.
fn error_message_from_body(body: &str) -> Option<String> {
    serde_json::from_str::<ComparisonResponse>(body)
        .ok()
        .and_then(|r| r.backend_error())
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
