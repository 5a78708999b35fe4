use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Everything that can stop a search from producing a working set.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("please enter a product name to search")]
    EmptyQuery,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}{}", detail_suffix(.message.as_deref()))]
    UnexpectedStatus {
        status: u16,
        url: String,
        /// `error` text from the response body, when the backend sent one.
        message: Option<String>,
    },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    /// The backend answered but reported a failure in its `error` field.
    /// Displayed verbatim.
    #[error("{0}")]
    Backend(String),

    #[error("no products found for \"{query}\"")]
    NoResults { query: String },
}

fn detail_suffix(message: Option<&str>) -> String {
    message.map(|m| format!(": {m}")).unwrap_or_default()
}

/// The four user-facing error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Fetch,
    Backend,
    NoResults,
}

impl SearchError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            SearchError::EmptyQuery => ErrorKind::Validation,
            SearchError::Http(_)
            | SearchError::UnexpectedStatus { .. }
            | SearchError::Deserialize { .. }
            | SearchError::InvalidBaseUrl { .. } => ErrorKind::Fetch,
            SearchError::Backend(_) => ErrorKind::Backend,
            SearchError::NoResults { .. } => ErrorKind::NoResults,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::Validation => "validation",
            ErrorKind::Fetch => "fetch",
            ErrorKind::Backend => "backend",
            ErrorKind::NoResults => "no results",
        };
        f.write_str(s)
    }
}
