use std::time::{Duration, Instant};

use crate::error::{ErrorKind, SearchError};

/// An error message that clears itself after a fixed interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorBanner {
    pub message: String,
    pub kind: ErrorKind,
    raised_at: Instant,
    ttl: Duration,
}

impl ErrorBanner {
    #[must_use]
    pub fn new(message: impl Into<String>, kind: ErrorKind, ttl: Duration, now: Instant) -> Self {
        Self {
            message: message.into(),
            kind,
            raised_at: now,
            ttl,
        }
    }

    #[must_use]
    pub fn from_error(err: &SearchError, ttl: Duration, now: Instant) -> Self {
        Self::new(err.to_string(), err.kind(), ttl, now)
    }

    #[must_use]
    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.raised_at) >= self.ttl
    }
}
