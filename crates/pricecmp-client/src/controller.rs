//! Owner of the widget state.
//!
//! [`ComparisonController`] holds the working set, the display set, the
//! selector values, the loading flag and the error banner, and is the only
//! thing that changes them. Every change ends with a full re-render through
//! its [`Presenter`].
//!
//! Searches are split into [`ComparisonController::begin_search`] and
//! [`ComparisonController::complete_search`] so callers can keep several
//! requests in flight. Each begin issues a new sequence number; a completion
//! carrying an older number is dropped, so a slow early response can never
//! overwrite a newer one.

use std::time::{Duration, Instant};

use pricecmp_core::{AppConfig, PricePolicy, UnifiedProduct, WorkingSet};

use crate::banner::ErrorBanner;
use crate::client::{validate_query, ComparisonClient};
use crate::error::{ErrorKind, SearchError};
use crate::filter::{apply_filters, AvailabilityFilter, FilterState, SortKey, StoreFilter};
use crate::normalize::normalize_response;
use crate::render::{build_view, Presenter, ResultsView, NO_RESULTS_MESSAGE};
use crate::summary::{summarize, Summary};
use crate::types::ComparisonResponse;

/// Handle for one in-flight search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    sequence: u64,
    query: String,
}

impl SearchTicket {
    /// The trimmed query to send.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    #[must_use]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

/// What a completed search did to the widget.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// A new working set was loaded.
    Loaded(Summary),
    /// The search succeeded but no store returned a usable product.
    NoResults,
    /// The search failed; the message is on the error banner.
    Failed { kind: ErrorKind, message: String },
    /// A newer search was started before this one completed; nothing changed.
    Stale,
}

pub struct ComparisonController<P> {
    presenter: P,
    price_policy: PricePolicy,
    error_ttl: Duration,
    filters: FilterState,
    working_set: Option<WorkingSet>,
    display_set: Vec<UnifiedProduct>,
    summary: Summary,
    banner: Option<ErrorBanner>,
    latest_request: u64,
    loading: bool,
}

impl<P: Presenter> ComparisonController<P> {
    #[must_use]
    pub fn new(presenter: P, price_policy: PricePolicy, error_ttl: Duration) -> Self {
        Self {
            presenter,
            price_policy,
            error_ttl,
            filters: FilterState::default(),
            working_set: None,
            display_set: Vec::new(),
            summary: Summary::default(),
            banner: None,
            latest_request: 0,
            loading: false,
        }
    }

    #[must_use]
    pub fn from_config(presenter: P, config: &AppConfig) -> Self {
        Self::new(
            presenter,
            config.price_policy,
            Duration::from_secs(config.error_dismiss_secs),
        )
    }

    /// Presets the selector values without rendering.
    #[must_use]
    pub fn with_filters(mut self, filters: FilterState) -> Self {
        self.filters = filters;
        self
    }

    /// Runs one search end to end against `client`.
    pub async fn search(&mut self, client: &ComparisonClient, query: &str) -> SearchOutcome {
        let ticket = match self.begin_search(query) {
            Ok(ticket) => ticket,
            Err(err) => return failed(&err),
        };
        let result = client.fetch(ticket.query()).await;
        self.complete_search(&ticket, result)
    }

    /// Validates `query` and marks a new search as in flight.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::EmptyQuery`] for blank input. The error is also
    /// shown on the banner and no search is started.
    pub fn begin_search(&mut self, query: &str) -> Result<SearchTicket, SearchError> {
        let query = match validate_query(query) {
            Ok(q) => q.to_owned(),
            Err(err) => {
                tracing::debug!(error = %err, "rejected search");
                self.raise(&err);
                return Err(err);
            }
        };

        self.latest_request += 1;
        self.dismiss_error();
        self.set_loading(true);
        tracing::info!(sequence = self.latest_request, query, "search started");

        Ok(SearchTicket {
            sequence: self.latest_request,
            query,
        })
    }

    /// Applies the result of the search identified by `ticket`.
    ///
    /// Completions for anything but the most recently started search are
    /// discarded and leave the loading indicator raised for the newer one.
    pub fn complete_search(
        &mut self,
        ticket: &SearchTicket,
        result: Result<ComparisonResponse, SearchError>,
    ) -> SearchOutcome {
        if ticket.sequence != self.latest_request {
            tracing::debug!(
                sequence = ticket.sequence,
                latest = self.latest_request,
                query = ticket.query,
                "discarding stale search response"
            );
            return SearchOutcome::Stale;
        }

        self.set_loading(false);

        match result.and_then(|r| normalize_response(&ticket.query, &r, self.price_policy)) {
            Ok(set) => {
                tracing::info!(
                    query = ticket.query,
                    products = set.products.len(),
                    "search loaded"
                );
                self.summary = summarize(&set);
                self.working_set = Some(set);
                self.presenter.render_summary(&self.summary);
                self.refresh();
                SearchOutcome::Loaded(self.summary.clone())
            }
            Err(err) => {
                self.clear_working_set();
                if err.kind() == ErrorKind::NoResults {
                    tracing::info!(query = ticket.query, "search returned no usable products");
                    self.presenter
                        .render_results(ResultsView::empty(err.to_string()));
                    SearchOutcome::NoResults
                } else {
                    tracing::warn!(query = ticket.query, error = %err, "search failed");
                    self.refresh();
                    self.raise(&err);
                    failed(&err)
                }
            }
        }
    }

    /// Replaces all three selector values and re-renders.
    pub fn set_filters(&mut self, filters: FilterState) -> &[UnifiedProduct] {
        self.filters = filters;
        self.refresh();
        &self.display_set
    }

    pub fn set_store_filter(&mut self, store: StoreFilter) -> &[UnifiedProduct] {
        self.set_filters(FilterState {
            store,
            ..self.filters
        })
    }

    pub fn set_availability_filter(&mut self, availability: AvailabilityFilter) -> &[UnifiedProduct] {
        self.set_filters(FilterState {
            availability,
            ..self.filters
        })
    }

    pub fn set_sort(&mut self, sort: SortKey) -> &[UnifiedProduct] {
        self.set_filters(FilterState {
            sort,
            ..self.filters
        })
    }

    /// Recomputes the display set from the working set and redraws the grid.
    ///
    /// Without a working set the grid shows [`NO_RESULTS_MESSAGE`], since
    /// there is nothing the filters could be hiding.
    pub fn refresh(&mut self) {
        let Some(set) = self.working_set.as_ref() else {
            self.display_set.clear();
            self.presenter
                .render_results(ResultsView::empty(NO_RESULTS_MESSAGE));
            return;
        };
        self.display_set = apply_filters(&set.products, self.filters);
        self.presenter.render_results(build_view(&self.display_set));
    }

    /// Clears the error banner once its interval has elapsed. Returns `true`
    /// if a banner was cleared.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.banner.as_ref().is_some_and(|b| b.is_expired(now)) {
            self.dismiss_error();
            return true;
        }
        false
    }

    #[must_use]
    pub fn working_set(&self) -> Option<&WorkingSet> {
        self.working_set.as_ref()
    }

    #[must_use]
    pub fn display_set(&self) -> &[UnifiedProduct] {
        &self.display_set
    }

    #[must_use]
    pub fn summary(&self) -> &Summary {
        &self.summary
    }

    #[must_use]
    pub fn filters(&self) -> FilterState {
        self.filters
    }

    #[must_use]
    pub fn active_error(&self) -> Option<&ErrorBanner> {
        self.banner.as_ref()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
        self.presenter.set_loading(loading);
    }

    fn clear_working_set(&mut self) {
        self.working_set = None;
        self.display_set.clear();
        self.summary = Summary::default();
        self.presenter.render_summary(&self.summary);
    }

    fn raise(&mut self, err: &SearchError) {
        let banner = ErrorBanner::from_error(err, self.error_ttl, Instant::now());
        self.presenter.show_error(&banner);
        self.banner = Some(banner);
    }

    fn dismiss_error(&mut self) {
        if self.banner.take().is_some() {
            self.presenter.clear_error();
        }
    }
}

fn failed(err: &SearchError) -> SearchOutcome {
    SearchOutcome::Failed {
        kind: err.kind(),
        message: err.to_string(),
    }
}

#[cfg(test)]
#[path = "controller_test.rs"]
mod tests;
