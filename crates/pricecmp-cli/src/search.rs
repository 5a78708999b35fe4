//! One-shot `search` command handler.

use std::process::ExitCode;

use pricecmp_client::{ComparisonClient, ComparisonController, FilterState, SearchOutcome};
use pricecmp_core::AppConfig;

use crate::terminal::{OutputMode, TerminalPresenter};

/// Run a single search with `filters` preset and print the display set.
///
/// Validation, fetch and backend failures are reported on stderr and turn
/// into a failing exit status; a search that finds nothing exits cleanly.
pub(crate) async fn run_search(
    config: &AppConfig,
    client: &ComparisonClient,
    query: &str,
    filters: FilterState,
    json: bool,
) -> ExitCode {
    let mode = if json {
        OutputMode::Json
    } else {
        OutputMode::Text
    };
    let mut controller =
        ComparisonController::from_config(TerminalPresenter::stdio(mode), config)
            .with_filters(filters);

    let outcome = controller.search(client, query).await;
    tracing::debug!(?outcome, "search finished");

    if is_failure(&outcome) {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

pub(crate) fn is_failure(outcome: &SearchOutcome) -> bool {
    matches!(outcome, SearchOutcome::Failed { .. })
}
