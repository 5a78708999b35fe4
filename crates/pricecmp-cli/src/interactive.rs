//! Line-oriented interactive front end.
//!
//! Each line is either a search or a selector change. Selector changes
//! re-filter the cached results without contacting the backend.

use std::io::Write;
use std::time::Instant;

use pricecmp_client::{
    AvailabilityFilter, ComparisonClient, ComparisonController, FilterParseError, Presenter,
    SortKey, StoreFilter,
};
use pricecmp_core::AppConfig;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::terminal::{OutputMode, TerminalPresenter};

pub(crate) const HELP: &str = "\
Commands:
  search <product>      search both stores (bare text works too)
  store <S>             all | startech | ryans
  availability <A>      all | available
  sort <K>              price-asc | price-desc | store-name
  show                  print the current results again
  help                  show this message
  quit                  exit";

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ReplCommand {
    Search(String),
    Store(StoreFilter),
    Availability(AvailabilityFilter),
    Sort(SortKey),
    Show,
    Help,
    Quit,
}

/// Parse one line of interactive input.
///
/// The first word selects the command; anything that is not a known command
/// is searched for verbatim. A blank line is an empty search, so it is
/// rejected by query validation like any other empty input.
///
/// # Errors
///
/// Returns [`FilterParseError`] when a selector command names an unknown
/// value.
pub(crate) fn parse_line(line: &str) -> Result<ReplCommand, FilterParseError> {
    let line = line.trim();
    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(word, rest)| (word, rest.trim()));

    let command = match word.to_ascii_lowercase().as_str() {
        "search" => ReplCommand::Search(rest.to_owned()),
        "store" => ReplCommand::Store(rest.parse()?),
        "availability" => ReplCommand::Availability(rest.parse()?),
        "sort" => ReplCommand::Sort(rest.parse()?),
        "show" if rest.is_empty() => ReplCommand::Show,
        "help" if rest.is_empty() => ReplCommand::Help,
        "quit" | "exit" if rest.is_empty() => ReplCommand::Quit,
        _ => ReplCommand::Search(line.to_owned()),
    };
    Ok(command)
}

/// Run the prompt loop until `quit` or end of input.
///
/// # Errors
///
/// Returns an error if stdin cannot be read.
pub(crate) async fn run_interactive(
    config: &AppConfig,
    client: &ComparisonClient,
) -> anyhow::Result<()> {
    let mut controller =
        ComparisonController::from_config(TerminalPresenter::stdio(OutputMode::Text), config);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    controller.presenter_mut().message(HELP);

    loop {
        controller.tick(Instant::now());
        controller.presenter_mut().prompt();

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = match parse_line(&line) {
            Ok(command) => command,
            Err(e) => {
                controller.presenter_mut().message(&e.to_string());
                continue;
            }
        };

        if !dispatch(&mut controller, client, command).await {
            break;
        }
    }

    Ok(())
}

/// Applies one command to the controller. Returns `false` on `quit`.
async fn dispatch<O: Write, E: Write>(
    controller: &mut ComparisonController<TerminalPresenter<O, E>>,
    client: &ComparisonClient,
    command: ReplCommand,
) -> bool {
    match command {
        ReplCommand::Search(query) => {
            let outcome = controller.search(client, &query).await;
            tracing::debug!(?outcome, "interactive search finished");
        }
        ReplCommand::Store(store) => {
            controller.set_store_filter(store);
        }
        ReplCommand::Availability(availability) => {
            controller.set_availability_filter(availability);
        }
        ReplCommand::Sort(sort) => {
            controller.set_sort(sort);
        }
        ReplCommand::Show => {
            let summary = controller.summary().clone();
            controller.presenter_mut().render_summary(&summary);
            controller.refresh();
        }
        ReplCommand::Help => controller.presenter_mut().message(HELP),
        ReplCommand::Quit => return false,
    }
    true
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pricecmp_client::ErrorKind;
    use pricecmp_core::{PricePolicy, Store};

    use super::*;

    fn recording_controller() -> ComparisonController<TerminalPresenter<Vec<u8>, Vec<u8>>> {
        ComparisonController::new(
            TerminalPresenter::new(Vec::new(), Vec::new(), OutputMode::Text),
            PricePolicy::Lenient,
            Duration::from_secs(5),
        )
    }

    #[test]
    fn bare_text_is_a_search() {
        assert_eq!(
            parse_line("  samsung 980 pro \n").unwrap(),
            ReplCommand::Search("samsung 980 pro".to_owned())
        );
    }

    #[test]
    fn search_keyword_takes_rest_of_line() {
        assert_eq!(
            parse_line("search  rtx 4060 ti").unwrap(),
            ReplCommand::Search("rtx 4060 ti".to_owned())
        );
    }

    #[test]
    fn search_keyword_alone_yields_empty_query() {
        assert_eq!(parse_line("search").unwrap(), ReplCommand::Search(String::new()));
    }

    #[test]
    fn selector_commands_parse_values() {
        assert_eq!(
            parse_line("store Ryans").unwrap(),
            ReplCommand::Store(StoreFilter::Only(Store::Ryans))
        );
        assert_eq!(
            parse_line("availability available").unwrap(),
            ReplCommand::Availability(AvailabilityFilter::Available)
        );
        assert_eq!(
            parse_line("SORT price-desc").unwrap(),
            ReplCommand::Sort(SortKey::PriceDesc)
        );
    }

    #[test]
    fn unknown_selector_value_is_an_error() {
        let err = parse_line("sort cheapest").unwrap_err();
        assert!(err.to_string().contains("cheapest"), "got: {err}");
        assert!(parse_line("store").is_err());
    }

    #[test]
    fn keywords_without_arguments() {
        assert_eq!(parse_line("show").unwrap(), ReplCommand::Show);
        assert_eq!(parse_line("help").unwrap(), ReplCommand::Help);
        assert_eq!(parse_line("quit").unwrap(), ReplCommand::Quit);
        assert_eq!(parse_line("exit").unwrap(), ReplCommand::Quit);
    }

    #[test]
    fn blank_line_is_an_empty_search() {
        assert_eq!(parse_line("").unwrap(), ReplCommand::Search(String::new()));
        assert_eq!(parse_line("   \t").unwrap(), ReplCommand::Search(String::new()));
    }

    #[test]
    fn keyword_followed_by_text_is_a_search() {
        assert_eq!(
            parse_line("show stoppers keyboard").unwrap(),
            ReplCommand::Search("show stoppers keyboard".to_owned())
        );
    }

    #[tokio::test]
    async fn blank_line_reports_validation_error() {
        // Validation fails before any request, so nothing listens here.
        let client = ComparisonClient::new("http://127.0.0.1:9", 1, "pricecmp-test/0.1")
            .expect("client should build");
        let mut controller = recording_controller();

        let command = parse_line("  ").unwrap();
        assert!(dispatch(&mut controller, &client, command).await);

        assert_eq!(
            controller.active_error().map(|b| b.kind),
            Some(ErrorKind::Validation)
        );
        let diagnostics = String::from_utf8(controller.presenter().diagnostics().clone())
            .expect("utf-8");
        assert_eq!(diagnostics, "error: please enter a product name to search\n");
    }

    #[tokio::test]
    async fn quit_stops_the_loop() {
        let client = ComparisonClient::new("http://127.0.0.1:9", 1, "pricecmp-test/0.1")
            .expect("client should build");
        let mut controller = recording_controller();
        assert!(!dispatch(&mut controller, &client, ReplCommand::Quit).await);
    }
}
