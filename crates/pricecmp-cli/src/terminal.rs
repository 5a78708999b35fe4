//! Terminal rendering for the comparison controller.
//!
//! Results go to the output stream; the loading indicator and error banner go
//! to the diagnostic stream so piped output only carries results.

use std::io::{self, Write};
use std::sync::LazyLock;

use pricecmp_client::{ErrorBanner, Presenter, ProductCard, ResultsView, Summary};
use regex::Regex;

static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid HTML tag regex"));

/// `&amp;` is decoded last so an escaped entity is not decoded twice.
const ENTITIES: [(&str, &str); 6] = [
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&nbsp;", " "),
    ("&amp;", "&"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OutputMode {
    Text,
    /// Only the results grid is written, as a JSON array of cards.
    Json,
}

pub(crate) struct TerminalPresenter<O, E> {
    out: O,
    err: E,
    mode: OutputMode,
}

impl TerminalPresenter<io::Stdout, io::Stderr> {
    pub(crate) fn stdio(mode: OutputMode) -> Self {
        Self::new(io::stdout(), io::stderr(), mode)
    }
}

impl<O: Write, E: Write> TerminalPresenter<O, E> {
    pub(crate) fn new(out: O, err: E, mode: OutputMode) -> Self {
        Self { out, err, mode }
    }

    /// Writes the interactive prompt and flushes it.
    pub(crate) fn prompt(&mut self) {
        let result = write!(self.out, "> ").and_then(|()| self.out.flush());
        log_write_failure(result);
    }

    /// Writes free-form text (help, parse errors) to the output stream.
    pub(crate) fn message(&mut self, text: &str) {
        log_write_failure(writeln!(self.out, "{text}"));
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> (O, E) {
        (self.out, self.err)
    }

    #[cfg(test)]
    pub(crate) fn diagnostics(&self) -> &E {
        &self.err
    }

    fn write_results(&mut self, view: &ResultsView) -> io::Result<()> {
        if self.mode == OutputMode::Json {
            let json = serde_json::to_string_pretty(view.cards()).map_err(io::Error::other)?;
            return writeln!(self.out, "{json}");
        }

        match view {
            ResultsView::Empty { message } => writeln!(self.out, "{message}"),
            ResultsView::Cards { cards } => {
                for card in cards {
                    write_card(&mut self.out, card)?;
                }
                Ok(())
            }
        }
    }
}

impl<O: Write, E: Write> Presenter for TerminalPresenter<O, E> {
    fn set_loading(&mut self, loading: bool) {
        if loading && self.mode == OutputMode::Text {
            log_write_failure(writeln!(self.err, "Searching..."));
        }
    }

    fn render_summary(&mut self, summary: &Summary) {
        if self.mode == OutputMode::Json || summary.is_empty() {
            return;
        }
        let query = summary.query.as_deref().unwrap_or_default();
        log_write_failure(writeln!(
            self.out,
            "Found {} products from {} stores for \"{query}\"\n",
            summary.product_count, summary.store_count
        ));
    }

    fn render_results(&mut self, view: ResultsView) {
        let result = self.write_results(&view).and_then(|()| self.out.flush());
        log_write_failure(result);
    }

    fn show_error(&mut self, banner: &ErrorBanner) {
        log_write_failure(writeln!(self.err, "error: {}", banner.message));
    }

    fn clear_error(&mut self) {}
}

fn write_card(out: &mut impl Write, card: &ProductCard) -> io::Result<()> {
    writeln!(out, "[{}] {}", card.badge.label, card.name)?;
    writeln!(out, "    {}", card.price)?;
    if let Some(description) = card.description.as_deref() {
        let text = strip_html(description);
        if !text.is_empty() {
            writeln!(out, "    {text}")?;
        }
    }
    writeln!(out, "    {}", card.link)?;
    writeln!(out)
}

/// Reduces a description fragment to a single line of plain text.
pub(crate) fn strip_html(html: &str) -> String {
    let mut text = HTML_TAG.replace_all(html, " ").into_owned();
    for (entity, replacement) in ENTITIES {
        text = text.replace(entity, replacement);
    }
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn log_write_failure(result: io::Result<()>) {
    if let Err(e) = result {
        tracing::warn!(error = %e, "failed to write to terminal");
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use pricecmp_client::ErrorKind;
    use pricecmp_core::{Store, UnifiedProduct};

    use super::*;

    fn card(description: Option<&str>) -> ProductCard {
        ProductCard::from_product(&UnifiedProduct {
            name: Some("WD Black SN770 1TB".to_owned()),
            price_display: Some("9,800৳".to_owned()),
            price_value: 9_800.0,
            store: Store::StarTech,
            store_label: "StarTech".to_owned(),
            url: None,
            description: description.map(str::to_owned),
        })
    }

    fn render(mode: OutputMode, view: ResultsView) -> String {
        let mut presenter = TerminalPresenter::new(Vec::new(), Vec::new(), mode);
        presenter.render_results(view);
        let (out, _) = presenter.into_inner();
        String::from_utf8(out).expect("utf-8 output")
    }

    #[test]
    fn strip_html_removes_tags_and_collapses_whitespace() {
        let html = "<ul>\n  <li>PCIe 4.0</li>\n  <li>5150 MB/s</li>\n</ul>";
        assert_eq!(strip_html(html), "PCIe 4.0 5150 MB/s");
    }

    #[test]
    fn strip_html_decodes_entities_once() {
        assert_eq!(
            strip_html("Tom&#39;s &quot;pick&quot; &amp; more&nbsp;&lt;3 &amp;lt;"),
            "Tom's \"pick\" & more <3 &lt;"
        );
    }

    #[test]
    fn strip_html_of_tags_only_is_empty() {
        assert_eq!(strip_html("<p></p><br/>"), "");
    }

    #[test]
    fn text_card_shows_badge_price_description_and_link() {
        let output = render(
            OutputMode::Text,
            ResultsView::Cards {
                cards: vec![card(Some("<b>NVMe</b> drive"))],
            },
        );
        assert_eq!(
            output,
            "[StarTech] WD Black SN770 1TB\n    9,800৳\n    NVMe drive\n    #\n\n"
        );
    }

    #[test]
    fn text_card_without_description_skips_the_line() {
        let output = render(
            OutputMode::Text,
            ResultsView::Cards {
                cards: vec![card(None)],
            },
        );
        assert_eq!(output, "[StarTech] WD Black SN770 1TB\n    9,800৳\n    #\n\n");
    }

    #[test]
    fn empty_view_prints_its_message() {
        let output = render(OutputMode::Text, ResultsView::empty("nothing here"));
        assert_eq!(output, "nothing here\n");
    }

    #[test]
    fn json_mode_prints_card_array() {
        let output = render(
            OutputMode::Json,
            ResultsView::Cards {
                cards: vec![card(None)],
            },
        );
        let parsed: serde_json::Value = serde_json::from_str(&output).expect("valid json");
        let cards = parsed.as_array().expect("array");
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0]["name"], "WD Black SN770 1TB");
        assert_eq!(cards[0]["badge"]["style"], "startech");
        assert_eq!(cards[0]["link"], "#");
        assert!(cards[0].get("description").is_none());
    }

    #[test]
    fn json_mode_prints_empty_array_for_empty_view() {
        let output = render(OutputMode::Json, ResultsView::empty("nothing here"));
        assert_eq!(output.trim(), "[]");
    }

    #[test]
    fn errors_and_loading_go_to_diagnostic_stream() {
        let mut presenter = TerminalPresenter::new(Vec::new(), Vec::new(), OutputMode::Text);
        presenter.set_loading(true);
        presenter.set_loading(false);
        presenter.show_error(&ErrorBanner::new(
            "rate limited",
            ErrorKind::Backend,
            Duration::from_secs(5),
            Instant::now(),
        ));
        let (out, err) = presenter.into_inner();
        assert!(out.is_empty());
        assert_eq!(
            String::from_utf8(err).expect("utf-8"),
            "Searching...\nerror: rate limited\n"
        );
    }

    #[test]
    fn summary_line_names_query_and_counts() {
        let mut presenter = TerminalPresenter::new(Vec::new(), Vec::new(), OutputMode::Text);
        presenter.render_summary(&Summary {
            store_count: 2,
            product_count: 7,
            query: Some("ssd".to_owned()),
            fetched_at: None,
        });
        presenter.render_summary(&Summary::default());
        let (out, _) = presenter.into_inner();
        assert_eq!(
            String::from_utf8(out).expect("utf-8"),
            "Found 7 products from 2 stores for \"ssd\"\n\n"
        );
    }
}
