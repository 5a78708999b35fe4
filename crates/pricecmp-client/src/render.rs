//! View model for the results grid and the presentation seam.
//!
//! [`build_view`] constructs a fresh [`ResultsView`] from the display set on
//! every call. A [`Presenter`] receives the whole view and replaces whatever
//! it showed before; nothing is diffed or reused.

use pricecmp_core::{Store, UnifiedProduct};
use serde::Serialize;

use crate::banner::ErrorBanner;
use crate::summary::Summary;

/// Link target for products the store sent without a URL.
pub const NO_LINK: &str = "#";

/// Placeholder shown while no search has loaded any products.
pub const NO_RESULTS_MESSAGE: &str = "No results to show.";

/// Placeholder shown when the current filters leave nothing to display.
pub const EMPTY_FILTER_MESSAGE: &str = "No products match the current filters. Try adjusting them.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreBadge {
    pub label: String,
    /// Stable style key for the badge, one per store.
    pub style: &'static str,
}

impl StoreBadge {
    #[must_use]
    pub fn for_store(store: Store, label: &str) -> Self {
        Self {
            label: label.to_owned(),
            style: store.key(),
        }
    }
}

/// One rendered product.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductCard {
    pub badge: StoreBadge,
    pub name: String,
    pub price: String,
    pub price_value: f64,
    /// Present iff the product carries a description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub link: String,
}

impl ProductCard {
    #[must_use]
    pub fn from_product(product: &UnifiedProduct) -> Self {
        Self {
            badge: StoreBadge::for_store(product.store, &product.store_label),
            name: product.display_name().to_owned(),
            price: product.display_price().to_owned(),
            price_value: product.price_value,
            description: product.description.clone(),
            link: product.url.clone().unwrap_or_else(|| NO_LINK.to_owned()),
        }
    }
}

/// Complete contents of the results grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResultsView {
    /// Nothing to show; render `message` instead of an empty grid.
    Empty { message: String },
    Cards { cards: Vec<ProductCard> },
}

impl ResultsView {
    #[must_use]
    pub fn empty(message: impl Into<String>) -> Self {
        ResultsView::Empty {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn cards(&self) -> &[ProductCard] {
        match self {
            ResultsView::Empty { .. } => &[],
            ResultsView::Cards { cards } => cards,
        }
    }
}

/// Builds the view for a display set.
#[must_use]
pub fn build_view(products: &[UnifiedProduct]) -> ResultsView {
    if products.is_empty() {
        return ResultsView::empty(EMPTY_FILTER_MESSAGE);
    }
    ResultsView::Cards {
        cards: products.iter().map(ProductCard::from_product).collect(),
    }
}

/// The surface the controller draws on.
///
/// Implementations own all formatting; the controller only decides what is
/// shown and when.
pub trait Presenter {
    fn set_loading(&mut self, loading: bool);

    fn render_summary(&mut self, summary: &Summary);

    /// Replaces the entire results grid with `view`.
    fn render_results(&mut self, view: ResultsView);

    fn show_error(&mut self, banner: &ErrorBanner);

    fn clear_error(&mut self);
}
