pub mod banner;
pub mod client;
pub mod controller;
pub mod error;
pub mod filter;
pub mod normalize;
pub mod render;
pub mod summary;
pub mod types;

pub use banner::ErrorBanner;
pub use client::{validate_query, ComparisonClient};
pub use controller::{ComparisonController, SearchOutcome, SearchTicket};
pub use error::{ErrorKind, SearchError};
pub use filter::{apply_filters, AvailabilityFilter, FilterParseError, FilterState, SortKey, StoreFilter};
pub use normalize::normalize_response;
pub use render::{build_view, Presenter, ProductCard, ResultsView, StoreBadge};
pub use summary::{summarize, Summary};
pub use types::{ComparisonResponse, RawProductRecord};
