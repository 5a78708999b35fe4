pub mod app_config;
pub mod config;
pub mod price;
pub mod products;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use price::{extract_price, parse_price, PricePolicy};
pub use products::{Store, UnifiedProduct, WorkingSet, NAME_PLACEHOLDER, PRICE_PLACEHOLDER};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown store: {0}")]
    UnknownStore(String),

    #[error("unknown price policy: {0}")]
    UnknownPricePolicy(String),
}
