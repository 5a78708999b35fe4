use crate::price::PricePolicy;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Origin of the comparison backend, optionally with a path prefix.
    pub base_url: String,
    /// Overall request timeout; `0` disables it.
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub price_policy: PricePolicy,
    /// How long an error banner stays visible before it clears itself.
    pub error_dismiss_secs: u64,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            request_timeout_secs: 30,
            user_agent: "pricecmp/0.1 (price-comparison)".to_string(),
            price_policy: PricePolicy::Lenient,
            error_dismiss_secs: 5,
            log_level: "warn".to_string(),
        }
    }
}
