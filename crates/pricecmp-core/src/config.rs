use crate::app_config::AppConfig;
use crate::price::PricePolicy;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to an invalid value.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to an invalid value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable is optional; unset variables take the [`AppConfig::default`]
/// value.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let defaults = AppConfig::default();

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: u64| -> Result<u64, ConfigError> {
        match lookup(var) {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|e| ConfigError::InvalidEnvVar {
                    var: var.to_string(),
                    reason: e.to_string(),
                }),
            Err(_) => Ok(default),
        }
    };

    let base_url = parse_base_url(&or_default("PRICECMP_BASE_URL", &defaults.base_url))?;
    let request_timeout_secs =
        parse_u64("PRICECMP_REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs)?;
    let user_agent = or_default("PRICECMP_USER_AGENT", &defaults.user_agent);
    let price_policy = parse_price_policy(lookup("PRICECMP_PRICE_POLICY").ok())?;
    let error_dismiss_secs = parse_u64("PRICECMP_ERROR_DISMISS_SECS", defaults.error_dismiss_secs)?;
    let log_level = or_default("PRICECMP_LOG_LEVEL", &defaults.log_level);

    Ok(AppConfig {
        base_url,
        request_timeout_secs,
        user_agent,
        price_policy,
        error_dismiss_secs,
        log_level,
    })
}

/// Accepts `http://` and `https://` URLs and strips any trailing slash so the
/// endpoint path can be appended directly.
fn parse_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let has_host = trimmed
        .strip_prefix("http://")
        .or_else(|| trimmed.strip_prefix("https://"))
        .is_some_and(|rest| !rest.is_empty());
    if has_host {
        Ok(trimmed.to_string())
    } else {
        Err(ConfigError::InvalidEnvVar {
            var: "PRICECMP_BASE_URL".to_string(),
            reason: format!("expected an http(s) URL, got \"{raw}\""),
        })
    }
}

fn parse_price_policy(raw: Option<String>) -> Result<PricePolicy, ConfigError> {
    match raw {
        None => Ok(PricePolicy::default()),
        Some(value) => value
            .parse::<PricePolicy>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: "PRICECMP_PRICE_POLICY".to_string(),
                reason: e.to_string(),
            }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
