use std::path::PathBuf;

use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is present but its value is invalid.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process.
///
/// Unlike [`load_config`], this does NOT load `.env` files — useful for
/// testing or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is present but its value is invalid.
pub fn load_config_from_env() -> Result<AppConfig, ConfigError> {
    build_config(|key| std::env::var(key))
}

/// Build configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual
/// environment so it can be tested with a pure `HashMap` lookup.
///
/// Every variable has a default, so an empty environment is valid.
fn build_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let api_url = or_default("BOOKCAP_API_URL", "https://api.publishnexus.ai/v1/capture");
    let log_level = or_default("BOOKCAP_LOG_LEVEL", "info");
    let request_timeout_secs = parse_u64("BOOKCAP_REQUEST_TIMEOUT_SECS", "10")?;
    let user_agent = or_default("BOOKCAP_USER_AGENT", "bookcap/0.1 (book-capture)");
    let max_retries = parse_u32("BOOKCAP_MAX_RETRIES", "1")?;
    let retry_backoff_base_secs = parse_u64("BOOKCAP_RETRY_BACKOFF_BASE_SECS", "1")?;
    let daily_capture_limit = parse_u32("BOOKCAP_DAILY_LIMIT", "150")?;
    let limit_state_path = PathBuf::from(or_default(
        "BOOKCAP_LIMIT_STATE_PATH",
        "./.bookcap/captures.json",
    ));

    Ok(AppConfig {
        api_url,
        log_level,
        request_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_secs,
        daily_capture_limit,
        limit_state_path,
    })
}
