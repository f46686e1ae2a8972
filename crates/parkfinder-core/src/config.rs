use crate::app_config::{AppConfig, Environment};
use crate::geo::Coordinate;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
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
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default, so an empty environment yields the Chicago
/// deployment settings.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_miles = |var: &str, default: &str| -> Result<f64, ConfigError> {
        let miles = or_default(var, default)
            .parse::<f64>()
            .map_err(|e| invalid(var, e.to_string()))?;
        if !miles.is_finite() || miles < 0.0 {
            return Err(invalid(
                var,
                format!("{miles} is not a non-negative distance"),
            ));
        }
        Ok(miles)
    };

    let env = parse_environment(&or_default("PARKFINDER_ENV", "development"))?;
    let log_level = or_default("PARKFINDER_LOG_LEVEL", "info");
    let catalog_path = PathBuf::from(or_default(
        "PARKFINDER_CATALOG_PATH",
        "./config/catalog.yaml",
    ));

    let api_base_url = or_default("PARKFINDER_API_BASE_URL", "http://127.0.0.1:5002");
    if !(api_base_url.starts_with("http://") || api_base_url.starts_with("https://")) {
        return Err(invalid(
            "PARKFINDER_API_BASE_URL",
            format!("{api_base_url} must start with http:// or https://"),
        ));
    }
    let request_timeout_secs = parse_u64("PARKFINDER_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("PARKFINDER_USER_AGENT", "parkfinder/0.1");
    let max_retries = parse_u32("PARKFINDER_MAX_RETRIES", "3")?;
    let retry_backoff_base_ms = parse_u64("PARKFINDER_RETRY_BACKOFF_BASE_MS", "500")?;

    let initial_cursor = parse_u32("PARKFINDER_INITIAL_CURSOR", "6")?;
    let page_size = parse_u32("PARKFINDER_PAGE_SIZE", "5")?;
    if page_size == 0 {
        return Err(invalid(
            "PARKFINDER_PAGE_SIZE",
            "must be at least 1".to_string(),
        ));
    }

    let default_radius_miles = parse_miles("PARKFINDER_DEFAULT_RADIUS_MILES", "2")?;
    let region_name = or_default("PARKFINDER_REGION_NAME", "Illinois");
    if region_name.trim().is_empty() {
        return Err(invalid(
            "PARKFINDER_REGION_NAME",
            "must be non-empty".to_string(),
        ));
    }
    let region_center = or_default("PARKFINDER_REGION_CENTER", "41.8781,-87.6298")
        .parse::<Coordinate>()
        .map_err(|e| invalid("PARKFINDER_REGION_CENTER", e))?;
    let manual_search_threshold_miles =
        parse_miles("PARKFINDER_MANUAL_SEARCH_THRESHOLD_MILES", "75")?;

    Ok(AppConfig {
        env,
        log_level,
        catalog_path,
        api_base_url,
        request_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_ms,
        initial_cursor,
        page_size,
        default_radius_miles,
        region_name,
        region_center,
        manual_search_threshold_miles,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for anything other than
/// `development`, `test` or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "PARKFINDER_ENV".to_string(),
            reason: format!(
                "unrecognized value \"{other}\"; expected development, test, or production"
            ),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
