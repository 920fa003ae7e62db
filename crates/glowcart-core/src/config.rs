use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
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
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let optional = |var: &str| -> Option<String> { lookup(var).ok().filter(|v| !v.is_empty()) };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u32_in = |var: &str, default: &str, min: u32, max: u32| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        let value = raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })?;
        if !(min..=max).contains(&value) {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("{value} is outside {min}..={max}"),
            });
        }
        Ok(value)
    };

    let non_zero = |var: &str, value: u64| -> Result<u64, ConfigError> {
        if value == 0 {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(value)
    };

    let wc_api_url = require("GLOWCART_WC_API_URL")?;
    let wc_consumer_key = optional("GLOWCART_WC_CONSUMER_KEY");
    let wc_consumer_secret = optional("GLOWCART_WC_CONSUMER_SECRET");

    let env = parse_environment(&or_default("GLOWCART_ENV", "development"))?;
    let log_level = or_default("GLOWCART_LOG_LEVEL", "info");

    let request_timeout_secs = non_zero(
        "GLOWCART_REQUEST_TIMEOUT_SECS",
        parse_u64("GLOWCART_REQUEST_TIMEOUT_SECS", "10")?,
    )?;
    let fetch_timeout_secs = non_zero(
        "GLOWCART_FETCH_TIMEOUT_SECS",
        parse_u64("GLOWCART_FETCH_TIMEOUT_SECS", "10")?,
    )?;
    let user_agent = or_default("GLOWCART_USER_AGENT", "glowcart/0.1 (storefront)");
    let per_page = parse_u32_in("GLOWCART_PER_PAGE", "100", 1, 100)?;
    let max_pages = parse_u32_in("GLOWCART_MAX_PAGES", "1", 1, 50)?;

    let categories_path = PathBuf::from(or_default(
        "GLOWCART_CATEGORIES_PATH",
        "./config/categories.yaml",
    ));
    let cart_path = PathBuf::from(or_default("GLOWCART_CART_PATH", "./cart.json"));

    Ok(AppConfig {
        env,
        log_level,
        wc_api_url,
        wc_consumer_key,
        wc_consumer_secret,
        request_timeout_secs,
        fetch_timeout_secs,
        user_agent,
        per_page,
        max_pages,
        categories_path,
        cart_path,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for anything other than
/// `development`, `test`, or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "GLOWCART_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
