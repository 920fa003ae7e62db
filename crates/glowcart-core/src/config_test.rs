use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

/// Returns a map with all required env vars populated with valid defaults.
fn full_env<'a>() -> HashMap<&'a str, &'a str> {
    let mut m = HashMap::new();
    m.insert("GLOWCART_WC_API_URL", "https://shop.example.com");
    m
}

#[test]
fn parse_environment_development() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
}

#[test]
fn parse_environment_production() {
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "GLOWCART_ENV"));
}

#[test]
fn build_app_config_fails_without_api_url() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "GLOWCART_WC_API_URL"),
        "expected MissingEnvVar(GLOWCART_WC_API_URL), got: {result:?}"
    );
}

#[test]
fn build_app_config_treats_blank_api_url_as_missing() {
    let mut map = HashMap::new();
    map.insert("GLOWCART_WC_API_URL", "   ");
    let result = build_app_config(lookup_from_map(&map));
    assert!(matches!(result, Err(ConfigError::MissingEnvVar(_))));
}

#[test]
fn build_app_config_succeeds_with_defaults() {
    let map = full_env();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.wc_api_url, "https://shop.example.com");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.request_timeout_secs, 10);
    assert_eq!(cfg.fetch_timeout_secs, 10);
    assert_eq!(cfg.user_agent, "glowcart/0.1 (storefront)");
    assert_eq!(cfg.per_page, 100);
    assert_eq!(cfg.max_pages, 1);
    assert_eq!(
        cfg.categories_path.to_string_lossy(),
        "./config/categories.yaml"
    );
    assert_eq!(cfg.cart_path.to_string_lossy(), "./cart.json");
    assert!(!cfg.has_credentials());
}

#[test]
fn build_app_config_reads_credentials() {
    let mut map = full_env();
    map.insert("GLOWCART_WC_CONSUMER_KEY", "ck_test");
    map.insert("GLOWCART_WC_CONSUMER_SECRET", "cs_test");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.has_credentials());
    assert_eq!(cfg.wc_consumer_key.as_deref(), Some("ck_test"));
}

#[test]
fn build_app_config_rejects_per_page_above_upstream_limit() {
    let mut map = full_env();
    map.insert("GLOWCART_PER_PAGE", "250");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "GLOWCART_PER_PAGE"),
        "expected InvalidEnvVar(GLOWCART_PER_PAGE), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_zero_fetch_timeout() {
    let mut map = full_env();
    map.insert("GLOWCART_FETCH_TIMEOUT_SECS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "GLOWCART_FETCH_TIMEOUT_SECS")
    );
}

#[test]
fn build_app_config_rejects_non_numeric_timeout() {
    let mut map = full_env();
    map.insert("GLOWCART_REQUEST_TIMEOUT_SECS", "soon");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "GLOWCART_REQUEST_TIMEOUT_SECS")
    );
}

#[test]
fn debug_output_redacts_credentials() {
    let mut map = full_env();
    map.insert("GLOWCART_WC_CONSUMER_KEY", "ck_live_secret");
    map.insert("GLOWCART_WC_CONSUMER_SECRET", "cs_live_secret");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let debug = format!("{cfg:?}");
    assert!(!debug.contains("ck_live_secret"));
    assert!(!debug.contains("cs_live_secret"));
    assert!(debug.contains("[redacted]"));
}
