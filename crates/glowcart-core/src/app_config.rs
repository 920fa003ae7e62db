use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// Raw upstream base as configured; resolved to `.../wp-json/wc/v3` by the client.
    pub wc_api_url: String,
    pub wc_consumer_key: Option<String>,
    pub wc_consumer_secret: Option<String>,
    pub request_timeout_secs: u64,
    /// Upper bound the catalog store places on a whole category fetch.
    pub fetch_timeout_secs: u64,
    pub user_agent: String,
    pub per_page: u32,
    pub max_pages: u32,
    pub categories_path: PathBuf,
    pub cart_path: PathBuf,
}

impl AppConfig {
    /// Returns `true` when both WooCommerce credentials are present.
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        self.wc_consumer_key.is_some() && self.wc_consumer_secret.is_some()
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("wc_api_url", &self.wc_api_url)
            .field(
                "wc_consumer_key",
                &self.wc_consumer_key.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "wc_consumer_secret",
                &self.wc_consumer_secret.as_ref().map(|_| "[redacted]"),
            )
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("fetch_timeout_secs", &self.fetch_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("per_page", &self.per_page)
            .field("max_pages", &self.max_pages)
            .field("categories_path", &self.categories_path)
            .field("cart_path", &self.cart_path)
            .finish()
    }
}
