pub mod app_config;
pub mod categories;
pub mod config;
pub mod pricing;
pub mod products;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use categories::{
    load_category_definitions, CategoryDefinition, CategoryDefinitions, CategoryKey, CategoryQuery,
};
pub use config::{load_app_config, load_app_config_from_env};
pub use pricing::{format_currency, parse_price, PriceDisplay, DEFAULT_CURRENCY_SYMBOL};
pub use products::{Product, ProductCategory, ProductImage, ProductTag, StockStatus};

/// Raised when a caller names a category the storefront does not know about.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("unknown category key \"{0}\"")]
    UnknownCategory(String),
}

/// Why an upstream call failed, reduced to what callers can act on.
///
/// `Clone` so a single coalesced failure can be handed to every waiter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchCause {
    #[error("network error: {0}")]
    Network(String),

    #[error("upstream returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("request timed out")]
    Timeout,

    #[error("malformed upstream response: {0}")]
    Decode(String),

    #[error("request was cancelled")]
    Cancelled,

    /// The injected fetch panicked; the message is the panic payload.
    #[error("fetch panicked: {0}")]
    Panicked(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read categories file {path}: {source}")]
    CategoriesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse categories file: {0}")]
    CategoriesFileParse(#[source] serde_yaml::Error),

    #[error(transparent)]
    Category(#[from] ConfigurationError),

    #[error("categories validation failed: {0}")]
    Validation(String),
}
