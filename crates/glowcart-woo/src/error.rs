use glowcart_core::FetchCause;
use thiserror::Error;

/// Longest upstream error body kept in an error value.
const MAX_ERROR_BODY_CHARS: usize = 512;

#[derive(Debug, Error)]
pub enum WooError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("endpoint not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}: {body}")]
    UnexpectedStatus {
        status: u16,
        url: String,
        body: String,
    },

    #[error("invalid API base URL \"{url}\": {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl WooError {
    /// Separates request timeouts from other transport failures.
    pub(crate) fn from_transport(err: reqwest::Error, url: &str) -> Self {
        if err.is_timeout() {
            WooError::Timeout {
                url: url.to_owned(),
            }
        } else {
            WooError::Http(err)
        }
    }

    pub(crate) fn truncate_body(body: &str) -> String {
        body.chars().take(MAX_ERROR_BODY_CHARS).collect()
    }
}

impl From<WooError> for FetchCause {
    fn from(err: WooError) -> Self {
        match &err {
            WooError::Timeout { .. } => FetchCause::Timeout,
            WooError::NotFound { .. } => FetchCause::Http {
                status: 404,
                body: String::new(),
            },
            WooError::UnexpectedStatus { status, body, .. } => FetchCause::Http {
                status: *status,
                body: body.clone(),
            },
            WooError::Deserialize { context, source } => {
                FetchCause::Decode(format!("{context}: {source}"))
            }
            WooError::Http(_) | WooError::InvalidBaseUrl { .. } => {
                FetchCause::Network(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unexpected_status_maps_to_http_cause() {
        let cause = FetchCause::from(WooError::UnexpectedStatus {
            status: 503,
            url: "https://shop.example.com/wp-json/wc/v3/products".into(),
            body: "maintenance".into(),
        });
        assert_eq!(
            cause,
            FetchCause::Http {
                status: 503,
                body: "maintenance".into()
            }
        );
    }

    #[test]
    fn timeout_maps_to_timeout_cause() {
        let cause = FetchCause::from(WooError::Timeout {
            url: "https://shop.example.com".into(),
        });
        assert_eq!(cause, FetchCause::Timeout);
    }

    #[test]
    fn not_found_maps_to_http_404() {
        let cause = FetchCause::from(WooError::NotFound {
            url: "https://shop.example.com/wp-json/wc/v3/products/9".into(),
        });
        assert!(matches!(cause, FetchCause::Http { status: 404, .. }));
    }

    #[test]
    fn deserialize_maps_to_decode_cause() {
        let source = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
        let cause = FetchCause::from(WooError::Deserialize {
            context: "products page 1".into(),
            source,
        });
        assert!(matches!(cause, FetchCause::Decode(ref m) if m.starts_with("products page 1")));
    }

    #[test]
    fn truncate_body_caps_length() {
        let long = "x".repeat(2_000);
        assert_eq!(WooError::truncate_body(&long).len(), MAX_ERROR_BODY_CHARS);
        assert_eq!(WooError::truncate_body("short"), "short");
    }
}
