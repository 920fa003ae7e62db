//! API base resolution for the WooCommerce REST namespace.

use reqwest::Url;

use crate::error::WooError;

const WC_NAMESPACE: &str = "/wp-json/wc/v3";

/// Resolves a configured site or API URL to the `wc/v3` namespace root.
///
/// Accepts a bare site (`https://shop.example.com`), the WordPress REST root
/// (`.../wp-json`), or the namespace itself (`.../wp-json/wc/v3`). The result
/// always ends in `/` so endpoint paths can be joined onto it.
///
/// # Errors
///
/// Returns [`WooError::InvalidBaseUrl`] for relative paths (there is no
/// same-origin proxy outside a browser), non-HTTP schemes, or unparsable input.
pub fn resolve_api_base(raw: &str) -> Result<Url, WooError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let invalid = |reason: String| WooError::InvalidBaseUrl {
        url: raw.to_owned(),
        reason,
    };

    if trimmed.is_empty() {
        return Err(invalid("empty URL".to_owned()));
    }
    if trimmed.starts_with('/') {
        return Err(invalid(
            "relative API base needs a same-origin proxy; configure an absolute URL".to_owned(),
        ));
    }

    let namespaced = if trimmed.contains(WC_NAMESPACE) || trimmed.ends_with("/wc/v3") {
        trimmed.to_owned()
    } else if trimmed.ends_with("/wp-json") {
        format!("{trimmed}/wc/v3")
    } else {
        format!("{trimmed}{WC_NAMESPACE}")
    };

    let url = Url::parse(&format!("{namespaced}/")).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme \"{}\"", url.scheme())));
    }
    Ok(url)
}
