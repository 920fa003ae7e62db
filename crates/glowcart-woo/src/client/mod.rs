//! HTTP client for the WooCommerce `wc/v3` REST API.

mod base;
mod fetch_all;

use std::time::Duration;

use glowcart_core::{AppConfig, CategoryQuery, Product};
use reqwest::{Client, Url};

use crate::error::WooError;
use crate::pagination::{parse_total_pages, TOTAL_PAGES_HEADER};

pub use base::resolve_api_base;

/// Hard ceiling on pages fetched for one query, whatever the configuration says.
pub(super) const MAX_PAGES: u32 = 50;

/// Consumer key/secret pair sent as query parameters.
#[derive(Clone)]
pub struct WooCredentials {
    pub consumer_key: String,
    pub consumer_secret: String,
}

impl std::fmt::Debug for WooCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WooCredentials")
            .field("consumer_key", &"[redacted]")
            .field("consumer_secret", &"[redacted]")
            .finish()
    }
}

/// One page of products plus the upstream page count, when reported.
#[derive(Debug)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub total_pages: Option<u32>,
}

/// HTTP client for WooCommerce product endpoints.
///
/// Non-2xx responses, timeouts, and undecodable bodies come back as typed
/// [`WooError`]s. Nothing is retried here; retry policy belongs to callers.
///
/// Clones share the underlying connection pool.
#[derive(Clone)]
pub struct WooClient {
    pub(super) client: Client,
    pub(super) base_url: Url,
    credentials: Option<WooCredentials>,
    pub(super) per_page: u32,
    pub(super) max_pages: u32,
}

impl WooClient {
    /// Creates a client with the given request timeout and `User-Agent`.
    ///
    /// Defaults to 100 products per page and a single page per query; see
    /// [`Self::with_paging`].
    ///
    /// # Errors
    ///
    /// Returns [`WooError::InvalidBaseUrl`] if `api_url` cannot be resolved,
    /// or [`WooError::Http`] if the underlying `reqwest::Client` cannot be built.
    pub fn new(
        api_url: &str,
        credentials: Option<WooCredentials>,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, WooError> {
        let base_url = resolve_api_base(api_url)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        if credentials.is_none() {
            tracing::warn!(
                base_url = %base_url,
                "WooCommerce credentials not configured; set GLOWCART_WC_CONSUMER_KEY and GLOWCART_WC_CONSUMER_SECRET"
            );
        }

        Ok(Self {
            client,
            base_url,
            credentials,
            per_page: 100,
            max_pages: 1,
        })
    }

    /// Builds a client from application configuration.
    ///
    /// # Errors
    ///
    /// Same as [`Self::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, WooError> {
        let credentials = match (&config.wc_consumer_key, &config.wc_consumer_secret) {
            (Some(key), Some(secret)) => Some(WooCredentials {
                consumer_key: key.clone(),
                consumer_secret: secret.clone(),
            }),
            _ => None,
        };
        Ok(Self::new(
            &config.wc_api_url,
            credentials,
            config.request_timeout_secs,
            &config.user_agent,
        )?
        .with_paging(config.per_page, config.max_pages))
    }

    /// Sets the default page size (clamped to 1..=100) and the number of pages
    /// followed per query (clamped to 1..=[`MAX_PAGES`]).
    #[must_use]
    pub fn with_paging(mut self, per_page: u32, max_pages: u32) -> Self {
        self.per_page = per_page.clamp(1, 100);
        self.max_pages = max_pages.clamp(1, MAX_PAGES);
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Fetches one page of `GET products` for `query`.
    ///
    /// # Errors
    ///
    /// - [`WooError::Timeout`] if the request exceeds the client timeout.
    /// - [`WooError::UnexpectedStatus`] / [`WooError::NotFound`] for non-2xx.
    /// - [`WooError::Http`] on other transport failures.
    /// - [`WooError::Deserialize`] if the body is not a product array.
    pub async fn fetch_products_page(
        &self,
        query: &CategoryQuery,
        page: u32,
    ) -> Result<ProductPage, WooError> {
        let url = self.products_url(query, page)?;
        let display_url = strip_query(&url);
        tracing::debug!(url = %display_url, page, "fetching products page");

        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| WooError::from_transport(e, &display_url))?;
        let response = Self::check_status(response, &display_url).await?;

        let total_pages = parse_total_pages(
            response
                .headers()
                .get(TOTAL_PAGES_HEADER)
                .and_then(|v| v.to_str().ok()),
        );

        let body = response
            .text()
            .await
            .map_err(|e| WooError::from_transport(e, &display_url))?;
        let products =
            serde_json::from_str::<Vec<Product>>(&body).map_err(|e| WooError::Deserialize {
                context: format!("products page {page} from {display_url}"),
                source: e,
            })?;

        Ok(ProductPage {
            products,
            total_pages,
        })
    }

    /// Fetches a single product by ID. A 404 yields `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Any [`WooError`] other than not-found.
    pub async fn fetch_product(&self, id: u64) -> Result<Option<Product>, WooError> {
        let mut url = self.endpoint(&format!("products/{id}"))?;
        self.authenticate(&mut url);
        let display_url = strip_query(&url);

        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| WooError::from_transport(e, &display_url))?;

        let response = match Self::check_status(response, &display_url).await {
            Ok(response) => response,
            Err(WooError::NotFound { .. }) => {
                tracing::debug!(product_id = id, "product not found upstream");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let body = response
            .text()
            .await
            .map_err(|e| WooError::from_transport(e, &display_url))?;
        let product =
            serde_json::from_str::<Product>(&body).map_err(|e| WooError::Deserialize {
                context: format!("product {id}"),
                source: e,
            })?;
        Ok(Some(product))
    }

    /// Full-text product search (`?search=`), first page only.
    ///
    /// # Errors
    ///
    /// Same as [`Self::fetch_products_page`].
    pub async fn search_products(&self, term: &str) -> Result<Vec<Product>, WooError> {
        let query = CategoryQuery {
            search: Some(term.to_owned()),
            ..CategoryQuery::default()
        };
        Ok(self.fetch_products_page(&query, 1).await?.products)
    }

    async fn check_status(
        response: reqwest::Response,
        display_url: &str,
    ) -> Result<reqwest::Response, WooError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(WooError::NotFound {
                url: display_url.to_owned(),
            });
        }

        // Error bodies are JSON or plain text; keep whatever is readable.
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(status = status.as_u16(), url = display_url, "upstream returned error status");
        Err(WooError::UnexpectedStatus {
            status: status.as_u16(),
            url: display_url.to_owned(),
            body: WooError::truncate_body(&body),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, WooError> {
        self.base_url
            .join(path)
            .map_err(|e| WooError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: format!("cannot join \"{path}\": {e}"),
            })
    }

    fn authenticate(&self, url: &mut Url) {
        if let Some(creds) = &self.credentials {
            url.query_pairs_mut()
                .append_pair("consumer_key", &creds.consumer_key)
                .append_pair("consumer_secret", &creds.consumer_secret);
        }
    }

    /// Builds the `products` URL for `query` and `page`, credentials included.
    pub(super) fn products_url(&self, query: &CategoryQuery, page: u32) -> Result<Url, WooError> {
        let mut url = self.endpoint("products")?;
        {
            let mut pairs = url.query_pairs_mut();
            let per_page = query.per_page.unwrap_or(self.per_page);
            pairs.append_pair("per_page", &per_page.to_string());
            pairs.append_pair("page", &page.to_string());
            if let Some(orderby) = &query.orderby {
                pairs.append_pair("orderby", orderby);
            }
            if let Some(order) = &query.order {
                pairs.append_pair("order", order);
            }
            if let Some(category) = query.category {
                pairs.append_pair("category", &category.to_string());
            }
            if let Some(tag) = query.tag {
                pairs.append_pair("tag", &tag.to_string());
            }
            if let Some(search) = &query.search {
                pairs.append_pair("search", search);
            }
        }
        self.authenticate(&mut url);
        Ok(url)
    }
}

/// Drops the query string so credentials never reach logs or error messages.
fn strip_query(url: &Url) -> String {
    let mut clean = url.clone();
    clean.set_query(None);
    clean.to_string()
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
