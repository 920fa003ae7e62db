//! Multi-page product fetch loops for `WooClient`.

use glowcart_core::{CategoryDefinition, CategoryQuery, Product};

use crate::error::WooError;
use crate::pagination::has_next_page;

use super::WooClient;

impl WooClient {
    /// Fetches products for `query`, following pages up to the configured
    /// page budget. Reaching the budget is not an error; the pages fetched so
    /// far are returned.
    ///
    /// **All-or-nothing**: if any page fails, products from earlier pages are
    /// discarded and the error returned, so a cached category is never
    /// replaced by a truncated list.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Self::fetch_products_page`].
    pub async fn fetch_products(&self, query: &CategoryQuery) -> Result<Vec<Product>, WooError> {
        let per_page = query.per_page.unwrap_or(self.per_page);
        let mut all_products: Vec<Product> = Vec::new();
        let mut page = 1u32;

        loop {
            let response = self.fetch_products_page(query, page).await?;
            let returned = response.products.len();
            all_products.extend(response.products);

            if page >= self.max_pages
                || !has_next_page(page, response.total_pages, returned, per_page)
            {
                break;
            }
            page += 1;
        }

        Ok(all_products)
    }

    /// Fetches the products of one logical category: runs the definition's
    /// upstream query, then applies its keyword filter and limit.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Self::fetch_products`].
    pub async fn fetch_category(
        &self,
        definition: &CategoryDefinition,
    ) -> Result<Vec<Product>, WooError> {
        let products = self.fetch_products(&definition.query).await?;
        let fetched = products.len();
        let selected = definition.select(products);
        tracing::debug!(
            category = %definition.key,
            fetched,
            selected = selected.len(),
            "category products selected"
        );
        Ok(selected)
    }
}
