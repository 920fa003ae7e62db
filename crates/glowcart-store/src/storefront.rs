use std::time::Duration;

use crate::cart::CartStore;
use crate::catalog::ProductCatalogStore;

/// The storefront's shared state: one catalog and one cart.
///
/// Build once at startup and hand out clones; every clone points at the same
/// stores.
#[derive(Clone, Default)]
pub struct Storefront {
    catalog: ProductCatalogStore,
    cart: CartStore,
}

impl Storefront {
    #[must_use]
    pub fn new(fetch_timeout: Duration) -> Self {
        Self {
            catalog: ProductCatalogStore::new(fetch_timeout),
            cart: CartStore::new(),
        }
    }

    #[must_use]
    pub fn catalog(&self) -> &ProductCatalogStore {
        &self.catalog
    }

    #[must_use]
    pub fn cart(&self) -> &CartStore {
        &self.cart
    }
}
