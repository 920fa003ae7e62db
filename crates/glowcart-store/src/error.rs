use glowcart_core::{CategoryKey, FetchCause};
use thiserror::Error;

pub use glowcart_core::ConfigurationError;

/// A category fetch that did not produce a product list.
///
/// Recorded on the category's state and returned to every caller that awaited
/// the fetch. Never retried by the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to fetch category {key}: {cause}")]
pub struct CatalogFetchError {
    pub key: CategoryKey,
    #[source]
    pub cause: FetchCause,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to add product {product_id} to cart: {cause}")]
pub struct AddItemError {
    pub product_id: u64,
    #[source]
    pub cause: AddItemCause,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddItemCause {
    #[error("quantity must be a positive integer")]
    InvalidQuantity,

    #[error("product has no valid id")]
    InvalidProduct,

    /// The remote side of the add failed before anything was merged locally.
    #[error(transparent)]
    Sync(#[from] FetchCause),
}
