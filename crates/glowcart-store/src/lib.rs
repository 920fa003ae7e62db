//! In-process storefront state: the category product cache and the cart.
//!
//! Neither store talks to the network directly. Callers inject the fetch (or
//! remote sync) as a closure returning a future, which keeps the stores
//! independent of any particular HTTP client.

pub mod cart;
pub mod catalog;
pub mod error;
pub mod storefront;

pub use cart::{AddOutcome, CartEntry, CartSnapshot, CartStore};
pub use catalog::{
    CategoryFetchState, CategoryStatus, FetchResult, PendingFetch, ProductCatalogStore,
    ProductList, DEFAULT_FETCH_TIMEOUT,
};
pub use error::{AddItemCause, AddItemError, CatalogFetchError, ConfigurationError};
pub use storefront::Storefront;
