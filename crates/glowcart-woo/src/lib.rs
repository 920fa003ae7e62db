pub mod client;
pub mod error;
pub mod pagination;

pub use client::{resolve_api_base, ProductPage, WooClient, WooCredentials};
pub use error::WooError;
