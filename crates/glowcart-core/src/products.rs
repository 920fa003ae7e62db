//! Product shape as returned by the WooCommerce `wc/v3/products` endpoint.
//!
//! Only the fields the storefront reads are modelled; everything else in the
//! upstream payload is ignored by serde. Prices stay raw strings because the
//! upstream formats them freely (`"1,250.00"`, `""` for "no sale"); see
//! [`crate::pricing`] for interpretation.

use serde::{Deserialize, Serialize};

/// A product as fetched from the catalog. Never mutated by the client; a
/// re-fetch replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Server-assigned product ID. `0` is never issued by WooCommerce.
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    /// Current price as a decimal string. Empty for products without a price.
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub regular_price: String,
    /// Empty string when the product is not on sale.
    #[serde(default)]
    pub sale_price: String,
    /// Ordered gallery. The first image is the display image, the second (if
    /// any) is shown on hover.
    #[serde(default)]
    pub images: Vec<ProductImage>,
    /// Raw HTML, rendered verbatim.
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub stock_quantity: Option<i64>,
    #[serde(default)]
    pub stock_status: StockStatus,
    #[serde(default)]
    pub categories: Vec<ProductCategory>,
    #[serde(default)]
    pub tags: Vec<ProductTag>,
}

impl Product {
    #[must_use]
    pub fn display_image(&self) -> Option<&ProductImage> {
        self.images.first()
    }

    #[must_use]
    pub fn hover_image(&self) -> Option<&ProductImage> {
        self.images.get(1)
    }

    #[must_use]
    pub fn is_in_stock(&self) -> bool {
        matches!(self.stock_status, StockStatus::InStock)
    }

    /// Case-insensitive keyword match against category names, product name,
    /// and short description.
    #[must_use]
    pub fn mentions(&self, keyword: &str) -> bool {
        let needle = keyword.to_lowercase();
        self.categories
            .iter()
            .any(|c| c.name.to_lowercase().contains(&needle))
            || self.name.to_lowercase().contains(&needle)
            || self.short_description.to_lowercase().contains(&needle)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImage {
    pub src: String,
    #[serde(default)]
    pub alt: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductCategory {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductTag {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub slug: String,
}

/// Upstream stock status. Values WooCommerce may add later are kept verbatim
/// in [`StockStatus::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StockStatus {
    #[default]
    InStock,
    OutOfStock,
    OnBackorder,
    Other(String),
}

impl From<String> for StockStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "instock" => StockStatus::InStock,
            "outofstock" => StockStatus::OutOfStock,
            "onbackorder" => StockStatus::OnBackorder,
            _ => StockStatus::Other(raw),
        }
    }
}

impl From<StockStatus> for String {
    fn from(status: StockStatus) -> Self {
        status.to_string()
    }
}

impl std::fmt::Display for StockStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StockStatus::InStock => write!(f, "instock"),
            StockStatus::OutOfStock => write!(f, "outofstock"),
            StockStatus::OnBackorder => write!(f, "onbackorder"),
            StockStatus::Other(raw) => write!(f, "{raw}"),
        }
    }
}
