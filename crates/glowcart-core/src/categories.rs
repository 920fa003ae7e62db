//! Logical product categories and how each one maps onto an upstream query.
//!
//! The set of [`CategoryKey`]s is fixed at compile time. What each key fetches
//! (upstream filters, keyword filter, limit, empty-state message) comes from
//! [`CategoryDefinitions::builtin`] and may be overridden per key by
//! `config/categories.yaml`.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::products::Product;
use crate::{ConfigError, ConfigurationError};

/// Upstream maximum for `per_page`.
pub const MAX_PER_PAGE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CategoryKey {
    BestSellers,
    AllProducts,
    WhatsNew,
    RoutineBuilder,
    Acne,
    Pigmentation,
    Hairfall,
    DullSkin,
    Detan,
    DamagedHair,
    SunCare,
    LipBalm,
    HairCare1,
}

impl CategoryKey {
    pub const ALL: [CategoryKey; 13] = [
        CategoryKey::BestSellers,
        CategoryKey::AllProducts,
        CategoryKey::WhatsNew,
        CategoryKey::RoutineBuilder,
        CategoryKey::Acne,
        CategoryKey::Pigmentation,
        CategoryKey::Hairfall,
        CategoryKey::DullSkin,
        CategoryKey::Detan,
        CategoryKey::DamagedHair,
        CategoryKey::SunCare,
        CategoryKey::LipBalm,
        CategoryKey::HairCare1,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CategoryKey::BestSellers => "bestSellers",
            CategoryKey::AllProducts => "allProducts",
            CategoryKey::WhatsNew => "whatsNew",
            CategoryKey::RoutineBuilder => "routineBuilder",
            CategoryKey::Acne => "acne",
            CategoryKey::Pigmentation => "pigmentation",
            CategoryKey::Hairfall => "hairfall",
            CategoryKey::DullSkin => "dullSkin",
            CategoryKey::Detan => "detan",
            CategoryKey::DamagedHair => "damagedHair",
            CategoryKey::SunCare => "sunCare",
            CategoryKey::LipBalm => "lipBalm",
            CategoryKey::HairCare1 => "hairCare1",
        }
    }
}

impl FromStr for CategoryKey {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CategoryKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| ConfigurationError::UnknownCategory(s.to_owned()))
    }
}

impl std::fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Upstream filters for `GET wc/v3/products`. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryQuery {
    #[serde(default)]
    pub orderby: Option<String>,
    #[serde(default)]
    pub order: Option<String>,
    /// WooCommerce category ID.
    #[serde(default)]
    pub category: Option<u64>,
    /// WooCommerce tag ID.
    #[serde(default)]
    pub tag: Option<u64>,
    #[serde(default)]
    pub search: Option<String>,
    /// Overrides the configured page size for this category.
    #[serde(default)]
    pub per_page: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDefinition {
    pub key: CategoryKey,
    pub query: CategoryQuery,
    /// Client-side keyword filter applied after fetching.
    pub keyword: Option<String>,
    /// Keep only the first `limit` products after filtering.
    pub limit: Option<usize>,
    /// Shown in place of the product grid when the category is empty or failed.
    pub empty_message: String,
}

impl CategoryDefinition {
    fn new(key: CategoryKey, empty_message: &str) -> Self {
        Self {
            key,
            query: CategoryQuery::default(),
            keyword: None,
            limit: None,
            empty_message: empty_message.to_owned(),
        }
    }

    fn ordered_by(mut self, orderby: &str, order: Option<&str>) -> Self {
        self.query.orderby = Some(orderby.to_owned());
        self.query.order = order.map(str::to_owned);
        self
    }

    fn keyword(mut self, keyword: &str) -> Self {
        self.keyword = Some(keyword.to_owned());
        self
    }

    fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Applies the keyword filter and limit to an upstream product list,
    /// preserving server order.
    #[must_use]
    pub fn select(&self, products: Vec<Product>) -> Vec<Product> {
        let filtered = products
            .into_iter()
            .filter(|p| self.keyword.as_deref().is_none_or(|kw| p.mentions(kw)));
        match self.limit {
            Some(limit) => filtered.take(limit).collect(),
            None => filtered.collect(),
        }
    }
}

/// One definition per [`CategoryKey`].
#[derive(Debug, Clone)]
pub struct CategoryDefinitions {
    by_key: HashMap<CategoryKey, CategoryDefinition>,
}

impl CategoryDefinitions {
    #[must_use]
    pub fn builtin() -> Self {
        use CategoryKey as K;

        let defs = [
            CategoryDefinition::new(K::BestSellers, "No best sellers to show right now")
                .ordered_by("popularity", None)
                .limit(6),
            CategoryDefinition::new(K::AllProducts, "No products found"),
            CategoryDefinition::new(K::WhatsNew, "Nothing new yet. Check back soon")
                .ordered_by("date", Some("desc"))
                .limit(6),
            CategoryDefinition::new(K::RoutineBuilder, "No routine products available").limit(6),
            CategoryDefinition::new(K::Acne, "No acne care products found").keyword("acne"),
            CategoryDefinition::new(K::Pigmentation, "No pigmentation products found")
                .keyword("pigmentation"),
            CategoryDefinition::new(K::Hairfall, "No hairfall products found").keyword("hairfall"),
            CategoryDefinition::new(K::DullSkin, "No dull skin products found").keyword("dull"),
            CategoryDefinition::new(K::Detan, "No detan products found").keyword("detan"),
            CategoryDefinition::new(K::DamagedHair, "No damaged hair products found")
                .keyword("damaged"),
            CategoryDefinition::new(K::SunCare, "No sun care products found").keyword("sun"),
            CategoryDefinition::new(K::LipBalm, "No lip balms found").keyword("lip"),
            CategoryDefinition::new(K::HairCare1, "No hair care products found").keyword("hair"),
        ];

        Self {
            by_key: defs.into_iter().map(|d| (d.key, d)).collect(),
        }
    }

    /// Every key has a definition, so lookup cannot fail.
    #[must_use]
    pub fn get(&self, key: CategoryKey) -> &CategoryDefinition {
        &self.by_key[&key]
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategoryDefinition> {
        CategoryKey::ALL.iter().map(|key| self.get(*key))
    }
}

impl Default for CategoryDefinitions {
    fn default() -> Self {
        Self::builtin()
    }
}

#[derive(Debug, Deserialize)]
struct CategoriesFile {
    categories: Vec<CategoryEntry>,
}

#[derive(Debug, Deserialize)]
struct CategoryEntry {
    key: String,
    #[serde(flatten)]
    query: CategoryQuery,
    #[serde(default)]
    keyword: Option<String>,
    #[serde(default)]
    limit: Option<usize>,
    #[serde(default)]
    empty_message: Option<String>,
}

impl CategoryEntry {
    /// Overlays the fields set in this entry onto `base`. A blank `keyword`
    /// removes the built-in keyword filter.
    fn merge_into(self, mut base: CategoryDefinition) -> CategoryDefinition {
        let query = self.query;
        base.query = CategoryQuery {
            orderby: query.orderby.or(base.query.orderby),
            order: query.order.or(base.query.order),
            category: query.category.or(base.query.category),
            tag: query.tag.or(base.query.tag),
            search: query.search.or(base.query.search),
            per_page: query.per_page.or(base.query.per_page),
        };
        if let Some(keyword) = self.keyword {
            base.keyword = Some(keyword).filter(|k| !k.trim().is_empty());
        }
        if let Some(limit) = self.limit {
            base.limit = Some(limit);
        }
        if let Some(message) = self.empty_message {
            base.empty_message = message;
        }
        base
    }
}

/// Load category overrides from a YAML file on top of the built-in definitions.
///
/// Each entry only changes the fields it sets; everything else keeps its
/// built-in value. A missing file is not an error: the built-in definitions
/// are returned.
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read, parsed, or
/// fails validation (unknown or duplicate keys, out-of-range `per_page`,
/// blank messages).
pub fn load_category_definitions(path: &Path) -> Result<CategoryDefinitions, ConfigError> {
    if !path.exists() {
        return Ok(CategoryDefinitions::builtin());
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CategoriesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_category_definitions(&content)
}

fn parse_category_definitions(content: &str) -> Result<CategoryDefinitions, ConfigError> {
    let file: CategoriesFile =
        serde_yaml::from_str(content).map_err(ConfigError::CategoriesFileParse)?;

    let mut definitions = CategoryDefinitions::builtin();
    let mut seen = HashSet::new();

    for entry in file.categories {
        let key = CategoryKey::from_str(&entry.key)?;
        if !seen.insert(key) {
            return Err(ConfigError::Validation(format!(
                "duplicate category key: '{key}'"
            )));
        }

        if let Some(per_page) = entry.query.per_page {
            if per_page == 0 || per_page > MAX_PER_PAGE {
                return Err(ConfigError::Validation(format!(
                    "category '{key}' has per_page {per_page}; must be 1..={MAX_PER_PAGE}"
                )));
            }
        }

        if entry.limit == Some(0) {
            return Err(ConfigError::Validation(format!(
                "category '{key}' has limit 0; omit it to keep the default"
            )));
        }
        if entry
            .empty_message
            .as_deref()
            .is_some_and(|msg| msg.trim().is_empty())
        {
            return Err(ConfigError::Validation(format!(
                "category '{key}' has a blank empty_message"
            )));
        }

        let merged = entry.merge_into(definitions.get(key).clone());
        definitions.by_key.insert(key, merged);
    }

    Ok(definitions)
}

#[cfg(test)]
#[path = "categories_test.rs"]
mod tests;
