//! Product catalog boundary
//!
//! The resolver looks products up through [`ProductLookup`]; the catalog
//! itself lives outside the engine. [`InMemoryCatalog`] is a ready-made
//! implementation loadable from YAML or JSON.

use crate::error::CatalogError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Catalog metadata of one product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductMetadata {
    /// Manufacturer part number, the key rules refer to
    pub part: String,

    pub manufacturer: String,

    #[serde(default)]
    pub description: String,

    /// Device role shown in the BOM ("N/A" when absent)
    #[serde(default)]
    pub device_role: Option<String>,

    /// Global list price
    #[serde(default)]
    pub list_price: Decimal,

    /// Customer discount as a fraction (0.15 = 15%)
    #[serde(default)]
    pub discount: Decimal,
}

impl ProductMetadata {
    /// Create a new product with no description, role or price
    pub fn new(part: impl Into<String>, manufacturer: impl Into<String>) -> Self {
        Self {
            part: part.into(),
            manufacturer: manufacturer.into(),
            description: String::new(),
            device_role: None,
            list_price: Decimal::ZERO,
            discount: Decimal::ZERO,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_device_role(mut self, role: impl Into<String>) -> Self {
        self.device_role = Some(role.into());
        self
    }

    pub fn with_pricing(mut self, list_price: Decimal, discount: Decimal) -> Self {
        self.list_price = list_price;
        self.discount = discount;
        self
    }

    /// Discounted unit price, rounded to cents; `None` when it cannot be represented
    pub fn customer_price(&self) -> Option<Decimal> {
        let factor = Decimal::ONE.checked_sub(self.discount)?;
        Some(self.list_price.checked_mul(factor)?.round_dp(2))
    }
}

/// Product lookup by key
pub trait ProductLookup: Send + Sync {
    /// Look up a product by its part number
    fn lookup(&self, key: &str) -> Option<ProductMetadata>;
}

impl ProductLookup for HashMap<String, ProductMetadata> {
    fn lookup(&self, key: &str) -> Option<ProductMetadata> {
        self.get(key).cloned()
    }
}

/// In-memory product catalog
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    products: HashMap<String, ProductMetadata>,
}

impl InMemoryCatalog {
    /// Create a new empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog from a list of products; part numbers must be unique
    pub fn from_products(
        products: impl IntoIterator<Item = ProductMetadata>,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Self::new();
        for product in products {
            if catalog.products.contains_key(&product.part) {
                return Err(CatalogError::DuplicatePart(product.part));
            }
            catalog.insert(product);
        }
        Ok(catalog)
    }

    /// Load a catalog from a YAML list of products
    pub fn from_yaml_str(text: &str) -> Result<Self, CatalogError> {
        let products: Vec<ProductMetadata> = serde_yaml::from_str(text)?;
        Self::from_products(products)
    }

    /// Load a catalog from a JSON array of products
    pub fn from_json_str(text: &str) -> Result<Self, CatalogError> {
        let products: Vec<ProductMetadata> = serde_json::from_str(text)?;
        Self::from_products(products)
    }

    /// Insert or replace a product
    pub fn insert(&mut self, product: ProductMetadata) {
        self.products.insert(product.part.clone(), product);
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl ProductLookup for InMemoryCatalog {
    fn lookup(&self, key: &str) -> Option<ProductMetadata> {
        self.products.get(key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_price() {
        let product = ProductMetadata::new("SW-48P", "Cisco")
            .with_pricing(Decimal::new(120050, 2), Decimal::new(15, 2));
        // 1200.50 * 0.85 = 1020.425, banker's rounding
        assert_eq!(product.customer_price(), Some(Decimal::new(102042, 2)));
    }

    #[test]
    fn test_customer_price_overflow() {
        let product = ProductMetadata::new("P1", "Acme").with_pricing(Decimal::MAX, -Decimal::ONE);
        assert_eq!(product.customer_price(), None);
    }

    #[test]
    fn test_catalog_from_yaml() {
        let yaml = r#"
- part: SW-48P
  manufacturer: Cisco
  description: 48 port switch
  device_role: Access
  list_price: 1200.50
  discount: 0.15
- part: CAB-3M
  manufacturer: Generic
  list_price: "4.99"
"#;
        let catalog = InMemoryCatalog::from_yaml_str(yaml).unwrap();
        assert_eq!(catalog.len(), 2);

        let switch = catalog.lookup("SW-48P").unwrap();
        assert_eq!(switch.device_role.as_deref(), Some("Access"));
        assert_eq!(switch.discount, Decimal::new(15, 2));

        let cable = catalog.lookup("CAB-3M").unwrap();
        assert_eq!(cable.list_price, Decimal::new(499, 2));
        assert_eq!(cable.discount, Decimal::ZERO);
        assert!(catalog.lookup("missing").is_none());
    }

    #[test]
    fn test_catalog_from_json() {
        let json = r#"[{"part": "P1", "manufacturer": "Acme", "list_price": "10"}]"#;
        let catalog = InMemoryCatalog::from_json_str(json).unwrap();
        assert_eq!(
            catalog.lookup("P1").unwrap().customer_price(),
            Some(Decimal::new(10, 0))
        );
    }

    #[test]
    fn test_duplicate_parts_are_rejected() {
        let products = vec![ProductMetadata::new("P1", "A"), ProductMetadata::new("P1", "B")];
        assert!(matches!(
            InMemoryCatalog::from_products(products),
            Err(CatalogError::DuplicatePart(part)) if part == "P1"
        ));
    }

    #[test]
    fn test_hash_map_lookup() {
        let mut map = HashMap::new();
        map.insert("P1".to_string(), ProductMetadata::new("P1", "Acme"));
        assert!(map.lookup("P1").is_some());
    }
}
