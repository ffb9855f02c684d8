// src/model/catalog.rs

use serde::{Deserialize, Serialize};

/// Static physical description of one product.
///
/// Field names match the catalog file's column headers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSpec {
    #[serde(default, rename = "product")]
    pub name: Option<String>,
    pub unit_volume: f64,
    pub unit_weight: f64,
    /// Shelf life in days.
    pub shelf_life: u32,
}

impl ProductSpec {
    pub fn new(unit_volume: f64, unit_weight: f64, shelf_life: u32) -> Self {
        Self {
            name: None,
            unit_volume,
            unit_weight,
            shelf_life,
        }
    }
}

/// The product subset a simulation run works on. Row order must match the
/// product columns of the forecast table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductCatalog {
    products: Vec<ProductSpec>,
}

impl ProductCatalog {
    pub fn new(products: Vec<ProductSpec>) -> Self {
        Self { products }
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn products(&self) -> &[ProductSpec] {
        &self.products
    }

    pub fn get(&self, index: usize) -> Option<&ProductSpec> {
        self.products.get(index)
    }
}

impl FromIterator<ProductSpec> for ProductCatalog {
    fn from_iter<I: IntoIterator<Item = ProductSpec>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
