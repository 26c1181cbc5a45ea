use serde::{Deserialize, Serialize};

use backstock_core::{ProductId, StoreId, VariantId};

/// A product belonging to a store. Variants carry the sellable detail; the
/// product itself is mostly a title and a scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub store_id: StoreId,
    pub title: String,
}

impl Product {
    pub fn new(id: ProductId, store_id: StoreId, title: impl Into<String>) -> Self {
        Self {
            id,
            store_id,
            title: title.into(),
        }
    }
}

/// A sellable variant of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    pub id: VariantId,
    pub product_id: ProductId,
    pub title: String,
    pub sku: Option<String>,
    /// Price in smallest currency unit (e.g., cents).
    pub price: u64,
    pub requires_shipping: bool,
}

impl Variant {
    pub fn new(
        id: VariantId,
        product_id: ProductId,
        title: impl Into<String>,
        price: u64,
    ) -> Self {
        Self {
            id,
            product_id,
            title: title.into(),
            sku: None,
            price,
            requires_shipping: true,
        }
    }

    pub fn with_sku(mut self, sku: impl Into<String>) -> Self {
        self.sku = Some(sku.into());
        self
    }

    /// "Product - Variant", the name error messages and alerts show.
    pub fn display_name(&self, product_title: &str) -> String {
        format!("{} - {}", product_title, self.title)
    }
}
