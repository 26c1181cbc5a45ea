use serde::{Deserialize, Serialize};

use backstock_catalog::Variant;
use backstock_core::{LineItemId, VariantId};

/// One order line referencing a variant.
///
/// Invariant: `0 <= fulfilled_quantity <= quantity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: LineItemId,
    pub variant_id: VariantId,
    /// Product title snapshot at order time.
    pub title: String,
    pub variant_title: String,
    pub sku: Option<String>,
    pub quantity: i64,
    pub fulfilled_quantity: i64,
    /// Unit price snapshot in smallest currency unit.
    pub price: u64,
    pub total_discount: u64,
    pub requires_shipping: bool,
}

impl LineItem {
    /// Build a line with title/sku/price defaults snapshotted from the
    /// variant.
    pub fn from_variant(
        id: LineItemId,
        product_title: &str,
        variant: &Variant,
        quantity: i64,
    ) -> Self {
        Self {
            id,
            variant_id: variant.id,
            title: product_title.to_string(),
            variant_title: variant.title.clone(),
            sku: variant.sku.clone(),
            quantity,
            fulfilled_quantity: 0,
            price: variant.price,
            total_discount: 0,
            requires_shipping: variant.requires_shipping,
        }
    }

    pub fn total(&self) -> u64 {
        (self.price * self.quantity.max(0) as u64).saturating_sub(self.total_discount)
    }

    pub fn remaining_to_fulfill(&self) -> i64 {
        self.quantity - self.fulfilled_quantity
    }

    pub fn fully_fulfilled(&self) -> bool {
        self.fulfilled_quantity >= self.quantity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backstock_core::ProductId;

    fn test_variant() -> Variant {
        Variant::new(VariantId::new(), ProductId::new(), "Large", 1500).with_sku("TEE-L")
    }

    #[test]
    fn snapshots_defaults_from_variant() {
        let variant = test_variant();
        let line = LineItem::from_variant(LineItemId::new(), "Basic Tee", &variant, 2);
        assert_eq!(line.title, "Basic Tee");
        assert_eq!(line.variant_title, "Large");
        assert_eq!(line.sku.as_deref(), Some("TEE-L"));
        assert_eq!(line.price, 1500);
        assert_eq!(line.fulfilled_quantity, 0);
    }

    #[test]
    fn total_subtracts_discount() {
        let variant = test_variant();
        let mut line = LineItem::from_variant(LineItemId::new(), "Basic Tee", &variant, 3);
        line.total_discount = 500;
        assert_eq!(line.total(), 4000);
    }

    #[test]
    fn tracks_remaining_to_fulfill() {
        let variant = test_variant();
        let mut line = LineItem::from_variant(LineItemId::new(), "Basic Tee", &variant, 3);
        assert_eq!(line.remaining_to_fulfill(), 3);
        line.fulfilled_quantity = 2;
        assert_eq!(line.remaining_to_fulfill(), 1);
        assert!(!line.fully_fulfilled());
    }
}
