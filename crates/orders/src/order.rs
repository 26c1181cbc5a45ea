use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use backstock_core::{OrderId, StoreId};

use crate::line_item::LineItem;

/// Order lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Fulfilled,
    Cancelled,
}

/// Fulfillment progress across an order's line items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FulfillmentStatus {
    Unfulfilled,
    Partial,
    Fulfilled,
}

/// Payment progress. Nothing in this core mutates it past creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FinancialStatus {
    Pending,
    Paid,
    Refunded,
}

/// An order and its line items.
///
/// `idempotency_key` is globally unique when present; the ledger store
/// enforces that, and order creation relies on it to deduplicate retries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub store_id: StoreId,
    /// `{prefix}-{000001}`-style number, unique per store.
    pub order_number: String,
    pub email: Option<String>,
    pub shipping_address: Option<JsonValue>,
    pub status: OrderStatus,
    pub fulfillment_status: FulfillmentStatus,
    pub financial_status: FinancialStatus,
    pub idempotency_key: Option<String>,
    pub line_items: Vec<LineItem>,
    pub subtotal: u64,
    pub total_tax: u64,
    pub total_shipping: u64,
    pub total_price: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// A pending order with no lines yet.
    pub fn pending(
        id: OrderId,
        store_id: StoreId,
        order_number: String,
        email: Option<String>,
        shipping_address: Option<JsonValue>,
        idempotency_key: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            store_id,
            order_number,
            email,
            shipping_address,
            status: OrderStatus::Pending,
            fulfillment_status: FulfillmentStatus::Unfulfilled,
            financial_status: FinancialStatus::Pending,
            idempotency_key,
            line_items: Vec::new(),
            subtotal: 0,
            total_tax: 0,
            total_shipping: 0,
            total_price: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Recompute `subtotal` and `total_price` from the lines. Tax and
    /// shipping are carried as-is (no calculation logic in this core).
    pub fn calculate_totals(&mut self) {
        self.subtotal = self
            .line_items
            .iter()
            .map(|li| li.price * li.quantity.max(0) as u64)
            .sum();
        self.total_price = self.subtotal + self.total_tax + self.total_shipping;
    }

    pub fn unfulfilled_items(&self) -> impl Iterator<Item = &LineItem> {
        self.line_items
            .iter()
            .filter(|li| li.quantity > li.fulfilled_quantity)
    }

    pub fn fully_fulfilled(&self) -> bool {
        self.line_items.iter().all(|li| li.fully_fulfilled())
    }

    /// Fulfillment status derived from line-item progress: `Fulfilled` when
    /// every line is complete, `Partial` when any line has progress, `None`
    /// (leave unchanged) otherwise.
    pub fn derived_fulfillment_status(&self) -> Option<FulfillmentStatus> {
        if !self.line_items.is_empty() && self.fully_fulfilled() {
            Some(FulfillmentStatus::Fulfilled)
        } else if self
            .line_items
            .iter()
            .any(|li| li.fulfilled_quantity > 0)
        {
            Some(FulfillmentStatus::Partial)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backstock_catalog::Variant;
    use backstock_core::{LineItemId, ProductId, VariantId};

    fn order_with_lines(lines: Vec<(i64, i64, u64)>) -> Order {
        let mut order = Order::pending(
            OrderId::new(),
            StoreId::new(),
            "ACM-000001".to_string(),
            None,
            None,
            None,
            Utc::now(),
        );
        for (quantity, fulfilled, price) in lines {
            let variant = Variant::new(VariantId::new(), ProductId::new(), "Default", price);
            let mut line = LineItem::from_variant(LineItemId::new(), "Item", &variant, quantity);
            line.fulfilled_quantity = fulfilled;
            order.line_items.push(line);
        }
        order
    }

    #[test]
    fn totals_sum_price_times_quantity() {
        let mut order = order_with_lines(vec![(2, 0, 1500), (1, 0, 700)]);
        order.total_shipping = 500;
        order.calculate_totals();
        assert_eq!(order.subtotal, 3700);
        assert_eq!(order.total_price, 4200);
    }

    #[test]
    fn derived_status_is_fulfilled_when_every_line_is_complete() {
        let order = order_with_lines(vec![(2, 2, 100), (1, 1, 100)]);
        assert_eq!(
            order.derived_fulfillment_status(),
            Some(FulfillmentStatus::Fulfilled)
        );
    }

    #[test]
    fn derived_status_is_partial_with_any_progress() {
        let order = order_with_lines(vec![(2, 1, 100), (1, 0, 100)]);
        assert_eq!(
            order.derived_fulfillment_status(),
            Some(FulfillmentStatus::Partial)
        );
        assert_eq!(order.unfulfilled_items().count(), 2);
    }

    #[test]
    fn derived_status_is_none_with_no_progress() {
        let order = order_with_lines(vec![(2, 0, 100)]);
        assert_eq!(order.derived_fulfillment_status(), None);
    }
}
