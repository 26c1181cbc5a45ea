//! Concrete notification messages emitted by the back-office core.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use backstock_core::{OrderId, StoreId};

/// What happened. Names match the subscription topics consumers know.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    InventoryLow,
    OrderCreated,
    FulfillmentStatusChanged,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::InventoryLow => "inventory_low",
            EventKind::OrderCreated => "order_created",
            EventKind::FulfillmentStatusChanged => "fulfillment_status_changed",
        }
    }
}

/// A published notification: event name, routing key for subscriber matching,
/// and a JSON payload snapshot of the triggering record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: EventKind,
    pub routing_key: String,
    pub payload: JsonValue,
    pub published_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(kind: EventKind, routing_key: String, payload: JsonValue) -> Self {
        Self {
            kind,
            routing_key,
            payload,
            published_at: Utc::now(),
        }
    }

    /// `inventory_low`, routed by `{store_id, threshold}`.
    pub fn inventory_low(store_id: StoreId, threshold: i64, payload: JsonValue) -> Self {
        Self::new(
            EventKind::InventoryLow,
            format!("store:{store_id}:threshold:{threshold}"),
            payload,
        )
    }

    /// `order_created`, routed by `{store_id}`.
    pub fn order_created(store_id: StoreId, payload: JsonValue) -> Self {
        Self::new(EventKind::OrderCreated, format!("store:{store_id}"), payload)
    }

    /// `fulfillment_status_changed`, routed by `{order_id}`.
    pub fn fulfillment_status_changed(order_id: OrderId, payload: JsonValue) -> Self {
        Self::new(
            EventKind::FulfillmentStatusChanged,
            format!("order:{order_id}"),
            payload,
        )
    }
}
