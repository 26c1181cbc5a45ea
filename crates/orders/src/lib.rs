//! Orders domain module: orders, line items, fulfillments.
//!
//! Status machines and totals live here as deterministic logic; reservation
//! and committed-stock release go through the inventory primitives inside the
//! ledger store, never through these types directly.

pub mod fulfillment;
pub mod line_item;
pub mod order;

pub use fulfillment::{Fulfillment, FulfillmentState, TrackingInfo};
pub use line_item::LineItem;
pub use order::{FinancialStatus, FulfillmentStatus, Order, OrderStatus};
