//! Transactional services: the mutation entry points of the core.
//!
//! Each public operation runs one ledger transaction; every step inside it
//! commits or rolls back together. Notifications publish after commit,
//! best-effort.

pub mod inventory;
pub mod orders;

pub use inventory::{AdjustInventoryRequest, InventoryService};
pub use orders::{CreateOrderRequest, LineItemRequest, OrderService};
