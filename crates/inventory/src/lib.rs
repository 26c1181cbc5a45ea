//! Inventory domain module: the stock-counter invariant engine.
//!
//! This crate contains the business rules for inventory levels and low-stock
//! alerts, implemented purely as deterministic domain logic (no IO, no HTTP,
//! no storage). The ledger store layers transactional persistence on top.

pub mod alert;
pub mod level;

pub use alert::InventoryAlert;
pub use level::InventoryLevel;
