//! `backstock-infra` — the ledger store and the transactional services.
//!
//! Everything that needs storage lives here: the `Ledger` transaction seam,
//! the in-memory reference implementation, the append-only audit log, and the
//! inventory/order services that compose the domain primitives inside one
//! transaction per mutation.

pub mod audit;
pub mod ledger;
pub mod services;


pub use audit::{AuditAction, AuditEntry, ResourceRef};
pub use ledger::{InMemoryLedger, Ledger, LevelKey, Tables};
pub use services::{
    AdjustInventoryRequest, CreateOrderRequest, InventoryService, LineItemRequest, OrderService,
};
