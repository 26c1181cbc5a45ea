//! `backstock-api` — mutation-resolver facade over the core services.
//!
//! Transport framing is out of scope; callers get synchronous
//! `{result | null, errors: [string]}` payloads, the shape a resolver layer
//! returns to clients.

pub mod mutations;

pub use mutations::{
    AdjustInventoryInput, AdjustInventoryPayload, CreateOrderInput, CreateOrderPayload,
    InventoryAlertPayload, LineItemInput, Mutations, UpdateFulfillmentStatusInput,
    UpdateFulfillmentStatusPayload,
};
