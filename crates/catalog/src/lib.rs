//! Catalog domain module: stores, locations, products, variants.
//!
//! These are the reference records the inventory and order services resolve
//! against. Pure data + validation, no storage.

pub mod location;
pub mod product;
pub mod store;

pub use location::Location;
pub use product::{Product, Variant};
pub use store::Store;
