use serde::{Deserialize, Serialize};

use backstock_core::{LocationId, StoreId};

/// A physical stock location belonging to a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    pub store_id: StoreId,
    pub name: String,
    pub active: bool,
}

impl Location {
    pub fn new(id: LocationId, store_id: StoreId, name: impl Into<String>) -> Self {
        Self {
            id,
            store_id,
            name: name.into(),
            active: true,
        }
    }
}
