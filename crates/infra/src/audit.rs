//! Append-only audit log.
//!
//! Every mutating service writes one entry inside its transaction, so an
//! aborted mutation never leaves a stray audit row behind.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value as JsonValue;
use uuid::Uuid;

use backstock_core::{Actor, StoreId, UserId};

/// What kind of mutation an entry records.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Create,
    AdjustInventory,
    UpdateFulfillment,
    MarkReviewed,
}

/// The record an entry points at: entity kind plus its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceRef {
    pub kind: &'static str,
    pub id: Uuid,
}

impl ResourceRef {
    pub fn new(kind: &'static str, id: impl Into<Uuid>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }
}

/// One immutable audit row. `changes` holds `field -> [before, after]`
/// pairs; `metadata` is free-form (reason text, deltas, and the like).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditEntry {
    pub id: Uuid,
    pub store_id: StoreId,
    pub user_id: Option<UserId>,
    pub action: AuditAction,
    pub resource: ResourceRef,
    pub changes: JsonValue,
    pub metadata: JsonValue,
    pub recorded_at: DateTime<Utc>,
}

impl AuditEntry {
    pub fn new(
        store_id: StoreId,
        actor: &Actor,
        action: AuditAction,
        resource: ResourceRef,
        changes: JsonValue,
        metadata: JsonValue,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            store_id,
            user_id: actor.user_id,
            action,
            resource,
            changes,
            metadata,
            recorded_at: now,
        }
    }
}
