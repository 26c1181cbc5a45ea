//! Inventory adjustment and alert review.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;

use backstock_catalog::Store;
use backstock_core::{Actor, AlertId, DomainResult, LocationId, VariantId};
use backstock_events::{Notification, Notifier};
use backstock_inventory::{InventoryAlert, InventoryLevel};

use crate::audit::{AuditAction, AuditEntry, ResourceRef};
use crate::ledger::{Ledger, Tables};

/// Input to `adjust_inventory`.
#[derive(Debug, Clone)]
pub struct AdjustInventoryRequest {
    pub variant_id: VariantId,
    pub location_id: LocationId,
    pub delta: i64,
    pub reason: Option<String>,
}

/// Applies stock deltas and drives the low-stock alert engine.
pub struct InventoryService<L, N> {
    ledger: Arc<L>,
    notifier: N,
}

impl<L, N> InventoryService<L, N>
where
    L: Ledger,
    N: Notifier<Notification>,
{
    pub fn new(ledger: Arc<L>, notifier: N) -> Self {
        Self { ledger, notifier }
    }

    /// Apply `delta` to the (variant, location) row, creating it at zero if
    /// absent. The counter change, the audit entry, and any low-stock alert
    /// persist together or not at all.
    pub fn adjust_inventory(
        &self,
        request: AdjustInventoryRequest,
        actor: &Actor,
    ) -> DomainResult<InventoryLevel> {
        let now = Utc::now();
        let (level, notification) = self.ledger.with_transaction(|tables| {
            tables.variant(request.variant_id)?;
            let location = tables.location(request.location_id)?;
            let store = tables.store(location.store_id)?.clone();

            let row = tables.find_or_create_level(request.variant_id, request.location_id, now);
            let previous_available = row.available;
            row.adjust(request.delta, now)?;
            let level = row.clone();

            tables.audit(AuditEntry::new(
                store.id,
                actor,
                AuditAction::AdjustInventory,
                ResourceRef::new("InventoryLevel", *level.variant_id.as_uuid()),
                json!({ "available": [previous_available, level.available] }),
                json!({
                    "reason": request.reason,
                    "delta": request.delta,
                    "location_id": request.location_id,
                }),
                now,
            ));

            let notification = raise_if_low(tables, &level, &store, now);

            Ok((level, notification))
        })?;

        tracing::info!(
            variant_id = %request.variant_id,
            location_id = %request.location_id,
            delta = request.delta,
            available = level.available,
            "inventory adjusted"
        );

        if let Some(notification) = notification {
            // Best-effort: a publish failure never unwinds the committed
            // adjustment.
            if let Err(e) = self.notifier.publish(notification) {
                tracing::warn!(error = ?e, "failed to publish inventory_low notification");
            }
        }

        Ok(level)
    }

    /// Close an alert. Reviewing an already-reviewed alert just re-sets the
    /// same fields; a missing alert is `NotFound`.
    pub fn mark_alert_reviewed(
        &self,
        alert_id: AlertId,
        actor: &Actor,
    ) -> DomainResult<InventoryAlert> {
        let now = Utc::now();
        let alert = self.ledger.with_transaction(|tables| {
            let alert = tables.alert_mut(alert_id)?;
            let previously_reviewed = alert.reviewed;
            alert.mark_reviewed(actor.user_id, now);
            let alert = alert.clone();

            tables.audit(AuditEntry::new(
                alert.store_id,
                actor,
                AuditAction::MarkReviewed,
                ResourceRef::new("InventoryAlert", alert.id),
                json!({ "reviewed": [previously_reviewed, true] }),
                json!({}),
                now,
            ));

            Ok(alert)
        })?;

        tracing::info!(alert_id = %alert_id, "inventory alert reviewed");
        Ok(alert)
    }
}

/// Low-stock alert engine: one new alert row per triggering adjustment.
///
/// Deliberately no deduplication against an existing unreviewed alert for the
/// same (variant, location); every qualifying adjustment creates a fresh row.
fn raise_if_low(
    tables: &mut Tables,
    level: &InventoryLevel,
    store: &Store,
    now: DateTime<Utc>,
) -> Option<Notification> {
    let threshold = store.low_stock_threshold;
    if !level.low_stock(threshold) {
        return None;
    }

    let alert = InventoryAlert::for_low_stock(AlertId::new(), store.id, level, threshold, now);
    let payload = json!({
        "alert_id": alert.id,
        "variant_id": alert.variant_id,
        "location_id": alert.location_id,
        "threshold": alert.threshold,
        "current_level": alert.current_level,
    });
    tables.insert_alert(alert);

    Some(Notification::inventory_low(store.id, threshold, payload))
}
