use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use backstock_core::{AlertId, LocationId, StoreId, UserId, VariantId};

use crate::level::InventoryLevel;

/// A low-stock alert: `available` crossed at or below the store threshold.
///
/// One row is created per triggering adjustment. Repeated triggers for the
/// same (variant, location) create repeated rows even while an earlier one is
/// unreviewed; alerts are closed by an explicit review and never auto-deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryAlert {
    pub id: AlertId,
    pub store_id: StoreId,
    pub variant_id: VariantId,
    pub location_id: LocationId,
    pub threshold: i64,
    /// Snapshot of `available` at creation time.
    pub current_level: i64,
    pub reviewed: bool,
    pub reviewed_by: Option<UserId>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl InventoryAlert {
    pub fn for_low_stock(
        id: AlertId,
        store_id: StoreId,
        level: &InventoryLevel,
        threshold: i64,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            store_id,
            variant_id: level.variant_id,
            location_id: level.location_id,
            threshold,
            current_level: level.available,
            reviewed: false,
            reviewed_by: None,
            reviewed_at: None,
            created_at: now,
        }
    }

    /// Close the alert. Calling this twice is not an error; the second call
    /// just re-sets the same fields.
    pub fn mark_reviewed(&mut self, reviewer: Option<UserId>, now: DateTime<Utc>) {
        self.reviewed = true;
        self.reviewed_by = reviewer;
        self.reviewed_at = Some(now);
    }
}
