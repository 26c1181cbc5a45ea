use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use backstock_core::{FulfillmentId, LocationId, OrderId};

/// Fulfillment row lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FulfillmentState {
    Pending,
    Open,
    Success,
    Cancelled,
}

/// Shipment tracking metadata recorded once shipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingInfo {
    pub tracking_number: Option<String>,
    pub tracking_company: Option<String>,
    pub tracking_url: Option<String>,
}

/// A shipment (or attempted shipment) against an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fulfillment {
    pub id: FulfillmentId,
    pub order_id: OrderId,
    pub location_id: Option<LocationId>,
    pub status: FulfillmentState,
    pub tracking: TrackingInfo,
    pub shipped_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Fulfillment {
    pub fn pending(id: FulfillmentId, order_id: OrderId, now: DateTime<Utc>) -> Self {
        Self {
            id,
            order_id,
            location_id: None,
            status: FulfillmentState::Pending,
            tracking: TrackingInfo::default(),
            shipped_at: None,
            created_at: now,
        }
    }

    /// A fulfillment created already shipped (the fulfilled-transition path).
    pub fn shipped(
        id: FulfillmentId,
        order_id: OrderId,
        tracking: TrackingInfo,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            order_id,
            location_id: None,
            status: FulfillmentState::Success,
            tracking,
            shipped_at: Some(now),
            created_at: now,
        }
    }

    /// Mark shipped: status becomes `Success` and tracking info is recorded.
    pub fn ship(&mut self, tracking: TrackingInfo, now: DateTime<Utc>) {
        self.status = FulfillmentState::Success;
        self.tracking = tracking;
        self.shipped_at = Some(now);
    }

    pub fn cancel(&mut self) {
        self.status = FulfillmentState::Cancelled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ship_records_tracking_and_timestamp() {
        let mut f = Fulfillment::pending(FulfillmentId::new(), OrderId::new(), Utc::now());
        f.ship(
            TrackingInfo {
                tracking_number: Some("1Z999".to_string()),
                tracking_company: Some("UPS".to_string()),
                tracking_url: None,
            },
            Utc::now(),
        );
        assert_eq!(f.status, FulfillmentState::Success);
        assert_eq!(f.tracking.tracking_number.as_deref(), Some("1Z999"));
        assert!(f.shipped_at.is_some());
    }

    #[test]
    fn cancel_keeps_tracking_but_flips_status() {
        let mut f = Fulfillment::shipped(
            FulfillmentId::new(),
            OrderId::new(),
            TrackingInfo::default(),
            Utc::now(),
        );
        f.cancel();
        assert_eq!(f.status, FulfillmentState::Cancelled);
    }
}
