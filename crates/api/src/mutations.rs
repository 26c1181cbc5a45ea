//! The four external mutations of the back-office core.
//!
//! Each resolver checks authorization against the resource's owning store,
//! delegates to the service layer, and folds the outcome into a payload of
//! `result | null` plus human-readable error strings. Service-level failures
//! never throw past this boundary.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value as JsonValue;

use backstock_auth::{Authorizer, MembershipDirectory, Resource, StoreAuthorizer};
use backstock_core::{Actor, AlertId, DomainError, LocationId, OrderId, StoreId, VariantId};
use backstock_events::{Notification, Notifier};
use backstock_infra::{
    AdjustInventoryRequest, CreateOrderRequest, InventoryService, Ledger, LineItemRequest,
    OrderService,
};
use backstock_inventory::{InventoryAlert, InventoryLevel};
use backstock_orders::{FulfillmentStatus, Order, TrackingInfo};

#[derive(Debug, Clone)]
pub struct AdjustInventoryInput {
    pub variant_id: VariantId,
    pub location_id: LocationId,
    pub delta: i64,
    pub reason: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AdjustInventoryPayload {
    pub inventory_level: Option<InventoryLevel>,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct LineItemInput {
    pub variant_id: VariantId,
    /// Defaults to 1 when omitted.
    pub quantity: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct CreateOrderInput {
    pub store_id: StoreId,
    pub line_items: Vec<LineItemInput>,
    pub email: Option<String>,
    pub shipping_address: Option<JsonValue>,
    pub idempotency_key: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateOrderPayload {
    pub order: Option<Order>,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct UpdateFulfillmentStatusInput {
    pub order_id: OrderId,
    pub status: FulfillmentStatus,
    pub tracking_number: Option<String>,
    pub tracking_company: Option<String>,
    pub tracking_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UpdateFulfillmentStatusPayload {
    pub order: Option<Order>,
    pub errors: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct InventoryAlertPayload {
    pub inventory_alert: Option<InventoryAlert>,
    pub errors: Vec<String>,
}

/// Resolver root wiring services and authorization together.
pub struct Mutations<L, N> {
    ledger: Arc<L>,
    inventory: InventoryService<L, N>,
    orders: OrderService<L, N>,
    authorizer: StoreAuthorizer<Arc<L>>,
}

impl<L, N> Mutations<L, N>
where
    L: Ledger + MembershipDirectory,
    N: Notifier<Notification> + Clone,
{
    pub fn new(ledger: Arc<L>, notifier: N) -> Self {
        Self {
            inventory: InventoryService::new(ledger.clone(), notifier.clone()),
            orders: OrderService::new(ledger.clone(), notifier),
            authorizer: StoreAuthorizer::new(ledger.clone()),
            ledger,
        }
    }

    pub fn adjust_inventory(
        &self,
        input: AdjustInventoryInput,
        actor: &Actor,
    ) -> AdjustInventoryPayload {
        let store_id = self
            .ledger
            .read(|tables| tables.store_for_location(input.location_id));
        let Some(store_id) = store_id else {
            return AdjustInventoryPayload {
                inventory_level: None,
                errors: vec![DomainError::not_found(format!(
                    "Location {}",
                    input.location_id
                ))
                .to_string()],
            };
        };
        if !self
            .authorizer
            .can_write(actor, &Resource::InventoryLevel { store_id })
        {
            return AdjustInventoryPayload {
                inventory_level: None,
                errors: vec![DomainError::Unauthorized.to_string()],
            };
        }

        let result = self.inventory.adjust_inventory(
            AdjustInventoryRequest {
                variant_id: input.variant_id,
                location_id: input.location_id,
                delta: input.delta,
                reason: input.reason,
            },
            actor,
        );
        match result {
            Ok(level) => AdjustInventoryPayload {
                inventory_level: Some(level),
                errors: vec![],
            },
            Err(e) => AdjustInventoryPayload {
                inventory_level: None,
                errors: vec![e.to_string()],
            },
        }
    }

    pub fn create_order(&self, input: CreateOrderInput, actor: &Actor) -> CreateOrderPayload {
        if !self.authorizer.can_write(
            actor,
            &Resource::Order {
                store_id: input.store_id,
            },
        ) {
            return CreateOrderPayload {
                order: None,
                errors: vec![DomainError::Unauthorized.to_string()],
            };
        }

        let request = CreateOrderRequest {
            store_id: input.store_id,
            line_items: input
                .line_items
                .iter()
                .map(|li| LineItemRequest {
                    variant_id: li.variant_id,
                    quantity: li.quantity.unwrap_or(1),
                })
                .collect(),
            email: input.email,
            shipping_address: input.shipping_address,
            idempotency_key: input.idempotency_key,
        };
        match self.orders.create_order(request, actor) {
            Ok(order) => CreateOrderPayload {
                order: Some(order),
                errors: vec![],
            },
            Err(errors) => CreateOrderPayload {
                order: None,
                errors: errors.iter().map(|e| e.to_string()).collect(),
            },
        }
    }

    pub fn update_fulfillment_status(
        &self,
        input: UpdateFulfillmentStatusInput,
        actor: &Actor,
    ) -> UpdateFulfillmentStatusPayload {
        let store_id = self
            .ledger
            .read(|tables| tables.order(input.order_id).map(|o| o.store_id).ok());
        let Some(store_id) = store_id else {
            return UpdateFulfillmentStatusPayload {
                order: None,
                errors: vec![
                    DomainError::not_found(format!("Order {}", input.order_id)).to_string(),
                ],
            };
        };
        if !self
            .authorizer
            .can_write(actor, &Resource::Order { store_id })
        {
            return UpdateFulfillmentStatusPayload {
                order: None,
                errors: vec![DomainError::Unauthorized.to_string()],
            };
        }

        let tracking = TrackingInfo {
            tracking_number: input.tracking_number,
            tracking_company: input.tracking_company,
            tracking_url: input.tracking_url,
        };
        match self
            .orders
            .update_fulfillment_status(input.order_id, input.status, tracking, actor)
        {
            Ok(order) => UpdateFulfillmentStatusPayload {
                order: Some(order),
                errors: vec![],
            },
            Err(e) => UpdateFulfillmentStatusPayload {
                order: None,
                errors: vec![e.to_string()],
            },
        }
    }

    pub fn mark_inventory_alert_reviewed(
        &self,
        alert_id: AlertId,
        actor: &Actor,
    ) -> InventoryAlertPayload {
        let store_id = self
            .ledger
            .read(|tables| tables.alert(alert_id).map(|a| a.store_id).ok());
        let Some(store_id) = store_id else {
            return InventoryAlertPayload {
                inventory_alert: None,
                errors: vec![
                    DomainError::not_found(format!("InventoryAlert {alert_id}")).to_string(),
                ],
            };
        };
        if !self
            .authorizer
            .can_write(actor, &Resource::InventoryAlert { store_id })
        {
            return InventoryAlertPayload {
                inventory_alert: None,
                errors: vec![DomainError::Unauthorized.to_string()],
            };
        }

        match self.inventory.mark_alert_reviewed(alert_id, actor) {
            Ok(alert) => InventoryAlertPayload {
                inventory_alert: Some(alert),
                errors: vec![],
            },
            Err(e) => InventoryAlertPayload {
                inventory_alert: None,
                errors: vec![e.to_string()],
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backstock_auth::{Membership, Role};
    use backstock_catalog::{Location, Product, Store, Variant};
    use backstock_core::{ProductId, UserId};
    use backstock_events::InMemoryNotifier;
    use backstock_infra::InMemoryLedger;
    use chrono::Utc;

    struct Fixture {
        mutations: Mutations<InMemoryLedger, Arc<InMemoryNotifier<Notification>>>,
        staff: Actor,
        viewer: Actor,
        store_id: StoreId,
        variant_id: VariantId,
        location_id: LocationId,
    }

    fn setup() -> Fixture {
        let now = Utc::now();
        let ledger = Arc::new(InMemoryLedger::new());
        let notifier = Arc::new(InMemoryNotifier::new());

        let store = Store::new(StoreId::new(), "Acme Outfitters", 10, now).unwrap();
        let store_id = store.id;
        let staff_id = UserId::new();
        let viewer_id = UserId::new();
        let product = Product::new(ProductId::new(), store_id, "Basic Tee");
        let variant = Variant::new(VariantId::new(), product.id, "Large", 1500);
        let variant_id = variant.id;
        let location = Location::new(LocationId::new(), store_id, "Warehouse A");
        let location_id = location.id;

        ledger.seed(|tables| {
            tables.insert_store(store);
            tables.insert_membership(Membership::new(store_id, staff_id, Role::Staff));
            tables.insert_membership(Membership::new(store_id, viewer_id, Role::Viewer));
            tables.insert_product(product);
            tables.insert_variant(variant);
            tables.insert_location(location);
            tables
                .find_or_create_level(variant_id, location_id, now)
                .adjust(50, now)
                .unwrap();
        });

        Fixture {
            mutations: Mutations::new(ledger, notifier),
            staff: Actor::user(staff_id),
            viewer: Actor::user(viewer_id),
            store_id,
            variant_id,
            location_id,
        }
    }

    #[test]
    fn adjust_returns_level_with_empty_errors() {
        let fx = setup();
        let payload = fx.mutations.adjust_inventory(
            AdjustInventoryInput {
                variant_id: fx.variant_id,
                location_id: fx.location_id,
                delta: 25,
                reason: Some("Restock".to_string()),
            },
            &fx.staff,
        );
        assert!(payload.errors.is_empty());
        assert_eq!(payload.inventory_level.unwrap().available, 75);
    }

    #[test]
    fn adjust_surfaces_negative_inventory_as_message() {
        let fx = setup();
        let payload = fx.mutations.adjust_inventory(
            AdjustInventoryInput {
                variant_id: fx.variant_id,
                location_id: fx.location_id,
                delta: -100,
                reason: None,
            },
            &fx.staff,
        );
        assert!(payload.inventory_level.is_none());
        assert_eq!(payload.errors, vec!["cannot reduce inventory below zero"]);
    }

    #[test]
    fn viewer_cannot_write_inventory() {
        let fx = setup();
        let payload = fx.mutations.adjust_inventory(
            AdjustInventoryInput {
                variant_id: fx.variant_id,
                location_id: fx.location_id,
                delta: 1,
                reason: None,
            },
            &fx.viewer,
        );
        assert!(payload.inventory_level.is_none());
        assert_eq!(payload.errors, vec!["unauthorized"]);
    }

    #[test]
    fn create_order_defaults_quantity_to_one() {
        let fx = setup();
        let payload = fx.mutations.create_order(
            CreateOrderInput {
                store_id: fx.store_id,
                line_items: vec![LineItemInput {
                    variant_id: fx.variant_id,
                    quantity: None,
                }],
                email: None,
                shipping_address: None,
                idempotency_key: None,
            },
            &fx.staff,
        );
        assert!(payload.errors.is_empty());
        assert_eq!(payload.order.unwrap().line_items[0].quantity, 1);
    }

    #[test]
    fn create_order_reports_every_bad_line() {
        let fx = setup();
        let payload = fx.mutations.create_order(
            CreateOrderInput {
                store_id: fx.store_id,
                line_items: vec![
                    LineItemInput {
                        variant_id: fx.variant_id,
                        quantity: Some(200),
                    },
                    LineItemInput {
                        variant_id: VariantId::new(),
                        quantity: Some(1),
                    },
                ],
                email: None,
                shipping_address: None,
                idempotency_key: None,
            },
            &fx.staff,
        );
        assert!(payload.order.is_none());
        assert_eq!(payload.errors.len(), 2);
        assert!(payload.errors[0].contains("insufficient inventory"));
        assert!(payload.errors[1].contains("not found"));
    }

    #[test]
    fn missing_alert_reports_not_found() {
        let fx = setup();
        let payload = fx
            .mutations
            .mark_inventory_alert_reviewed(AlertId::new(), &fx.staff);
        assert!(payload.inventory_alert.is_none());
        assert!(payload.errors[0].contains("not found"));
    }
}
