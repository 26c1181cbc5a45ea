//! Demo wiring: in-memory stack, one store, one end-to-end flow.

use std::sync::Arc;

use chrono::Utc;

use backstock_api::{
    AdjustInventoryInput, CreateOrderInput, LineItemInput, Mutations, UpdateFulfillmentStatusInput,
};
use backstock_auth::{Membership, Role};
use backstock_catalog::{Location, Product, Store, Variant};
use backstock_core::{Actor, LocationId, ProductId, StoreId, UserId, VariantId};
use backstock_events::{InMemoryNotifier, Notification, Notifier};
use backstock_infra::InMemoryLedger;
use backstock_orders::FulfillmentStatus;

fn main() -> anyhow::Result<()> {
    backstock_observability::init();

    let now = Utc::now();
    let ledger = Arc::new(InMemoryLedger::new());
    let notifier: Arc<InMemoryNotifier<Notification>> = Arc::new(InMemoryNotifier::new());
    let subscription = notifier.subscribe();

    let store = Store::new(StoreId::new(), "Acme Outfitters", 10, now)
        .map_err(|e| anyhow::anyhow!("seed store: {e}"))?;
    let store_id = store.id;
    let user_id = UserId::new();
    let product = Product::new(ProductId::new(), store_id, "Basic Tee");
    let variant = Variant::new(VariantId::new(), product.id, "Large", 1500).with_sku("TEE-L");
    let variant_id = variant.id;
    let location = Location::new(LocationId::new(), store_id, "Main Warehouse");
    let location_id = location.id;

    ledger.seed(|tables| {
        tables.insert_store(store);
        tables.insert_membership(Membership::new(store_id, user_id, Role::Owner));
        tables.insert_product(product);
        tables.insert_variant(variant);
        tables.insert_location(location);
    });

    let mutations = Mutations::new(ledger, notifier);
    let actor = Actor::user(user_id);

    let adjusted = mutations.adjust_inventory(
        AdjustInventoryInput {
            variant_id,
            location_id,
            delta: 12,
            reason: Some("Initial receiving".to_string()),
        },
        &actor,
    );
    tracing::info!(?adjusted, "adjusted inventory");

    let created = mutations.create_order(
        CreateOrderInput {
            store_id,
            line_items: vec![LineItemInput {
                variant_id,
                quantity: Some(3),
            }],
            email: Some("buyer@example.com".to_string()),
            shipping_address: None,
            idempotency_key: Some("demo-order-1".to_string()),
        },
        &actor,
    );
    tracing::info!(?created, "created order");

    if let Some(order) = created.order {
        let fulfilled = mutations.update_fulfillment_status(
            UpdateFulfillmentStatusInput {
                order_id: order.id,
                status: FulfillmentStatus::Fulfilled,
                tracking_number: Some("1Z999".to_string()),
                tracking_company: Some("UPS".to_string()),
                tracking_url: None,
            },
            &actor,
        );
        tracing::info!(?fulfilled, "fulfilled order");
    }

    while let Ok(notification) = subscription.try_recv() {
        tracing::info!(
            event = notification.kind.as_str(),
            routing_key = %notification.routing_key,
            "notification delivered"
        );
    }

    Ok(())
}
