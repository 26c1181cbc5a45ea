//! Order creation/reservation and fulfillment transitions.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::{Value as JsonValue, json};

use backstock_core::{Actor, DomainError, DomainResult, FulfillmentId, LineItemId, OrderId, StoreId, VariantId};
use backstock_events::{Notification, Notifier};
use backstock_orders::{
    Fulfillment, FulfillmentStatus, LineItem, Order, OrderStatus, TrackingInfo,
};

use crate::audit::{AuditAction, AuditEntry, ResourceRef};
use crate::ledger::{Ledger, Tables};

/// One requested order line.
#[derive(Debug, Clone)]
pub struct LineItemRequest {
    pub variant_id: VariantId,
    pub quantity: i64,
}

/// Input to `create_order`.
#[derive(Debug, Clone)]
pub struct CreateOrderRequest {
    pub store_id: StoreId,
    pub line_items: Vec<LineItemRequest>,
    pub email: Option<String>,
    pub shipping_address: Option<JsonValue>,
    /// Caller-supplied deduplication token; retries with the same key return
    /// the order the first attempt created.
    pub idempotency_key: Option<String>,
}

/// Creates orders (with inventory reservation) and drives fulfillment.
pub struct OrderService<L, N> {
    ledger: Arc<L>,
    notifier: N,
}

struct CreateOutcome {
    order: Order,
    created: bool,
}

impl<L, N> OrderService<L, N>
where
    L: Ledger,
    N: Notifier<Notification>,
{
    pub fn new(ledger: Arc<L>, notifier: N) -> Self {
        Self { ledger, notifier }
    }

    /// Create an order, validating every requested line against aggregate
    /// availability before anything persists. Validation problems are
    /// collected across all lines and returned together; any of them aborts
    /// the whole transaction.
    ///
    /// With an idempotency key, a prior order under the same key is returned
    /// unchanged, and a storage-level key conflict (a concurrent duplicate
    /// racing us) resolves the same way by re-reading.
    pub fn create_order(
        &self,
        request: CreateOrderRequest,
        actor: &Actor,
    ) -> Result<Order, Vec<DomainError>> {
        let now = Utc::now();
        let mut line_errors: Vec<DomainError> = Vec::new();

        let result = self.ledger.with_transaction(|tables| {
            if let Some(key) = &request.idempotency_key {
                if let Some(existing) = tables.order_by_idempotency_key(key) {
                    return Ok(CreateOutcome {
                        order: existing.clone(),
                        created: false,
                    });
                }
            }

            let store = tables.store(request.store_id)?.clone();

            // Validate every line before building anything; all problems are
            // reported together.
            let mut lines: Vec<LineItem> = Vec::with_capacity(request.line_items.len());
            for item in &request.line_items {
                let Some((product, variant)) =
                    tables.variant_in_store(item.variant_id, store.id)
                else {
                    line_errors
                        .push(DomainError::not_found(format!("Variant {}", item.variant_id)));
                    continue;
                };
                if item.quantity <= 0 {
                    line_errors.push(DomainError::validation(format!(
                        "quantity must be positive for {}",
                        variant.display_name(&product.title)
                    )));
                    continue;
                }
                let total_available = tables.total_available(item.variant_id);
                if total_available < item.quantity {
                    line_errors.push(DomainError::validation(format!(
                        "insufficient inventory for {}",
                        variant.display_name(&product.title)
                    )));
                    continue;
                }
                lines.push(LineItem::from_variant(
                    LineItemId::new(),
                    &product.title,
                    variant,
                    item.quantity,
                ));
            }
            if !line_errors.is_empty() {
                return Err(DomainError::validation("order validation failed"));
            }

            let mut order = Order::pending(
                OrderId::new(),
                store.id,
                tables.next_order_number(&store),
                request.email.clone(),
                request.shipping_address.clone(),
                request.idempotency_key.clone(),
                now,
            );
            order.line_items = lines;
            order.calculate_totals();

            tables.insert_order(order.clone())?;

            // Reserve against the single best location per line. Aggregate
            // sufficiency was already checked, so a failure here (stock split
            // across locations) leaves the line under-reserved rather than
            // aborting the order.
            for line in &order.line_items {
                match tables.best_reservation_level(line.variant_id, line.quantity) {
                    Some(key) => {
                        if let Some(level) = tables.level_mut(key) {
                            if let Err(e) = level.reserve(line.quantity, now) {
                                tracing::warn!(
                                    variant_id = %line.variant_id,
                                    error = %e,
                                    "line left under-reserved"
                                );
                            }
                        }
                    }
                    None => {
                        tracing::warn!(
                            variant_id = %line.variant_id,
                            quantity = line.quantity,
                            "no single location can hold the line; left unreserved"
                        );
                    }
                }
            }

            tables.audit(AuditEntry::new(
                store.id,
                actor,
                AuditAction::Create,
                ResourceRef::new("Order", order.id),
                json!({ "status": [JsonValue::Null, "pending"] }),
                json!({}),
                now,
            ));

            Ok(CreateOutcome {
                order,
                created: true,
            })
        });

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(_) if !line_errors.is_empty() => return Err(line_errors),
            // Lost a creation race on the idempotency key: the order exists,
            // re-read it.
            Err(DomainError::Conflict(msg)) => {
                let existing = request.idempotency_key.as_deref().and_then(|key| {
                    self.ledger
                        .read(|tables| tables.order_by_idempotency_key(key).cloned())
                });
                match existing {
                    Some(order) => CreateOutcome {
                        order,
                        created: false,
                    },
                    None => return Err(vec![DomainError::Conflict(msg)]),
                }
            }
            Err(e) => return Err(vec![e]),
        };

        if outcome.created {
            tracing::info!(
                order_id = %outcome.order.id,
                order_number = %outcome.order.order_number,
                "order created"
            );
            let notification = Notification::order_created(
                outcome.order.store_id,
                json!({
                    "order_id": outcome.order.id,
                    "order_number": outcome.order.order_number,
                    "total_price": outcome.order.total_price,
                }),
            );
            if let Err(e) = self.notifier.publish(notification) {
                tracing::warn!(error = ?e, "failed to publish order_created notification");
            }
        }

        Ok(outcome.order)
    }

    /// Drive the order-level fulfillment state machine.
    ///
    /// `Fulfilled` creates a shipped fulfillment row, completes every line
    /// item, and releases the committed stock backing them. `Partial` and
    /// `Unfulfilled` are status-only markings.
    pub fn update_fulfillment_status(
        &self,
        order_id: OrderId,
        target: FulfillmentStatus,
        tracking: TrackingInfo,
        actor: &Actor,
    ) -> DomainResult<Order> {
        let now = Utc::now();
        let (order, previous) = self.ledger.with_transaction(|tables| {
            let previous = tables.order(order_id)?.fulfillment_status;

            match target {
                FulfillmentStatus::Fulfilled => {
                    tables.insert_fulfillment(Fulfillment::shipped(
                        FulfillmentId::new(),
                        order_id,
                        tracking.clone(),
                        now,
                    ));

                    // Complete every line, then release its committed stock
                    // location by location until the line is covered or no
                    // committed stock is left for the variant.
                    let line_specs: Vec<(VariantId, i64)> = {
                        let order = tables.order_mut(order_id)?;
                        order
                            .line_items
                            .iter_mut()
                            .map(|line| {
                                line.fulfilled_quantity = line.quantity;
                                (line.variant_id, line.quantity)
                            })
                            .collect()
                    };
                    for (variant_id, quantity) in line_specs {
                        let mut remaining = quantity;
                        for key in tables.committed_level_keys(variant_id) {
                            if remaining == 0 {
                                break;
                            }
                            if let Some(level) = tables.level_mut(key) {
                                let to_fulfill = level.committed.min(remaining);
                                level.fulfill(to_fulfill, now)?;
                                remaining -= to_fulfill;
                            }
                        }
                    }

                    let order = tables.order_mut(order_id)?;
                    order.status = OrderStatus::Fulfilled;
                    order.fulfillment_status = FulfillmentStatus::Fulfilled;
                    order.updated_at = now;
                }
                FulfillmentStatus::Partial => {
                    let order = tables.order_mut(order_id)?;
                    order.fulfillment_status = FulfillmentStatus::Partial;
                    order.updated_at = now;
                }
                FulfillmentStatus::Unfulfilled => {
                    let order = tables.order_mut(order_id)?;
                    order.fulfillment_status = FulfillmentStatus::Unfulfilled;
                    order.updated_at = now;
                }
            }

            let order = tables.order(order_id)?.clone();
            tables.audit(AuditEntry::new(
                order.store_id,
                actor,
                AuditAction::UpdateFulfillment,
                ResourceRef::new("Order", order.id),
                json!({ "fulfillment_status": [previous, order.fulfillment_status] }),
                json!({}),
                now,
            ));

            Ok((order, previous))
        })?;

        tracing::info!(
            order_id = %order.id,
            from = ?previous,
            to = ?order.fulfillment_status,
            "fulfillment status updated"
        );

        let notification = Notification::fulfillment_status_changed(
            order.id,
            json!({
                "order_id": order.id,
                "previous": previous,
                "current": order.fulfillment_status,
            }),
        );
        if let Err(e) = self.notifier.publish(notification) {
            tracing::warn!(error = ?e, "failed to publish fulfillment_status_changed notification");
        }

        Ok(order)
    }

    /// Mark one fulfillment row shipped. The owning order's fulfillment
    /// status is recomputed from line-item progress as a side effect of the
    /// save.
    pub fn ship_fulfillment(
        &self,
        fulfillment_id: FulfillmentId,
        tracking: TrackingInfo,
        _actor: &Actor,
    ) -> DomainResult<Fulfillment> {
        let now = Utc::now();
        self.ledger.with_transaction(|tables| {
            let fulfillment = tables.fulfillment_mut(fulfillment_id)?;
            fulfillment.ship(tracking.clone(), now);
            let fulfillment = fulfillment.clone();
            Self::recompute_order_status(tables, fulfillment.order_id, now)?;
            Ok(fulfillment)
        })
    }

    /// Cancel one fulfillment row; same derived-status recompute as `ship`.
    pub fn cancel_fulfillment(
        &self,
        fulfillment_id: FulfillmentId,
        _actor: &Actor,
    ) -> DomainResult<Fulfillment> {
        let now = Utc::now();
        self.ledger.with_transaction(|tables| {
            let fulfillment = tables.fulfillment_mut(fulfillment_id)?;
            fulfillment.cancel();
            let fulfillment = fulfillment.clone();
            Self::recompute_order_status(tables, fulfillment.order_id, now)?;
            Ok(fulfillment)
        })
    }

    fn recompute_order_status(
        tables: &mut Tables,
        order_id: OrderId,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        let order = tables.order_mut(order_id)?;
        if let Some(status) = order.derived_fulfillment_status() {
            order.fulfillment_status = status;
            order.updated_at = now;
        }
        Ok(())
    }
}
