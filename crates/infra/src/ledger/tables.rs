//! Relational state of the back office.
//!
//! Uniqueness constraints are carried by the map keys themselves: one
//! inventory level per `(variant, location)`, one order per idempotency key.
//! `BTreeMap`s keep iteration deterministic.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use backstock_auth::{Membership, Role};
use backstock_catalog::{Location, Product, Store, Variant};
use backstock_core::{
    AlertId, DomainError, DomainResult, FulfillmentId, LocationId, OrderId, ProductId, StoreId,
    UserId, VariantId,
};
use backstock_inventory::{InventoryAlert, InventoryLevel};
use backstock_orders::{Fulfillment, Order};

use crate::audit::AuditEntry;

/// Primary key of an inventory level: the unique (variant, location) pair.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct LevelKey {
    pub variant_id: VariantId,
    pub location_id: LocationId,
}

impl LevelKey {
    pub fn new(variant_id: VariantId, location_id: LocationId) -> Self {
        Self {
            variant_id,
            location_id,
        }
    }
}

/// All tables. Cloneable so a transaction can work on a private copy.
#[derive(Debug, Clone, Default)]
pub struct Tables {
    stores: BTreeMap<StoreId, Store>,
    memberships: BTreeMap<(StoreId, UserId), Membership>,
    locations: BTreeMap<LocationId, Location>,
    products: BTreeMap<ProductId, Product>,
    variants: BTreeMap<VariantId, Variant>,
    levels: BTreeMap<LevelKey, InventoryLevel>,
    orders: BTreeMap<OrderId, Order>,
    orders_by_idempotency_key: BTreeMap<String, OrderId>,
    fulfillments: BTreeMap<FulfillmentId, Fulfillment>,
    alerts: BTreeMap<AlertId, InventoryAlert>,
    audit_log: Vec<AuditEntry>,
}

impl Tables {
    pub fn new() -> Self {
        Self::default()
    }

    // ── catalog ──────────────────────────────────────────────────────────

    pub fn insert_store(&mut self, store: Store) {
        self.stores.insert(store.id, store);
    }

    pub fn store(&self, id: StoreId) -> DomainResult<&Store> {
        self.stores
            .get(&id)
            .ok_or_else(|| DomainError::not_found(format!("Store {id}")))
    }

    pub fn insert_location(&mut self, location: Location) {
        self.locations.insert(location.id, location);
    }

    pub fn location(&self, id: LocationId) -> DomainResult<&Location> {
        self.locations
            .get(&id)
            .ok_or_else(|| DomainError::not_found(format!("Location {id}")))
    }

    pub fn insert_product(&mut self, product: Product) {
        self.products.insert(product.id, product);
    }

    pub fn insert_variant(&mut self, variant: Variant) {
        self.variants.insert(variant.id, variant);
    }

    pub fn product(&self, id: ProductId) -> DomainResult<&Product> {
        self.products
            .get(&id)
            .ok_or_else(|| DomainError::not_found(format!("Product {id}")))
    }

    pub fn variant(&self, id: VariantId) -> DomainResult<&Variant> {
        self.variants
            .get(&id)
            .ok_or_else(|| DomainError::not_found(format!("Variant {id}")))
    }

    /// Resolve a variant scoped to a store. Cross-store references come back
    /// as `None`, indistinguishable from a missing variant.
    pub fn variant_in_store(
        &self,
        variant_id: VariantId,
        store_id: StoreId,
    ) -> Option<(&Product, &Variant)> {
        let variant = self.variants.get(&variant_id)?;
        let product = self.products.get(&variant.product_id)?;
        (product.store_id == store_id).then_some((product, variant))
    }

    /// Owning store of a variant, via its product.
    pub fn store_for_variant(&self, variant_id: VariantId) -> Option<StoreId> {
        let variant = self.variants.get(&variant_id)?;
        Some(self.products.get(&variant.product_id)?.store_id)
    }

    /// Owning store of a location.
    pub fn store_for_location(&self, location_id: LocationId) -> Option<StoreId> {
        Some(self.locations.get(&location_id)?.store_id)
    }

    // ── memberships ──────────────────────────────────────────────────────

    pub fn insert_membership(&mut self, membership: Membership) {
        self.memberships
            .insert((membership.store_id, membership.user_id), membership);
    }

    pub fn role_for(&self, store_id: StoreId, user_id: UserId) -> Option<Role> {
        self.memberships
            .get(&(store_id, user_id))
            .map(|m| m.role)
    }

    // ── inventory levels ─────────────────────────────────────────────────

    pub fn level(&self, key: LevelKey) -> Option<&InventoryLevel> {
        self.levels.get(&key)
    }

    pub fn level_mut(&mut self, key: LevelKey) -> Option<&mut InventoryLevel> {
        self.levels.get_mut(&key)
    }

    /// Locate or create the row for a (variant, location) pair; a fresh row
    /// starts with every counter at zero. The map key is the uniqueness
    /// constraint, so concurrent creation cannot produce duplicates.
    pub fn find_or_create_level(
        &mut self,
        variant_id: VariantId,
        location_id: LocationId,
        now: DateTime<Utc>,
    ) -> &mut InventoryLevel {
        self.levels
            .entry(LevelKey::new(variant_id, location_id))
            .or_insert_with(|| InventoryLevel::empty(variant_id, location_id, now))
    }

    pub fn levels_for_variant(
        &self,
        variant_id: VariantId,
    ) -> impl Iterator<Item = &InventoryLevel> {
        self.levels
            .range(
                LevelKey::new(variant_id, LocationId::from_uuid(uuid::Uuid::nil()))..,
            )
            .take_while(move |(key, _)| key.variant_id == variant_id)
            .map(|(_, level)| level)
    }

    /// Sum of `available` across every location holding the variant.
    pub fn total_available(&self, variant_id: VariantId) -> i64 {
        self.levels_for_variant(variant_id)
            .map(|level| level.available)
            .sum()
    }

    /// Best single location to reserve against: the largest `available`
    /// among rows that can hold the whole quantity. `None` when no single
    /// location suffices; demand is then left unreserved rather than split.
    pub fn best_reservation_level(&self, variant_id: VariantId, quantity: i64) -> Option<LevelKey> {
        self.levels_for_variant(variant_id)
            .filter(|level| level.available >= quantity)
            .max_by_key(|level| level.available)
            .map(|level| LevelKey::new(level.variant_id, level.location_id))
    }

    /// Rows of a variant that still carry committed stock, in key order.
    pub fn committed_level_keys(&self, variant_id: VariantId) -> Vec<LevelKey> {
        self.levels_for_variant(variant_id)
            .filter(|level| level.committed > 0)
            .map(|level| LevelKey::new(level.variant_id, level.location_id))
            .collect()
    }

    pub fn low_stock_levels(&self, threshold: i64) -> impl Iterator<Item = &InventoryLevel> {
        self.levels.values().filter(move |l| l.low_stock(threshold))
    }

    pub fn in_stock_levels(&self) -> impl Iterator<Item = &InventoryLevel> {
        self.levels.values().filter(|l| l.in_stock())
    }

    pub fn out_of_stock_levels(&self) -> impl Iterator<Item = &InventoryLevel> {
        self.levels.values().filter(|l| l.out_of_stock())
    }

    // ── orders ───────────────────────────────────────────────────────────

    /// Insert a new order, enforcing global uniqueness of the idempotency
    /// key. A `Conflict` here means another request already created the
    /// order; callers re-read instead of failing.
    pub fn insert_order(&mut self, order: Order) -> DomainResult<()> {
        if let Some(key) = &order.idempotency_key {
            if self.orders_by_idempotency_key.contains_key(key) {
                return Err(DomainError::conflict(format!(
                    "idempotency key {key:?} already used"
                )));
            }
            self.orders_by_idempotency_key
                .insert(key.clone(), order.id);
        }
        self.orders.insert(order.id, order);
        Ok(())
    }

    pub fn order(&self, id: OrderId) -> DomainResult<&Order> {
        self.orders
            .get(&id)
            .ok_or_else(|| DomainError::not_found(format!("Order {id}")))
    }

    pub fn order_mut(&mut self, id: OrderId) -> DomainResult<&mut Order> {
        self.orders
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found(format!("Order {id}")))
    }

    pub fn order_by_idempotency_key(&self, key: &str) -> Option<&Order> {
        let id = self.orders_by_idempotency_key.get(key)?;
        self.orders.get(id)
    }

    pub fn order_count_for_store(&self, store_id: StoreId) -> usize {
        self.orders.values().filter(|o| o.store_id == store_id).count()
    }

    /// `{prefix}-{sequence}` with the sequence zero-padded to six digits.
    pub fn next_order_number(&self, store: &Store) -> String {
        let sequence = self.order_count_for_store(store.id) + 1;
        format!("{}-{:06}", store.order_prefix(), sequence)
    }

    // ── fulfillments ─────────────────────────────────────────────────────

    pub fn insert_fulfillment(&mut self, fulfillment: Fulfillment) {
        self.fulfillments.insert(fulfillment.id, fulfillment);
    }

    pub fn fulfillment(&self, id: FulfillmentId) -> DomainResult<&Fulfillment> {
        self.fulfillments
            .get(&id)
            .ok_or_else(|| DomainError::not_found(format!("Fulfillment {id}")))
    }

    pub fn fulfillments_for_order(&self, order_id: OrderId) -> Vec<&Fulfillment> {
        self.fulfillments
            .values()
            .filter(|f| f.order_id == order_id)
            .collect()
    }

    pub fn fulfillment_mut(&mut self, id: FulfillmentId) -> DomainResult<&mut Fulfillment> {
        self.fulfillments
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found(format!("Fulfillment {id}")))
    }

    // ── alerts ───────────────────────────────────────────────────────────

    pub fn insert_alert(&mut self, alert: InventoryAlert) {
        self.alerts.insert(alert.id, alert);
    }

    pub fn alert(&self, id: AlertId) -> DomainResult<&InventoryAlert> {
        self.alerts
            .get(&id)
            .ok_or_else(|| DomainError::not_found(format!("InventoryAlert {id}")))
    }

    pub fn alert_mut(&mut self, id: AlertId) -> DomainResult<&mut InventoryAlert> {
        self.alerts
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found(format!("InventoryAlert {id}")))
    }

    pub fn unreviewed_alerts(&self, store_id: StoreId) -> impl Iterator<Item = &InventoryAlert> {
        self.alerts
            .values()
            .filter(move |a| a.store_id == store_id && !a.reviewed)
    }

    pub fn reviewed_alerts(&self, store_id: StoreId) -> impl Iterator<Item = &InventoryAlert> {
        self.alerts
            .values()
            .filter(move |a| a.store_id == store_id && a.reviewed)
    }

    pub fn alert_count(&self) -> usize {
        self.alerts.len()
    }

    // ── audit log ────────────────────────────────────────────────────────

    /// Append-only; nothing ever mutates or removes an entry.
    pub fn audit(&mut self, entry: AuditEntry) {
        self.audit_log.push(entry);
    }

    pub fn audit_log(&self) -> &[AuditEntry] {
        &self.audit_log
    }
}
