//! Authorization contract checked at the mutation boundary.
//!
//! Resources are a tagged enum carrying their resolved store scope; the
//! caller derives the scope where the data lives (an inventory level reaches
//! its store through its location, an alert carries it directly) and policy
//! here stays a pure role check. No IO, no panics, no business logic.

use backstock_core::{Actor, StoreId};

use crate::membership::Role;

/// What is being acted on, tagged by entity type with its owning store.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Resource {
    Store { store_id: StoreId },
    InventoryLevel { store_id: StoreId },
    InventoryAlert { store_id: StoreId },
    Order { store_id: StoreId },
}

impl Resource {
    pub fn store_id(&self) -> StoreId {
        match self {
            Resource::Store { store_id }
            | Resource::InventoryLevel { store_id }
            | Resource::InventoryAlert { store_id }
            | Resource::Order { store_id } => *store_id,
        }
    }
}

/// Membership lookup seam; the ledger store implements it.
pub trait MembershipDirectory {
    fn role_for(&self, store_id: StoreId, user_id: backstock_core::UserId) -> Option<Role>;
}

impl<D> MembershipDirectory for std::sync::Arc<D>
where
    D: MembershipDirectory + ?Sized,
{
    fn role_for(&self, store_id: StoreId, user_id: backstock_core::UserId) -> Option<Role> {
        (**self).role_for(store_id, user_id)
    }
}

/// Per-entity-type authorization decisions.
pub trait Authorizer {
    fn can_read(&self, actor: &Actor, resource: &Resource) -> bool;
    fn can_write(&self, actor: &Actor, resource: &Resource) -> bool;
    fn can_manage(&self, actor: &Actor, resource: &Resource) -> bool;
}

/// Role-based authorizer over store memberships.
///
/// Every entity type today resolves to the same store-membership check; the
/// per-variant match is the seam where finer-grained rules land.
#[derive(Debug)]
pub struct StoreAuthorizer<D> {
    directory: D,
}

impl<D: MembershipDirectory> StoreAuthorizer<D> {
    pub fn new(directory: D) -> Self {
        Self { directory }
    }

    fn role(&self, actor: &Actor, resource: &Resource) -> Option<Role> {
        let user_id = actor.user_id?;
        self.directory.role_for(resource.store_id(), user_id)
    }
}

impl<D: MembershipDirectory> Authorizer for StoreAuthorizer<D> {
    fn can_read(&self, actor: &Actor, resource: &Resource) -> bool {
        self.role(actor, resource).is_some()
    }

    fn can_write(&self, actor: &Actor, resource: &Resource) -> bool {
        match resource {
            Resource::Store { .. }
            | Resource::InventoryLevel { .. }
            | Resource::InventoryAlert { .. }
            | Resource::Order { .. } => self
                .role(actor, resource)
                .is_some_and(|role| role.can_write()),
        }
    }

    fn can_manage(&self, actor: &Actor, resource: &Resource) -> bool {
        self.role(actor, resource)
            .is_some_and(|role| role.can_manage())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backstock_core::UserId;
    use std::collections::HashMap;

    struct FixedDirectory(HashMap<(StoreId, UserId), Role>);

    impl MembershipDirectory for FixedDirectory {
        fn role_for(&self, store_id: StoreId, user_id: UserId) -> Option<Role> {
            self.0.get(&(store_id, user_id)).copied()
        }
    }

    #[test]
    fn membership_gates_access_per_store() {
        let store = StoreId::new();
        let other_store = StoreId::new();
        let user = UserId::new();
        let authz = StoreAuthorizer::new(FixedDirectory(HashMap::from([(
            (store, user),
            Role::Staff,
        )])));
        let actor = Actor::user(user);

        assert!(authz.can_write(&actor, &Resource::InventoryLevel { store_id: store }));
        assert!(!authz.can_write(
            &actor,
            &Resource::InventoryLevel {
                store_id: other_store
            }
        ));
        assert!(!authz.can_manage(&actor, &Resource::Store { store_id: store }));
    }

    #[test]
    fn anonymous_actor_is_denied() {
        let store = StoreId::new();
        let authz = StoreAuthorizer::new(FixedDirectory(HashMap::new()));
        let actor = Actor::system();

        assert!(!authz.can_read(&actor, &Resource::Order { store_id: store }));
        assert!(!authz.can_write(&actor, &Resource::Order { store_id: store }));
    }
}
