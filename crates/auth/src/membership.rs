use serde::{Deserialize, Serialize};

use backstock_core::{StoreId, UserId};

/// Role a user holds within one store.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Owner,
    Staff,
    Viewer,
}

impl Role {
    pub fn can_write(&self) -> bool {
        matches!(self, Role::Owner | Role::Staff)
    }

    pub fn can_manage(&self) -> bool {
        matches!(self, Role::Owner)
    }
}

/// A user's membership in a store. The (store, user) pair is unique.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    pub store_id: StoreId,
    pub user_id: UserId,
    pub role: Role,
}

impl Membership {
    pub fn new(store_id: StoreId, user_id: UserId, role: Role) -> Self {
        Self {
            store_id,
            user_id,
            role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staff_writes_but_does_not_manage() {
        assert!(Role::Staff.can_write());
        assert!(!Role::Staff.can_manage());
    }

    #[test]
    fn viewer_only_reads() {
        assert!(!Role::Viewer.can_write());
        assert!(!Role::Viewer.can_manage());
    }

    #[test]
    fn owner_does_everything() {
        assert!(Role::Owner.can_write());
        assert!(Role::Owner.can_manage());
    }
}
