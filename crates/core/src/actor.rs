//! Actor identity threaded explicitly through every service call.
//!
//! There is deliberately no ambient "current user" context; callers pass the
//! acting identity down to the layer that records it.

use serde::{Deserialize, Serialize};

use crate::id::UserId;

/// The identity performing a mutation. Audit entries record it; authorization
/// decisions consume it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: Option<UserId>,
}

impl Actor {
    /// An authenticated user.
    pub fn user(user_id: UserId) -> Self {
        Self {
            user_id: Some(user_id),
        }
    }

    /// A system-initiated action with no user attached.
    pub fn system() -> Self {
        Self { user_id: None }
    }
}
