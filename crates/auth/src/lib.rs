//! `backstock-auth` — store-scoped role-based authorization.
//!
//! Policy is an explicit contract over a tagged resource enum: no ambient
//! request context, no dispatch by record class name.

pub mod authorize;
pub mod membership;

pub use authorize::{Authorizer, MembershipDirectory, Resource, StoreAuthorizer};
pub use membership::{Membership, Role};
