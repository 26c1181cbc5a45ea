//! `backstock-events` — best-effort pub/sub notification plumbing.
//!
//! Mutating services publish notifications *after* their transaction commits;
//! delivery is best-effort and a publish failure is never allowed to roll a
//! committed mutation back.

pub mod in_memory;
pub mod notification;
pub mod notifier;

pub use in_memory::{InMemoryNotifier, InMemoryNotifierError};
pub use notification::{EventKind, Notification};
pub use notifier::{Notifier, Subscription};
