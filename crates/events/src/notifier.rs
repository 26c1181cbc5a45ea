//! Notification publishing/subscription abstraction (mechanics only).
//!
//! The notifier is the **transport seam** for subscription-style events after a
//! mutation has been persisted. It is intentionally lightweight:
//!
//! - Transport-agnostic: in-memory channels here, a broker in production.
//! - Best-effort: delivery may fail or duplicate; the persisted rows are the
//!   source of truth, so consumers must tolerate both.
//! - Broadcast semantics: each subscriber gets a copy of every message.
//!
//! `publish()` failures are surfaced to the caller, which logs and moves on —
//! they must never propagate as caller-visible errors from a service.

use std::sync::Arc;
use std::sync::mpsc::Receiver;

/// A subscription to a notification stream.
///
/// Designed for single-threaded consumption: one subscription per consumer
/// thread, messages received in publish order per publisher.
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Receive the next message without blocking. `Err` means either no
    /// message is waiting yet or the notifier side went away.
    pub fn try_recv(&self) -> Result<M, std::sync::mpsc::TryRecvError> {
        self.receiver.try_recv()
    }
}

/// Domain-agnostic notifier (pub/sub abstraction).
///
/// Implementations must be safe to share across threads; multiple request
/// handlers publish concurrently.
pub trait Notifier<M>: Send + Sync {
    type Error: core::fmt::Debug + Send + Sync + 'static;

    fn publish(&self, message: M) -> Result<(), Self::Error>;

    fn subscribe(&self) -> Subscription<M>;
}

impl<M, N> Notifier<M> for Arc<N>
where
    N: Notifier<M> + ?Sized,
{
    type Error = N::Error;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        (**self).publish(message)
    }

    fn subscribe(&self) -> Subscription<M> {
        (**self).subscribe()
    }
}
