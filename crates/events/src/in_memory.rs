//! Channel-backed notifier for tests and the demo binary.

use std::sync::{Mutex, mpsc};

use thiserror::Error;

use crate::notifier::{Notifier, Subscription};

/// Failure publishing through [`InMemoryNotifier`].
#[derive(Debug, Error)]
pub enum InMemoryNotifierError {
    /// The sender list lock was poisoned by a panicking thread.
    #[error("notifier sender list poisoned")]
    Poisoned,
}

/// Fan-out notifier over std channels.
///
/// Each subscriber owns the receiving half of its own channel and gets a
/// clone of every message published after it subscribed; nothing is replayed.
/// Dropping a `Subscription` closes its channel, and the matching sender is
/// pruned on the next publish rather than eagerly.
#[derive(Debug)]
pub struct InMemoryNotifier<M> {
    senders: Mutex<Vec<mpsc::Sender<M>>>,
}

impl<M> InMemoryNotifier<M> {
    pub fn new() -> Self {
        Self {
            senders: Mutex::new(Vec::new()),
        }
    }
}

impl<M> Default for InMemoryNotifier<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> Notifier<M> for InMemoryNotifier<M>
where
    M: Clone + Send + 'static,
{
    type Error = InMemoryNotifierError;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        let mut senders = self
            .senders
            .lock()
            .map_err(|_| InMemoryNotifierError::Poisoned)?;
        senders.retain(|sender| sender.send(message.clone()).is_ok());
        Ok(())
    }

    fn subscribe(&self) -> Subscription<M> {
        let (sender, receiver) = mpsc::channel();
        // On a poisoned list the sender is dropped right here and the
        // subscription sees a disconnected stream.
        if let Ok(mut senders) = self.senders.lock() {
            senders.push(sender);
        }
        Subscription::new(receiver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_subscriber_receives_its_own_copy() {
        let notifier: InMemoryNotifier<String> = InMemoryNotifier::new();
        let first = notifier.subscribe();
        let second = notifier.subscribe();

        notifier.publish("stock-low".to_string()).unwrap();

        assert_eq!(first.try_recv().unwrap(), "stock-low");
        assert_eq!(second.try_recv().unwrap(), "stock-low");
    }

    #[test]
    fn dropped_subscriptions_are_pruned_on_publish() {
        let notifier: InMemoryNotifier<String> = InMemoryNotifier::new();
        let kept = notifier.subscribe();
        drop(notifier.subscribe());

        notifier.publish("first".to_string()).unwrap();
        notifier.publish("second".to_string()).unwrap();

        assert_eq!(kept.try_recv().unwrap(), "first");
        assert_eq!(kept.try_recv().unwrap(), "second");
        assert!(kept.try_recv().is_err());
    }

    #[test]
    fn messages_before_subscribing_are_not_replayed() {
        let notifier: InMemoryNotifier<String> = InMemoryNotifier::new();
        notifier.publish("early".to_string()).unwrap();

        let late = notifier.subscribe();
        notifier.publish("late".to_string()).unwrap();

        assert_eq!(late.try_recv().unwrap(), "late");
        assert!(late.try_recv().is_err());
    }
}
