//! Cross-context change notification.
//!
//! A [`SyncChannel`] is an observer registry shared by every view context in
//! the process. Writers publish a [`StorageEvent`] carrying the key and the
//! full new value; every other subscriber receives it on its own queue and
//! decides when to drain it. The writer never hears its own event.
//!
//! The channel only reaches contexts within one process. The CLI runs one
//! context per process, so there commits from other processes are picked up
//! through the storage change counter instead.

use std::sync::{
    Arc, Mutex, PoisonError,
    mpsc::{self, Receiver, Sender},
};

use uuid::Uuid;

/// Identifies one view context.
pub type ContextId = Uuid;

/// A change to one storage key, as seen by contexts that did not make it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEvent {
    pub key: String,

    /// The full new serialized value.
    pub new_value: String,
}

struct Subscriber {
    context: ContextId,
    tx: Sender<StorageEvent>,
}

/// Process-wide publish/subscribe hub for storage changes.
///
/// Cheap to clone; clones share the same subscriber list.
#[derive(Clone, Default)]
pub struct SyncChannel {
    subscribers: Arc<Mutex<Vec<Subscriber>>>,
}

impl SyncChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `context` and returns its event queue.
    pub fn subscribe(&self, context: ContextId) -> Subscription {
        let (tx, rx) = mpsc::channel();
        self.lock().push(Subscriber { context, tx });
        Subscription { rx }
    }

    /// Delivers `event` to every subscriber except `origin`.
    ///
    /// Subscribers whose queue has been dropped are pruned.
    pub fn publish(&self, origin: ContextId, event: &StorageEvent) {
        let mut subscribers = self.lock();
        subscribers.retain(|s| s.context == origin || s.tx.send(event.clone()).is_ok());
        tracing::trace!(key = %event.key, subscribers = subscribers.len(), "published");
    }

    /// Number of live subscriptions, including the caller's own.
    #[cfg(test)]
    pub fn subscriber_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Subscriber>> {
        // A poisoned list is still a valid list.
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// The receiving end of one context's subscription.
pub struct Subscription {
    rx: Receiver<StorageEvent>,
}

impl Subscription {
    /// Takes every event queued so far, oldest first, without blocking.
    pub fn drain(&self) -> Vec<StorageEvent> {
        self.rx.try_iter().collect()
    }
}
