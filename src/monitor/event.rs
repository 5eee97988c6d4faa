//! Change events and the observer registry monitors publish them through

use crate::core::types::Address;
use parking_lot::Mutex;
use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

/// A monitored value changed.
///
/// `address` is the effective address the new value was read from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemoryChange<T> {
    pub address: Address,
    pub value: T,
}

/// One element of a monitored array changed.
///
/// `address` is the effective address of element 0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrayChange<T> {
    pub address: Address,
    pub index: usize,
    pub value: T,
}

impl<T> ArrayChange<T> {
    /// Address of the element that changed, given the element size
    pub fn element_address(&self, element_size: usize) -> Address {
        self.address.element(self.index, element_size)
    }
}

/// Token returned by [`SubscriberRegistry::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub#{}", self.0)
    }
}

type Callback<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// Add/remove/notify list of event callbacks.
///
/// Callbacks run on the notifying thread, outside the registry lock, so a
/// callback may subscribe or unsubscribe without deadlocking.
pub struct SubscriberRegistry<E> {
    next_id: AtomicU64,
    subscribers: Mutex<Vec<(SubscriptionId, Callback<E>)>>,
}

impl<E> SubscriberRegistry<E> {
    pub fn new() -> Self {
        SubscriberRegistry {
            next_id: AtomicU64::new(1),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Registers `callback` for every future event
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.subscribers.lock().push((id, Arc::new(callback)));
        id
    }

    /// Removes a callback; `false` if it was not registered
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.lock();
        let before = subscribers.len();
        subscribers.retain(|(existing, _)| *existing != id);
        subscribers.len() != before
    }

    /// Detaches every callback
    pub fn clear(&self) {
        self.subscribers.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.subscribers.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.lock().is_empty()
    }

    /// Calls every callback in subscription order; no-op when empty
    pub fn notify(&self, event: &E) {
        let callbacks: Vec<Callback<E>> = self
            .subscribers
            .lock()
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();

        for callback in callbacks {
            callback(event);
        }
    }
}

impl<E: Clone + Send + 'static> SubscriberRegistry<E> {
    /// Registers a callback forwarding clones of every event into a channel.
    ///
    /// Events after the receiver is dropped are discarded.
    pub fn subscribe_channel(&self) -> (SubscriptionId, mpsc::UnboundedReceiver<E>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = self.subscribe(move |event: &E| {
            let _ = tx.send(event.clone());
        });
        (id, rx)
    }
}

impl<E> Default for SubscriberRegistry<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for SubscriberRegistry<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriberRegistry")
            .field("subscribers", &self.len())
            .finish()
    }
}
