//! Pointer signal fan-out.
//!
//! The bus plays the role of the platform event source: whoever owns the
//! window (a UI loop, a trace replayer, a test) calls [`PointerBus::emit`],
//! and every live [`Subscription`] interested in that signal kind receives it
//! on its own channel. Dropping a subscription removes it from the bus
//! before the next emit, so a stopped tracker never sees late signals.

use crate::collector::types::{PointerSignal, PointerSignalKind};
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

/// Queued signals on one subscription at which a backlog warning is logged.
///
/// Signals are never dropped; a subscriber that falls this far behind is
/// not being drained often enough.
pub const BACKLOG_WARN_THRESHOLD: usize = 10_000;

struct Subscriber {
    kinds: Vec<PointerSignalKind>,
    sender: Sender<PointerSignal>,
}

#[derive(Default)]
struct BusInner {
    next_id: AtomicU64,
    subscribers: Mutex<HashMap<u64, Subscriber>>,
}

impl BusInner {
    fn subscribers(&self) -> MutexGuard<'_, HashMap<u64, Subscriber>> {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Cloneable handle to a shared pointer signal source.
#[derive(Clone, Default)]
pub struct PointerBus {
    inner: Arc<BusInner>,
}

impl PointerBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to the given signal kinds.
    pub fn subscribe(&self, kinds: &[PointerSignalKind]) -> Subscription {
        let (sender, receiver) = unbounded();
        let id = self.inner.next_id.fetch_add(1, Ordering::SeqCst);

        self.inner.subscribers().insert(
            id,
            Subscriber {
                kinds: kinds.to_vec(),
                sender,
            },
        );
        tracing::trace!(subscription = id, ?kinds, "pointer subscription added");

        Subscription {
            id,
            kinds: kinds.to_vec(),
            receiver,
            bus: Arc::downgrade(&self.inner),
        }
    }

    /// Deliver a signal to every interested subscriber.
    ///
    /// Returns the number of subscriptions that accepted the signal.
    pub fn emit(&self, signal: PointerSignal) -> usize {
        let mut subscribers = self.inner.subscribers();
        let mut delivered = 0;
        let mut disconnected = Vec::new();

        for (id, subscriber) in subscribers.iter() {
            if !subscriber.kinds.contains(&signal.kind) {
                continue;
            }
            if subscriber.sender.send(signal).is_err() {
                disconnected.push(*id);
                continue;
            }
            delivered += 1;
            if subscriber.sender.len() == BACKLOG_WARN_THRESHOLD {
                tracing::warn!(
                    subscription = id,
                    queued = BACKLOG_WARN_THRESHOLD,
                    "pointer subscription is falling behind"
                );
            }
        }

        for id in disconnected {
            subscribers.remove(&id);
        }

        delivered
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers().len()
    }
}

impl std::fmt::Debug for PointerBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PointerBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// Receiving side of a bus subscription. Unsubscribes on drop.
pub struct Subscription {
    id: u64,
    kinds: Vec<PointerSignalKind>,
    receiver: Receiver<PointerSignal>,
    bus: Weak<BusInner>,
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn kinds(&self) -> &[PointerSignalKind] {
        &self.kinds
    }

    /// Try to receive a pending signal without blocking.
    pub fn try_recv(&self) -> Option<PointerSignal> {
        self.receiver.try_recv().ok()
    }

    /// Take every pending signal in arrival order.
    pub fn drain(&self) -> Vec<PointerSignal> {
        self.receiver.try_iter().collect()
    }

    /// Explicitly remove this subscription from the bus.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(bus) = self.bus.upgrade() {
            bus.subscribers().remove(&self.id);
            tracing::trace!(subscription = self.id, "pointer subscription removed");
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("kinds", &self.kinds)
            .finish()
    }
}
