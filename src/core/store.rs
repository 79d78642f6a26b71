//! # Retention store: keyed slots for bindings and pending entries.
//!
//! One map, keyed by [`Address`], whose slots hold both the live handler
//! binding (at most one per address) and the insertion-ordered pending
//! entries buffered for that address. Keeping both in a single keyed store
//! gives the two composite protocols a shared critical section:
//!
//! - **check-binding-then-maybe-buffer** ([`RetentionStore::admit`]) and
//! - **register-then-drain** ([`RetentionStore::bind`])
//!
//! are mutually atomic per address, so a registration can never slip between
//! a routing call's binding check and its buffer append.
//!
//! ## Rules
//! - No await points inside a critical section; handler invocation happens
//!   outside the lock, in the router and registry.
//! - Pending entries per address preserve arrival order (append-only until
//!   drained or swept).
//! - Slots left with neither binding nor entries are removed.
//! - The sweep is the only mechanism that reclaims memory for addresses
//!   that never register; it is lossy by design.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use crate::message::{Address, Message};
use crate::ports::Handler;

/// A buffered message with its arrival timestamp.
struct PendingEntry {
    at: Instant,
    message: Message,
}

/// Per-address cell: the live binding and the buffered entries.
#[derive(Default)]
struct Slot {
    handler: Option<Arc<dyn Handler>>,
    pending: Vec<PendingEntry>,
}

/// Outcome of admitting a message for an address.
pub(crate) enum Admission {
    /// A binding existed before the routing call began: dispatch directly.
    Dispatch {
        handler: Arc<dyn Handler>,
        message: Message,
    },
    /// A binding appeared during the routing call: delivery belongs to the
    /// registration's drain, the routing call reports "not handled".
    Deferred,
    /// No binding: the message was appended to the pending sequence.
    Buffered {
        /// Queue depth after the append.
        depth: usize,
    },
}

/// Keyed buffer of handler bindings and time-stamped pending messages.
pub(crate) struct RetentionStore {
    slots: RwLock<HashMap<Address, Slot>>,
    retention: Duration,
}

impl RetentionStore {
    /// Creates an empty store with the given retention window.
    pub(crate) fn new(retention: Duration) -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
            retention,
        }
    }

    /// True if a handler is currently bound for `address`.
    pub(crate) async fn is_bound(&self, address: &Address) -> bool {
        self.slots
            .read()
            .await
            .get(address)
            .is_some_and(|slot| slot.handler.is_some())
    }

    /// Decides the fate of a message in one critical section.
    ///
    /// `had_binding` is the binding snapshot taken when the routing call
    /// began, before any suspension point; comparing it against the current
    /// binding distinguishes pre-existing bindings (dispatch) from ones that
    /// raced in mid-call (defer to the registration's drain).
    pub(crate) async fn admit(
        &self,
        address: &Address,
        message: Message,
        had_binding: bool,
        now: Instant,
    ) -> Admission {
        let mut slots = self.slots.write().await;
        let slot = slots.entry(address.clone()).or_default();
        match &slot.handler {
            Some(handler) if had_binding => Admission::Dispatch {
                handler: Arc::clone(handler),
                message,
            },
            Some(_) => Admission::Deferred,
            None => {
                slot.pending.push(PendingEntry { at: now, message });
                Admission::Buffered {
                    depth: slot.pending.len(),
                }
            }
        }
    }

    /// Installs (or replaces) the binding for `address` and takes every
    /// pending entry, in arrival order, in one critical section.
    ///
    /// The caller delivers the returned messages; once the binding is in
    /// place no routing call buffers for this address anymore, so each
    /// entry is taken exactly once.
    pub(crate) async fn bind(
        &self,
        address: Address,
        handler: Arc<dyn Handler>,
    ) -> Vec<Message> {
        let mut slots = self.slots.write().await;
        let slot = slots.entry(address).or_default();
        slot.handler = Some(handler);
        slot.pending.drain(..).map(|entry| entry.message).collect()
    }

    /// Removes the binding for `address` if present; pending entries stay
    /// buffered awaiting a future registration or expiry.
    pub(crate) async fn unbind(&self, address: &Address) -> bool {
        let mut slots = self.slots.write().await;
        let Some(slot) = slots.get_mut(address) else {
            return false;
        };
        if slot.handler.take().is_none() {
            return false;
        }
        if slot.pending.is_empty() {
            slots.remove(address);
        }
        true
    }

    /// Evicts entries older than the retention window.
    ///
    /// Returns per-address eviction counts. Addresses left with neither a
    /// binding nor entries are removed entirely. An entry admitted while a
    /// sweep cycle is pending is simply seen one cycle later.
    pub(crate) async fn sweep(&self, now: Instant) -> Vec<(Address, usize)> {
        let retention = self.retention;
        let mut evicted = Vec::new();
        let mut slots = self.slots.write().await;
        slots.retain(|address, slot| {
            let before = slot.pending.len();
            slot.pending
                .retain(|entry| now.duration_since(entry.at) <= retention);
            let dropped = before - slot.pending.len();
            if dropped > 0 {
                evicted.push((address.clone(), dropped));
            }
            slot.handler.is_some() || !slot.pending.is_empty()
        });
        evicted
    }

    /// Number of pending entries buffered for `address`.
    pub(crate) async fn pending_count(&self, address: &Address) -> usize {
        self.slots
            .read()
            .await
            .get(address)
            .map_or(0, |slot| slot.pending.len())
    }

    /// Total number of pending entries across all addresses.
    pub(crate) async fn pending_total(&self) -> usize {
        self.slots
            .read()
            .await
            .values()
            .map(|slot| slot.pending.len())
            .sum()
    }
}
