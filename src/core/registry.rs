//! # Handler registry: register/unregister with replay-on-register.
//!
//! Registration is what turns a buffered address live: installing a binding
//! atomically takes every pending entry for that address, then delivers them
//! to the new handler sequentially in arrival order.
//!
//! ## Rules
//! - At most one binding per address; registering again replaces it.
//! - Drained deliveries are best-effort: outcomes are not surfaced back to
//!   the original routing callers (they already received "handled").
//! - Unregistering never touches pending entries; they stay buffered for a
//!   future registration or until the sweep evicts them.

use std::sync::Arc;

use crate::core::store::RetentionStore;
use crate::events::{Bus, Event, EventKind};
use crate::message::Address;
use crate::ports::Handler;

/// Register/unregister surface over the retention store.
pub(crate) struct HandlerRegistry {
    store: Arc<RetentionStore>,
    bus: Bus,
}

impl HandlerRegistry {
    /// Creates a registry over the shared store.
    pub(crate) fn new(store: Arc<RetentionStore>, bus: Bus) -> Self {
        Self { store, bus }
    }

    /// Installs (or replaces) the binding for `address`, then drains every
    /// buffered entry to the new handler in arrival order.
    pub(crate) async fn register(&self, address: Address, handler: Arc<dyn Handler>) {
        let drained = self
            .store
            .bind(address.clone(), Arc::clone(&handler))
            .await;
        self.bus
            .publish(Event::now(EventKind::HandlerRegistered).with_address(address.as_str()));

        if drained.is_empty() {
            return;
        }
        let count = drained.len();
        for message in drained {
            // Sequential awaits keep arrival order; outcomes are discarded.
            let _ = handler.handle(message).await;
        }
        self.bus.publish(
            Event::now(EventKind::PendingDrained)
                .with_address(address.as_str())
                .with_count(count),
        );
    }

    /// Removes the binding for `address` if one is present.
    pub(crate) async fn unregister(&self, address: &Address) {
        if self.store.unbind(address).await {
            self.bus
                .publish(Event::now(EventKind::HandlerUnregistered).with_address(address.as_str()));
        }
    }
}
