//! # Router: the routing decision for an inbound addressed message.
//!
//! One call, three possible fates for a message:
//!
//! ```text
//! route(message, pre_confirmed)
//!   ├─ target fails address syntax ──► false (not mine, no side effects)
//!   ├─ subscriber unknown ──► spawn activation coordinator ──► true
//!   ├─ consent declined ──► true (dropped, not retried, not buffered)
//!   ├─ binding pre-existing ──► dispatch ──► handler outcome
//!   ├─ binding appeared mid-call ──► false (drain owns delivery)
//!   └─ no binding ──► buffer + request activation ──► true
//! ```
//!
//! ## Rules
//! - The binding snapshot is taken before any suspension point; the final
//!   decision compares it against the current binding inside the store's
//!   critical section, which is what prevents a duplicate delivery when
//!   registration and routing race.
//! - The "unhandled" resolution is asynchronous: the accept/hold decision is
//!   immediate, and `route` never reflects its eventual outcome.
//! - Consent is skipped for pre-confirmed messages (a carry revived after a
//!   restart was already consented to).

use std::sync::Arc;

use crate::activation::Coordinator;
use crate::core::clock::Clock;
use crate::core::store::{Admission, RetentionStore};
use crate::events::{Bus, Event, EventKind};
use crate::message::{Address, Message};
use crate::ports::{Activate, Confirm, Lifecycle};

/// Entry point for inbound addressed messages.
pub(crate) struct Router {
    store: Arc<RetentionStore>,
    coordinator: Arc<Coordinator>,
    lifecycle: Arc<dyn Lifecycle>,
    confirm: Arc<dyn Confirm>,
    activate: Arc<dyn Activate>,
    clock: Arc<dyn Clock>,
    bus: Bus,
}

impl Router {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        store: Arc<RetentionStore>,
        coordinator: Arc<Coordinator>,
        lifecycle: Arc<dyn Lifecycle>,
        confirm: Arc<dyn Confirm>,
        activate: Arc<dyn Activate>,
        clock: Arc<dyn Clock>,
        bus: Bus,
    ) -> Self {
        Self {
            store,
            coordinator,
            lifecycle,
            confirm,
            activate,
            clock,
            bus,
        }
    }

    /// Routes one message; returns whether this system handled it.
    pub(crate) async fn route(&self, message: Message, pre_confirmed: bool) -> bool {
        let Ok(address) = Address::parse(message.target()) else {
            return false;
        };
        let had_binding = self.store.is_bound(&address).await;

        let Some(subscriber) = self.lifecycle.resolve_active(&address).await else {
            let coordinator = Arc::clone(&self.coordinator);
            let spawned_address = address.clone();
            tokio::spawn(async move {
                coordinator.resolve_unhandled(message, spawned_address).await;
            });
            return true;
        };

        if !pre_confirmed {
            let prompt = format!(
                "Allow '{}' to receive this message?",
                subscriber.display_name
            );
            if !self
                .confirm
                .confirm(&prompt, &message.preview(), "Allow")
                .await
            {
                self.bus
                    .publish(Event::now(EventKind::ConfirmDeclined).with_address(address.as_str()));
                return true;
            }
        }

        match self
            .store
            .admit(&address, message, had_binding, self.clock.now())
            .await
        {
            Admission::Dispatch { handler, message } => {
                let delivered = handler.handle(message).await;
                self.bus.publish(
                    Event::now(EventKind::MessageDispatched)
                        .with_address(address.as_str())
                        .with_delivered(delivered),
                );
                delivered
            }
            Admission::Deferred => {
                self.bus
                    .publish(Event::now(EventKind::DispatchDeferred).with_address(address.as_str()));
                false
            }
            Admission::Buffered { depth } => {
                self.bus.publish(
                    Event::now(EventKind::MessageBuffered)
                        .with_address(address.as_str())
                        .with_count(depth),
                );
                self.activate.request_activation(&address).await;
                self.bus.publish(
                    Event::now(EventKind::ActivationRequested).with_address(address.as_str()),
                );
                true
            }
        }
    }
}
