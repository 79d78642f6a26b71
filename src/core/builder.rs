//! Builder wiring the delivery service and its collaborators.

use std::sync::Arc;

use crate::activation::Coordinator;
use crate::core::carry::Carry;
use crate::core::clock::{Clock, RealClock};
use crate::core::config::Config;
use crate::core::registry::HandlerRegistry;
use crate::core::router::Router;
use crate::core::service::DeliveryService;
use crate::core::store::RetentionStore;
use crate::events::Bus;
use crate::observers::{Observe, ObserverSet};
use crate::ports::Ports;

/// Builder for constructing a [`DeliveryService`] with optional extras.
pub struct ServiceBuilder {
    cfg: Config,
    ports: Ports,
    observers: Vec<Arc<dyn Observe>>,
    clock: Option<Arc<dyn Clock>>,
}

impl ServiceBuilder {
    /// Creates a new builder over the given configuration and collaborators.
    pub(crate) fn new(cfg: Config, ports: Ports) -> Self {
        Self {
            cfg,
            ports,
            observers: Vec::new(),
            clock: None,
        }
    }

    /// Sets event observers for observability.
    ///
    /// Observers receive delivery events (dispatch, buffering, drains,
    /// expiry, activation progress) through dedicated workers with bounded
    /// queues while the service is started.
    pub fn with_observers(mut self, observers: Vec<Arc<dyn Observe>>) -> Self {
        self.observers = observers;
        self
    }

    /// Overrides the time source (tests inject a
    /// [`TestClock`](crate::TestClock)). Defaults to [`RealClock`].
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Builds and returns the service instance.
    ///
    /// This consumes the builder and wires all runtime components: the
    /// event bus, the keyed retention store, the router, the handler
    /// registry, the activation coordinator, the restart carry, and the
    /// observer workers.
    pub fn build(self) -> Arc<DeliveryService> {
        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let clock: Arc<dyn Clock> = self
            .clock
            .unwrap_or_else(|| Arc::new(RealClock::new()));

        let store = Arc::new(RetentionStore::new(self.cfg.retention));
        let carry = Carry::new(Arc::clone(&self.ports.storage));
        let coordinator = Arc::new(Coordinator::new(
            Arc::clone(&self.ports.lifecycle),
            Arc::clone(&self.ports.confirm),
            Arc::clone(&self.ports.notify),
            Arc::clone(&self.ports.restart),
            carry.clone(),
            bus.clone(),
        ));
        let router = Router::new(
            Arc::clone(&store),
            coordinator,
            Arc::clone(&self.ports.lifecycle),
            Arc::clone(&self.ports.confirm),
            Arc::clone(&self.ports.activate),
            Arc::clone(&clock),
            bus.clone(),
        );
        let registry = HandlerRegistry::new(Arc::clone(&store), bus.clone());
        let observers = Arc::new(ObserverSet::new(self.observers, bus.clone()));

        Arc::new(DeliveryService::new_internal(
            self.cfg, bus, store, registry, router, carry, clock, observers,
        ))
    }
}
