//! # DeliveryService: facade, sweep loop, and restart continuity.
//!
//! The [`DeliveryService`] owns the retention store, handler registry,
//! router, activation coordinator, carry, event bus, and observer set, and
//! exposes the surface the host embeds:
//!
//! ```text
//! host ──► route(message, pre_confirmed) ──► Router
//!      ──► register(address, handler) ─────► HandlerRegistry ──► drain
//!      ──► unregister(address) ────────────► HandlerRegistry
//!      ──► start() ──► spawn sweeper + observer forwarder, replay carry
//!      ──► stop() ───► cancel background loops
//! ```
//!
//! ## Lifecycle
//! Background work is tied to an explicit [`start`](DeliveryService::start)/
//! [`stop`](DeliveryService::stop) pair holding a [`CancellationToken`], not
//! to construction, so tests control time deterministically through the
//! injected clock. `start` is idempotent while running; `stop` cancels the
//! sweeper and the observer forwarder.

use std::sync::Arc;

use tokio::sync::{Mutex, broadcast};
use tokio_util::sync::CancellationToken;

use crate::core::carry::Carry;
use crate::core::clock::Clock;
use crate::core::config::Config;
use crate::core::registry::HandlerRegistry;
use crate::core::router::Router;
use crate::core::store::RetentionStore;
use crate::events::{Bus, Event, EventKind};
use crate::message::{Address, Message};
use crate::observers::ObserverSet;
use crate::ports::{Handler, Ports};

use super::builder::ServiceBuilder;

/// Deferred-delivery runtime for addressed messages.
pub struct DeliveryService {
    cfg: Config,
    bus: Bus,
    store: Arc<RetentionStore>,
    registry: HandlerRegistry,
    router: Router,
    carry: Carry,
    clock: Arc<dyn Clock>,
    observers: Arc<ObserverSet>,
    runtime: Mutex<Option<CancellationToken>>,
}

impl DeliveryService {
    /// Starts building a service over the given collaborators.
    pub fn builder(cfg: Config, ports: Ports) -> ServiceBuilder {
        ServiceBuilder::new(cfg, ports)
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new_internal(
        cfg: Config,
        bus: Bus,
        store: Arc<RetentionStore>,
        registry: HandlerRegistry,
        router: Router,
        carry: Carry,
        clock: Arc<dyn Clock>,
        observers: Arc<ObserverSet>,
    ) -> Self {
        Self {
            cfg,
            bus,
            store,
            registry,
            router,
            carry,
            clock,
            observers,
            runtime: Mutex::new(None),
        }
    }

    /// Routes one inbound message; returns whether this system handled it.
    ///
    /// `pre_confirmed` skips the consent prompt (used when replaying a
    /// message the user already consented to before a restart).
    pub async fn route(&self, message: Message, pre_confirmed: bool) -> bool {
        self.router.route(message, pre_confirmed).await
    }

    /// Installs (or replaces) the handler for `address` and drains every
    /// buffered entry to it in arrival order.
    pub async fn register(&self, address: Address, handler: Arc<dyn Handler>) {
        self.registry.register(address, handler).await;
    }

    /// Removes the handler for `address`; buffered entries stay put.
    pub async fn unregister(&self, address: &Address) {
        self.registry.unregister(address).await;
    }

    /// Starts the background loops and replays any carried message.
    ///
    /// Idempotent while running: a second call neither spawns another
    /// sweeper nor replays twice (the carry key is consumed on first read).
    pub async fn start(&self) {
        {
            let mut runtime = self.runtime.lock().await;
            if runtime.is_none() {
                let token = CancellationToken::new();
                self.spawn_sweeper(token.clone());
                if !self.observers.is_empty() {
                    self.spawn_observer_forwarder(token.clone());
                }
                *runtime = Some(token);
            }
        }

        if let Some(message) = self.carry.consume().await {
            self.bus
                .publish(Event::now(EventKind::CarryReplayed).with_address(message.target()));
            // Consent was given before the restart; do not ask again.
            let _ = self.route(message, true).await;
        }
    }

    /// Cancels the background loops. Pending entries and bindings survive.
    pub async fn stop(&self) {
        if let Some(token) = self.runtime.lock().await.take() {
            token.cancel();
        }
    }

    /// Creates a receiver observing subsequent delivery events.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    /// True if a handler is currently bound for `address`.
    pub async fn is_bound(&self, address: &Address) -> bool {
        self.store.is_bound(address).await
    }

    /// Number of entries buffered for `address`.
    pub async fn pending_count(&self, address: &Address) -> usize {
        self.store.pending_count(address).await
    }

    /// Total buffered entries across all addresses.
    pub async fn pending_total(&self) -> usize {
        self.store.pending_total().await
    }

    /// The configuration this service was built with.
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Periodic eviction of entries older than the retention window.
    fn spawn_sweeper(&self, token: CancellationToken) {
        let store = Arc::clone(&self.store);
        let clock = Arc::clone(&self.clock);
        let bus = self.bus.clone();
        let interval = self.cfg.sweep_interval;

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = clock.sleep(interval) => {
                        for (address, evicted) in store.sweep(clock.now()).await {
                            bus.publish(
                                Event::now(EventKind::PendingExpired)
                                    .with_address(address.as_str())
                                    .with_count(evicted),
                            );
                        }
                    }
                }
            }
        });
    }

    /// Forwards bus events to the observer set (fire-and-forget).
    fn spawn_observer_forwarder(&self, token: CancellationToken) {
        let mut rx = self.bus.subscribe();
        let observers = Arc::clone(&self.observers);

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    result = rx.recv() => match result {
                        Ok(ev) => observers.emit(&ev),
                        Err(broadcast::error::RecvError::Closed) => break,
                        Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    }
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::TestClock;
    use crate::ports::StorageScope;
    use crate::ports::fakes::{
        FakeLifecycle, MemoryStore, RecordingActivate, RecordingHandler, RecordingNotify,
        RecordingRestart, StaticConfirm, subscriber,
    };
    use std::time::Duration;
    use tokio::time::timeout;

    struct Bench {
        service: Arc<DeliveryService>,
        confirm: Arc<StaticConfirm>,
        notify: Arc<RecordingNotify>,
        activate: Arc<RecordingActivate>,
        restart: Arc<RecordingRestart>,
        storage: Arc<MemoryStore>,
        _clock: TestClock,
    }

    fn bench(lifecycle: FakeLifecycle, confirm_answer: bool) -> Bench {
        let confirm = StaticConfirm::new(confirm_answer);
        let notify = RecordingNotify::new(false, false);
        let activate = RecordingActivate::new();
        let restart = RecordingRestart::new();
        let storage = MemoryStore::new();
        let clock = TestClock::new();

        let ports = Ports {
            lifecycle: Arc::new(lifecycle) as _,
            confirm: Arc::clone(&confirm) as _,
            notify: Arc::clone(&notify) as _,
            storage: Arc::clone(&storage) as _,
            activate: Arc::clone(&activate) as _,
            restart: Arc::clone(&restart) as _,
        };
        let service = DeliveryService::builder(Config::default(), ports)
            .with_clock(Arc::new(clock.clone()))
            .build();

        Bench {
            service,
            confirm,
            notify,
            activate,
            restart,
            storage,
            _clock: clock,
        }
    }

    fn active_lifecycle() -> FakeLifecycle {
        FakeLifecycle {
            active: Some(subscriber("foo.bar", "Foo Bar")),
            ..FakeLifecycle::default()
        }
    }

    fn addr(raw: &str) -> Address {
        Address::parse(raw).expect("valid test address")
    }

    fn msg(uri: &str) -> Message {
        Message::new("foo.bar", uri)
    }

    #[tokio::test]
    async fn test_malformed_address_not_handled_no_side_effects() {
        let b = bench(active_lifecycle(), true);

        let handled = b
            .service
            .route(Message::new("not-an-address", "scheme://x"), false)
            .await;

        assert!(!handled, "malformed target is not ours to handle");
        assert_eq!(b.confirm.calls(), 0);
        assert!(b.activate.requests().is_empty());
        assert_eq!(b.service.pending_total().await, 0);
    }

    #[tokio::test]
    async fn test_preexisting_binding_dispatches_exactly_once() {
        let b = bench(active_lifecycle(), true);
        let handler = RecordingHandler::new(true);
        b.service
            .register(addr("foo.bar"), Arc::clone(&handler) as _)
            .await;

        let handled = b.service.route(msg("scheme://foo.bar/one"), false).await;

        assert!(handled);
        assert_eq!(handler.received_uris(), vec!["scheme://foo.bar/one"]);
        assert_eq!(b.service.pending_count(&addr("foo.bar")).await, 0);
    }

    #[tokio::test]
    async fn test_dispatch_surfaces_handler_outcome() {
        let b = bench(active_lifecycle(), true);
        b.service
            .register(addr("foo.bar"), RecordingHandler::new(false) as _)
            .await;

        assert!(
            !b.service.route(msg("scheme://foo.bar/one"), false).await,
            "handler declined the message"
        );
    }

    #[tokio::test]
    async fn test_declined_consent_drops_without_buffering() {
        let b = bench(active_lifecycle(), false);

        let handled = b.service.route(msg("scheme://foo.bar/one"), false).await;

        assert!(handled, "a declined message is still 'handled'");
        assert_eq!(b.confirm.calls(), 1);
        assert_eq!(b.service.pending_total().await, 0);
        assert!(b.activate.requests().is_empty());
    }

    #[tokio::test]
    async fn test_buffered_messages_drain_in_arrival_order() {
        let b = bench(active_lifecycle(), true);

        assert!(b.service.route(msg("scheme://foo.bar/m1"), false).await);
        assert!(b.service.route(msg("scheme://foo.bar/m2"), false).await);
        assert_eq!(b.service.pending_count(&addr("foo.bar")).await, 2);
        assert_eq!(b.activate.requests().len(), 2, "each buffering re-signals");

        let handler = RecordingHandler::new(true);
        b.service
            .register(addr("foo.bar"), Arc::clone(&handler) as _)
            .await;

        assert_eq!(
            handler.received_uris(),
            vec!["scheme://foo.bar/m1", "scheme://foo.bar/m2"],
            "strict arrival order"
        );
        assert_eq!(b.service.pending_count(&addr("foo.bar")).await, 0);
    }

    #[tokio::test]
    async fn test_route_then_register_delivers_exactly_once() {
        let b = bench(active_lifecycle(), true);

        assert!(b.service.route(msg("scheme://foo.bar/m1"), false).await);
        let handler = RecordingHandler::new(true);
        b.service
            .register(addr("foo.bar"), Arc::clone(&handler) as _)
            .await;

        assert_eq!(
            handler.received_uris(),
            vec!["scheme://foo.bar/m1"],
            "never zero, never two"
        );
    }

    #[tokio::test]
    async fn test_unregister_keeps_pending_for_next_registration() {
        let b = bench(active_lifecycle(), true);
        b.service
            .register(addr("foo.bar"), RecordingHandler::new(true) as _)
            .await;
        b.service.unregister(&addr("foo.bar")).await;

        assert!(b.service.route(msg("scheme://foo.bar/m1"), false).await);
        assert_eq!(b.service.pending_count(&addr("foo.bar")).await, 1);

        let handler = RecordingHandler::new(true);
        b.service
            .register(addr("foo.bar"), Arc::clone(&handler) as _)
            .await;
        assert_eq!(handler.received_uris(), vec!["scheme://foo.bar/m1"]);
    }

    #[tokio::test]
    async fn test_unknown_subscriber_without_package_stays_silent() {
        let b = bench(FakeLifecycle::default(), true);
        let mut rx = b.service.subscribe();

        let handled = b.service.route(msg("scheme://foo.bar/m1"), false).await;
        assert!(handled, "accept/hold decision is immediate");

        let ev = timeout(Duration::from_secs(2), async {
            loop {
                let ev = rx.recv().await.expect("bus open");
                if ev.kind == EventKind::ActivationAbandoned {
                    break ev;
                }
            }
        })
        .await
        .expect("abandonment observed");
        assert_eq!(ev.address.as_deref(), Some("foo.bar"));

        assert!(b.notify.journal.errors.lock().expect("lock").is_empty());
        assert!(
            b.notify
                .journal
                .progress_titles
                .lock()
                .expect("lock")
                .is_empty(),
            "no notification shown"
        );
        assert_eq!(b.service.pending_total().await, 0);
    }

    #[tokio::test]
    async fn test_inactive_installed_subscriber_restarts_with_carry() {
        let b = bench(
            FakeLifecycle {
                installed: Some(subscriber("foo.bar", "Foo Bar")),
                enabled: true,
                ..FakeLifecycle::default()
            },
            true,
        );
        assert!(b.service.route(msg("scheme://foo.bar/m1"), false).await);

        // The resolution path runs on a spawned task; wait for its terminal
        // action rather than an intermediate event.
        timeout(Duration::from_secs(2), async {
            while b.restart.count() == 0 {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("restart requested");

        assert_eq!(b.restart.count(), 1, "restart invoked once");
        let blob = b
            .storage
            .blob("postbox.carry", StorageScope::Workspace)
            .expect("carry persisted");
        assert!(
            String::from_utf8(blob)
                .expect("utf8")
                .contains("scheme://foo.bar/m1"),
            "the exact message is carried"
        );
    }

    #[tokio::test]
    async fn test_start_replays_carry_pre_confirmed() {
        // Consent answer is "decline": a delivered message proves the replay
        // skipped the prompt entirely.
        let b = bench(active_lifecycle(), false);
        b.storage.seed(
            "postbox.carry",
            br#"{"target":"foo.bar","uri":"scheme://foo.bar/carried"}"#,
            StorageScope::Workspace,
        );
        let handler = RecordingHandler::new(true);
        b.service
            .register(addr("foo.bar"), Arc::clone(&handler) as _)
            .await;

        b.service.start().await;

        assert_eq!(handler.received_uris(), vec!["scheme://foo.bar/carried"]);
        assert_eq!(b.confirm.calls(), 0, "no consent prompt for a carry");
        assert!(
            b.storage
                .blob("postbox.carry", StorageScope::Workspace)
                .is_none(),
            "carry key consumed"
        );
        b.service.stop().await;
    }

    #[tokio::test]
    async fn test_second_start_does_not_replay_again() {
        let b = bench(active_lifecycle(), false);
        b.storage.seed(
            "postbox.carry",
            br#"{"target":"foo.bar","uri":"scheme://foo.bar/carried"}"#,
            StorageScope::Workspace,
        );
        let handler = RecordingHandler::new(true);
        b.service
            .register(addr("foo.bar"), Arc::clone(&handler) as _)
            .await;

        b.service.start().await;
        b.service.start().await;

        assert_eq!(handler.received_uris().len(), 1, "replayed exactly once");
        b.service.stop().await;
    }

    #[tokio::test]
    async fn test_sweep_loop_evicts_stale_entries() {
        let b = bench(active_lifecycle(), true);
        assert!(b.service.route(msg("scheme://foo.bar/m1"), false).await);
        assert_eq!(b.service.pending_total().await, 1);

        // The test clock advances by one sweep interval per loop iteration,
        // so the entry crosses the retention window after a few cycles.
        b.service.start().await;
        timeout(Duration::from_secs(5), async {
            while b.service.pending_total().await > 0 {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("entry evicted");

        assert_eq!(b.service.pending_total().await, 0);
        b.service.stop().await;
    }
}
