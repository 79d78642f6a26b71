//! # postbox
//!
//! **Postbox** resolves *deferred delivery* of addressed messages to
//! subscribers that may not yet be ready to receive them.
//!
//! A message names its target subscriber by a two-segment identifier. A
//! subscriber becomes ready only after an external activation step
//! completes; until then, inbound messages are held (not dropped, not
//! silently lost for short periods) and replayed in arrival order once the
//! subscriber registers a handler. One in-flight message survives a
//! deliberate host restart. The crate is designed as a building block for
//! hosts that manage addressable plug-in units.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!            inbound message (URI naming "segment.segment")
//!                              │
//!                              ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  DeliveryService (facade)                                         │
//! │  - Router (routing decision per message)                          │
//! │  - RetentionStore (keyed slots: binding + pending entries)        │
//! │  - HandlerRegistry (register/unregister, replay-on-register)      │
//! │  - Coordinator (install/enable/restart for not-ready subscribers) │
//! │  - Carry (one message across a host restart)                      │
//! │  - Bus (broadcast events) + ObserverSet (fan-out)                 │
//! └──────┬──────────────┬──────────────────┬──────────────────┬──────┘
//!        ▼              ▼                  ▼                  ▼
//!   Handler (live   Confirm /          Lifecycle /        KvStore
//!   subscriber      Notify (UX         Activate /         (carry
//!   callback)       collaborators)     RestartHost        storage)
//! ```
//!
//! ### Routing decision
//! ```text
//! route(message, pre_confirmed)
//!   ├─ target fails address syntax ─► false  (unrelated to this system)
//!   ├─ subscriber unknown ─► activation coordinator (async) ─► true
//!   ├─ consent declined ─► true  (dropped; not retried, not buffered)
//!   ├─ binding existed before the call ─► dispatch ─► handler outcome
//!   ├─ binding appeared mid-call ─► false  (registration's drain owns it)
//!   └─ no binding ─► buffer + request activation ─► true
//!
//! register(address, handler)
//!   └─► install binding, take pending entries (atomic)
//!         └─► deliver each in arrival order (best-effort)
//!
//! sweep (every 30s)
//!   └─► evict entries older than 5 minutes; lossy by design
//! ```
//!
//! ## Features
//! | Area              | Description                                                  | Key types / traits                  |
//! |-------------------|--------------------------------------------------------------|-------------------------------------|
//! | **Routing**       | Accept/hold decision per inbound message.                    | [`DeliveryService::route`]          |
//! | **Registration**  | Handler bindings with replay-on-register.                    | [`Handler`], [`DeliveryService::register`] |
//! | **Retention**     | Bounded, time-windowed buffering of pending messages.        | [`Config`]                          |
//! | **Activation**    | Install/enable/restart resolution behind explicit consent.   | [`Lifecycle`], [`Confirm`], [`Notify`] |
//! | **Continuity**    | One message carried across a deliberate restart.             | [`KvStore`], [`DeliveryService::start`] |
//! | **Observability** | Broadcast events with per-observer bounded fan-out.          | [`Event`], [`Observe`]              |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust,no_run
//! use std::sync::Arc;
//! use postbox::{Address, Config, DeliveryService, Handler, Message, Ports};
//!
//! # async fn example(ports: Ports, inbox: Arc<dyn Handler>) {
//! let service = DeliveryService::builder(Config::default(), ports).build();
//! service.start().await;
//!
//! // A ready subscriber registers its handler; buffered messages drain to
//! // it in arrival order.
//! let address = Address::parse("my-app.inbox").unwrap();
//! service.register(address, inbox).await;
//!
//! // Inbound messages go through the routing decision.
//! let message = Message::new("my-app.inbox", "scheme://my-app.inbox/open?item=42");
//! let handled = service.route(message, false).await;
//! assert!(handled);
//! # }
//! ```

mod activation;
mod core;
mod error;
mod events;
mod message;
mod observers;
mod ports;

// ---- Public re-exports ----

pub use crate::core::{Clock, Config, DeliveryService, RealClock, ServiceBuilder, TestClock};
pub use error::{AddressError, CarryError, LifecycleError, StorageError};
pub use events::{Bus, Event, EventKind};
pub use message::{Address, Message};
pub use observers::{Observe, ObserverSet};
pub use ports::{
    Activate, Confirm, Handler, KvStore, Lifecycle, Notify, PackageRecord, Ports, Progress,
    RestartHost, StorageScope, SubscriberRecord,
};

// Optional: expose a simple built-in logger observer (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use observers::LogWriter;
