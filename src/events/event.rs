//! # Delivery events emitted by the router, registry, sweeper, and coordinator.
//!
//! The [`EventKind`] enum classifies event types across four categories:
//! - **Routing events**: what happened to an inbound message (dispatched,
//!   buffered, deferred, declined).
//! - **Registry events**: handler bindings appearing and disappearing, and
//!   buffered entries draining.
//! - **Activation events**: the resolution path for messages whose
//!   subscriber is not ready (activation requests, install/enable progress,
//!   restart requests, abandonment).
//! - **Observer events**: fan-out overflow and panic isolation.
//!
//! The [`Event`] struct carries additional metadata such as the subscriber
//! address, a reason string, entry counts, and the dispatch outcome.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. Use `seq` to restore the exact order when events are
//! observed out of order.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of delivery events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Routing events ===
    /// A message was dispatched to a live, pre-existing handler binding.
    ///
    /// Sets: `address`, `delivered` (the handler's outcome).
    MessageDispatched,

    /// A binding appeared mid-call; delivery was left to the registration's
    /// own drain and the routing call reported "not handled".
    ///
    /// Sets: `address`.
    DispatchDeferred,

    /// A message was buffered for a subscriber with no live binding.
    ///
    /// Sets: `address`, `count` (queue depth after the append).
    MessageBuffered,

    /// The user declined the delivery confirmation; the message was dropped.
    ///
    /// Sets: `address`.
    ConfirmDeclined,

    // === Registry events ===
    /// A handler binding was installed (or replaced) for an address.
    ///
    /// Sets: `address`.
    HandlerRegistered,

    /// A handler binding was removed; pending entries are untouched.
    ///
    /// Sets: `address`.
    HandlerUnregistered,

    /// Buffered entries were drained to a newly registered handler.
    ///
    /// Sets: `address`, `count` (number of drained entries).
    PendingDrained,

    /// The sweep evicted entries older than the retention window.
    ///
    /// Sets: `address`, `count` (number of evicted entries).
    PendingExpired,

    // === Activation events ===
    /// Activation of a not-yet-ready subscriber was requested.
    ///
    /// Sets: `address`.
    ActivationRequested,

    /// No installed subscriber and no compatible installable package; the
    /// resolution path stopped silently.
    ///
    /// Sets: `address`.
    ActivationAbandoned,

    /// A disabled subscriber was enabled ahead of a restart.
    ///
    /// Sets: `address`.
    SubscriberEnabled,

    /// Installation of a subscriber package began.
    ///
    /// Sets: `address`.
    InstallStarted,

    /// Installation of a subscriber package completed.
    ///
    /// Sets: `address`.
    InstallCompleted,

    /// Installation of a subscriber package failed.
    ///
    /// Sets: `address`, `reason`.
    InstallFailed,

    // === Restart continuity ===
    /// The in-flight message was persisted ahead of a deliberate restart.
    ///
    /// Sets: `address`.
    CarryPersisted,

    /// A persisted message was revived at startup and re-injected.
    ///
    /// Sets: `address`.
    CarryReplayed,

    /// A host restart was requested from an activation branch.
    ///
    /// Sets: `address`.
    RestartRequested,

    // === Observer events ===
    /// An observer dropped an event (queue full or worker closed).
    ///
    /// Sets: `address` (observer name), `reason`.
    ObserverOverflow,

    /// An observer panicked while processing an event.
    ///
    /// Sets: `address` (observer name), `reason`.
    ObserverPanicked,
}

/// Delivery event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Subscriber address (or observer name for observer events).
    pub address: Option<Arc<str>>,
    /// Human-readable reason (errors, overflow details, etc.).
    pub reason: Option<Arc<str>>,
    /// Entry count (queue depth, drained entries, evicted entries).
    pub count: Option<u32>,
    /// Dispatch outcome reported by the handler.
    pub delivered: Option<bool>,
}

impl Event {
    /// Creates a new event of the given kind with the current timestamp and
    /// next sequence number.
    pub fn now(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            address: None,
            reason: None,
            count: None,
            delivered: None,
        }
    }

    /// Attaches a subscriber address (or observer name).
    #[inline]
    pub fn with_address(mut self, address: impl Into<Arc<str>>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches an entry count (saturating at `u32::MAX`).
    #[inline]
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count.min(u32::MAX as usize) as u32);
        self
    }

    /// Attaches the dispatch outcome.
    #[inline]
    pub fn with_delivered(mut self, delivered: bool) -> Self {
        self.delivered = Some(delivered);
        self
    }

    /// Creates an observer overflow event.
    #[inline]
    pub fn observer_overflow(observer: &'static str, reason: &'static str) -> Self {
        Event::now(EventKind::ObserverOverflow)
            .with_address(observer)
            .with_reason(reason)
    }

    /// Creates an observer panic event.
    #[inline]
    pub fn observer_panicked(observer: &'static str, info: String) -> Self {
        Event::now(EventKind::ObserverPanicked)
            .with_address(observer)
            .with_reason(info)
    }

    #[inline]
    pub fn is_observer_overflow(&self) -> bool {
        matches!(self.kind, EventKind::ObserverOverflow)
    }

    #[inline]
    pub fn is_observer_panic(&self) -> bool {
        matches!(self.kind, EventKind::ObserverPanicked)
    }
}
