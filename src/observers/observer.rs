//! # Event observer trait.
//!
//! Provides [`Observe`], the extension point for plugging custom event
//! handlers (logging, metrics, auditing) into the delivery runtime.
//!
//! Each observer gets:
//! - **Dedicated worker task** (runs independently)
//! - **Per-observer bounded queue** (capacity via [`Observe::queue_capacity`])
//! - **Panic isolation** (panics are caught and reported as
//!   [`EventKind::ObserverPanicked`](crate::EventKind::ObserverPanicked))
//!
//! ## Rules
//! - A slow observer only affects its own queue.
//! - Queue overflow drops the event **for this observer only** and publishes
//!   `EventKind::ObserverOverflow`; other observers are unaffected.
//! - Events are processed sequentially (FIFO) per observer.
//! - Observers do not block publishers or each other.

use async_trait::async_trait;

use crate::events::Event;

/// Event observer for delivery observability.
///
/// ### Implementation requirements
/// - Use async I/O; avoid blocking the executor.
/// - Handle errors internally; do not panic.
/// - Slow processing affects only this observer's queue.
#[async_trait]
pub trait Observe: Send + Sync + 'static {
    /// Processes a single event.
    ///
    /// Called from a dedicated worker task, not in the publisher context.
    /// Events are delivered in FIFO order per observer.
    async fn on_event(&self, event: &Event);

    /// Returns the observer name used in overflow/panic events.
    ///
    /// Prefer short, descriptive names (e.g., "metrics", "audit"). The
    /// default uses `type_name::<Self>()`, which can be verbose.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Returns the preferred queue capacity for this observer.
    ///
    /// The runtime clamps capacity to a minimum of 1. Default: 1024.
    fn queue_capacity(&self) -> usize {
        1024
    }
}
