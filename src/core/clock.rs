//! # Time abstraction for deterministic retention behavior.
//!
//! The retention window and the sweep cadence are the only time-dependent
//! behavior in the core. Both go through [`Clock`] so tests can control time
//! instead of relying on wall-clock timers: production wiring uses
//! [`RealClock`]; tests inject a [`TestClock`] and advance it explicitly.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Injectable time source.
pub trait Clock: Send + Sync + 'static {
    /// Returns the current instant for age measurements.
    fn now(&self) -> Instant;

    /// Sleeps for the given duration.
    ///
    /// Production maps this to [`tokio::time::sleep`]; a test clock may
    /// advance virtual time immediately instead.
    fn sleep(&self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + '_>>;
}

/// Production clock backed by the system time and tokio's timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealClock;

impl RealClock {
    /// Creates a new real clock.
    pub fn new() -> Self {
        Self
    }
}

impl Clock for RealClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        Box::pin(tokio::time::sleep(duration))
    }
}

/// Controllable clock for deterministic tests.
///
/// Monotonic time starts at construction and only moves when
/// [`TestClock::advance`] is called (or through `sleep`, which advances by
/// the requested duration and yields).
#[derive(Debug, Clone)]
pub struct TestClock {
    elapsed_ns: Arc<AtomicU64>,
    base: Instant,
}

impl TestClock {
    /// Creates a test clock anchored at the current instant.
    pub fn new() -> Self {
        Self {
            elapsed_ns: Arc::new(AtomicU64::new(0)),
            base: Instant::now(),
        }
    }

    /// Advances virtual time by `duration`.
    pub fn advance(&self, duration: Duration) {
        let ns = u64::try_from(duration.as_nanos().min(u128::from(u64::MAX))).unwrap_or(u64::MAX);
        self.elapsed_ns.fetch_add(ns, Ordering::AcqRel);
    }
}

impl Default for TestClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TestClock {
    fn now(&self) -> Instant {
        self.base + Duration::from_nanos(self.elapsed_ns.load(Ordering::Acquire))
    }

    fn sleep(&self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        self.advance(duration);
        Box::pin(tokio::task::yield_now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_moves_now() {
        let clock = TestClock::new();
        let start = clock.now();
        clock.advance(Duration::from_secs(10));
        assert_eq!(clock.now().duration_since(start), Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_sleep_advances_virtual_time() {
        let clock = TestClock::new();
        let start = clock.now();
        clock.sleep(Duration::from_secs(5)).await;
        assert_eq!(clock.now().duration_since(start), Duration::from_secs(5));
    }

    #[test]
    fn test_clones_share_time() {
        let clock = TestClock::new();
        let twin = clock.clone();
        clock.advance(Duration::from_secs(3));
        assert_eq!(twin.now(), clock.now());
    }
}
