//! # Delivery service configuration.
//!
//! Provides [`Config`], the centralized settings for the delivery runtime.
//!
//! ## Field semantics
//! - `retention`: how long a buffered entry survives without a registration
//!   (the only timeout that applies to buffered messages).
//! - `sweep_interval`: cadence of the eviction sweep.
//! - `bus_capacity`: event bus ring buffer size (min 1; clamped by the bus).

use std::time::Duration;

/// Global configuration for the delivery runtime.
#[derive(Clone, Debug)]
pub struct Config {
    /// Retention window for buffered entries.
    ///
    /// Entries older than this are evicted by the sweep; eviction is lossy
    /// by design and not reported to the original sender.
    pub retention: Duration,

    /// Interval between eviction sweeps.
    pub sweep_interval: Duration,

    /// Capacity of the event bus broadcast ring buffer.
    ///
    /// Slow receivers that lag behind more than `bus_capacity` events
    /// observe `Lagged` and skip older items. Minimum value is 1.
    pub bus_capacity: usize,
}

impl Config {
    /// Returns the bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `retention = 5 minutes`
    /// - `sweep_interval = 30 seconds`
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            retention: Duration::from_secs(5 * 60),
            sweep_interval: Duration::from_secs(30),
            bus_capacity: 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_retention_contract() {
        let cfg = Config::default();
        assert_eq!(cfg.retention, Duration::from_secs(300));
        assert_eq!(cfg.sweep_interval, Duration::from_secs(30));
    }

    #[test]
    fn test_bus_capacity_is_clamped() {
        let cfg = Config {
            bus_capacity: 0,
            ..Config::default()
        };
        assert_eq!(cfg.bus_capacity_clamped(), 1);
    }
}
