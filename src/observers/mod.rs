//! Observability: observer trait and fan-out set.
//!
//! ## Contents
//! - [`Observe`] extension point for event handlers (logging, metrics, …)
//! - [`ObserverSet`] per-observer bounded queues with dedicated workers
//! - [`LogWriter`] reference printer, behind the `logging` feature

mod observer;
mod set;

pub use observer::Observe;
pub use set::ObserverSet;

#[cfg(feature = "logging")]
mod log;
#[cfg(feature = "logging")]
pub use log::LogWriter;
