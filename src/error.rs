//! Error types used across the delivery core.
//!
//! This module defines:
//!
//! - [`AddressError`] — subscriber-address syntax violations.
//! - [`StorageError`] — persistence collaborator failures.
//! - [`LifecycleError`] — lifecycle collaborator failures (enable/install).
//! - [`CarryError`] — restart-carry failures (storage or codec).
//!
//! A malformed address is **not** an error at the routing boundary: `route`
//! maps it to "not handled" (`false`) with no side effects. The typed error
//! exists for callers that validate addresses directly. Collaborator
//! failures are absorbed where the routing contract demands absorption and
//! surfaced through the notification collaborator instead of the router's
//! caller.

use thiserror::Error;

/// Subscriber-address syntax violation.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum AddressError {
    /// The identifier is not made of exactly two dot-separated segments.
    #[error("expected two dot-separated segments: {raw:?}")]
    SegmentCount {
        /// The rejected raw identifier.
        raw: String,
    },

    /// A segment is empty or contains characters outside `[A-Za-z0-9-]`.
    #[error("address segment is empty or contains invalid characters: {raw:?}")]
    InvalidSegment {
        /// The rejected raw identifier.
        raw: String,
    },
}

impl AddressError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            AddressError::SegmentCount { .. } => "address_segment_count",
            AddressError::InvalidSegment { .. } => "address_invalid_segment",
        }
    }
}

/// Failure reported by the persistence collaborator.
///
/// The backend is opaque to the core; only a human-readable message is
/// carried.
#[derive(Error, Debug)]
#[error("storage backend failure: {message}")]
pub struct StorageError {
    /// Backend-provided failure description.
    pub message: String,
}

impl StorageError {
    /// Creates a storage error from a backend message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Failure reported by the lifecycle collaborator (enable or install).
#[derive(Error, Debug)]
#[error("lifecycle operation failed: {message}")]
pub struct LifecycleError {
    /// Collaborator-provided failure description.
    pub message: String,
}

impl LifecycleError {
    /// Creates a lifecycle error from a collaborator message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Failure while persisting or reviving the restart carry.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum CarryError {
    /// The persistence collaborator failed.
    #[error("carry storage: {0}")]
    Storage(#[from] StorageError),

    /// The carry record could not be encoded.
    #[error("carry encoding: {0}")]
    Codec(#[from] serde_json::Error),
}

impl CarryError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            CarryError::Storage(_) => "carry_storage",
            CarryError::Codec(_) => "carry_codec",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_are_stable() {
        let err = AddressError::SegmentCount { raw: "x".into() };
        assert_eq!(err.as_label(), "address_segment_count");

        let err = CarryError::Storage(StorageError::new("disk gone"));
        assert_eq!(err.as_label(), "carry_storage");
    }

    #[test]
    fn test_messages_carry_context() {
        let err = StorageError::new("connection reset");
        assert!(err.to_string().contains("connection reset"));

        let err = LifecycleError::new("gallery unreachable");
        assert!(err.to_string().contains("gallery unreachable"));
    }
}
