//! # Confirmation collaborator.
//!
//! User consent is requested before delivering to a known subscriber and
//! before every mutating activation step (restart, enable, install). The
//! collaborator must be safe to call repeatedly and from concurrent routing
//! calls; each call is an independent prompt.

use async_trait::async_trait;

/// Modal consent prompt.
#[async_trait]
pub trait Confirm: Send + Sync + 'static {
    /// Asks the user to confirm an action.
    ///
    /// - `message`: the question (names the subscriber).
    /// - `detail`: supporting context (a bounded message preview).
    /// - `primary_action`: label of the confirming choice.
    ///
    /// Returns `true` when the user confirmed. Declining is an expected
    /// user choice, not a fault: the caller ends that message's path
    /// silently.
    async fn confirm(&self, message: &str, detail: &str, primary_action: &str) -> bool;
}
