//! # Notification collaborator.
//!
//! Progress-bearing notifications with mutable message and follow-up
//! actions, plus fire-and-forget error prompts. Used by the activation
//! coordinator to surface installation progress, the post-install
//! "restart and open" action, and failures.

use async_trait::async_trait;

/// Host notification surface.
#[async_trait]
pub trait Notify: Send + Sync + 'static {
    /// Opens a progress-bearing notification (indeterminate progress) and
    /// returns a handle for later mutation.
    async fn progress(&self, title: &str) -> Box<dyn Progress>;

    /// Shows a standalone, fire-and-forget error notification.
    async fn error(&self, message: &str);
}

/// Handle to one open progress notification.
#[async_trait]
pub trait Progress: Send {
    /// Replaces the message shown on the surface.
    async fn update(&mut self, message: &str);

    /// Completes the progress and offers a follow-up action, kept visible
    /// until the user reacts or dismisses the surface. Returns whether the
    /// action was accepted.
    async fn offer_action(&mut self, message: &str, action_label: &str) -> bool;

    /// Surfaces a failure on this notification. Returns `false` when the
    /// surface was already dismissed and the caller should fall back to a
    /// standalone error notification.
    async fn fail(&mut self, message: &str) -> bool;
}
