//! # Host control collaborators: activation trigger and restart.

use async_trait::async_trait;

use crate::message::Address;

/// Fire-and-forget activation signal.
///
/// Requesting activation should cause the subscriber to become active and
/// eventually register a handler, which is what drains its buffered
/// messages. The router never awaits the activation outcome.
#[async_trait]
pub trait Activate: Send + Sync + 'static {
    /// Signals that the subscriber at `address` should activate.
    async fn request_activation(&self, address: &Address);
}

/// Deliberate host restart.
#[async_trait]
pub trait RestartHost: Send + Sync + 'static {
    /// Restarts the host process. May never return: the restart can
    /// terminate the process before the future resolves. The in-flight
    /// message must already be persisted when this is invoked.
    async fn restart(&self);
}
