//! # Delivery handler trait.
//!
//! A [`Handler`] is the live callback a ready subscriber registers to
//! receive its messages. At most one handler is bound per address at any
//! time; registering for an already-bound address replaces the prior
//! binding.
//!
//! ## Example
//! ```
//! use async_trait::async_trait;
//! use postbox::{Handler, Message};
//!
//! struct Inbox;
//!
//! #[async_trait]
//! impl Handler for Inbox {
//!     async fn handle(&self, message: Message) -> bool {
//!         println!("got {message}");
//!         true
//!     }
//! }
//! ```

use async_trait::async_trait;

use crate::message::Message;

/// Capability to deliver a message to a ready subscriber.
#[async_trait]
pub trait Handler: Send + Sync + 'static {
    /// Delivers one message; returns whether the subscriber handled it.
    ///
    /// For directly dispatched messages the outcome is surfaced to the
    /// routing caller. For entries drained on registration the outcome is
    /// discarded (the original callers were already told "handled").
    async fn handle(&self, message: Message) -> bool;
}
