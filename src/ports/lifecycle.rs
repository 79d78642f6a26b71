//! # Lifecycle resolver collaborator.
//!
//! Resolves what is known about a subscriber: whether it is part of the
//! running session, installed, enabled, or available for install from the
//! gallery/catalog. Also performs the enable and install mutations on the
//! coordinator's behalf. All policy/UX around these operations stays on the
//! collaborator side; the core only triggers and awaits them.

use async_trait::async_trait;

use crate::error::LifecycleError;
use crate::message::Address;

/// What the host knows about an installed (or running) subscriber.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubscriberRecord {
    /// Canonical subscriber address.
    pub address: Address,
    /// Human-readable name used in consent prompts and notifications.
    pub display_name: String,
}

/// An installable package compatible with the current host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackageRecord {
    /// Address the package would register under once installed.
    pub address: Address,
    /// Human-readable name used in consent prompts and notifications.
    pub display_name: String,
}

/// Subscriber resolution and mutation operations.
#[async_trait]
pub trait Lifecycle: Send + Sync + 'static {
    /// Resolves a subscriber known to the **running** session (it may still
    /// need activation before it registers a handler). `None` means the
    /// subscriber is not part of the current session at all.
    async fn resolve_active(&self, address: &Address) -> Option<SubscriberRecord>;

    /// Looks the subscriber up among installed subscribers, enabled or not.
    async fn get_installed(&self, address: &Address) -> Option<SubscriberRecord>;

    /// Whether an installed subscriber is currently enabled.
    fn is_enabled(&self, record: &SubscriberRecord) -> bool;

    /// Enables or disables an installed subscriber.
    async fn set_enabled(
        &self,
        record: &SubscriberRecord,
        enabled: bool,
    ) -> Result<(), LifecycleError>;

    /// Finds a gallery package compatible with the current host, if any.
    async fn compatible_installable(&self, address: &Address) -> Option<PackageRecord>;

    /// Installs a package previously returned by
    /// [`compatible_installable`](Lifecycle::compatible_installable).
    async fn install(&self, package: &PackageRecord) -> Result<(), LifecycleError>;
}
