//! # Activation coordinator: resolution path for unhandled messages.
//!
//! Entered when a routed message targets a subscriber that is not part of
//! the running session. The routing call has already reported "handled";
//! everything here is asynchronous best-effort resolution.
//!
//! ## State machine
//! ```text
//! Unresolved ──► gather facts (installed? enabled? installable?)
//!     │
//!     ├─► RestartHost        confirm ─► persist carry ─► restart
//!     ├─► EnableAndRestart   confirm ─► enable ─► persist carry ─► restart
//!     ├─► Install            confirm ─► install ─► offer "restart and open"
//!     │                                   │            (second consent)
//!     │                                   └─ failure ─► progress surface,
//!     │                                                 fallback notification
//!     └─► Ignore             stop silently (nothing to install)
//! ```
//!
//! ## Rules
//! - Every mutating action sits behind explicit consent; declining ends the
//!   path silently (expected user choice, not a fault).
//! - Installation failure never persists a carry and never restarts; there
//!   is no automatic retry — the user re-triggers by resending the message.
//! - A carry persistence failure aborts the restart (restarting would lose
//!   the message) and is surfaced as an error notification.

use std::sync::Arc;

use crate::core::carry::Carry;
use crate::events::{Bus, Event, EventKind};
use crate::message::{Address, Message};
use crate::ports::{Confirm, Lifecycle, Notify, PackageRecord, RestartHost, SubscriberRecord};

use super::plan::{ActivationPlan, resolve_plan};

/// Drives install/enable/restart decisions for not-ready subscribers.
pub(crate) struct Coordinator {
    lifecycle: Arc<dyn Lifecycle>,
    confirm: Arc<dyn Confirm>,
    notify: Arc<dyn Notify>,
    restart: Arc<dyn RestartHost>,
    carry: Carry,
    bus: Bus,
}

impl Coordinator {
    pub(crate) fn new(
        lifecycle: Arc<dyn Lifecycle>,
        confirm: Arc<dyn Confirm>,
        notify: Arc<dyn Notify>,
        restart: Arc<dyn RestartHost>,
        carry: Carry,
        bus: Bus,
    ) -> Self {
        Self {
            lifecycle,
            confirm,
            notify,
            restart,
            carry,
            bus,
        }
    }

    /// Resolves one unhandled message to a terminal state.
    pub(crate) async fn resolve_unhandled(&self, message: Message, address: Address) {
        let record = self.lifecycle.get_installed(&address).await;
        let enabled = record
            .as_ref()
            .map(|r| self.lifecycle.is_enabled(r))
            .unwrap_or(false);
        let package = if record.is_none() {
            self.lifecycle.compatible_installable(&address).await
        } else {
            None
        };

        match resolve_plan(record.is_some(), enabled, package.is_some()) {
            ActivationPlan::RestartHost => {
                if let Some(record) = record {
                    self.offer_restart(message, &address, record).await;
                }
            }
            ActivationPlan::EnableAndRestart => {
                if let Some(record) = record {
                    self.offer_enable(message, &address, record).await;
                }
            }
            ActivationPlan::Install => {
                if let Some(package) = package {
                    self.offer_install(message, &address, package).await;
                }
            }
            ActivationPlan::Ignore => {
                // Nothing to install: the message is dropped without any
                // user-visible feedback.
                self.bus.publish(
                    Event::now(EventKind::ActivationAbandoned).with_address(address.as_str()),
                );
            }
        }
    }

    /// Installed and enabled, but not part of the running session.
    async fn offer_restart(&self, message: Message, address: &Address, record: SubscriberRecord) {
        let prompt = format!(
            "'{}' is installed but not running. Restart the host to deliver this message?",
            record.display_name
        );
        if !self
            .confirm
            .confirm(&prompt, &message.preview(), "Restart")
            .await
        {
            return;
        }
        self.carry_and_restart(message, address).await;
    }

    /// Installed but disabled.
    async fn offer_enable(&self, message: Message, address: &Address, record: SubscriberRecord) {
        let prompt = format!(
            "'{}' is disabled. Enable it and restart the host to deliver this message?",
            record.display_name
        );
        if !self
            .confirm
            .confirm(&prompt, &message.preview(), "Enable and Restart")
            .await
        {
            return;
        }
        if let Err(err) = self.lifecycle.set_enabled(&record, true).await {
            self.notify
                .error(&format!("Could not enable '{}': {err}", record.display_name))
                .await;
            return;
        }
        self.bus
            .publish(Event::now(EventKind::SubscriberEnabled).with_address(address.as_str()));
        self.carry_and_restart(message, address).await;
    }

    /// Not installed; a compatible package exists.
    async fn offer_install(&self, message: Message, address: &Address, package: PackageRecord) {
        let prompt = format!(
            "'{}' is not installed. Install it to receive this message?",
            package.display_name
        );
        if !self
            .confirm
            .confirm(&prompt, &message.preview(), "Install")
            .await
        {
            return;
        }

        self.bus
            .publish(Event::now(EventKind::InstallStarted).with_address(address.as_str()));
        let mut progress = self
            .notify
            .progress(&format!("Installing '{}'…", package.display_name))
            .await;

        match self.lifecycle.install(&package).await {
            Ok(()) => {
                self.bus
                    .publish(Event::now(EventKind::InstallCompleted).with_address(address.as_str()));
                let note = format!(
                    "'{}' was installed. Restart the host to deliver the pending message?",
                    package.display_name
                );
                // Second, separate consent: never an automatic restart.
                if progress.offer_action(&note, "Restart and Open").await {
                    self.carry_and_restart(message, address).await;
                }
            }
            Err(err) => {
                self.bus.publish(
                    Event::now(EventKind::InstallFailed)
                        .with_address(address.as_str())
                        .with_reason(err.to_string()),
                );
                let note = format!("Installing '{}' failed: {err}", package.display_name);
                if !progress.fail(&note).await {
                    self.notify.error(&note).await;
                }
            }
        }
    }

    /// Persists the carry, then restarts; a persistence failure aborts the
    /// restart so the message is not lost.
    async fn carry_and_restart(&self, message: Message, address: &Address) {
        if let Err(err) = self.carry.persist(&message).await {
            self.notify
                .error(&format!(
                    "Could not preserve the message across a restart: {err}"
                ))
                .await;
            return;
        }
        self.bus
            .publish(Event::now(EventKind::CarryPersisted).with_address(address.as_str()));
        self.bus
            .publish(Event::now(EventKind::RestartRequested).with_address(address.as_str()));
        self.restart.restart().await;
    }
}
