//! # LogWriter — simple event printer.
//!
//! A minimal observer that prints incoming [`Event`]s to stdout.
//! Use it for tests or demos.
//!
//! ## Example output
//! ```text
//! [dispatched] address="foo.bar" delivered=true
//! [buffered] address="foo.bar" depth=2
//! [registered] address="foo.bar"
//! [drained] address="foo.bar" count=2
//! [expired] address="foo.bar" count=1
//! [install-failed] address="foo.bar" reason="gallery unreachable"
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::observers::Observe;

/// Event writer observer.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Observe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let address = e.address.as_deref().unwrap_or("unknown");
        match e.kind {
            EventKind::MessageDispatched => {
                println!(
                    "[dispatched] address={address:?} delivered={:?}",
                    e.delivered
                );
            }
            EventKind::DispatchDeferred => {
                println!("[deferred] address={address:?}");
            }
            EventKind::MessageBuffered => {
                println!("[buffered] address={address:?} depth={:?}", e.count);
            }
            EventKind::ConfirmDeclined => {
                println!("[declined] address={address:?}");
            }
            EventKind::HandlerRegistered => {
                println!("[registered] address={address:?}");
            }
            EventKind::HandlerUnregistered => {
                println!("[unregistered] address={address:?}");
            }
            EventKind::PendingDrained => {
                println!("[drained] address={address:?} count={:?}", e.count);
            }
            EventKind::PendingExpired => {
                println!("[expired] address={address:?} count={:?}", e.count);
            }
            EventKind::ActivationRequested => {
                println!("[activation-requested] address={address:?}");
            }
            EventKind::ActivationAbandoned => {
                println!("[activation-abandoned] address={address:?}");
            }
            EventKind::SubscriberEnabled => {
                println!("[enabled] address={address:?}");
            }
            EventKind::InstallStarted => {
                println!("[install-started] address={address:?}");
            }
            EventKind::InstallCompleted => {
                println!("[install-completed] address={address:?}");
            }
            EventKind::InstallFailed => {
                println!(
                    "[install-failed] address={address:?} reason={:?}",
                    e.reason
                );
            }
            EventKind::CarryPersisted => {
                println!("[carry-persisted] address={address:?}");
            }
            EventKind::CarryReplayed => {
                println!("[carry-replayed] address={address:?}");
            }
            EventKind::RestartRequested => {
                println!("[restart-requested] address={address:?}");
            }
            EventKind::ObserverOverflow => {
                println!(
                    "[observer-overflow] observer={address:?} reason={:?}",
                    e.reason
                );
            }
            EventKind::ObserverPanicked => {
                println!(
                    "[observer-panicked] observer={address:?} reason={:?}",
                    e.reason
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
