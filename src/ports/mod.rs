//! External collaborator seams.
//!
//! The delivery core owns the routing, buffering, and replay semantics;
//! everything policy- or environment-specific is consumed through the trait
//! seams in this module and injected as `Arc<dyn …>` at construction time:
//!
//! - [`Handler`] — the delivery capability a ready subscriber registers
//! - [`Confirm`] — modal consent prompts
//! - [`Lifecycle`] — subscriber resolution, enable, and install
//! - [`Activate`] / [`RestartHost`] — host control signals
//! - [`KvStore`] — scoped persistence for the restart carry
//! - [`Notify`] — progress-bearing and fire-and-forget notifications
//!
//! [`Ports`] groups the collaborator handles handed to the service builder.

mod confirm;
mod handler;
mod host;
mod lifecycle;
mod notify;
mod storage;

pub use confirm::Confirm;
pub use handler::Handler;
pub use host::{Activate, RestartHost};
pub use lifecycle::{Lifecycle, PackageRecord, SubscriberRecord};
pub use notify::{Notify, Progress};
pub use storage::{KvStore, StorageScope};

use std::sync::Arc;

/// Collaborator handles required to build a delivery service.
#[derive(Clone)]
pub struct Ports {
    /// Subscriber resolution and mutation.
    pub lifecycle: Arc<dyn Lifecycle>,
    /// Consent prompts.
    pub confirm: Arc<dyn Confirm>,
    /// Notification surface.
    pub notify: Arc<dyn Notify>,
    /// Scoped blob persistence.
    pub storage: Arc<dyn KvStore>,
    /// Activation trigger.
    pub activate: Arc<dyn Activate>,
    /// Deliberate host restart.
    pub restart: Arc<dyn RestartHost>,
}

#[cfg(test)]
pub(crate) mod fakes {
    //! Recording collaborator fakes shared by the core tests.

    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use crate::error::{LifecycleError, StorageError};
    use crate::message::{Address, Message};

    use super::*;

    pub(crate) fn subscriber(address: &str, display_name: &str) -> SubscriberRecord {
        SubscriberRecord {
            address: Address::parse(address).expect("valid test address"),
            display_name: display_name.to_string(),
        }
    }

    pub(crate) fn package(address: &str, display_name: &str) -> PackageRecord {
        PackageRecord {
            address: Address::parse(address).expect("valid test address"),
            display_name: display_name.to_string(),
        }
    }

    /// Handler that records everything it receives.
    pub(crate) struct RecordingHandler {
        outcome: bool,
        received: Mutex<Vec<Message>>,
    }

    impl RecordingHandler {
        pub(crate) fn new(outcome: bool) -> Arc<Self> {
            Arc::new(Self {
                outcome,
                received: Mutex::new(Vec::new()),
            })
        }

        pub(crate) fn received_uris(&self) -> Vec<String> {
            self.received
                .lock()
                .expect("handler lock")
                .iter()
                .map(|m| m.uri().to_string())
                .collect()
        }
    }

    #[async_trait]
    impl Handler for RecordingHandler {
        async fn handle(&self, message: Message) -> bool {
            self.received.lock().expect("handler lock").push(message);
            self.outcome
        }
    }

    /// Confirmation fake with a fixed answer and a call counter.
    pub(crate) struct StaticConfirm {
        answer: bool,
        calls: AtomicUsize,
    }

    impl StaticConfirm {
        pub(crate) fn new(answer: bool) -> Arc<Self> {
            Arc::new(Self {
                answer,
                calls: AtomicUsize::new(0),
            })
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Confirm for StaticConfirm {
        async fn confirm(&self, _message: &str, _detail: &str, _primary_action: &str) -> bool {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.answer
        }
    }

    /// Lifecycle fake configured through public fields.
    #[derive(Default)]
    pub(crate) struct FakeLifecycle {
        pub active: Option<SubscriberRecord>,
        pub installed: Option<SubscriberRecord>,
        pub enabled: bool,
        pub installable: Option<PackageRecord>,
        pub enable_error: Option<String>,
        pub install_error: Option<String>,
        pub enable_calls: AtomicUsize,
        pub install_calls: AtomicUsize,
    }

    #[async_trait]
    impl Lifecycle for FakeLifecycle {
        async fn resolve_active(&self, _address: &Address) -> Option<SubscriberRecord> {
            self.active.clone()
        }

        async fn get_installed(&self, _address: &Address) -> Option<SubscriberRecord> {
            self.installed.clone()
        }

        fn is_enabled(&self, _record: &SubscriberRecord) -> bool {
            self.enabled
        }

        async fn set_enabled(
            &self,
            _record: &SubscriberRecord,
            _enabled: bool,
        ) -> Result<(), LifecycleError> {
            self.enable_calls.fetch_add(1, Ordering::SeqCst);
            match &self.enable_error {
                Some(message) => Err(LifecycleError::new(message.clone())),
                None => Ok(()),
            }
        }

        async fn compatible_installable(&self, _address: &Address) -> Option<PackageRecord> {
            self.installable.clone()
        }

        async fn install(&self, _package: &PackageRecord) -> Result<(), LifecycleError> {
            self.install_calls.fetch_add(1, Ordering::SeqCst);
            match &self.install_error {
                Some(message) => Err(LifecycleError::new(message.clone())),
                None => Ok(()),
            }
        }
    }

    /// Activation trigger that records requested addresses.
    #[derive(Default)]
    pub(crate) struct RecordingActivate {
        requests: Mutex<Vec<Address>>,
    }

    impl RecordingActivate {
        pub(crate) fn new() -> Arc<Self> {
            Arc::new(Self::default())
        }

        pub(crate) fn requests(&self) -> Vec<Address> {
            self.requests.lock().expect("activate lock").clone()
        }
    }

    #[async_trait]
    impl Activate for RecordingActivate {
        async fn request_activation(&self, address: &Address) {
            self.requests
                .lock()
                .expect("activate lock")
                .push(address.clone());
        }
    }

    /// Restart trigger that only counts invocations.
    #[derive(Default)]
    pub(crate) struct RecordingRestart {
        count: AtomicUsize,
    }

    impl RecordingRestart {
        pub(crate) fn new() -> Arc<Self> {
            Arc::new(Self::default())
        }

        pub(crate) fn count(&self) -> usize {
            self.count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RestartHost for RecordingRestart {
        async fn restart(&self) {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// In-memory scoped blob store.
    #[derive(Default)]
    pub(crate) struct MemoryStore {
        map: Mutex<HashMap<(StorageScope, String), Vec<u8>>>,
    }

    impl MemoryStore {
        pub(crate) fn new() -> Arc<Self> {
            Arc::new(Self::default())
        }

        pub(crate) fn seed(&self, key: &str, blob: &[u8], scope: StorageScope) {
            self.map
                .lock()
                .expect("store lock")
                .insert((scope, key.to_string()), blob.to_vec());
        }

        pub(crate) fn blob(&self, key: &str, scope: StorageScope) -> Option<Vec<u8>> {
            self.map
                .lock()
                .expect("store lock")
                .get(&(scope, key.to_string()))
                .cloned()
        }
    }

    #[async_trait]
    impl KvStore for MemoryStore {
        async fn put(
            &self,
            key: &str,
            blob: &[u8],
            scope: StorageScope,
        ) -> Result<(), StorageError> {
            self.seed(key, blob, scope);
            Ok(())
        }

        async fn get(
            &self,
            key: &str,
            scope: StorageScope,
        ) -> Result<Option<Vec<u8>>, StorageError> {
            Ok(self.blob(key, scope))
        }

        async fn remove(&self, key: &str, scope: StorageScope) -> Result<(), StorageError> {
            self.map
                .lock()
                .expect("store lock")
                .remove(&(scope, key.to_string()));
            Ok(())
        }
    }

    /// Shared notification journal.
    #[derive(Default)]
    pub(crate) struct NotifyJournal {
        pub errors: Mutex<Vec<String>>,
        pub progress_titles: Mutex<Vec<String>>,
        pub offers: Mutex<Vec<String>>,
        pub failures: Mutex<Vec<String>>,
    }

    /// Notification fake; progress handles write back into the journal.
    pub(crate) struct RecordingNotify {
        pub journal: Arc<NotifyJournal>,
        accept_action: bool,
        progress_dismissed: bool,
    }

    impl RecordingNotify {
        pub(crate) fn new(accept_action: bool, progress_dismissed: bool) -> Arc<Self> {
            Arc::new(Self {
                journal: Arc::new(NotifyJournal::default()),
                accept_action,
                progress_dismissed,
            })
        }
    }

    #[async_trait]
    impl Notify for RecordingNotify {
        async fn progress(&self, title: &str) -> Box<dyn Progress> {
            self.journal
                .progress_titles
                .lock()
                .expect("notify lock")
                .push(title.to_string());
            Box::new(FakeProgress {
                journal: Arc::clone(&self.journal),
                accept_action: self.accept_action,
                dismissed: self.progress_dismissed,
            })
        }

        async fn error(&self, message: &str) {
            self.journal
                .errors
                .lock()
                .expect("notify lock")
                .push(message.to_string());
        }
    }

    struct FakeProgress {
        journal: Arc<NotifyJournal>,
        accept_action: bool,
        dismissed: bool,
    }

    #[async_trait]
    impl Progress for FakeProgress {
        async fn update(&mut self, _message: &str) {}

        async fn offer_action(&mut self, _message: &str, action_label: &str) -> bool {
            self.journal
                .offers
                .lock()
                .expect("notify lock")
                .push(action_label.to_string());
            self.accept_action
        }

        async fn fail(&mut self, message: &str) -> bool {
            self.journal
                .failures
                .lock()
                .expect("notify lock")
                .push(message.to_string());
            !self.dismissed
        }
    }
}
