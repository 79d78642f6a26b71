//! # Restart continuity: one message carried across a deliberate restart.
//!
//! Immediately before an activation branch restarts the host, the in-flight
//! message is serialized and written to workspace-scoped storage under a
//! fixed key. On the next startup the key is read **once** and erased; a
//! revived message re-enters the router pre-confirmed (the user consented
//! before the restart).
//!
//! A malformed or unreadable blob is treated as absent rather than failing
//! startup.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::CarryError;
use crate::message::Message;
use crate::ports::{KvStore, StorageScope};

/// Fixed storage key for the carried message.
const CARRY_KEY: &str = "postbox.carry";

/// Wire form of the carried message.
#[derive(Serialize, Deserialize)]
struct CarryRecord {
    target: String,
    uri: String,
}

/// Persist/consume surface for the restart carry.
#[derive(Clone)]
pub(crate) struct Carry {
    storage: Arc<dyn KvStore>,
}

impl Carry {
    pub(crate) fn new(storage: Arc<dyn KvStore>) -> Self {
        Self { storage }
    }

    /// Serializes `message` and stores it under the carry key, replacing any
    /// previously carried message.
    pub(crate) async fn persist(&self, message: &Message) -> Result<(), CarryError> {
        let record = CarryRecord {
            target: message.target().to_string(),
            uri: message.uri().to_string(),
        };
        let blob = serde_json::to_vec(&record)?;
        self.storage
            .put(CARRY_KEY, &blob, StorageScope::Workspace)
            .await?;
        Ok(())
    }

    /// Reads and erases the carried message, if any.
    ///
    /// The key is removed before the blob is decoded, so a corrupt record is
    /// consumed (and dropped) rather than replayed forever.
    pub(crate) async fn consume(&self) -> Option<Message> {
        let blob = self
            .storage
            .get(CARRY_KEY, StorageScope::Workspace)
            .await
            .ok()
            .flatten()?;
        let _ = self.storage.remove(CARRY_KEY, StorageScope::Workspace).await;
        let record: CarryRecord = serde_json::from_slice(&blob).ok()?;
        Some(Message::new(record.target, record.uri))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::fakes::MemoryStore;

    #[tokio::test]
    async fn test_round_trip_then_key_absent() {
        let storage = MemoryStore::new();
        let carry = Carry::new(storage.clone() as _);
        let message = Message::new("foo.bar", "scheme://foo.bar/open?x=1");

        carry.persist(&message).await.expect("persist succeeds");
        assert!(storage.blob(CARRY_KEY, StorageScope::Workspace).is_some());

        let revived = carry.consume().await.expect("message revived");
        assert_eq!(revived, message);
        assert!(
            storage.blob(CARRY_KEY, StorageScope::Workspace).is_none(),
            "key erased after consume"
        );
    }

    #[tokio::test]
    async fn test_consume_with_nothing_persisted() {
        let carry = Carry::new(MemoryStore::new() as _);
        assert!(carry.consume().await.is_none());
        assert!(carry.consume().await.is_none(), "still nothing on retry");
    }

    #[tokio::test]
    async fn test_malformed_blob_treated_as_absent() {
        let storage = MemoryStore::new();
        storage.seed(CARRY_KEY, b"{not json", StorageScope::Workspace);
        let carry = Carry::new(storage.clone() as _);

        assert!(carry.consume().await.is_none());
        assert!(
            storage.blob(CARRY_KEY, StorageScope::Workspace).is_none(),
            "corrupt record is erased, not replayed"
        );
    }
}
