//! # Persistence collaborator.
//!
//! A scoped key/value store for small opaque blobs. The core uses a single
//! workspace-scoped key to carry one in-flight message across a deliberate
//! host restart; everything else about the store is the host's concern.

use async_trait::async_trait;

use crate::error::StorageError;

/// Visibility scope of a stored blob.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StorageScope {
    /// Scoped to the current workspace/session.
    Workspace,
    /// Shared across workspaces on this host.
    Global,
}

/// Scoped key/value blob store.
#[async_trait]
pub trait KvStore: Send + Sync + 'static {
    /// Stores `blob` under `key` in `scope`, replacing any previous value.
    async fn put(&self, key: &str, blob: &[u8], scope: StorageScope) -> Result<(), StorageError>;

    /// Reads the blob stored under `key` in `scope`, if any.
    async fn get(&self, key: &str, scope: StorageScope) -> Result<Option<Vec<u8>>, StorageError>;

    /// Removes `key` from `scope`; removing an absent key is not an error.
    async fn remove(&self, key: &str, scope: StorageScope) -> Result<(), StorageError>;
}
