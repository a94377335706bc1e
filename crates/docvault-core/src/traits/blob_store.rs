//! Blob store trait for pluggable byte storage backends.

use async_trait::async_trait;
use bytes::Bytes;
use uuid::Uuid;

use crate::result::AppResult;

/// Trait for blob storage backends.
///
/// The trait is defined here in `docvault-core` and implemented in
/// `docvault-storage`. Locators returned by [`BlobStore::put`] are opaque to
/// callers; they are persisted on the owning metadata record and passed back
/// verbatim to `get`/`delete`.
#[async_trait]
pub trait BlobStore: Send + Sync + std::fmt::Debug + 'static {
    /// Write a blob for the record with the given id and return its locator.
    ///
    /// The locator is derived deterministically from `id` and `extension`,
    /// so a retried put after a failure overwrites the same location instead
    /// of leaving an orphan.
    async fn put(&self, id: Uuid, extension: &str, data: Bytes) -> AppResult<String>;

    /// Read a blob into memory. Fails with a not-found error if absent.
    async fn get(&self, locator: &str) -> AppResult<Bytes>;

    /// Delete a blob. Deleting an already-absent blob is a success, keeping
    /// purge operations idempotent.
    async fn delete(&self, locator: &str) -> AppResult<()>;

    /// Check whether a blob exists at the given locator.
    async fn exists(&self, locator: &str) -> AppResult<bool>;
}
