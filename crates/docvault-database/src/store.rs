//! The metadata repository boundary.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use docvault_core::result::AppResult;
use docvault_entity::file::{ContentSave, CreateFileRecord, FileRecord, MetadataPatch};

/// CRUD plus the specialized operations the lifecycle and synchronization
/// engine needs from its metadata store.
///
/// Implemented by [`crate::PgFileStore`] for PostgreSQL and by
/// [`crate::InMemoryFileStore`] for single-node and test use. Services hold
/// an `Arc<dyn FileStore>` and never know which one they got.
#[async_trait]
pub trait FileStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a single new record with `version = 1`.
    async fn insert(&self, record: CreateFileRecord) -> AppResult<FileRecord>;

    /// Insert a batch of records all-or-nothing: if any row fails, no row
    /// from the batch remains.
    async fn insert_many(&self, records: Vec<CreateFileRecord>) -> AppResult<Vec<FileRecord>>;

    /// Find a record by id.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<FileRecord>>;

    /// List records that are neither trashed nor awaiting their first blob
    /// write.
    async fn list_active(&self) -> AppResult<Vec<FileRecord>>;

    /// List a user's non-trashed records.
    async fn list_by_owner(&self, owner_id: Uuid) -> AppResult<Vec<FileRecord>>;

    /// List trashed records.
    async fn list_trashed(&self) -> AppResult<Vec<FileRecord>>;

    /// Apply a metadata-only patch. Cannot touch the version counter.
    async fn apply_patch(&self, id: Uuid, patch: MetadataPatch) -> AppResult<FileRecord>;

    /// Move a record into the trash, stamping both soft-delete fields.
    async fn mark_deleted(&self, id: Uuid, deleted_at: DateTime<Utc>) -> AppResult<FileRecord>;

    /// Clear both soft-delete fields.
    async fn clear_deleted(&self, id: Uuid) -> AppResult<FileRecord>;

    /// Restore every currently-trashed record in `ids`, skipping ids that
    /// are missing or not trashed. Returns how many rows were restored.
    async fn restore_many(&self, ids: &[Uuid]) -> AppResult<u64>;

    /// Finalize a blank-created record by attaching its blob locator.
    async fn set_storage_path(&self, id: Uuid, storage_path: &str) -> AppResult<FileRecord>;

    /// Conditionally apply a content save: increments `version` by one and
    /// writes the save fields, but only if the stored version still equals
    /// `expected_version`. Returns `false` when the guard fails; the row is
    /// then untouched.
    async fn compare_and_swap_version(
        &self,
        id: Uuid,
        expected_version: i32,
        save: &ContentSave,
    ) -> AppResult<bool>;

    /// Remove a record outright. Returns `true` if a row was deleted.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}
