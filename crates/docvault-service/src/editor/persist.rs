//! The single write path for document content.
//!
//! Every content mutation — editor save callbacks and structured
//! spreadsheet updates alike — funnels through [`ContentPersister`], so one
//! serialization strategy covers them all: an optimistic compare-and-swap
//! on the record's version, retried a bounded number of times.

use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use bytes::Bytes;
use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use docvault_core::error::AppError;
use docvault_core::traits::blob_store::BlobStore;
use docvault_database::store::FileStore;
use docvault_entity::file::{ContentSave, FileRecord};

/// How many times a lost version race is retried before surfacing
/// a concurrent-modification error to the caller.
const MAX_CAS_ATTEMPTS: u32 = 3;

/// Writes new content for a record: blob overwrite plus version bump.
#[derive(Debug, Clone)]
pub struct ContentPersister {
    /// Metadata repository.
    files: Arc<dyn FileStore>,
    /// Blob store.
    blobs: Arc<dyn BlobStore>,
}

impl ContentPersister {
    /// Creates a new persister.
    pub fn new(files: Arc<dyn FileStore>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { files, blobs }
    }

    /// Overwrite the record's content and advance its version by one.
    ///
    /// Each attempt re-reads the record so the version guard always targets
    /// the repository's *current* version, never a value cached earlier in
    /// the request. The blob is overwritten at the record's existing
    /// locator — locators are derived from the immutable record id, so a
    /// retry lands on the same location.
    ///
    /// Failure modes:
    /// - record missing (or vanished mid-retry) → save-reconciliation error,
    ///   version untouched;
    /// - version guard still losing after [`MAX_CAS_ATTEMPTS`] →
    ///   concurrent-modification error, which callers may retry wholesale.
    pub async fn persist(
        &self,
        file_id: Uuid,
        data: Bytes,
        saved_by: Option<Uuid>,
    ) -> Result<FileRecord, AppError> {
        for attempt in 1..=MAX_CAS_ATTEMPTS {
            let record = self
                .files
                .find_by_id(file_id)
                .await?
                .ok_or_else(|| {
                    AppError::save_reconciliation(format!(
                        "File {file_id} disappeared before its content could be saved"
                    ))
                })?;

            if record.is_pending_storage() {
                return Err(AppError::save_reconciliation(format!(
                    "File {file_id} has no storage location yet"
                )));
            }

            self.blobs
                .put(record.id, record.kind.extension(), data.clone())
                .await?;

            let save = ContentSave {
                size_bytes: data.len() as i64,
                content_snapshot: Some(BASE64.encode(&data)),
                saved_at: Utc::now(),
                saved_by,
            };

            if self
                .files
                .compare_and_swap_version(file_id, record.version, &save)
                .await?
            {
                return self.files.find_by_id(file_id).await?.ok_or_else(|| {
                    AppError::save_reconciliation(format!(
                        "File {file_id} disappeared right after its content was saved"
                    ))
                });
            }

            debug!(
                file_id = %file_id,
                attempt,
                expected_version = record.version,
                "Version swap lost the race, retrying"
            );
        }

        Err(AppError::concurrent_modification(format!(
            "File {file_id} kept changing under the save; giving up after {MAX_CAS_ATTEMPTS} attempts"
        )))
    }
}
