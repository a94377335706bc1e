//! File lifecycle transitions: trash, restore, purge, favorite.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use docvault_core::error::{AppError, ErrorKind};
use docvault_core::traits::blob_store::BlobStore;
use docvault_database::store::FileStore;
use docvault_entity::file::{FileRecord, MetadataPatch};

use crate::context::RequestContext;

/// Result of a hard delete.
///
/// The metadata row is always gone by the time this is returned; the
/// variant records whether the blob went with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurgeOutcome {
    /// Metadata and blob both removed.
    Complete,
    /// Metadata removed, but the blob purge failed and was left to an
    /// out-of-band cleanup sweep.
    BlobPurgeFailed,
}

/// Drives the record state machine: `Active` → `Trashed` → `Active`, with
/// hard delete as the terminal transition from either state.
#[derive(Debug, Clone)]
pub struct LifecycleService {
    /// Metadata repository.
    files: Arc<dyn FileStore>,
    /// Blob store.
    blobs: Arc<dyn BlobStore>,
}

impl LifecycleService {
    /// Creates a new lifecycle service.
    pub fn new(files: Arc<dyn FileStore>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { files, blobs }
    }

    /// Moves a file to the trash.
    ///
    /// Idempotent: trashing an already-trashed file returns it unchanged,
    /// keeping the original deletion timestamp.
    pub async fn soft_delete(
        &self,
        ctx: &RequestContext,
        file_id: Uuid,
    ) -> Result<FileRecord, AppError> {
        let record = self.get(file_id).await?;

        if record.is_deleted {
            debug!(file_id = %file_id, "File already trashed");
            return Ok(record);
        }

        let record = self.files.mark_deleted(file_id, Utc::now()).await?;

        info!(user_id = %ctx.user_id, file_id = %file_id, "File trashed");

        Ok(record)
    }

    /// Restores a trashed file.
    ///
    /// Unlike trashing, this is strict: restoring a file that is not in the
    /// trash signals a client logic error and fails.
    pub async fn restore(
        &self,
        ctx: &RequestContext,
        file_id: Uuid,
    ) -> Result<FileRecord, AppError> {
        let record = self.get(file_id).await?;

        if !record.is_deleted {
            return Err(AppError::not_trashed(format!(
                "File {file_id} is not in the trash"
            )));
        }

        let record = self.files.clear_deleted(file_id).await?;

        info!(user_id = %ctx.user_id, file_id = %file_id, "File restored");

        Ok(record)
    }

    /// Restores every trashed file in `ids`.
    ///
    /// Ids that are missing or not trashed are skipped, not errors; the
    /// returned count covers only rows actually restored.
    pub async fn restore_many(
        &self,
        ctx: &RequestContext,
        ids: &[Uuid],
    ) -> Result<u64, AppError> {
        let restored = self.files.restore_many(ids).await?;

        info!(
            user_id = %ctx.user_id,
            requested = ids.len(),
            restored,
            "Bulk restore completed"
        );

        Ok(restored)
    }

    /// Permanently removes a file from any state, trash or not.
    ///
    /// The metadata row goes first — it is the source of truth for
    /// visibility. The blob purge afterwards is best-effort: a failure is
    /// logged and reported, never rolled back, so a stranded blob can't
    /// block repeated deletes of the same id.
    pub async fn hard_delete(
        &self,
        ctx: &RequestContext,
        file_id: Uuid,
    ) -> Result<PurgeOutcome, AppError> {
        let record = self.get(file_id).await?;

        self.files.delete(file_id).await?;

        info!(user_id = %ctx.user_id, file_id = %file_id, "File permanently deleted");

        if record.is_pending_storage() {
            return Ok(PurgeOutcome::Complete);
        }

        match self.blobs.delete(&record.storage_path).await {
            Ok(()) => Ok(PurgeOutcome::Complete),
            Err(e) => {
                let warning = AppError::with_source(
                    ErrorKind::BlobPurgeFailed,
                    format!("Blob {} could not be purged", record.storage_path),
                    e,
                );
                warn!(
                    file_id = %file_id,
                    error = %warning,
                    "Blob purge failed after metadata delete; leaving to cleanup sweep"
                );
                Ok(PurgeOutcome::BlobPurgeFailed)
            }
        }
    }

    /// Flips the favorite flag and returns the updated record, so callers
    /// can render the new state without a second read.
    pub async fn toggle_favorite(
        &self,
        ctx: &RequestContext,
        file_id: Uuid,
    ) -> Result<FileRecord, AppError> {
        let record = self.get(file_id).await?;

        let record = self
            .files
            .apply_patch(
                file_id,
                MetadataPatch::Favorite {
                    is_favorite: !record.is_favorite,
                },
            )
            .await?;

        info!(
            user_id = %ctx.user_id,
            file_id = %file_id,
            is_favorite = record.is_favorite,
            "Favorite toggled"
        );

        Ok(record)
    }

    async fn get(&self, file_id: Uuid) -> Result<FileRecord, AppError> {
        self.files
            .find_by_id(file_id)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))
    }
}
