//! Structured spreadsheet editing: whole-sheet row replacement applied
//! directly to the stored workbook.

use std::sync::Arc;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use docvault_core::error::AppError;
use docvault_core::traits::blob_store::BlobStore;
use docvault_database::store::FileStore;
use docvault_entity::file::FileRecord;
use docvault_entity::workbook::{CellValue, Workbook, codec};

use crate::context::RequestContext;
use crate::editor::persist::ContentPersister;

/// A full-replace update for one sheet.
///
/// The supplied rows become the sheet's entire row set; there is no diff or
/// patch form, which keeps partial-update semantics out of the contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetUpdate {
    /// Target sheet id.
    pub sheet_id: String,
    /// Replacement rows.
    pub rows: Vec<Vec<CellValue>>,
}

/// Opens, mutates, and re-serializes workbook blobs in place.
#[derive(Debug, Clone)]
pub struct WorkbookService {
    /// Metadata repository.
    files: Arc<dyn FileStore>,
    /// Blob store.
    blobs: Arc<dyn BlobStore>,
    /// Shared content write path (same serialization point as the editor
    /// save callback).
    persister: ContentPersister,
}

impl WorkbookService {
    /// Creates a new workbook service.
    pub fn new(
        files: Arc<dyn FileStore>,
        blobs: Arc<dyn BlobStore>,
        persister: ContentPersister,
    ) -> Self {
        Self {
            files,
            blobs,
            persister,
        }
    }

    /// Opens a file's workbook view.
    ///
    /// The result always has at least one sheet with at least one row; an
    /// empty stored document is normalized so callers never special-case
    /// an empty workbook.
    pub async fn read_structured(&self, file_id: Uuid) -> Result<Workbook, AppError> {
        let record = self.get(file_id).await?;
        let data = self.blobs.get(&record.storage_path).await?;

        let mut workbook = codec::decode(&data)?;
        workbook.normalize();
        Ok(workbook)
    }

    /// Replaces the row sets of the targeted sheets and persists the
    /// workbook as a new content version.
    ///
    /// Sheet ids are validated against the current document before anything
    /// is written, so an unknown id fails the whole request with no partial
    /// update.
    pub async fn apply_structured_update(
        &self,
        ctx: &RequestContext,
        file_id: Uuid,
        updates: Vec<SheetUpdate>,
    ) -> Result<FileRecord, AppError> {
        let record = self.get(file_id).await?;
        let data = self.blobs.get(&record.storage_path).await?;

        let mut workbook = codec::decode(&data)?;
        workbook.normalize();

        for update in &updates {
            if !workbook.has_sheet(&update.sheet_id) {
                return Err(AppError::sheet_not_found(format!(
                    "Sheet '{}' does not exist in file {file_id}",
                    update.sheet_id
                )));
            }
        }

        for update in updates {
            if let Some(sheet) = workbook.sheet_mut(&update.sheet_id) {
                sheet.rows = update.rows;
            }
        }

        let encoded = Bytes::from(codec::encode(&workbook)?);
        let record = self
            .persister
            .persist(file_id, encoded, Some(ctx.user_id))
            .await?;

        info!(
            user_id = %ctx.user_id,
            file_id = %file_id,
            version = record.version,
            "Structured update applied"
        );

        Ok(record)
    }

    async fn get(&self, file_id: Uuid) -> Result<FileRecord, AppError> {
        let record = self
            .files
            .find_by_id(file_id)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))?;

        if record.is_pending_storage() {
            return Err(AppError::not_found("File has no stored content yet"));
        }

        Ok(record)
    }
}
