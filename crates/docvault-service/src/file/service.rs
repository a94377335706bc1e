//! Read and metadata-only file operations.

use std::sync::Arc;

use bytes::Bytes;
use tracing::info;
use uuid::Uuid;

use docvault_core::error::AppError;
use docvault_core::traits::blob_store::BlobStore;
use docvault_database::store::FileStore;
use docvault_entity::file::{FileRecord, MetadataPatch};

use crate::context::RequestContext;

/// Read paths and metadata-only updates.
///
/// Nothing here can touch the version counter: renames go through a
/// [`MetadataPatch`] and the content-mutating services live elsewhere.
#[derive(Debug, Clone)]
pub struct FileService {
    /// Metadata repository.
    files: Arc<dyn FileStore>,
    /// Blob store (for downloads).
    blobs: Arc<dyn BlobStore>,
}

impl FileService {
    /// Creates a new file service.
    pub fn new(files: Arc<dyn FileStore>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { files, blobs }
    }

    /// Lists all non-trashed files.
    pub async fn list_files(&self) -> Result<Vec<FileRecord>, AppError> {
        self.files.list_active().await
    }

    /// Lists all trashed files.
    pub async fn list_trash(&self) -> Result<Vec<FileRecord>, AppError> {
        self.files.list_trashed().await
    }

    /// Lists the files a user uploaded.
    pub async fn files_by_owner(&self, owner_id: Uuid) -> Result<Vec<FileRecord>, AppError> {
        self.files.list_by_owner(owner_id).await
    }

    /// Gets a single file's record.
    pub async fn get_file(&self, file_id: Uuid) -> Result<FileRecord, AppError> {
        self.files
            .find_by_id(file_id)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))
    }

    /// Returns the record and the current content bytes for a download.
    pub async fn download(&self, file_id: Uuid) -> Result<(FileRecord, Bytes), AppError> {
        let record = self.get_file(file_id).await?;
        if record.is_pending_storage() {
            return Err(AppError::not_found("File content is not available yet"));
        }
        let data = self.blobs.get(&record.storage_path).await?;
        Ok((record, data))
    }

    /// Renames a file. A metadata-only change: the version stays put.
    pub async fn rename(
        &self,
        ctx: &RequestContext,
        file_id: Uuid,
        file_name: String,
    ) -> Result<FileRecord, AppError> {
        if file_name.trim().is_empty() {
            return Err(AppError::validation("File name cannot be empty"));
        }

        // Resolve first so a rename of a missing file reports NotFound
        // rather than a bare repository error.
        self.get_file(file_id).await?;

        let record = self
            .files
            .apply_patch(file_id, MetadataPatch::Rename { file_name })
            .await?;

        info!(user_id = %ctx.user_id, file_id = %file_id, name = %record.file_name, "File renamed");

        Ok(record)
    }
}
