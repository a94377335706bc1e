//! File upload pipeline — validation, blob writes, and batch metadata
//! creation with compensating cleanup.

use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use bytes::Bytes;
use tracing::{info, warn};
use uuid::Uuid;

use docvault_core::config::storage::StorageConfig;
use docvault_core::error::AppError;
use docvault_core::traits::blob_store::BlobStore;
use docvault_database::store::FileStore;
use docvault_entity::file::{CreateFileRecord, FileKind, FileRecord};

use crate::context::RequestContext;
use crate::file::blank;

/// One raw file payload in an upload request.
#[derive(Debug, Clone)]
pub struct UploadPayload {
    /// Original file name.
    pub file_name: String,
    /// MIME type as declared by the client.
    pub mime_type: String,
    /// File content bytes.
    pub data: Bytes,
}

/// Handles single and multi-file uploads plus blank-file creation.
#[derive(Debug, Clone)]
pub struct UploadService {
    /// Metadata repository.
    files: Arc<dyn FileStore>,
    /// Blob store.
    blobs: Arc<dyn BlobStore>,
    /// Storage configuration.
    config: StorageConfig,
}

impl UploadService {
    /// Creates a new upload service.
    pub fn new(
        files: Arc<dyn FileStore>,
        blobs: Arc<dyn BlobStore>,
        config: StorageConfig,
    ) -> Self {
        Self {
            files,
            blobs,
            config,
        }
    }

    /// Uploads one or more files.
    ///
    /// Validation failures surface before any byte is written. Blob writes
    /// are tracked; if the batch metadata insert fails afterwards, every
    /// written blob is deleted again so a failed batch leaves nothing
    /// behind — neither rows (the insert is all-or-nothing) nor blobs.
    pub async fn upload(
        &self,
        ctx: &RequestContext,
        payloads: Vec<UploadPayload>,
    ) -> Result<Vec<FileRecord>, AppError> {
        if payloads.is_empty() {
            return Err(AppError::no_file_provided("No file payload in request"));
        }

        // Validate the whole batch up front.
        let mut validated = Vec::with_capacity(payloads.len());
        for payload in payloads {
            let kind = FileKind::from_mime(&payload.mime_type).ok_or_else(|| {
                AppError::unsupported_file_type(format!(
                    "Unsupported file type: {}",
                    payload.mime_type
                ))
            })?;

            if payload.data.len() as u64 > self.config.max_upload_size_bytes {
                return Err(AppError::validation(format!(
                    "File '{}' exceeds maximum upload size of {} bytes",
                    payload.file_name, self.config.max_upload_size_bytes
                )));
            }

            validated.push((payload, kind));
        }

        // Write blobs, remembering what landed for rollback.
        let mut written: Vec<String> = Vec::with_capacity(validated.len());
        let mut creates = Vec::with_capacity(validated.len());
        for (payload, kind) in validated {
            let id = Uuid::new_v4();
            let locator = match self.blobs.put(id, kind.extension(), payload.data.clone()).await {
                Ok(locator) => locator,
                Err(e) => {
                    self.rollback_blobs(&written).await;
                    return Err(e);
                }
            };
            written.push(locator.clone());

            creates.push(CreateFileRecord {
                id,
                owner_id: ctx.user_id,
                file_name: payload.file_name,
                kind,
                size_bytes: payload.data.len() as i64,
                storage_path: locator,
                content_snapshot: Some(BASE64.encode(&payload.data)),
            });
        }

        let records = match self.files.insert_many(creates).await {
            Ok(records) => records,
            Err(e) => {
                self.rollback_blobs(&written).await;
                return Err(e);
            }
        };

        info!(
            user_id = %ctx.user_id,
            count = records.len(),
            "Upload completed"
        );

        Ok(records)
    }

    /// Creates a blank document of the given kind.
    ///
    /// The metadata row is created first with an empty locator (the record
    /// stays invisible to listings in that state), the blob is written under
    /// the new record's id, and the locator is attached last.
    pub async fn create_blank(
        &self,
        ctx: &RequestContext,
        kind: FileKind,
    ) -> Result<FileRecord, AppError> {
        let data = blank::blank_payload(kind)?;
        let id = Uuid::new_v4();

        let create = CreateFileRecord {
            id,
            owner_id: ctx.user_id,
            file_name: format!("Untitled.{}", kind.extension()),
            kind,
            size_bytes: data.len() as i64,
            storage_path: String::new(),
            content_snapshot: Some(BASE64.encode(&data)),
        };
        self.files.insert(create).await?;

        let locator = match self.blobs.put(id, kind.extension(), data).await {
            Ok(locator) => locator,
            Err(e) => {
                // Undo the row so the transient state cannot outlive the
                // request.
                if let Err(cleanup) = self.files.delete(id).await {
                    warn!(file_id = %id, error = %cleanup, "Failed to remove record after blob write failure");
                }
                return Err(e);
            }
        };

        let record = self.files.set_storage_path(id, &locator).await?;

        info!(
            user_id = %ctx.user_id,
            file_id = %id,
            kind = %kind,
            "Blank file created"
        );

        Ok(record)
    }

    /// Best-effort deletion of blobs written by a failed batch.
    async fn rollback_blobs(&self, locators: &[String]) {
        for locator in locators {
            if let Err(e) = self.blobs.delete(locator).await {
                warn!(locator, error = %e, "Failed to roll back blob after upload failure");
            }
        }
    }
}
