//! Local filesystem blob store.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tracing::debug;
use uuid::Uuid;

use docvault_core::error::{AppError, ErrorKind};
use docvault_core::result::AppResult;
use docvault_core::traits::blob_store::BlobStore;

/// Local filesystem blob store.
///
/// The storage root is injected at construction; nothing in the store reads
/// process-wide state. Locators are file names relative to the root.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    /// Root directory for all stored blobs.
    root: PathBuf,
}

impl LocalBlobStore {
    /// Create a new blob store rooted at the given path.
    pub async fn new(root_path: &str) -> AppResult<Self> {
        let root = PathBuf::from(root_path);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create storage root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root })
    }

    /// Derive the locator for a record id and extension.
    ///
    /// Deterministic, so retried puts land on the same location.
    pub fn locator_for(id: Uuid, extension: &str) -> String {
        format!("{id}.{extension}")
    }

    /// Resolve a locator to an absolute path within the root.
    fn resolve(&self, locator: &str) -> PathBuf {
        let clean = locator.trim_start_matches('/');
        self.root.join(clean)
    }

    /// Ensure the parent directory of a path exists.
    async fn ensure_parent(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create parent directory: {}", parent.display()),
                    e,
                )
            })?;
        }
        Ok(())
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn put(&self, id: Uuid, extension: &str, data: Bytes) -> AppResult<String> {
        let locator = Self::locator_for(id, extension);
        let full_path = self.resolve(&locator);
        self.ensure_parent(&full_path).await?;

        fs::write(&full_path, &data).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write blob: {locator}"),
                e,
            )
        })?;

        debug!(locator, bytes = data.len(), "Wrote blob");
        Ok(locator)
    }

    async fn get(&self, locator: &str) -> AppResult<Bytes> {
        let full_path = self.resolve(locator);
        let data = fs::read(&full_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!("Blob not found: {locator}"))
            } else {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to read blob: {locator}"),
                    e,
                )
            }
        })?;
        Ok(Bytes::from(data))
    }

    async fn delete(&self, locator: &str) -> AppResult<()> {
        let full_path = self.resolve(locator);
        match fs::remove_file(&full_path).await {
            Ok(()) => {
                debug!(locator, "Deleted blob");
                Ok(())
            }
            // Already gone counts as deleted so purges stay idempotent.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to delete blob: {locator}"),
                e,
            )),
        }
    }

    async fn exists(&self, locator: &str) -> AppResult<bool> {
        Ok(self.resolve(locator).exists())
    }
}
