//! Shared test helpers for service integration tests.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use uuid::Uuid;

use docvault_core::config::editor::EditorConfig;
use docvault_core::config::storage::StorageConfig;
use docvault_core::result::AppResult;
use docvault_core::traits::blob_store::BlobStore;
use docvault_core::traits::fetcher::ContentFetcher;
use docvault_database::memory::InMemoryFileStore;
use docvault_database::store::FileStore;
use docvault_service::{
    ContentPersister, EditorSessionService, FileService, LifecycleService, RequestContext,
    UploadPayload, UploadService, WorkbookService,
};
use docvault_storage::LocalBlobStore;

/// Everything a service test needs, wired over an in-memory metadata store
/// and a tempdir-backed blob store.
pub struct TestHarness {
    pub files: Arc<dyn FileStore>,
    pub blobs: Arc<dyn BlobStore>,
    pub upload: UploadService,
    pub file_service: FileService,
    pub lifecycle: LifecycleService,
    pub workbook: WorkbookService,
    pub ctx: RequestContext,
    pub storage_config: StorageConfig,
    pub editor_config: EditorConfig,
    tmp: tempfile::TempDir,
}

impl TestHarness {
    pub async fn new() -> Self {
        let tmp = tempfile::tempdir().unwrap();
        let blobs: Arc<dyn BlobStore> = Arc::new(
            LocalBlobStore::new(tmp.path().to_str().unwrap())
                .await
                .unwrap(),
        );
        let files: Arc<dyn FileStore> = Arc::new(InMemoryFileStore::new());

        let storage_config = StorageConfig {
            root_path: tmp.path().to_string_lossy().into_owned(),
            public_base_url: "http://localhost:8080/uploads".into(),
            max_upload_size_bytes: 10 * 1024 * 1024,
        };
        let editor_config = EditorConfig {
            callback_base_url: "http://localhost:8080".into(),
        };

        let persister = ContentPersister::new(files.clone(), blobs.clone());

        Self {
            upload: UploadService::new(files.clone(), blobs.clone(), storage_config.clone()),
            file_service: FileService::new(files.clone(), blobs.clone()),
            lifecycle: LifecycleService::new(files.clone(), blobs.clone()),
            workbook: WorkbookService::new(files.clone(), blobs.clone(), persister),
            ctx: RequestContext::new(Uuid::new_v4(), "tester@example.com"),
            files,
            blobs,
            storage_config,
            editor_config,
            tmp,
        }
    }

    /// Build an editor session service around a custom fetcher.
    pub fn editor_service(&self, fetcher: Arc<dyn ContentFetcher>) -> EditorSessionService {
        EditorSessionService::new(
            self.files.clone(),
            fetcher,
            ContentPersister::new(self.files.clone(), self.blobs.clone()),
            self.storage_config.clone(),
            self.editor_config.clone(),
        )
    }

    /// Number of blobs currently on disk.
    pub fn blob_count(&self) -> usize {
        std::fs::read_dir(self.tmp.path()).unwrap().count()
    }
}

/// Fetcher that serves a fixed body, standing in for the editor's download
/// endpoint.
#[derive(Debug, Clone)]
pub struct StaticFetcher {
    pub body: Bytes,
}

#[async_trait]
impl ContentFetcher for StaticFetcher {
    async fn fetch(&self, _url: &str) -> AppResult<Bytes> {
        Ok(self.body.clone())
    }
}

/// Fetcher that always fails.
#[derive(Debug, Clone)]
pub struct FailingFetcher;

#[async_trait]
impl ContentFetcher for FailingFetcher {
    async fn fetch(&self, url: &str) -> AppResult<Bytes> {
        Err(docvault_core::AppError::external_service(format!(
            "refusing to fetch {url}"
        )))
    }
}

pub fn pdf_payload(name: &str, content: &str) -> UploadPayload {
    UploadPayload {
        file_name: name.to_string(),
        mime_type: "application/pdf".to_string(),
        data: Bytes::from(content.to_string()),
    }
}

pub fn docx_payload(name: &str, content: &str) -> UploadPayload {
    UploadPayload {
        file_name: name.to_string(),
        mime_type: "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            .to_string(),
        data: Bytes::from(content.to_string()),
    }
}
