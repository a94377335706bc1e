//! Editor session brokering and save-callback ingestion.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use docvault_core::config::editor::EditorConfig;
use docvault_core::config::storage::StorageConfig;
use docvault_core::error::{AppError, ErrorKind};
use docvault_core::traits::fetcher::ContentFetcher;
use docvault_database::store::FileStore;
use docvault_entity::file::FileRecord;

use crate::context::RequestContext;
use crate::editor::persist::ContentPersister;

/// The callback status value that means "document ready to save" in the
/// external editor's wire protocol. Every other status is acknowledged and
/// ignored.
pub const STATUS_READY_TO_SAVE: i32 = 2;

/// Session descriptor handed to the external editor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorSession {
    /// Cache-busting document key (`"{id}-{version}"`): changes with every
    /// save, so the editor never serves a stale cached document.
    pub document_key: String,
    /// Document title.
    pub title: String,
    /// Editor document type (`"spreadsheet"` or `"text"`).
    pub document_type: String,
    /// Public URL the editor downloads the content from.
    pub document_url: String,
    /// URL the editor posts its save callback to, unique per file.
    pub callback_url: String,
    /// The acting user's id.
    pub user_id: Uuid,
    /// The acting user's email.
    pub user_email: String,
    /// Whether the session allows editing.
    pub can_edit: bool,
}

/// The external editor's save callback body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveCallback {
    /// Editor-defined status code.
    pub status: i32,
    /// Where the saved document can be downloaded from.
    #[serde(default)]
    pub url: Option<String>,
    /// Users who were editing the document.
    #[serde(default)]
    pub users: Vec<String>,
}

/// Result of ingesting a save callback.
#[derive(Debug, Clone)]
pub enum SaveOutcome {
    /// Content was fetched and persisted; a new version exists.
    Saved(FileRecord),
    /// The callback carried nothing to save and was acknowledged as-is.
    Ignored,
}

/// Bridges to the external co-editing service.
#[derive(Debug, Clone)]
pub struct EditorSessionService {
    /// Metadata repository.
    files: Arc<dyn FileStore>,
    /// Fetcher for editor-saved content.
    fetcher: Arc<dyn ContentFetcher>,
    /// Shared content write path.
    persister: ContentPersister,
    /// Storage configuration (public URL derivation).
    storage_config: StorageConfig,
    /// Editor configuration (callback URL derivation).
    editor_config: EditorConfig,
}

impl EditorSessionService {
    /// Creates a new editor session service.
    pub fn new(
        files: Arc<dyn FileStore>,
        fetcher: Arc<dyn ContentFetcher>,
        persister: ContentPersister,
        storage_config: StorageConfig,
        editor_config: EditorConfig,
    ) -> Self {
        Self {
            files,
            fetcher,
            persister,
            storage_config,
            editor_config,
        }
    }

    /// Issues an edit-session descriptor for a file.
    pub async fn create_session(
        &self,
        ctx: &RequestContext,
        file_id: Uuid,
    ) -> Result<EditorSession, AppError> {
        let record = self.get(file_id).await?;
        if record.is_pending_storage() {
            return Err(AppError::not_found("File has no content URL yet"));
        }

        Ok(EditorSession {
            document_key: record.document_key(),
            title: record.file_name.clone(),
            document_type: record.kind.editor_document_type().to_string(),
            document_url: record.content_url(&self.storage_config.public_base_url),
            callback_url: format!(
                "{}/api/files/save-callback/{}",
                self.editor_config.callback_base_url.trim_end_matches('/'),
                record.id
            ),
            user_id: ctx.user_id,
            user_email: ctx.email.clone(),
            can_edit: true,
        })
    }

    /// Ingests a save callback from the external editor.
    ///
    /// Only [`STATUS_READY_TO_SAVE`] with a download URL persists anything;
    /// every other callback is acknowledged without touching the record —
    /// the editor expects a 200 either way. On the saving path the bytes
    /// are fetched first, then handed to the shared persister, so a failed
    /// fetch never bumps the version.
    pub async fn handle_save_callback(
        &self,
        file_id: Uuid,
        callback: SaveCallback,
    ) -> Result<SaveOutcome, AppError> {
        let url = match (&callback.url, callback.status) {
            (Some(url), STATUS_READY_TO_SAVE) if !url.is_empty() => url.clone(),
            _ => {
                return Ok(SaveOutcome::Ignored);
            }
        };

        // 404 on unknown ids: a benign-ignore here would silently drop
        // saves for deleted documents.
        self.get(file_id).await?;

        let data = self.fetcher.fetch(&url).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::SaveReconciliationFailed,
                format!("Failed to fetch saved content for file {file_id}"),
                e,
            )
        })?;

        let saved_by = callback
            .users
            .first()
            .and_then(|u| Uuid::parse_str(u).ok());

        let record = self.persister.persist(file_id, data, saved_by).await?;

        info!(
            file_id = %file_id,
            version = record.version,
            "Editor save callback persisted"
        );

        Ok(SaveOutcome::Saved(record))
    }

    async fn get(&self, file_id: Uuid) -> Result<FileRecord, AppError> {
        self.files
            .find_by_id(file_id)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))
    }
}
