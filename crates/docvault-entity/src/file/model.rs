//! File record entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::kind::FileKind;

/// A document stored in DocVault.
///
/// The record is the metadata half of a file; the bytes live in the blob
/// store under `storage_path`. The two are reconciled by the service layer:
/// every content change writes the blob and bumps `version` through a
/// version-guarded update, so `version` plus `content_snapshot` always
/// describe the same bytes.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FileRecord {
    /// Unique file identifier.
    pub id: Uuid,
    /// The user who uploaded the file. A lookup key, not an access-control
    /// relation.
    pub owner_id: Uuid,
    /// The file name shown to users (including extension).
    pub file_name: String,
    /// Document kind derived from the upload MIME type.
    pub kind: FileKind,
    /// File size in bytes.
    pub size_bytes: i64,
    /// Opaque blob store locator. Empty only during the short window
    /// between blank-file row creation and the first blob write.
    pub storage_path: String,
    /// Content version. Starts at 1, incremented by exactly one per
    /// successful content mutation; never decremented or reused.
    pub version: i32,
    /// Base64 copy of the latest bytes, kept as a fast-path cache beside
    /// the blob store.
    pub content_snapshot: Option<String>,
    /// Whether the file is in the trash.
    pub is_deleted: bool,
    /// When the file was trashed. Set and cleared together with
    /// `is_deleted`.
    pub deleted_at: Option<DateTime<Utc>>,
    /// Favorite flag, independent of trash state.
    pub is_favorite: bool,
    /// When the content was last saved by an editor.
    pub last_saved_at: Option<DateTime<Utc>>,
    /// Who last saved the content.
    pub last_saved_by: Option<Uuid>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl FileRecord {
    /// The public URL under which this file's content is reachable.
    ///
    /// Derived from the locator; the locator itself is never handed to
    /// external collaborators.
    pub fn content_url(&self, public_base_url: &str) -> String {
        format!(
            "{}/{}",
            public_base_url.trim_end_matches('/'),
            self.storage_path
        )
    }

    /// Cache-busting document key for the external editor.
    ///
    /// Includes the version so the editor re-fetches content after every
    /// save instead of serving a stale cached copy.
    pub fn document_key(&self) -> String {
        format!("{}-{}", self.id, self.version)
    }

    /// Whether this record is still waiting for its first blob write.
    pub fn is_pending_storage(&self) -> bool {
        self.storage_path.is_empty()
    }
}

/// Data required to create a new file record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFileRecord {
    /// Pre-assigned file identifier (also the basis of the blob locator).
    pub id: Uuid,
    /// The file owner.
    pub owner_id: Uuid,
    /// The file name.
    pub file_name: String,
    /// Document kind.
    pub kind: FileKind,
    /// File size in bytes.
    pub size_bytes: i64,
    /// Blob store locator, or empty for the blank-file creation flow.
    pub storage_path: String,
    /// Base64 copy of the initial bytes.
    pub content_snapshot: Option<String>,
}

impl CreateFileRecord {
    /// Materialize a full record with fresh timestamps, `version = 1`, and
    /// clear lifecycle flags.
    pub fn into_record(self, now: DateTime<Utc>) -> FileRecord {
        FileRecord {
            id: self.id,
            owner_id: self.owner_id,
            file_name: self.file_name,
            kind: self.kind,
            size_bytes: self.size_bytes,
            storage_path: self.storage_path,
            version: 1,
            content_snapshot: self.content_snapshot,
            is_deleted: false,
            deleted_at: None,
            is_favorite: false,
            last_saved_at: None,
            last_saved_by: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> FileRecord {
        CreateFileRecord {
            id: Uuid::nil(),
            owner_id: Uuid::new_v4(),
            file_name: "report.pdf".into(),
            kind: FileKind::Pdf,
            size_bytes: 4,
            storage_path: "00000000-0000-0000-0000-000000000000.pdf".into(),
            content_snapshot: None,
        }
        .into_record(Utc::now())
    }

    #[test]
    fn test_new_records_start_at_version_one() {
        let r = record();
        assert_eq!(r.version, 1);
        assert!(!r.is_deleted);
        assert!(r.deleted_at.is_none());
    }

    #[test]
    fn test_document_key_embeds_version() {
        let mut r = record();
        assert_eq!(
            r.document_key(),
            "00000000-0000-0000-0000-000000000000-1"
        );
        r.version = 7;
        assert_eq!(
            r.document_key(),
            "00000000-0000-0000-0000-000000000000-7"
        );
    }

    #[test]
    fn test_content_url_joins_base_and_locator() {
        let r = record();
        assert_eq!(
            r.content_url("http://host/uploads/"),
            "http://host/uploads/00000000-0000-0000-0000-000000000000.pdf"
        );
    }
}
