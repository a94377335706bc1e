//! Typed update payloads for file records.
//!
//! Updates are split by field group so that the repository can keep the
//! version counter reachable only from content mutations: a
//! [`MetadataPatch`] can never bump `version`, and a [`ContentSave`] can
//! only be applied through the version compare-and-swap operation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A metadata-only update. Leaves `version`, `last_saved_at`, and
/// `last_saved_by` untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MetadataPatch {
    /// Rename the file.
    Rename {
        /// New display name.
        file_name: String,
    },
    /// Set the favorite flag.
    Favorite {
        /// New favorite state.
        is_favorite: bool,
    },
}

/// The field group written by a successful content mutation.
///
/// Consumed exclusively by the repository's version compare-and-swap: the
/// version increment, byte bookkeeping, and save attribution land in one
/// conditional update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentSave {
    /// Size of the new content in bytes.
    pub size_bytes: i64,
    /// Base64 copy of the new content.
    pub content_snapshot: Option<String>,
    /// When the save happened.
    pub saved_at: DateTime<Utc>,
    /// Who saved, when known.
    pub saved_by: Option<Uuid>,
}
