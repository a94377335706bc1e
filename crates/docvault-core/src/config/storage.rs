//! Blob storage configuration.

use serde::{Deserialize, Serialize};

/// File storage configuration.
///
/// The storage root is injected into the blob store at construction time;
/// no component reads a process-wide upload directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory for stored blobs.
    #[serde(default = "default_root_path")]
    pub root_path: String,
    /// Base URL under which stored blobs are publicly reachable.
    ///
    /// A record's content URL is `{public_base_url}/{locator}`.
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
    /// Maximum upload size in bytes (default 100 MB).
    #[serde(default = "default_max_upload")]
    pub max_upload_size_bytes: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root_path: default_root_path(),
            public_base_url: default_public_base_url(),
            max_upload_size_bytes: default_max_upload(),
        }
    }
}

fn default_root_path() -> String {
    "./data/uploads".to_string()
}

fn default_public_base_url() -> String {
    "http://localhost:8080/uploads".to_string()
}

fn default_max_upload() -> u64 {
    104_857_600 // 100 MB
}
