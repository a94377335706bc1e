//! External co-editing service configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the external document editor integration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Base URL of this backend as reachable by the editor service.
    ///
    /// Per-file callback URLs are built as
    /// `{callback_base_url}/api/files/save-callback/{file_id}`.
    #[serde(default = "default_callback_base_url")]
    pub callback_base_url: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            callback_base_url: default_callback_base_url(),
        }
    }
}

fn default_callback_base_url() -> String {
    "http://localhost:8080".to_string()
}
