//! Unified application error types for DocVault.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// The requested record or blob was not found.
    NotFound,
    /// The uploaded MIME type is outside the supported set.
    UnsupportedFileType,
    /// An upload request carried no file payload.
    NoFileProvided,
    /// Restore was called on a record that is not in the trash.
    NotTrashed,
    /// A structured update referenced a sheet that does not exist.
    SheetNotFound,
    /// A stored document could not be decoded.
    CorruptDocument,
    /// Fetching or writing editor-saved content failed mid-callback.
    SaveReconciliationFailed,
    /// The blob could not be purged after its metadata row was removed.
    BlobPurgeFailed,
    /// A version compare-and-swap lost the race with a concurrent writer.
    ConcurrentModification,
    /// Input validation failed.
    Validation,
    /// A storage I/O error occurred.
    Storage,
    /// A database error occurred.
    Database,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// A configuration error occurred.
    Configuration,
    /// An external service error occurred.
    ExternalService,
    /// An internal server error occurred.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::UnsupportedFileType => write!(f, "UNSUPPORTED_FILE_TYPE"),
            Self::NoFileProvided => write!(f, "NO_FILE_PROVIDED"),
            Self::NotTrashed => write!(f, "NOT_TRASHED"),
            Self::SheetNotFound => write!(f, "SHEET_NOT_FOUND"),
            Self::CorruptDocument => write!(f, "CORRUPT_DOCUMENT"),
            Self::SaveReconciliationFailed => write!(f, "SAVE_RECONCILIATION_FAILED"),
            Self::BlobPurgeFailed => write!(f, "BLOB_PURGE_FAILED"),
            Self::ConcurrentModification => write!(f, "CONCURRENT_MODIFICATION"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::Storage => write!(f, "STORAGE"),
            Self::Database => write!(f, "DATABASE"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::ExternalService => write!(f, "EXTERNAL_SERVICE"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The unified application error used throughout DocVault.
///
/// All crate-specific errors are mapped into `AppError` using `From` impls
/// or explicit `.map_err()` calls. This provides a single error type for
/// the entire application boundary.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create an unsupported-file-type error.
    pub fn unsupported_file_type(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnsupportedFileType, message)
    }

    /// Create a no-file-provided error.
    pub fn no_file_provided(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NoFileProvided, message)
    }

    /// Create a not-trashed error.
    pub fn not_trashed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotTrashed, message)
    }

    /// Create a sheet-not-found error.
    pub fn sheet_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::SheetNotFound, message)
    }

    /// Create a corrupt-document error.
    pub fn corrupt_document(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::CorruptDocument, message)
    }

    /// Create a save-reconciliation error.
    pub fn save_reconciliation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::SaveReconciliationFailed, message)
    }

    /// Create a concurrent-modification error.
    pub fn concurrent_modification(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConcurrentModification, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Storage, message)
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an external-service error.
    pub fn external_service(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ExternalService, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Whether a caller may safely retry the failed operation as-is.
    ///
    /// Only compare-and-swap losses qualify: retrying re-reads the current
    /// version and reapplies the write.
    pub fn is_retryable(&self) -> bool {
        self.kind == ErrorKind::ConcurrentModification
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorKind::Storage, format!("I/O error: {err}"), err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}
