//! # docvault-service
//!
//! Business logic service layer for DocVault. Each service orchestrates
//! the metadata repository, the blob store, and the external editor
//! integration to implement application-level use cases.
//!
//! Services follow constructor injection — all dependencies are provided
//! at construction time via `Arc` references.

pub mod context;
pub mod editor;
pub mod file;

pub use context::RequestContext;
pub use editor::{
    ContentPersister, EditorSession, EditorSessionService, HttpContentFetcher, SaveCallback,
    SaveOutcome, SheetUpdate, WorkbookService,
};
pub use file::{FileService, LifecycleService, PurgeOutcome, UploadPayload, UploadService};
