//! File services: reads, uploads, and lifecycle transitions.

pub mod blank;
pub mod lifecycle;
pub mod service;
pub mod upload;

pub use lifecycle::{LifecycleService, PurgeOutcome};
pub use service::FileService;
pub use upload::{UploadPayload, UploadService};
