//! # docvault-storage
//!
//! Blob store implementations for DocVault. The [`BlobStore`] trait lives
//! in `docvault-core`; this crate provides the local-filesystem backend.

pub mod local;

pub use docvault_core::traits::blob_store::BlobStore;
pub use local::LocalBlobStore;
