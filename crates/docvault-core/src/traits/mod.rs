//! Boundary traits implemented by other DocVault crates.

pub mod blob_store;
pub mod fetcher;

pub use blob_store::BlobStore;
pub use fetcher::ContentFetcher;
