//! Content fetcher trait for pulling editor-saved document bytes.

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// Trait for fetching document content from a URL supplied by the external
/// editing service in its save callback.
///
/// Defined as a boundary so the callback ingestion path can be exercised
/// without a live editor deployment.
#[async_trait]
pub trait ContentFetcher: Send + Sync + std::fmt::Debug + 'static {
    /// Download the full document body from `url`.
    async fn fetch(&self, url: &str) -> AppResult<Bytes>;
}
