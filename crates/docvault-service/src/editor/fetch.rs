//! HTTP implementation of the content fetcher boundary.

use async_trait::async_trait;
use bytes::Bytes;

use docvault_core::error::{AppError, ErrorKind};
use docvault_core::result::AppResult;
use docvault_core::traits::fetcher::ContentFetcher;

/// Fetches editor-saved document bytes over HTTP.
#[derive(Debug, Clone, Default)]
pub struct HttpContentFetcher {
    client: reqwest::Client,
}

impl HttpContentFetcher {
    /// Creates a fetcher with a default client.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContentFetcher for HttpContentFetcher {
    async fn fetch(&self, url: &str) -> AppResult<Bytes> {
        let response = self.client.get(url).send().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::ExternalService,
                format!("Failed to fetch document content from {url}"),
                e,
            )
        })?;

        if !response.status().is_success() {
            return Err(AppError::external_service(format!(
                "Document fetch from {url} returned HTTP {}",
                response.status()
            )));
        }

        response.bytes().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::ExternalService,
                "Failed to read document content body",
                e,
            )
        })
    }
}
