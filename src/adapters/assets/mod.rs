//! Generic asset retrieval
//!
//! A thin HTTP GET capable of fetching arbitrary asset URLs and returning
//! raw bytes plus the reported media type. Failures are typed as
//! [`AssetError`] so the materializer can apply its swallow-and-continue
//! policy without inspecting HTTP details.

use crate::domain::errors::AssetError;
use crate::domain::{KaryaError, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, ClientBuilder};
use std::time::Duration;

const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";

/// One successfully retrieved asset
#[derive(Debug, Clone)]
pub struct FetchedAsset {
    /// Media type from the Content-Type header, parameters stripped
    pub media_type: String,

    pub bytes: Vec<u8>,
}

/// Source of remote assets
#[async_trait]
pub trait AssetSource: Send + Sync {
    /// Fetch a single asset URL
    ///
    /// Errors are per-item: the caller decides whether they are fatal.
    async fn fetch(&self, url: &str) -> std::result::Result<FetchedAsset, AssetError>;
}

/// HTTP implementation of [`AssetSource`]
pub struct HttpAssetSource {
    client: Client,
}

impl HttpAssetSource {
    /// Create a source with the given per-request timeout
    pub fn new(timeout_seconds: u64) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(timeout_seconds))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| KaryaError::Configuration(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl AssetSource for HttpAssetSource {
    async fn fetch(&self, url: &str) -> std::result::Result<FetchedAsset, AssetError> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AssetError::ConnectionFailed(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(AssetError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let media_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| FALLBACK_MEDIA_TYPE.to_string());

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| AssetError::Decode(e.to_string()))?;

        if bytes.is_empty() {
            return Err(AssetError::Decode(format!("empty response body from {url}")));
        }

        Ok(FetchedAsset {
            media_type,
            bytes: bytes.to_vec(),
        })
    }
}
