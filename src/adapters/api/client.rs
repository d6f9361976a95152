//! Backend REST client
//!
//! Implements the two read-only endpoints the pipeline consumes, with
//! bearer-token auth and exponential-backoff retry for transient failures.

use crate::config::{ApiConfig, RetryConfig, SecretString};
use crate::domain::errors::ApiError;
use crate::domain::{ExportDataset, ExportPreview, ExportScope, KaryaError, Result, SeriesId};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, StatusCode};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Read-only view of the backend export endpoints
#[async_trait]
pub trait PortfolioApi: Send + Sync {
    /// Fetch the externally computed preview counts for a scope
    async fn get_export_preview(
        &self,
        series_id: SeriesId,
        scope: &ExportScope,
    ) -> Result<ExportPreview>;

    /// Fetch the full export dataset for a scope
    async fn get_export_dataset(
        &self,
        series_id: SeriesId,
        scope: &ExportScope,
    ) -> Result<ExportDataset>;
}

/// HTTP implementation of [`PortfolioApi`]
pub struct HttpPortfolioApi {
    base_url: String,
    client: Client,
    token: Option<SecretString>,
    retry: RetryConfig,
}

impl HttpPortfolioApi {
    /// Create a client from configuration
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| KaryaError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: config.trimmed_base_url().to_string(),
            client,
            token: config.token.clone(),
            retry: config.retry.clone(),
        })
    }

    /// Base URL this client talks to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn auth_header_value(&self) -> Option<String> {
        self.token
            .as_ref()
            .map(|token| format!("Bearer {}", token.expose_secret().as_ref()))
    }

    /// Retry a request with exponential backoff
    ///
    /// Client errors (4xx) are never retried; only connection failures,
    /// timeouts, and server errors are considered transient.
    async fn retry_request<F, T, Fut>(&self, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let max_retries = self.retry.max_retries;
        let mut attempt = 0;

        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    attempt += 1;
                    if attempt >= max_retries || !is_retryable(&e) {
                        return Err(e);
                    }

                    let delay_ms = self.retry.initial_delay_ms
                        * (self.retry.backoff_multiplier.powf((attempt - 1) as f64) as u64).max(1);
                    let delay_ms = delay_ms.min(self.retry.max_delay_ms);

                    tracing::warn!(
                        attempt = attempt,
                        max_retries = max_retries,
                        delay_ms = delay_ms,
                        error = %e,
                        "Retrying backend request after error"
                    );

                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                }
            }
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, scope: &ExportScope) -> Result<T> {
        self.retry_request(|| async {
            let mut request = self.client.get(url).query(&scope.query_params());

            if let Some(auth) = self.auth_header_value() {
                request = request.header("Authorization", auth);
            }

            let resp = request.send().await.map_err(|e| {
                if e.is_timeout() {
                    KaryaError::Api(ApiError::Timeout(e.to_string()))
                } else {
                    KaryaError::Api(ApiError::ConnectionFailed(e.to_string()))
                }
            })?;

            let status = resp.status();
            if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                return Err(KaryaError::Api(ApiError::AuthenticationFailed(format!(
                    "backend rejected request with status {status}"
                ))));
            }
            if status.is_client_error() {
                let body = resp.text().await.unwrap_or_default();
                return Err(KaryaError::Api(ApiError::ClientError {
                    status: status.as_u16(),
                    message: body,
                }));
            }
            if status.is_server_error() {
                let body = resp.text().await.unwrap_or_default();
                return Err(KaryaError::Api(ApiError::ServerError {
                    status: status.as_u16(),
                    message: body,
                }));
            }

            resp.json::<T>()
                .await
                .map_err(|e| KaryaError::Api(ApiError::InvalidResponse(e.to_string())))
        })
        .await
    }
}

fn is_retryable(err: &KaryaError) -> bool {
    matches!(
        err,
        KaryaError::Api(
            ApiError::ConnectionFailed(_) | ApiError::Timeout(_) | ApiError::ServerError { .. }
        )
    )
}

#[async_trait]
impl PortfolioApi for HttpPortfolioApi {
    async fn get_export_preview(
        &self,
        series_id: SeriesId,
        scope: &ExportScope,
    ) -> Result<ExportPreview> {
        let url = format!("{}/api/series/{}/export/preview", self.base_url, series_id);
        tracing::debug!(url = %url, "Requesting export preview");
        self.get_json(&url, scope).await
    }

    async fn get_export_dataset(
        &self,
        series_id: SeriesId,
        scope: &ExportScope,
    ) -> Result<ExportDataset> {
        let url = format!("{}/api/series/{}/export", self.base_url, series_id);
        tracing::info!(url = %url, "Fetching export dataset");
        self.get_json(&url, scope).await
    }
}
