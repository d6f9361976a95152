//! Domain error types
//!
//! This module defines the error hierarchy for the export pipeline.
//! All errors are domain-specific and don't expose third-party types:
//! reqwest and printpdf failures are stringified at the adapter boundary.

use thiserror::Error;

/// Main error type for the export tool
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum KaryaError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Backend API errors (preview and dataset endpoints)
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Asset fetch errors
    ///
    /// Individual asset failures are swallowed by the materializer; this
    /// variant only surfaces when an asset error escapes that boundary
    /// (e.g. adapter construction).
    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),

    /// The resolved scope matches no published portfolios
    ///
    /// Raised both by the preview gate (before any dataset fetch) and by a
    /// dataset fetch that returns zero portfolios. Fatal: no file is produced.
    #[error("Nothing to export: the current scope matches no published portfolios")]
    NothingToExport,

    /// Export process errors
    #[error("Export error: {0}")]
    Export(String),

    /// Document rendering/encoding errors (fatal for the run)
    #[error("Render error: {0}")]
    Render(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// The run was cancelled by a shutdown signal
    #[error("Export cancelled")]
    Cancelled,
}

/// Backend API errors
///
/// Errors that occur when talking to the Karya backend REST API.
/// These errors don't expose the HTTP client's types.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Failed to connect to the backend
    #[error("Failed to connect to backend: {0}")]
    ConnectionFailed(String),

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Invalid response from the backend
    #[error("Invalid response from backend: {0}")]
    InvalidResponse(String),

    /// Client error (4xx)
    #[error("Client error: {status} - {message}")]
    ClientError { status: u16, message: String },

    /// Server error (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Request timeout
    #[error("Request timeout: {0}")]
    Timeout(String),
}

/// Per-asset fetch errors
///
/// These are non-fatal by contract: the materializer logs them and leaves
/// the cache entry absent. Callers of the cache treat a missing key as the
/// failure signal.
#[derive(Debug, Error)]
pub enum AssetError {
    /// Network-level failure
    #[error("Failed to fetch asset: {0}")]
    ConnectionFailed(String),

    /// Non-2xx response for an asset URL
    #[error("Asset request failed with status {status}: {url}")]
    Status { status: u16, url: String },

    /// The response body could not be used as an image payload
    #[error("Failed to decode asset: {0}")]
    Decode(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for KaryaError {
    fn from(err: std::io::Error) -> Self {
        KaryaError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for KaryaError {
    fn from(err: serde_json::Error) -> Self {
        KaryaError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for KaryaError {
    fn from(err: toml::de::Error) -> Self {
        KaryaError::Configuration(format!("TOML parse error: {err}"))
    }
}
