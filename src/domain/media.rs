//! Encoded media payloads
//!
//! The pipeline never ships raw fetched bytes into the composed document.
//! Remote images are re-encoded as base64 payloads keyed by media type, and
//! verification codes are base64 payloads derived from a profile URL.

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine as _;
use serde::{Deserialize, Serialize};

/// A fetched remote image, encoded for embedding
///
/// Stored in the run-scoped image cache. The raw bytes are gone once the
/// materializer encodes them; everything downstream works with this form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedImage {
    /// Media type reported by the asset server (e.g. `image/png`)
    pub media_type: String,

    /// Base64-encoded image bytes
    pub data: String,
}

impl EncodedImage {
    /// Encode raw fetched bytes
    pub fn from_bytes(media_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            media_type: media_type.into(),
            data: STANDARD.encode(bytes),
        }
    }

    /// Render the image as a `data:` URL
    pub fn as_data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.data)
    }

    /// Decoded payload size in bytes
    pub fn byte_len(&self) -> usize {
        // base64 expands 3 bytes to 4 characters, padding included
        (self.data.len() / 4) * 3
    }
}

/// A per-user verification code
///
/// The payload is a deterministic function of the profile URL alone; which
/// portfolio triggered generation never influences it. Rendered in the
/// identity region of every page owned by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationCode {
    /// Username the code belongs to
    pub username: String,

    /// The profile URL the code points at
    pub profile_url: String,

    /// URL-safe base64 encoding of the profile URL, the scannable payload
    pub payload: String,
}

impl VerificationCode {
    /// Build a code from an already-validated profile URL
    pub fn new(username: impl Into<String>, profile_url: impl Into<String>) -> Self {
        let profile_url = profile_url.into();
        let payload = URL_SAFE_NO_PAD.encode(profile_url.as_bytes());
        Self {
            username: username.into(),
            profile_url,
            payload,
        }
    }
}
