//! Verification code generation
//!
//! One encoded code per distinct username. The payload is derived from the
//! profile URL template and the username alone; portfolio titles, content,
//! or counts never influence it. A failure for one username is logged and
//! tolerated, leaving that cache entry absent.

use crate::config::USERNAME_PLACEHOLDER;
use crate::domain::VerificationCode;
use std::collections::HashMap;
use thiserror::Error;
use url::Url;

/// Run-scoped verification code cache, keyed by username
#[derive(Debug, Default, Clone)]
pub struct CodeCache {
    entries: HashMap<String, VerificationCode>,
}

impl CodeCache {
    /// Fresh empty cache for a new run
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, code: VerificationCode) {
        self.entries.insert(code.username.clone(), code);
    }

    /// Resolve a username; `None` means generation failed for this user
    pub fn resolve(&self, username: &str) -> Option<&VerificationCode> {
        self.entries.get(username)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Per-username generation failure
#[derive(Debug, Error)]
pub enum CodeError {
    #[error("Username is empty")]
    EmptyUsername,

    #[error("Profile URL is not valid: {0}")]
    InvalidProfileUrl(String),
}

/// Generate one code per distinct username
///
/// Iterates the set once; usernames that fail stay absent from the cache
/// and never block the others.
pub fn generate_codes(usernames: &[String], profile_url_template: &str) -> CodeCache {
    let mut cache = CodeCache::new();

    for username in usernames {
        match generate_code(username, profile_url_template) {
            Ok(code) => cache.insert(code),
            Err(e) => {
                // non-fatal by contract: absent entry, run continues
                tracing::warn!(
                    username = %username,
                    error = %e,
                    "Failed to generate verification code, skipping"
                );
            }
        }
    }

    tracing::info!(
        requested = usernames.len(),
        generated = cache.len(),
        "Verification code generation finished"
    );

    cache
}

/// Generate the code for a single username
pub fn generate_code(
    username: &str,
    profile_url_template: &str,
) -> std::result::Result<VerificationCode, CodeError> {
    if username.trim().is_empty() {
        return Err(CodeError::EmptyUsername);
    }

    let profile_url = profile_url_template.replace(USERNAME_PLACEHOLDER, username);
    let parsed =
        Url::parse(&profile_url).map_err(|e| CodeError::InvalidProfileUrl(e.to_string()))?;

    Ok(VerificationCode::new(username, parsed.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = "https://karya.example/u/{username}";

    #[test]
    fn test_one_entry_per_distinct_username() {
        let usernames = vec!["alice".to_string(), "bob".to_string()];
        let cache = generate_codes(&usernames, TEMPLATE);
        assert_eq!(cache.len(), 2);
        assert!(cache.resolve("alice").is_some());
        assert!(cache.resolve("carol").is_none());
    }

    #[test]
    fn test_code_depends_on_username_alone() {
        let a = generate_code("alice", TEMPLATE).unwrap();
        let b = generate_code("alice", TEMPLATE).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.profile_url, "https://karya.example/u/alice");
    }

    #[test]
    fn test_empty_username_is_tolerated() {
        let usernames = vec!["".to_string(), "budi".to_string()];
        let cache = generate_codes(&usernames, TEMPLATE);
        assert_eq!(cache.len(), 1);
        assert!(cache.resolve("budi").is_some());
    }

    #[test]
    fn test_invalid_template_is_tolerated() {
        let usernames = vec!["budi".to_string()];
        let cache = generate_codes(&usernames, "not a url {username}");
        assert!(cache.is_empty());
    }
}
