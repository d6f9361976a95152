//! Run-scoped image cache
//!
//! Maps asset URLs to their encoded fetch results. Owned exclusively by one
//! pipeline run and read-only once materialization finishes. A missing key
//! IS the failure signal; failed fetches are never stored.

use crate::domain::EncodedImage;
use std::collections::HashMap;

#[derive(Debug, Default, Clone)]
pub struct ImageCache {
    entries: HashMap<String, EncodedImage>,
}

impl ImageCache {
    /// Fresh empty cache for a new run
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a successful fetch result
    pub fn insert(&mut self, url: impl Into<String>, image: EncodedImage) {
        self.entries.insert(url.into(), image);
    }

    /// Resolve a URL; `None` means the fetch failed or never happened
    pub fn resolve(&self, url: &str) -> Option<&EncodedImage> {
        self.entries.get(url)
    }

    pub fn contains(&self, url: &str) -> bool {
        self.entries.contains_key(url)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
