//! Export scope and preview
//!
//! The scope is the filter pair narrowing which published portfolios
//! qualify for a run. The preview is computed externally by the backend and
//! is advisory for sizing, but its portfolio count is a hard precondition:
//! a zero-count preview must prevent the pipeline from starting.

use crate::domain::ids::{JurusanId, KelasId};
use serde::{Deserialize, Serialize};

/// Scope filters for one export run, immutable once the run starts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportScope {
    #[serde(default)]
    pub jurusan_id: Option<JurusanId>,

    #[serde(default)]
    pub kelas_id: Option<KelasId>,
}

impl ExportScope {
    /// Unfiltered scope: every published portfolio of the series qualifies
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the jurusan filter
    ///
    /// The kelas filter depends on the selected jurusan, so changing
    /// jurusan invalidates it. Any previewed counts must be re-requested
    /// after this call.
    pub fn set_jurusan(&mut self, jurusan_id: Option<JurusanId>) {
        self.jurusan_id = jurusan_id;
        self.kelas_id = None;
    }

    /// Set the kelas filter
    pub fn set_kelas(&mut self, kelas_id: Option<KelasId>) {
        self.kelas_id = kelas_id;
    }

    /// Builder-style jurusan filter
    pub fn with_jurusan(mut self, jurusan_id: JurusanId) -> Self {
        self.set_jurusan(Some(jurusan_id));
        self
    }

    /// Builder-style kelas filter
    pub fn with_kelas(mut self, kelas_id: KelasId) -> Self {
        self.set_kelas(Some(kelas_id));
        self
    }

    /// Query parameters for the backend endpoints
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(jurusan_id) = self.jurusan_id {
            params.push(("jurusan_id", jurusan_id.to_string()));
        }
        if let Some(kelas_id) = self.kelas_id {
            params.push(("kelas_id", kelas_id.to_string()));
        }
        params
    }
}

/// Externally computed preview counts
///
/// Advisory for everything except [`ExportPreview::allows_export`]: layout
/// decisions never trust these numbers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ExportPreview {
    pub portfolio_count: usize,
    pub user_count: usize,
    pub estimated_pages: usize,
}

impl ExportPreview {
    /// Hard gate: a run may only start when the preview reports at least
    /// one portfolio
    pub fn allows_export(&self) -> bool {
        self.portfolio_count > 0
    }
}
