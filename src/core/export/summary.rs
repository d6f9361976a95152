//! Export summary and reporting

use std::path::PathBuf;
use std::time::Duration;

/// Summary of one export run
#[derive(Debug, Clone, Default)]
pub struct ExportSummary {
    /// Display name of the exported series
    pub series_nama: String,

    /// Portfolios in the dataset (== pages in the document)
    pub total_portfolios: usize,

    /// Distinct portfolio owners
    pub total_users: usize,

    /// Distinct asset URLs referenced by the run
    pub assets_requested: usize,

    /// Assets fetched and cached successfully
    pub assets_resolved: usize,

    /// Assets that failed and render as placeholders
    pub assets_failed: usize,

    /// Verification codes generated
    pub codes_generated: usize,

    /// Usernames whose code generation failed
    pub codes_failed: usize,

    /// Pages composed
    pub pages_composed: usize,

    /// Artifact filename (set even on dry runs)
    pub artifact_filename: Option<String>,

    /// SHA-256 of the rendered artifact bytes
    pub artifact_checksum: Option<String>,

    /// Where the artifact was written
    pub artifact_path: Option<PathBuf>,

    /// True when rendering and delivery were skipped
    pub dry_run: bool,

    /// Duration of the run
    pub duration: Duration,
}

impl ExportSummary {
    /// Create a new empty export summary
    pub fn new() -> Self {
        Self::default()
    }

    /// True when nothing degraded: every asset and every code materialized
    pub fn is_complete_success(&self) -> bool {
        self.assets_failed == 0 && self.codes_failed == 0
    }

    /// Share of requested assets that resolved, as a percentage
    pub fn asset_success_rate(&self) -> f64 {
        if self.assets_requested == 0 {
            return 100.0;
        }
        (self.assets_resolved as f64 / self.assets_requested as f64) * 100.0
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            series = %self.series_nama,
            portfolios = self.total_portfolios,
            users = self.total_users,
            pages = self.pages_composed,
            assets_requested = self.assets_requested,
            assets_resolved = self.assets_resolved,
            assets_failed = self.assets_failed,
            codes_generated = self.codes_generated,
            codes_failed = self.codes_failed,
            dry_run = self.dry_run,
            duration_ms = self.duration.as_millis(),
            asset_success_rate = format!("{:.2}%", self.asset_success_rate()),
            "Export completed"
        );

        if let Some(path) = &self.artifact_path {
            tracing::info!(path = %path.display(), "Artifact written");
        }
        if !self.is_complete_success() {
            tracing::warn!(
                assets_failed = self.assets_failed,
                codes_failed = self.codes_failed,
                "Export completed with degraded items (placeholders rendered)"
            );
        }
    }
}
