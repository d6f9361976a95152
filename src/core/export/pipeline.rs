//! Export pipeline orchestrator
//!
//! Sequences the stages of one export run: preview gate, dataset fetch,
//! code generation, branding fetch, asset materialization, composition,
//! rendering, and delivery. Both caches are constructed fresh inside the
//! run and never shared; two concurrent invocations cannot corrupt each
//! other's state.

use crate::adapters::api::PortfolioApi;
use crate::adapters::assets::AssetSource;
use crate::adapters::renderer::DocumentRenderer;
use crate::config::KaryaConfig;
use crate::core::assets::{collect_asset_urls, materialize_images, ImageCache};
use crate::core::codes::generate_codes;
use crate::core::compose::compose_document;
use crate::core::export::filename::export_filename;
use crate::core::export::progress::{ExportStage, ProgressObserver, StageMachine};
use crate::core::export::summary::ExportSummary;
use crate::domain::{
    EncodedImage, ExportPreview, ExportScope, KaryaError, Result, SeriesId,
};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;

/// Per-run options derived from configuration
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Fixed branding image embedded into every document
    pub branding_url: Option<String>,

    /// Profile URL template driving verification codes
    pub profile_url_template: String,

    /// Directory the artifact is delivered into
    pub output_dir: PathBuf,

    /// Skip rendering and delivery
    pub dry_run: bool,
}

impl ExportOptions {
    pub fn from_config(config: &KaryaConfig) -> Self {
        Self {
            branding_url: config.export.branding_url.clone(),
            profile_url_template: config.export.profile_url_template.clone(),
            output_dir: PathBuf::from(&config.export.output_dir),
            dry_run: config.application.dry_run,
        }
    }
}

/// The finished artifact of a successful run
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub filename: String,
    pub path: PathBuf,
    pub checksum: String,
    pub bytes: Vec<u8>,
}

/// Result of one pipeline invocation
#[derive(Debug, Clone)]
pub struct ExportOutcome {
    pub summary: ExportSummary,

    /// `None` on dry runs
    pub artifact: Option<ExportArtifact>,
}

/// Orchestrator for one series export
pub struct ExportPipeline {
    api: Arc<dyn PortfolioApi>,
    assets: Arc<dyn AssetSource>,
    renderer: Arc<dyn DocumentRenderer>,
    options: ExportOptions,
    observer: Arc<dyn ProgressObserver>,
    shutdown: watch::Receiver<bool>,
}

impl ExportPipeline {
    pub fn new(
        api: Arc<dyn PortfolioApi>,
        assets: Arc<dyn AssetSource>,
        renderer: Arc<dyn DocumentRenderer>,
        options: ExportOptions,
        observer: Arc<dyn ProgressObserver>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            api,
            assets,
            renderer,
            options,
            observer,
            shutdown,
        }
    }

    /// Fetch the externally computed preview for a scope
    pub async fn preview(&self, series_id: SeriesId, scope: &ExportScope) -> Result<ExportPreview> {
        self.api.get_export_preview(series_id, scope).await
    }

    /// Run the full export
    ///
    /// Re-checks the preview first: a zero-portfolio preview refuses to
    /// start, and no dataset fetch happens. On success exactly one artifact
    /// was delivered (unless this is a dry run).
    pub async fn execute(&self, series_id: SeriesId, scope: &ExportScope) -> Result<ExportOutcome> {
        let preview = self.preview(series_id, scope).await?;
        if !preview.allows_export() {
            tracing::warn!(
                series_id = %series_id,
                "Preview reports no portfolios in scope, refusing to start"
            );
            return Err(KaryaError::NothingToExport);
        }

        tracing::info!(
            series_id = %series_id,
            portfolio_count = preview.portfolio_count,
            user_count = preview.user_count,
            estimated_pages = preview.estimated_pages,
            "Starting export run"
        );

        let started = Instant::now();
        let mut machine = StageMachine::new(self.observer.clone(), self.shutdown.clone());

        match self.run_stages(series_id, scope, &mut machine).await {
            Ok(mut outcome) => {
                outcome.summary.duration = started.elapsed();
                outcome.summary.log_summary();
                Ok(outcome)
            }
            Err(e) => {
                machine.fail();
                tracing::error!(error = %e, "Export run failed");
                Err(e)
            }
        }
    }

    async fn run_stages(
        &self,
        series_id: SeriesId,
        scope: &ExportScope,
        machine: &mut StageMachine,
    ) -> Result<ExportOutcome> {
        let mut summary = ExportSummary {
            dry_run: self.options.dry_run,
            ..ExportSummary::new()
        };

        machine.enter(ExportStage::FetchingDataset)?;
        let dataset = self.api.get_export_dataset(series_id, scope).await?;
        if dataset.is_empty() {
            tracing::warn!(series_id = %series_id, "Dataset contains no portfolios");
            return Err(KaryaError::NothingToExport);
        }

        let usernames = dataset.distinct_usernames();
        summary.series_nama = dataset.series.nama.clone();
        summary.total_portfolios = dataset.portfolios.len();
        summary.total_users = usernames.len();

        machine.enter(ExportStage::GeneratingCodes)?;
        let codes = generate_codes(&usernames, &self.options.profile_url_template);
        summary.codes_generated = codes.len();
        summary.codes_failed = usernames.len() - codes.len();

        machine.enter(ExportStage::FetchingBrandingAsset)?;
        let mut images = ImageCache::new();
        let mut attempted = HashSet::new();
        let mut branding_failed = 0;
        if let Some(branding_url) = &self.options.branding_url {
            attempted.insert(branding_url.clone());
            match self.assets.fetch(branding_url).await {
                Ok(asset) => {
                    images.insert(
                        branding_url.clone(),
                        EncodedImage::from_bytes(asset.media_type, &asset.bytes),
                    );
                }
                Err(e) => {
                    branding_failed = 1;
                    tracing::warn!(
                        url = %branding_url,
                        error = %e,
                        "Failed to fetch branding asset, continuing without it"
                    );
                }
            }
        }

        machine.enter(ExportStage::MaterializingImages)?;
        let urls = collect_asset_urls(&dataset, self.options.branding_url.as_deref());
        let stats = materialize_images(
            self.assets.as_ref(),
            &urls,
            &mut images,
            &attempted,
            &self.shutdown,
            |done, total| machine.asset_batch(done, total),
        )
        .await?;
        summary.assets_requested = urls.len();
        summary.assets_resolved = images.len();
        summary.assets_failed = stats.failed + branding_failed;

        machine.enter(ExportStage::ComposingDocument)?;
        let pages = compose_document(&dataset, &images, &codes);
        summary.pages_composed = pages.len();

        machine.enter(ExportStage::Finalizing)?;
        let today = chrono::Local::now().date_naive();
        let filename = export_filename(&dataset.series.nama, &usernames, today);
        summary.artifact_filename = Some(filename.clone());

        let artifact = if self.options.dry_run {
            tracing::info!(filename = %filename, "Dry run: skipping render and delivery");
            None
        } else {
            let branding = self
                .options
                .branding_url
                .as_deref()
                .and_then(|url| images.resolve(url));
            let bytes = self.renderer.render(&pages, branding)?;
            let checksum = artifact_checksum(&bytes);
            let path = self.deliver(&filename, &bytes).await?;

            summary.artifact_checksum = Some(checksum.clone());
            summary.artifact_path = Some(path.clone());

            Some(ExportArtifact {
                filename,
                path,
                checksum,
                bytes,
            })
        };

        machine.enter(ExportStage::Done)?;
        Ok(ExportOutcome { summary, artifact })
    }

    /// Write the artifact into the output directory
    async fn deliver(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.options.output_dir).await?;
        let path = self.options.output_dir.join(filename);
        tokio::fs::write(&path, bytes).await?;

        tracing::info!(
            path = %path.display(),
            size_bytes = bytes.len(),
            "Artifact delivered"
        );
        Ok(path)
    }
}

/// SHA-256 hex digest of the artifact bytes
pub fn artifact_checksum(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_checksum_is_stable_hex() {
        let a = artifact_checksum(b"abc");
        let b = artifact_checksum(b"abc");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_options_from_config() {
        let toml_content = r#"
[api]
base_url = "https://karya.example"

[export]
output_dir = "out"
profile_url_template = "https://karya.example/u/{username}"
"#;
        let config: KaryaConfig = toml::from_str(toml_content).unwrap();
        let options = ExportOptions::from_config(&config);
        assert_eq!(options.output_dir, PathBuf::from("out"));
        assert!(options.branding_url.is_none());
        assert!(!options.dry_run);
    }
}
