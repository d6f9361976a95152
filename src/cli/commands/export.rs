//! Export command implementation
//!
//! Previews the scope, asks for confirmation, then drives the pipeline and
//! prints the run summary.

use crate::adapters::api::HttpPortfolioApi;
use crate::adapters::assets::HttpAssetSource;
use crate::adapters::renderer::PdfRenderer;
use crate::cli::commands::scope_from_args;
use crate::config::load_config;
use crate::core::export::{
    ExportOptions, ExportPipeline, ProgressObserver, ProgressUpdate,
};
use crate::domain::{JurusanId, KaryaError, KelasId, SeriesId};
use clap::Args;
use std::sync::Arc;
use tokio::sync::watch;

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Series to export
    #[arg(long)]
    pub series_id: SeriesId,

    /// Restrict to one jurusan (major)
    #[arg(long)]
    pub jurusan_id: Option<JurusanId>,

    /// Restrict to one kelas (class)
    #[arg(long)]
    pub kelas_id: Option<KelasId>,

    /// Override the output directory from the config
    #[arg(long)]
    pub output_dir: Option<String>,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Dry run mode - compose the document but skip rendering and delivery
    #[arg(long)]
    pub dry_run: bool,
}

/// Prints stage progress to the console
struct ConsoleProgress;

impl ProgressObserver for ConsoleProgress {
    fn on_progress(&self, update: &ProgressUpdate) {
        println!("[{:>3}%] {}", update.percent, update.label);
    }
}

impl ExportArgs {
    /// Execute the export command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!(series_id = %self.series_id, "Starting export command");

        let mut config = load_config(config_path)?;

        if let Some(output_dir) = &self.output_dir {
            tracing::info!(output_dir = %output_dir, "Overriding output directory from CLI");
            config.export.output_dir = output_dir.clone();
        }
        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.application.dry_run = true;
        }

        let scope = scope_from_args(self.jurusan_id, self.kelas_id);

        let pipeline = ExportPipeline::new(
            Arc::new(HttpPortfolioApi::new(&config.api)?),
            Arc::new(HttpAssetSource::new(config.api.timeout_seconds)?),
            Arc::new(PdfRenderer::new()),
            ExportOptions::from_config(&config),
            Arc::new(ConsoleProgress),
            shutdown_signal,
        );

        // Preview first: the zero-count gate applies before any dataset work
        let preview = match pipeline.preview(self.series_id, &scope).await {
            Ok(p) => p,
            Err(e) => {
                tracing::error!(error = %e, "Failed to fetch export preview");
                eprintln!("Failed to fetch export preview: {e}");
                return Ok(4); // Connection error exit code
            }
        };

        println!("Export scope:");
        println!("  Series: {}", self.series_id);
        println!(
            "  Jurusan: {}",
            self.jurusan_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| "All".to_string())
        );
        println!(
            "  Kelas: {}",
            self.kelas_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| "All".to_string())
        );
        println!("  Portfolios: {}", preview.portfolio_count);
        println!("  Students: {}", preview.user_count);
        println!("  Estimated pages: {}", preview.estimated_pages);
        println!();

        if !preview.allows_export() {
            println!("Nothing to export: the current scope matches no published portfolios.");
            return Ok(1);
        }

        if self.dry_run {
            println!("DRY RUN MODE - no file will be written");
            println!();
        }

        if !self.yes && !self.dry_run {
            print!("Proceed with export? [y/N]: ");
            use std::io::{self, Write};
            io::stdout().flush()?;

            let mut input = String::new();
            io::stdin().read_line(&mut input)?;

            if !input.trim().eq_ignore_ascii_case("y") {
                println!("Export cancelled.");
                return Ok(0);
            }
        }

        println!("Starting export...");
        println!();

        let outcome = match pipeline.execute(self.series_id, &scope).await {
            Ok(outcome) => outcome,
            Err(KaryaError::Cancelled) => {
                println!();
                println!("Export interrupted. No file was written.");
                return Ok(130); // SIGINT exit code
            }
            Err(KaryaError::NothingToExport) => {
                println!("Nothing to export: the current scope matches no published portfolios.");
                return Ok(1);
            }
            Err(e) => {
                tracing::error!(error = %e, "Export failed");
                eprintln!("Export failed: {e}");
                return Ok(5); // Fatal error exit code
            }
        };

        let summary = &outcome.summary;
        println!();
        println!("Export Summary:");
        println!("  Series: {}", summary.series_nama);
        println!("  Portfolios: {}", summary.total_portfolios);
        println!("  Students: {}", summary.total_users);
        println!("  Pages: {}", summary.pages_composed);
        println!(
            "  Assets: {}/{} fetched ({} failed)",
            summary.assets_resolved, summary.assets_requested, summary.assets_failed
        );
        println!(
            "  Verification codes: {} ({} failed)",
            summary.codes_generated, summary.codes_failed
        );
        println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
        if let Some(path) = &summary.artifact_path {
            println!("  File: {}", path.display());
        }
        if let Some(checksum) = &summary.artifact_checksum {
            println!("  SHA-256: {checksum}");
        }
        println!();

        if summary.dry_run {
            println!("Dry run completed (no file written).");
        } else if summary.is_complete_success() {
            println!("Export completed successfully!");
        } else {
            println!("Export completed with placeholders for failed assets.");
        }

        Ok(0)
    }
}
