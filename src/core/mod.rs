//! Core business logic.
//!
//! # Modules
//!
//! - [`assets`] - URL collection, image cache, bounded-concurrency materializer
//! - [`codes`] - per-user verification code generation
//! - [`compose`] - pure document composition with per-variant layout rules
//! - [`export`] - pipeline orchestration, progress, filename, summary
//!
//! # Export Workflow
//!
//! 1. **Preview gate**: refuse to start when the scope matches nothing
//! 2. **Fetch dataset**: one snapshot, order preserved verbatim
//! 3. **Generate codes**: one per distinct username
//! 4. **Fetch branding + materialize images**: deduplicated, batched, partial
//!    failures degrade to placeholders
//! 5. **Compose**: one page per portfolio
//! 6. **Finalize**: render, checksum, deliver under the deterministic filename
//!
//! ```rust,no_run
//! use karya::adapters::api::HttpPortfolioApi;
//! use karya::adapters::assets::HttpAssetSource;
//! use karya::adapters::renderer::PdfRenderer;
//! use karya::config::load_config;
//! use karya::core::export::{ExportOptions, ExportPipeline, NoopProgress};
//! use karya::domain::{ExportScope, SeriesId};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("karya.toml")?;
//! let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//!
//! let pipeline = ExportPipeline::new(
//!     Arc::new(HttpPortfolioApi::new(&config.api)?),
//!     Arc::new(HttpAssetSource::new(config.api.timeout_seconds)?),
//!     Arc::new(PdfRenderer::new()),
//!     ExportOptions::from_config(&config),
//!     Arc::new(NoopProgress),
//!     shutdown_rx,
//! );
//!
//! let outcome = pipeline
//!     .execute(SeriesId::new(3)?, &ExportScope::new())
//!     .await?;
//! println!("Pages: {}", outcome.summary.pages_composed);
//! # Ok(())
//! # }
//! ```

pub mod assets;
pub mod codes;
pub mod compose;
pub mod export;
