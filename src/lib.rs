// Karya - Series export tool for the Karya student portfolio platform
// Copyright (c) 2025 Karya Contributors
// Licensed under the MIT License

//! # Karya Series Export
//!
//! Karya is the export tool of the Karya student-portfolio platform. It
//! turns a filtered set of published student portfolios into one paginated,
//! print-ready PDF, embedding deduplicated remote images and per-user
//! verification codes.
//!
//! ## Overview
//!
//! One export run:
//! - **Previews** the scope against the backend and refuses to start on an
//!   empty result (hard gate, not advisory)
//! - **Fetches** the export dataset snapshot exactly once
//! - **Generates** one verification code per distinct student, regardless of
//!   how many portfolios each owns
//! - **Materializes** every referenced image into a run-scoped cache, at
//!   most one fetch per distinct URL, five requests in flight at a time
//! - **Composes** one page per portfolio in dataset order, applying the
//!   per-block layout rules (truncation, row caps, placeholders)
//! - **Renders and delivers** a single PDF under a deterministic filename
//!
//! Individual asset or code failures never abort a run; they degrade to
//! placeholders. Only a failed dataset fetch, an empty dataset, a render
//! failure, or cancellation is fatal.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (assets, codes, compose, export pipeline)
//! - [`adapters`] - External integrations (backend API, asset GET, renderer)
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
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
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("karya.toml")?;
//!     let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//!
//!     let pipeline = ExportPipeline::new(
//!         Arc::new(HttpPortfolioApi::new(&config.api)?),
//!         Arc::new(HttpAssetSource::new(config.api.timeout_seconds)?),
//!         Arc::new(PdfRenderer::new()),
//!         ExportOptions::from_config(&config),
//!         Arc::new(NoopProgress),
//!         shutdown_rx,
//!     );
//!
//!     let outcome = pipeline
//!         .execute(SeriesId::new(3)?, &ExportScope::new())
//!         .await?;
//!
//!     println!("Composed {} pages", outcome.summary.pages_composed);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All fallible operations return [`domain::Result`] with the
//! [`domain::KaryaError`] hierarchy:
//!
//! ```rust,no_run
//! use karya::domain::{KaryaError, Result};
//!
//! fn example() -> Result<()> {
//!     let config = karya::config::load_config("karya.toml")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Logging
//!
//! Structured logging via the `tracing` crate:
//!
//! ```rust,no_run
//! tracing::info!(series_id = 3, "Starting export");
//! tracing::warn!(url = "https://cdn.example/x.png", "Failed to fetch asset, skipping");
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
