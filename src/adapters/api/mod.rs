//! Karya backend API adapter
//!
//! The backend computes export previews and assembles the export dataset;
//! this adapter is the only place that knows the REST surface. The trait
//! seam keeps the pipeline testable with fake backends.

pub mod client;

pub use client::{HttpPortfolioApi, PortfolioApi};
