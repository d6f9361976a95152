//! Asset materialization
//!
//! URL collection, the run-scoped image cache, and the bounded-concurrency
//! materializer that fills it.

pub mod cache;
pub mod materializer;

pub use cache::ImageCache;
pub use materializer::{
    collect_asset_urls, materialize_images, MaterializeStats, ASSET_BATCH_SIZE,
};
