//! Domain models and types for the export pipeline.
//!
//! This module contains the core domain models shared by every layer:
//!
//! - **Strongly-typed identifiers** ([`SeriesId`], [`JurusanId`], [`KelasId`])
//! - **Dataset snapshot types** ([`ExportDataset`], [`PortfolioExportItem`],
//!   [`BlockPayload`])
//! - **Scope and preview** ([`ExportScope`], [`ExportPreview`])
//! - **Composed page model** ([`Page`] and its regions)
//! - **Encoded media** ([`EncodedImage`], [`VerificationCode`])
//! - **Error types** ([`KaryaError`], [`ApiError`], [`AssetError`]) and the
//!   [`Result`] alias
//!
//! The newtype pattern keeps identifier kinds apart:
//!
//! ```rust
//! use karya::domain::{JurusanId, SeriesId};
//!
//! # fn example() -> Result<(), String> {
//! let series_id = SeriesId::new(3)?;
//! let jurusan_id = JurusanId::new(7)?;
//! // let wrong: SeriesId = jurusan_id; // Compile error!
//! # Ok(())
//! # }
//! ```

pub mod dataset;
pub mod errors;
pub mod ids;
pub mod media;
pub mod page;
pub mod scope;

pub use dataset::{
    BlockPayload, ContentBlockExportItem, ExportDataset, PortfolioExportItem, SeriesBlockTemplate,
    SeriesInfo, UserExportInfo,
};
pub use errors::{ApiError, AssetError, KaryaError};
pub use ids::{JurusanId, KelasId, SeriesId};
pub use media::{EncodedImage, VerificationCode};
pub use page::{BlockBody, ComposedBlock, IdentityRegion, ImageSlot, Page, PortfolioHeader};
pub use scope::{ExportPreview, ExportScope};

/// Result type alias used throughout the crate
pub type Result<T> = std::result::Result<T, KaryaError>;
