//! Document rendering collaborator
//!
//! The pipeline hands its composed pages to a [`DocumentRenderer`] and gets
//! back the binary artifact. The boundary is a trait so the actual document
//! engine stays swappable; the bundled implementation emits a print-ready
//! PDF. Pixel-fidelity of the layout is explicitly not guaranteed.

pub mod pdf;

use crate::domain::{EncodedImage, Page, Result};

/// Turns composed pages plus the branding asset into a binary document
pub trait DocumentRenderer: Send + Sync {
    /// Render the full document
    ///
    /// A failure here is fatal for the run: no partial or corrupt artifact
    /// is ever delivered.
    fn render(&self, pages: &[Page], branding: Option<&EncodedImage>) -> Result<Vec<u8>>;
}

pub use pdf::PdfRenderer;
