//! Composed page model
//!
//! The composer turns the dataset plus the run caches into one [`Page`] per
//! portfolio. A page carries its position metadata and the fully
//! resolved render model, so every layout rule is observable without a
//! document renderer in the loop.

use crate::domain::dataset::PortfolioExportItem;
use crate::domain::media::{EncodedImage, VerificationCode};
use serde::{Deserialize, Serialize};

/// A slot where an image was requested
///
/// Resolution happens against the run's image cache: a missing cache entry
/// means the fetch failed and the slot degrades to a placeholder. This is
/// the layout-level expression of the non-fatal asset policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageSlot {
    /// The URL resolved in the image cache
    Resolved(EncodedImage),

    /// The fetch failed; render a placeholder box, optionally labelled
    Placeholder { label: Option<String> },
}

impl ImageSlot {
    pub fn is_resolved(&self) -> bool {
        matches!(self, ImageSlot::Resolved(_))
    }
}

/// Identity region: who owns the portfolio on this page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityRegion {
    pub nama: String,
    pub username: String,

    /// Avatar if resolved, else a placeholder labelled with the first
    /// letter of the name, uppercased
    pub avatar: ImageSlot,

    pub kelas_nama: Option<String>,
    pub jurusan_nama: Option<String>,
    pub nisn: Option<String>,
    pub nis: Option<String>,

    /// Cached verification code for this user; absent renders nothing,
    /// never an error visual
    pub verification_code: Option<VerificationCode>,
}

/// Portfolio header region: title, date, thumbnail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioHeader {
    pub judul: String,

    /// Creation date, already formatted for display
    pub created_label: String,

    /// `None` when the portfolio never had a thumbnail URL; a set URL that
    /// failed to fetch becomes a placeholder slot instead
    pub thumbnail: Option<ImageSlot>,
}

/// A content block after layout rules were applied
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComposedBlock {
    /// Instructional caption from the series template, rendered above the
    /// block when the template has an entry for this block position
    pub instruction: Option<String>,

    pub body: BlockBody,
}

/// Render-ready block content
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum BlockBody {
    Text {
        content: String,
        /// True when the source exceeded the truncation limit and an
        /// ellipsis marker was appended
        truncated: bool,
    },
    Image {
        image: ImageSlot,
        caption: Option<String>,
    },
    Youtube {
        title: String,
        /// Textual watch reference; the static document embeds nothing live
        reference: String,
    },
    Button {
        label: String,
        url: String,
    },
    Table {
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
        /// Rows beyond the cap are dropped, not paginated
        dropped_rows: usize,
    },
}

/// The render-ready composition of one portfolio
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Read-only snapshot of the source portfolio
    pub portfolio: PortfolioExportItem,

    /// 1 + index in dataset order
    pub page_number: usize,

    /// Dataset length
    pub total_pages: usize,

    pub identity: IdentityRegion,
    pub header: PortfolioHeader,
    pub blocks: Vec<ComposedBlock>,
}
