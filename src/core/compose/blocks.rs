//! Per-variant block composition rules
//!
//! The match over [`BlockPayload`] is exhaustive over the known variants;
//! [`BlockPayload::Unknown`] composes to nothing and never fails the page.

use crate::core::assets::ImageCache;
use crate::domain::{
    BlockBody, BlockPayload, ComposedBlock, ContentBlockExportItem, ImageSlot, SeriesInfo,
};

/// Text blocks longer than this many characters are cut
pub const TEXT_TRUNCATE_CHARS: usize = 200;

/// Marker appended to truncated text
pub const ELLIPSIS: &str = "…";

/// Data rows kept per table block; the rest are dropped, not paginated
pub const TABLE_ROW_CAP: usize = 3;

const YOUTUBE_FALLBACK_TITLE: &str = "Video YouTube";

/// Compose one content block
///
/// Returns `None` for unknown variants. The instructional caption comes
/// from the series template entry with exactly this block's position.
pub fn compose_block(
    block: &ContentBlockExportItem,
    series: &SeriesInfo,
    images: &ImageCache,
) -> Option<ComposedBlock> {
    let body = match &block.payload {
        BlockPayload::Text { content } => {
            let (content, truncated) = truncate_content(content);
            BlockBody::Text { content, truncated }
        }
        BlockPayload::Image { url, caption } => BlockBody::Image {
            image: resolve_image(url, images),
            caption: caption.clone(),
        },
        BlockPayload::Youtube { video_id, title } => BlockBody::Youtube {
            title: title
                .clone()
                .unwrap_or_else(|| YOUTUBE_FALLBACK_TITLE.to_string()),
            reference: format!("https://youtu.be/{video_id}"),
        },
        BlockPayload::Button { text, url } => BlockBody::Button {
            label: text.clone(),
            url: url.clone(),
        },
        BlockPayload::Table { headers, rows } => {
            let kept: Vec<Vec<String>> = rows.iter().take(TABLE_ROW_CAP).cloned().collect();
            BlockBody::Table {
                headers: headers.clone(),
                dropped_rows: rows.len().saturating_sub(kept.len()),
                rows: kept,
            }
        }
        BlockPayload::Unknown => {
            tracing::debug!(
                block_id = block.id,
                block_order = block.block_order,
                "Skipping block with unknown variant"
            );
            return None;
        }
    };

    Some(ComposedBlock {
        instruction: series
            .instruction_for(block.block_order)
            .map(|s| s.to_string()),
        body,
    })
}

/// Resolve an image URL against the run cache, degrading to a placeholder
pub fn resolve_image(url: &str, images: &ImageCache) -> ImageSlot {
    match images.resolve(url) {
        Some(image) => ImageSlot::Resolved(image.clone()),
        None => ImageSlot::Placeholder { label: None },
    }
}

/// Apply the text truncation rule
///
/// Counts characters, not bytes, so multi-byte content never splits mid
/// character.
pub fn truncate_content(content: &str) -> (String, bool) {
    if content.chars().count() <= TEXT_TRUNCATE_CHARS {
        return (content.to_string(), false);
    }
    let mut cut: String = content.chars().take(TEXT_TRUNCATE_CHARS).collect();
    cut.push_str(ELLIPSIS);
    (cut, true)
}
