//! Document composer
//!
//! Pure mapping from the dataset plus the two run caches onto render-ready
//! pages. No I/O happens here; everything the layout needs was materialized
//! in the earlier stages, and anything that failed to materialize degrades
//! per the placeholder policy instead of erroring.

pub mod blocks;

pub use blocks::{compose_block, ELLIPSIS, TABLE_ROW_CAP, TEXT_TRUNCATE_CHARS};

use crate::core::assets::ImageCache;
use crate::core::codes::CodeCache;
use crate::domain::{
    ExportDataset, IdentityRegion, ImageSlot, Page, PortfolioExportItem, PortfolioHeader,
    UserExportInfo,
};

const CREATED_DATE_FORMAT: &str = "%d %B %Y";

/// Compose the whole document
///
/// One page per portfolio, in original dataset order; `page_number` and
/// `total_pages` derive purely from position and dataset length.
pub fn compose_document(
    dataset: &ExportDataset,
    images: &ImageCache,
    codes: &CodeCache,
) -> Vec<Page> {
    let total_pages = dataset.portfolios.len();

    dataset
        .portfolios
        .iter()
        .enumerate()
        .map(|(index, portfolio)| {
            compose_page(portfolio, dataset, images, codes, index + 1, total_pages)
        })
        .collect()
}

fn compose_page(
    portfolio: &PortfolioExportItem,
    dataset: &ExportDataset,
    images: &ImageCache,
    codes: &CodeCache,
    page_number: usize,
    total_pages: usize,
) -> Page {
    let blocks = portfolio
        .blocks_in_order()
        .into_iter()
        .filter_map(|block| compose_block(block, &dataset.series, images))
        .collect();

    Page {
        portfolio: portfolio.clone(),
        page_number,
        total_pages,
        identity: compose_identity(&portfolio.user, images, codes),
        header: compose_header(portfolio, images),
        blocks,
    }
}

fn compose_identity(user: &UserExportInfo, images: &ImageCache, codes: &CodeCache) -> IdentityRegion {
    let avatar = user
        .avatar_url
        .as_deref()
        .and_then(|url| images.resolve(url))
        .map(|image| ImageSlot::Resolved(image.clone()))
        .unwrap_or_else(|| ImageSlot::Placeholder {
            label: Some(avatar_placeholder(&user.nama)),
        });

    IdentityRegion {
        nama: user.nama.clone(),
        username: user.username.clone(),
        avatar,
        kelas_nama: user.kelas_nama.clone(),
        jurusan_nama: user.jurusan_nama.clone(),
        nisn: user.nisn.clone(),
        nis: user.nis.clone(),
        verification_code: codes.resolve(&user.username).cloned(),
    }
}

fn compose_header(portfolio: &PortfolioExportItem, images: &ImageCache) -> PortfolioHeader {
    let thumbnail = portfolio
        .thumbnail_url
        .as_deref()
        .map(|url| blocks::resolve_image(url, images));

    PortfolioHeader {
        judul: portfolio.judul.clone(),
        created_label: portfolio.created_at.format(CREATED_DATE_FORMAT).to_string(),
        thumbnail,
    }
}

/// Deterministic avatar placeholder: first letter of the name, uppercased
fn avatar_placeholder(nama: &str) -> String {
    nama.trim()
        .chars()
        .next()
        .map(|c| c.to_uppercase().to_string())
        .unwrap_or_else(|| "?".to_string())
}
