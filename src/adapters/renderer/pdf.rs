//! PDF implementation of the document renderer
//!
//! One A4 page per composed page, laid out as stacked text lines. Image
//! slots render as bracketed markers (the composed page already carries the
//! encoded payloads for engines that can embed them).

use super::DocumentRenderer;
use crate::domain::{BlockBody, EncodedImage, ImageSlot, KaryaError, Page, Result};
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_LEFT_MM: f32 = 18.0;
const TOP_MM: f32 = 280.0;
const BOTTOM_MM: f32 = 20.0;
const FOOTER_MM: f32 = 12.0;
const WRAP_COLUMNS: usize = 90;

/// Print-ready PDF renderer
pub struct PdfRenderer;

impl PdfRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PdfRenderer {
    fn default() -> Self {
        Self::new()
    }
}

struct Line {
    text: String,
    size: f32,
    bold: bool,
}

impl Line {
    fn new(text: impl Into<String>, size: f32, bold: bool) -> Self {
        Self {
            text: text.into(),
            size,
            bold,
        }
    }

    fn advance_mm(&self) -> f32 {
        self.size * 0.55
    }
}

impl DocumentRenderer for PdfRenderer {
    fn render(&self, pages: &[Page], branding: Option<&EncodedImage>) -> Result<Vec<u8>> {
        let (doc, first_page, first_layer) = PdfDocument::new(
            "Karya Series Export",
            Mm(PAGE_WIDTH_MM),
            Mm(PAGE_HEIGHT_MM),
            "content",
        );

        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| KaryaError::Render(e.to_string()))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| KaryaError::Render(e.to_string()))?;

        for (index, page) in pages.iter().enumerate() {
            let (page_index, layer_index) = if index == 0 {
                (first_page, first_layer)
            } else {
                doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "content")
            };
            let layer = doc.get_page(page_index).get_layer(layer_index);

            draw_page(&layer, page, branding, &regular, &bold);
        }

        doc.save_to_bytes()
            .map_err(|e| KaryaError::Render(e.to_string()))
    }
}

fn draw_page(
    layer: &PdfLayerReference,
    page: &Page,
    branding: Option<&EncodedImage>,
    regular: &IndirectFontRef,
    bold: &IndirectFontRef,
) {
    let mut y = TOP_MM;

    if branding.is_some() {
        layer.use_text("Karya", 10.0, Mm(PAGE_WIDTH_MM - 36.0), Mm(TOP_MM + 6.0), bold);
    }

    for line in page_lines(page) {
        if y < BOTTOM_MM {
            // content past the page floor is dropped, not re-paginated
            break;
        }
        let font = if line.bold { bold } else { regular };
        layer.use_text(line.text.clone(), line.size, Mm(MARGIN_LEFT_MM), Mm(y), font);
        y -= line.advance_mm();
    }

    layer.use_text(
        format!("Halaman {} / {}", page.page_number, page.total_pages),
        8.0,
        Mm(MARGIN_LEFT_MM),
        Mm(FOOTER_MM),
        regular,
    );
}

fn page_lines(page: &Page) -> Vec<Line> {
    let mut lines = Vec::new();

    lines.push(Line::new(page.identity.nama.clone(), 13.0, true));
    lines.push(Line::new(format!("@{}", page.identity.username), 10.0, false));
    if let ImageSlot::Placeholder { label: Some(label) } = &page.identity.avatar {
        lines.push(Line::new(format!("[{label}]"), 9.0, false));
    }
    if let Some(kelas) = &page.identity.kelas_nama {
        lines.push(Line::new(format!("Kelas: {kelas}"), 9.0, false));
    }
    if let Some(jurusan) = &page.identity.jurusan_nama {
        lines.push(Line::new(format!("Jurusan: {jurusan}"), 9.0, false));
    }
    if let Some(nisn) = &page.identity.nisn {
        lines.push(Line::new(format!("NISN: {nisn}"), 9.0, false));
    }
    if let Some(nis) = &page.identity.nis {
        lines.push(Line::new(format!("NIS: {nis}"), 9.0, false));
    }
    if let Some(code) = &page.identity.verification_code {
        lines.push(Line::new(format!("Verifikasi: {}", code.payload), 8.0, false));
    }

    lines.push(Line::new(String::new(), 6.0, false));
    lines.push(Line::new(page.header.judul.clone(), 15.0, true));
    lines.push(Line::new(
        format!("Dibuat: {}", page.header.created_label),
        9.0,
        false,
    ));
    if let Some(thumbnail) = &page.header.thumbnail {
        lines.push(Line::new(image_marker(thumbnail), 9.0, false));
    }

    for block in &page.blocks {
        lines.push(Line::new(String::new(), 5.0, false));
        if let Some(instruction) = &block.instruction {
            for wrapped in wrap_text(instruction, WRAP_COLUMNS) {
                lines.push(Line::new(wrapped, 9.0, true));
            }
        }
        match &block.body {
            BlockBody::Text { content, .. } => {
                for wrapped in wrap_text(content, WRAP_COLUMNS) {
                    lines.push(Line::new(wrapped, 10.0, false));
                }
            }
            BlockBody::Image { image, caption } => {
                lines.push(Line::new(image_marker(image), 9.0, false));
                if let Some(caption) = caption {
                    for wrapped in wrap_text(caption, WRAP_COLUMNS) {
                        lines.push(Line::new(wrapped, 8.0, false));
                    }
                }
            }
            BlockBody::Youtube { title, reference } => {
                lines.push(Line::new(format!("{title} - {reference}"), 10.0, false));
            }
            BlockBody::Button { label, url } => {
                lines.push(Line::new(format!("{label}: {url}"), 10.0, false));
            }
            BlockBody::Table {
                headers,
                rows,
                dropped_rows,
            } => {
                lines.push(Line::new(headers.join(" | "), 10.0, true));
                for row in rows {
                    lines.push(Line::new(row.join(" | "), 10.0, false));
                }
                if *dropped_rows > 0 {
                    lines.push(Line::new(
                        format!("({dropped_rows} baris lainnya)"),
                        8.0,
                        false,
                    ));
                }
            }
        }
    }

    lines
}

fn image_marker(slot: &ImageSlot) -> String {
    match slot {
        ImageSlot::Resolved(image) => format!("[Gambar: {}]", image.media_type),
        ImageSlot::Placeholder { label: Some(label) } => format!("[Gambar tidak tersedia: {label}]"),
        ImageSlot::Placeholder { label: None } => "[Gambar tidak tersedia]".to_string(),
    }
}

/// Greedy word wrap; a single overlong word becomes its own line
fn wrap_text(text: &str, max_columns: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
        } else if current.chars().count() + 1 + word.chars().count() <= max_columns {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{IdentityRegion, PortfolioExportItem, PortfolioHeader, UserExportInfo};
    use chrono::Utc;

    fn sample_page() -> Page {
        let user = UserExportInfo {
            username: "alice".to_string(),
            nama: "Alice".to_string(),
            avatar_url: None,
            kelas_nama: Some("XII RPL 1".to_string()),
            jurusan_nama: None,
            nisn: None,
            nis: None,
        };
        Page {
            portfolio: PortfolioExportItem {
                id: 1,
                judul: "Karya Pertama".to_string(),
                created_at: Utc::now(),
                thumbnail_url: None,
                user: user.clone(),
                content_blocks: Vec::new(),
            },
            page_number: 1,
            total_pages: 1,
            identity: IdentityRegion {
                nama: user.nama,
                username: user.username,
                avatar: ImageSlot::Placeholder {
                    label: Some("A".to_string()),
                },
                kelas_nama: Some("XII RPL 1".to_string()),
                jurusan_nama: None,
                nisn: None,
                nis: None,
                verification_code: None,
            },
            header: PortfolioHeader {
                judul: "Karya Pertama".to_string(),
                created_label: "01 May 2024".to_string(),
                thumbnail: None,
            },
            blocks: Vec::new(),
        }
    }

    #[test]
    fn test_render_produces_pdf_bytes() {
        let renderer = PdfRenderer::new();
        let bytes = renderer.render(&[sample_page()], None).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_optional_identity_fields_render_only_if_present() {
        let lines = page_lines(&sample_page());
        let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
        assert!(texts.iter().any(|t| t.starts_with("Kelas:")));
        assert!(!texts.iter().any(|t| t.starts_with("Jurusan:")));
        assert!(!texts.iter().any(|t| t.starts_with("NISN:")));
    }

    #[test]
    fn test_wrap_text_respects_columns() {
        let wrapped = wrap_text("satu dua tiga empat lima", 9);
        assert_eq!(wrapped, vec!["satu dua", "tiga", "empat", "lima"]);
    }

    #[test]
    fn test_wrap_text_empty_input() {
        assert_eq!(wrap_text("", 10), vec![String::new()]);
    }
}
