//! Page rasterization
//!
//! Renders the leading pages of a source document to RGB pixels through
//! MuPDF. The trait is synchronous; callers run it on the [`RenderPool`].
//!
//! [`RenderPool`]: super::RenderPool

use mupdf::{Colorspace, Matrix};

use crate::document::{DocumentError, DocumentResult, SourceDocument};
use crate::layout::geometry::POINTS_PER_INCH;

use super::image::{image_from_samples, PageImage};

/// Pages consumed from each source document
pub const PAGES_PER_DOCUMENT: usize = 2;

/// Default rendering resolution
pub const DEFAULT_DPI: u32 = 300;

/// Lowest accepted rendering resolution
pub const MIN_DPI: u32 = 36;

/// Highest accepted rendering resolution
pub const MAX_DPI: u32 = 600;

/// Renders leading pages of a document to images
pub trait PageRasterizer: Send + Sync {
    /// Render pages `0..first_n` at `dpi`.
    ///
    /// Fails with `InsufficientPages` if the document is shorter than
    /// `first_n`.
    fn render(
        &self,
        document: &SourceDocument,
        first_n: usize,
        dpi: u32,
    ) -> DocumentResult<Vec<PageImage>>;
}

/// Check a rendering resolution against the supported range
pub fn check_dpi(dpi: u32) -> DocumentResult<()> {
    if !(MIN_DPI..=MAX_DPI).contains(&dpi) {
        return Err(DocumentError::InvalidResolution(dpi));
    }
    Ok(())
}

/// MuPDF rasterizer
#[derive(Debug, Clone, Copy, Default)]
pub struct MuPdfRasterizer;

impl PageRasterizer for MuPdfRasterizer {
    fn render(
        &self,
        document: &SourceDocument,
        first_n: usize,
        dpi: u32,
    ) -> DocumentResult<Vec<PageImage>> {
        check_dpi(dpi)?;
        document.ensure_pages(first_n)?;

        let scale = dpi as f32 / POINTS_PER_INCH as f32;

        document.with_doc(|doc| {
            let mut images = Vec::with_capacity(first_n);
            for index in 0..first_n {
                let page = doc.load_page(index as i32).map_err(|e| {
                    DocumentError::RenderError(format!("page {}: {}", index, e))
                })?;

                let matrix = Matrix::new_scale(scale, scale);
                let colorspace = Colorspace::device_rgb();
                let pixmap = page.to_pixmap(&matrix, &colorspace, false, true)?;

                let width = pixmap.width() as u32;
                let height = pixmap.height() as u32;
                let n = pixmap.n() as usize;
                let pixels = image_from_samples(pixmap.samples(), width, height, n)?;

                tracing::debug!(
                    document_id = %document.id(),
                    page = index,
                    width,
                    height,
                    dpi,
                    "Rasterized page"
                );

                images.push(PageImage::new(pixels, dpi));
            }
            Ok(images)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_dpi() {
        assert!(check_dpi(300).is_ok());
        assert!(check_dpi(MIN_DPI).is_ok());
        assert!(check_dpi(MAX_DPI).is_ok());
        assert!(matches!(check_dpi(0), Err(DocumentError::InvalidResolution(0))));
        assert!(check_dpi(MAX_DPI + 1).is_err());
    }

    #[test]
    fn test_short_document_is_rejected_before_rendering() {
        // Bytes are never parsed: the page count check comes first
        let doc = SourceDocument::new(Vec::new(), 1);
        let result = MuPdfRasterizer.render(&doc, PAGES_PER_DOCUMENT, DEFAULT_DPI);
        assert!(matches!(
            result,
            Err(DocumentError::InsufficientPages { required: 2, found: 1 })
        ));
    }
}
