//! Page rasterization through PDFium.
//!
//! `Pdfium` is not `Send`, so a rasterizer lives on the thread that owns the
//! viewer and re-opens the document from its bytes for each page.

use super::PageRasterizer;
use super::pdfium_loader::PdfiumLoader;
use crate::constants::PDF_POINTS_PER_INCH;
use crate::error::{DocumentError, DocumentResult};
use crate::profile_scope;
use image::RgbaImage;
use pdfium_render::prelude::*;
use tracing::trace;

/// Largest bitmap edge, in pixels, a single render may produce
const MAX_RENDER_DIMENSION: f32 = 8192.0;

pub struct PdfiumRasterizer {
    pdfium: Pdfium,
}

impl PdfiumRasterizer {
    /// Bind the PDFium library via [`PdfiumLoader`].
    pub fn new() -> DocumentResult<Self> {
        Ok(Self::from_pdfium(PdfiumLoader::load()?))
    }

    pub fn from_pdfium(pdfium: Pdfium) -> Self {
        Self { pdfium }
    }

    /// Pixel size of a page of `points` size at `scale`, clamped to the render limit.
    fn target_size(points: (f32, f32), scale: f32) -> (i32, i32) {
        let scale = if scale.is_finite() && scale > 0.0 { scale } else { 1.0 };
        let width = (points.0 * scale).clamp(1.0, MAX_RENDER_DIMENSION);
        let height = (points.1 * scale).clamp(1.0, MAX_RENDER_DIMENSION);
        (width.round() as i32, height.round() as i32)
    }

    /// Scale factor that renders at `dpi`.
    pub fn scale_for_dpi(dpi: f32) -> f32 {
        dpi / PDF_POINTS_PER_INCH
    }
}

impl PageRasterizer for PdfiumRasterizer {
    fn rasterize(&self, bytes: &[u8], index: usize, scale: f32) -> DocumentResult<RgbaImage> {
        profile_scope!("pdfium_rasterize");

        let document = self
            .pdfium
            .load_pdf_from_byte_slice(bytes, None)
            .map_err(|e| DocumentError::Raster(format!("{:?}", e)))?;
        let page_index = PdfPageIndex::try_from(index).map_err(|_| DocumentError::PageIndex(index))?;
        let page = document
            .pages()
            .get(page_index)
            .map_err(|_| DocumentError::PageIndex(index))?;

        let (width, height) = Self::target_size((page.width().value, page.height().value), scale);
        let bitmap = page
            .render_with_config(
                &PdfRenderConfig::new()
                    .set_target_width(width)
                    .set_target_height(height)
                    .render_form_data(true)
                    .render_annotations(true),
            )
            .map_err(|e| DocumentError::Raster(format!("{:?}", e)))?;

        trace!(index, width, height, "rasterized page");
        Ok(bitmap.as_image().to_rgba8())
    }
}
