//! Document engine capability and its implementations.
//!
//! The viewer never touches a PDF library directly; it goes through these
//! traits so tests can substitute an in-memory document:
//!
//! - `DocumentEngine` - parse bytes into a `LoadedDocument`
//! - `LoadedDocument` - page count, page geometry, page content
//! - `FormWriter` - write/read AcroForm text fields
//! - `PageRasterizer` - turn a page into a bitmap
//!
//! Implementations:
//!
//! - `lopdf_engine` - pure-Rust parsing and page content via lopdf
//! - `forms` - AcroForm field writing/reading for `LopdfEngine`
//! - `raster` - pdfium-backed `PdfiumRasterizer`
//! - `pdfium_loader` - shared PDFium library loading logic

mod forms;
mod lopdf_engine;
mod pdfium_loader;
mod raster;

pub use lopdf_engine::{LopdfDocument, LopdfEngine};
pub use pdfium_loader::PdfiumLoader;
pub use raster::PdfiumRasterizer;

use crate::error::DocumentResult;
use crate::export::FieldLayoutEntry;
use crate::types::FieldType;
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Parses raw bytes into a paginated document.
///
/// Engines are shared with background load workers, hence `Send + Sync`.
pub trait DocumentEngine: Send + Sync {
    fn parse(&self, bytes: Vec<u8>) -> DocumentResult<Box<dyn LoadedDocument>>;
}

/// A parsed, renderable document.
pub trait LoadedDocument: Send {
    fn page_count(&self) -> usize;

    /// Page size in points (width, height), `None` for a bad index
    fn page_size(&self, index: usize) -> Option<(f32, f32)>;

    /// Produce drawable content for a page at the given scale.
    fn render_page(&self, index: usize, scale: f32) -> DocumentResult<PageRender>;

    /// The raw bytes the document was parsed from
    fn bytes(&self) -> &[u8];
}

/// Writes and reads named form fields.
pub trait FormWriter {
    /// Return a copy of `bytes` with one text field per layout entry.
    fn write_fields(&self, bytes: &[u8], layout: &[FieldLayoutEntry]) -> DocumentResult<Vec<u8>>;

    /// List the form fields a document carries.
    fn read_fields(&self, bytes: &[u8]) -> DocumentResult<Vec<FormFieldInfo>>;
}

/// Rasterizes a page of a document held as bytes.
pub trait PageRasterizer {
    fn rasterize(&self, bytes: &[u8], index: usize, scale: f32) -> DocumentResult<RgbaImage>;
}

/// Page content ready to be painted.
#[derive(Clone, Debug)]
pub enum PageContent {
    /// Decoded content stream plus its operation count
    Vector { content: Arc<Vec<u8>>, operations: usize },
    /// Bitmap at `PageRender::scale`
    Raster(Arc<RgbaImage>),
}

#[derive(Clone, Debug)]
pub struct PageRender {
    pub index: usize,
    /// Page size in points
    pub size: (f32, f32),
    pub scale: f32,
    pub content: PageContent,
}

/// A form field as reported by a document engine, in page space
/// (top-left origin, points).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FormFieldInfo {
    /// Fully qualified field name
    pub name: String,
    /// `None` for field kinds this crate does not author
    pub field_type: Option<FieldType>,
    pub page: Option<usize>,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub value: String,
}
