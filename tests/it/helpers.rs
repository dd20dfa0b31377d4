//! Test helpers and builders for reducing boilerplate in tests.
//!
//! This module provides:
//! - `TestPdfBuilder` - Real PDF bytes built with lopdf
//! - `FakeEngine` - In-memory document engine driven by a tiny text format
//! - `PanickingEngine` - Engine whose parser panics
//! - `SolidRasterizer` / `FailingRasterizer` - Stand-ins for pdfium
//! - `TestViewerBuilder` - Builder for loaded viewers over a `SceneCanvas`
//! - `wait_for_completion()` - Poll background loads until a condition holds

use fieldboard::document::{PageContent, PageRender};
use fieldboard::error::{DocumentError, DocumentResult};
use fieldboard::types::Placement;
use fieldboard::{
    DocumentEngine, DocumentSource, LoadedDocument, LopdfEngine, PageRasterizer, SceneCanvas, Viewer,
    ViewerOptions,
};
use image::{Rgba, RgbaImage};
use lopdf::{Document, Object, dictionary};
use std::sync::Arc;
use std::time::{Duration, Instant};

// ============================================================================
// TestPdfBuilder - Real PDF documents
// ============================================================================

/// Builds a minimal PDF with one content stream per page.
pub struct TestPdfBuilder {
    pages: Vec<(f32, f32)>,
}

impl Default for TestPdfBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestPdfBuilder {
    pub fn new() -> Self {
        Self { pages: Vec::new() }
    }

    /// Add a page of the given size in points.
    pub fn with_page(mut self, width: f32, height: f32) -> Self {
        self.pages.push((width, height));
        self
    }

    /// Add `count` US Letter pages.
    pub fn with_letter_pages(mut self, count: usize) -> Self {
        self.pages.extend(std::iter::repeat_n((612.0, 792.0), count));
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();

        let kids: Vec<Object> = self
            .pages
            .iter()
            .enumerate()
            .map(|(index, (width, height))| {
                let text = format!("BT /F1 12 Tf 72 {} Td (Page {}) Tj ET", height - 72.0, index + 1);
                let content_id = doc.add_object(lopdf::Stream::new(dictionary! {}, text.into_bytes()));
                let page_id = doc.add_object(dictionary! {
                    "Type" => "Page",
                    "Parent" => pages_id,
                    "MediaBox" => vec![0.into(), 0.into(), Object::Real(*width), Object::Real(*height)],
                    "Contents" => content_id,
                });
                Object::Reference(page_id)
            })
            .collect();

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer).expect("serialize test pdf");
        buffer
    }
}

/// A PDF with `count` US Letter pages.
pub fn letter_pdf(count: usize) -> Vec<u8> {
    TestPdfBuilder::new().with_letter_pages(count).build()
}

// ============================================================================
// FakeEngine - In-memory documents
// ============================================================================

/// Source bytes for [`FakeEngine`]: `pages=N` with an optional `;delay_ms=M`
/// and `;fail_render=1`.
pub fn fake_source(pages: usize, delay_ms: u64) -> DocumentSource {
    DocumentSource::Bytes(format!("pages={};delay_ms={}", pages, delay_ms).into_bytes())
}

/// Engine that "parses" `pages=N;delay_ms=M`, sleeping for the delay first.
pub struct FakeEngine;

impl DocumentEngine for FakeEngine {
    fn parse(&self, bytes: Vec<u8>) -> DocumentResult<Box<dyn LoadedDocument>> {
        let text = String::from_utf8(bytes.clone()).map_err(|e| DocumentError::Parse(e.to_string()))?;
        let mut pages = None;
        let mut delay_ms = 0;
        let mut fail_render = false;
        for part in text.split(';') {
            match part.split_once('=') {
                Some(("pages", n)) => pages = n.parse::<usize>().ok(),
                Some(("delay_ms", n)) => delay_ms = n.parse::<u64>().unwrap_or(0),
                Some(("fail_render", flag)) => fail_render = flag == "1",
                _ => return Err(DocumentError::Parse(format!("unexpected token {:?}", part))),
            }
        }
        let pages = pages.ok_or_else(|| DocumentError::Parse("missing page count".to_string()))?;
        if pages == 0 {
            return Err(DocumentError::NoPages);
        }

        std::thread::sleep(Duration::from_millis(delay_ms));
        Ok(Box::new(FakeDocument {
            pages,
            bytes,
            fail_render,
        }))
    }
}

pub struct FakeDocument {
    pages: usize,
    bytes: Vec<u8>,
    fail_render: bool,
}

impl LoadedDocument for FakeDocument {
    fn page_count(&self) -> usize {
        self.pages
    }

    fn page_size(&self, index: usize) -> Option<(f32, f32)> {
        (index < self.pages).then_some((612.0, 792.0))
    }

    fn render_page(&self, index: usize, scale: f32) -> DocumentResult<PageRender> {
        if index >= self.pages {
            return Err(DocumentError::PageIndex(index));
        }
        if self.fail_render {
            return Err(DocumentError::Parse(format!("content stream of page {} is corrupt", index)));
        }
        Ok(PageRender {
            index,
            size: (612.0, 792.0),
            scale,
            content: PageContent::Vector {
                content: Arc::new(Vec::new()),
                operations: 0,
            },
        })
    }

    fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Engine whose parser always panics, like a library choking on bad input.
pub struct PanickingEngine;

impl DocumentEngine for PanickingEngine {
    fn parse(&self, _bytes: Vec<u8>) -> DocumentResult<Box<dyn LoadedDocument>> {
        panic!("malformed cross-reference stream");
    }
}

// ============================================================================
// Rasterizers
// ============================================================================

/// Paints every page one solid color at `scale` pixels per point.
pub struct SolidRasterizer {
    pub color: Rgba<u8>,
}

impl PageRasterizer for SolidRasterizer {
    fn rasterize(&self, _bytes: &[u8], _index: usize, scale: f32) -> DocumentResult<RgbaImage> {
        let width = (612.0 * scale).round() as u32;
        let height = (792.0 * scale).round() as u32;
        Ok(RgbaImage::from_pixel(width, height, self.color))
    }
}

pub struct FailingRasterizer;

impl PageRasterizer for FailingRasterizer {
    fn rasterize(&self, _bytes: &[u8], _index: usize, _scale: f32) -> DocumentResult<RgbaImage> {
        Err(DocumentError::Raster("pdfium library not found".to_string()))
    }
}

// ============================================================================
// TestViewerBuilder - Loaded viewers
// ============================================================================

/// Builder for viewers over a [`SceneCanvas`].
///
/// # Example
/// ```ignore
/// let viewer = TestViewerBuilder::new()
///     .with_pages(3)
///     .read_only()
///     .build();
/// ```
pub struct TestViewerBuilder {
    pages: usize,
    options: ViewerOptions,
    lopdf: bool,
    rasterizer: Option<Box<dyn PageRasterizer>>,
}

impl Default for TestViewerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestViewerBuilder {
    pub fn new() -> Self {
        Self {
            pages: 1,
            options: ViewerOptions::default(),
            lopdf: false,
            rasterizer: None,
        }
    }

    pub fn with_pages(mut self, pages: usize) -> Self {
        self.pages = pages;
        self
    }

    pub fn read_only(mut self) -> Self {
        self.options.read_only = true;
        self
    }

    pub fn with_initial_page(mut self, page: usize) -> Self {
        self.options.initial_page = page;
        self
    }

    /// Load a real PDF through [`LopdfEngine`] instead of the fake engine.
    pub fn with_lopdf(mut self) -> Self {
        self.lopdf = true;
        self
    }

    pub fn with_rasterizer(mut self, rasterizer: impl PageRasterizer + 'static) -> Self {
        self.rasterizer = Some(Box::new(rasterizer));
        self
    }

    /// Build without loading anything.
    pub fn build_empty(self) -> Viewer<SceneCanvas> {
        let engine: Arc<dyn DocumentEngine> = if self.lopdf {
            Arc::new(LopdfEngine::new())
        } else {
            Arc::new(FakeEngine)
        };
        let viewer = Viewer::new(engine, SceneCanvas::new(), self.options);
        match self.rasterizer {
            Some(rasterizer) => viewer.with_rasterizer(rasterizer),
            None => viewer,
        }
    }

    pub fn build(self) -> Viewer<SceneCanvas> {
        let source = if self.lopdf {
            DocumentSource::Bytes(letter_pdf(self.pages))
        } else {
            fake_source(self.pages, 0)
        };
        let mut viewer = self.build_empty();
        viewer.load(source).expect("load test document");
        viewer
    }
}

/// A default-sized placement on `page`.
pub fn placement(page: usize, x: f32, y: f32) -> Placement {
    Placement::with_default_size(page, (x, y))
}

/// Poll background loads until `condition` holds or `timeout` passes.
pub fn wait_for_completion<F>(viewer: &mut Viewer<SceneCanvas>, mut condition: F, timeout: Duration) -> bool
where
    F: FnMut(&Viewer<SceneCanvas>) -> bool,
{
    let start = Instant::now();
    while start.elapsed() < timeout {
        viewer.poll_load().expect("poll load");
        if condition(viewer) {
            return true;
        }
        std::thread::sleep(Duration::from_millis(2));
    }
    viewer.poll_load().expect("poll load");
    condition(viewer)
}
