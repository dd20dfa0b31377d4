//! Pure-Rust document engine backed by lopdf.
//!
//! Provides parsing, page geometry (MediaBox with inheritance) and vector
//! page content. It cannot rasterize; pair it with a `PageRasterizer` for
//! bitmaps.

use super::{DocumentEngine, LoadedDocument, PageContent, PageRender};
use crate::constants::FALLBACK_PAGE_SIZE;
use crate::error::{DocumentError, DocumentResult};
use crate::profile_scope;
use lopdf::content::Content;
use lopdf::{Document, Object, ObjectId};
use std::sync::Arc;
use tracing::{debug, warn};

/// Upper bound on Parent hops when resolving inherited page attributes
const MAX_INHERITANCE_DEPTH: usize = 32;

/// Page boundary in PDF user space (lower-left origin).
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct PageBox {
    pub llx: f32,
    pub lly: f32,
    pub urx: f32,
    pub ury: f32,
}

impl PageBox {
    pub fn width(&self) -> f32 {
        self.urx - self.llx
    }

    pub fn height(&self) -> f32 {
        self.ury - self.lly
    }

    fn fallback() -> Self {
        Self {
            llx: 0.0,
            lly: 0.0,
            urx: FALLBACK_PAGE_SIZE.0,
            ury: FALLBACK_PAGE_SIZE.1,
        }
    }
}

/// Read a page's MediaBox, following `/Parent` for inherited values.
pub(crate) fn page_box(doc: &Document, page_id: ObjectId) -> PageBox {
    let mut current = Some(page_id);
    for _ in 0..MAX_INHERITANCE_DEPTH {
        let Some(id) = current else { break };
        let Ok(dict) = doc.get_dictionary(id) else { break };

        if let Ok(media_box) = dict.get(b"MediaBox") {
            let media_box = match media_box {
                Object::Reference(r) => doc.get_object(*r).ok(),
                other => Some(other),
            };
            if let Some(rect) = media_box.and_then(|o| o.as_array().ok()).and_then(|a| rect_from_array(a)) {
                return rect;
            }
        }
        current = dict.get(b"Parent").and_then(Object::as_reference).ok();
    }
    warn!(?page_id, "page has no usable MediaBox, using US Letter");
    PageBox::fallback()
}

/// Parse a PDF rectangle array, normalizing corner order.
pub(crate) fn rect_from_array(values: &[Object]) -> Option<PageBox> {
    if values.len() != 4 {
        return None;
    }
    let mut numbers = [0.0f32; 4];
    for (slot, value) in numbers.iter_mut().zip(values) {
        *slot = value.as_float().ok()?;
    }
    Some(PageBox {
        llx: numbers[0].min(numbers[2]),
        lly: numbers[1].min(numbers[3]),
        urx: numbers[0].max(numbers[2]),
        ury: numbers[1].max(numbers[3]),
    })
}

/// Pages of a document in order, with their boxes.
pub(crate) fn ordered_pages(doc: &Document) -> Vec<(ObjectId, PageBox)> {
    // get_pages is keyed by 1-based page number, already sorted
    doc.get_pages()
        .into_values()
        .map(|id| (id, page_box(doc, id)))
        .collect()
}

/// Stateless lopdf-backed engine.
#[derive(Debug, Default, Clone, Copy)]
pub struct LopdfEngine;

impl LopdfEngine {
    pub fn new() -> Self {
        Self
    }

    pub(crate) fn load(bytes: &[u8]) -> DocumentResult<Document> {
        let doc = Document::load_mem(bytes).map_err(|e| DocumentError::Parse(e.to_string()))?;
        if doc.is_encrypted() {
            return Err(DocumentError::Encrypted);
        }
        Ok(doc)
    }
}

impl DocumentEngine for LopdfEngine {
    fn parse(&self, bytes: Vec<u8>) -> DocumentResult<Box<dyn LoadedDocument>> {
        profile_scope!("lopdf_parse");

        let doc = Self::load(&bytes)?;
        let pages = ordered_pages(&doc);
        if pages.is_empty() {
            return Err(DocumentError::NoPages);
        }
        debug!(pages = pages.len(), bytes = bytes.len(), "parsed document");

        Ok(Box::new(LopdfDocument { doc, bytes, pages }))
    }
}

/// A document parsed by [`LopdfEngine`].
pub struct LopdfDocument {
    doc: Document,
    bytes: Vec<u8>,
    pages: Vec<(ObjectId, PageBox)>,
}

impl LoadedDocument for LopdfDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_size(&self, index: usize) -> Option<(f32, f32)> {
        self.pages
            .get(index)
            .map(|(_, page_box)| (page_box.width(), page_box.height()))
    }

    fn render_page(&self, index: usize, scale: f32) -> DocumentResult<PageRender> {
        profile_scope!("lopdf_render_page");

        let (page_id, page_box) = self.pages.get(index).ok_or(DocumentError::PageIndex(index))?;
        let content = self.doc.get_page_content(*page_id)?;
        let operations = Content::decode(&content)?.operations.len();

        Ok(PageRender {
            index,
            size: (page_box.width(), page_box.height()),
            scale,
            content: PageContent::Vector {
                content: Arc::new(content),
                operations,
            },
        })
    }

    fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}
