//! In-memory scene canvas.
//!
//! ## Performance Notes
//!
//! Hit testing runs on every pointer down. Drawables are indexed per page
//! in an R-tree keyed by z-order, so a point query only touches nearby boxes.
//! Page bitmaps are shared through `Arc` so a host can hold on to the frame
//! it painted without copying pixels.

use super::{DrawableSpec, RenderSurface};
use crate::document::{PageContent, PageRender};
use crate::input::coords::ViewTransform;
use crate::profile_scope;
use crate::spatial_index::{Slot, SpatialIndex};
use crate::types::{CanvasPoint, DrawableRef, ObjectHandle};
use image::RgbaImage;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::trace;

/// The page currently painted on the canvas.
#[derive(Clone, Debug, PartialEq)]
pub struct PageFrame {
    pub index: usize,
    /// Page size in points
    pub size: (f32, f32),
    /// Scale the page content was produced at
    pub scale: f32,
    pub transform: ViewTransform,
    pub content: FrameContent,
}

/// What the page frame paints under the drawables.
#[derive(Clone, Debug, PartialEq)]
pub enum FrameContent {
    /// Rendered pixels at `PageFrame::scale`
    Bitmap(Arc<RgbaImage>),
    /// Decoded content stream; painted as a blank page by hosts without a
    /// vector backend
    Vector { content: Arc<Vec<u8>>, operations: usize },
}

impl PageFrame {
    pub fn bitmap(&self) -> Option<&Arc<RgbaImage>> {
        match &self.content {
            FrameContent::Bitmap(image) => Some(image),
            FrameContent::Vector { .. } => None,
        }
    }

    pub fn is_rasterized(&self) -> bool {
        self.bitmap().is_some()
    }
}

/// Canvas keeping drawables in memory, in creation (z) order.
#[derive(Default)]
pub struct SceneCanvas {
    drawables: BTreeMap<ObjectHandle, DrawableSpec>,
    index: SpatialIndex,
    next_handle: u64,
    current_page: Option<PageFrame>,
    draw_count: usize,
}

impl SceneCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drawable(&self, handle: ObjectHandle) -> Option<&DrawableSpec> {
        self.drawables.get(&handle)
    }

    /// Drawables in z-order (back to front)
    pub fn drawables(&self) -> impl Iterator<Item = (ObjectHandle, &DrawableSpec)> {
        self.drawables.iter().map(|(h, d)| (*h, d))
    }

    /// Drawables visible on the current page
    pub fn visible_drawables(&self) -> Vec<(ObjectHandle, &DrawableSpec)> {
        let Some(frame) = &self.current_page else {
            return Vec::new();
        };
        self.drawables()
            .filter(|(_, d)| d.page == frame.index)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.drawables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drawables.is_empty()
    }

    pub fn current_page(&self) -> Option<&PageFrame> {
        self.current_page.as_ref()
    }

    /// Number of page draws since creation
    pub fn draw_count(&self) -> usize {
        self.draw_count
    }

    /// Index `handle`; creation order doubles as stacking order.
    fn place(&mut self, handle: ObjectHandle, spec: &DrawableSpec) {
        let slot = Slot { handle, z: handle.0 };
        self.index.insert(slot, spec.page, spec.position, spec.size);
    }
}

impl RenderSurface for SceneCanvas {
    fn add_drawable(&mut self, spec: DrawableSpec) -> DrawableRef {
        let handle = ObjectHandle(self.next_handle);
        self.next_handle += 1;

        let kind = spec.kind;
        self.place(handle, &spec);
        self.drawables.insert(handle, spec);
        trace!(handle = handle.0, "drawable added");

        DrawableRef { handle, kind }
    }

    fn update_drawable(&mut self, handle: ObjectHandle, spec: DrawableSpec) -> bool {
        if !self.drawables.contains_key(&handle) {
            return false;
        }
        self.place(handle, &spec);
        self.drawables.insert(handle, spec);
        true
    }

    fn remove_drawable(&mut self, handle: ObjectHandle) -> bool {
        if self.drawables.remove(&handle).is_none() {
            return false;
        }
        self.index.remove(handle);
        trace!(handle = handle.0, "drawable removed");
        true
    }

    fn contains(&self, handle: ObjectHandle) -> bool {
        self.drawables.contains_key(&handle)
    }

    fn draw_page(&mut self, page: &PageRender, transform: ViewTransform) {
        profile_scope!("scene_draw_page");

        let content = match &page.content {
            PageContent::Raster(image) => FrameContent::Bitmap(Arc::clone(image)),
            PageContent::Vector { content, operations } => FrameContent::Vector {
                content: Arc::clone(content),
                operations: *operations,
            },
        };
        self.current_page = Some(PageFrame {
            index: page.index,
            size: page.size,
            scale: page.scale,
            transform,
            content,
        });
        self.draw_count += 1;
    }

    fn hit_test(&self, page: usize, point: CanvasPoint) -> Option<ObjectHandle> {
        profile_scope!("scene_hit_test");

        self.index.topmost_at(page, point)
    }

    fn clear(&mut self) {
        self.drawables.clear();
        self.index.clear();
        self.current_page = None;
    }
}
