//! Rendering engine capability.
//!
//! The viewer talks to its canvas only through [`RenderSurface`], so a host
//! can plug in a real GPU surface or a recording fake. [`SceneCanvas`] is the
//! crate's own in-memory surface: it keeps drawables in z-order, indexes them
//! per page for hit testing and records the page currently drawn.

mod scene;

pub use scene::{FrameContent, PageFrame, SceneCanvas};

use crate::document::PageRender;
use crate::input::coords::ViewTransform;
use crate::types::{CanvasPoint, DrawableKind, DrawableRef, ObjectHandle};

/// Everything a surface needs to draw one drawable.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawableSpec {
    pub kind: DrawableKind,
    /// Page the drawable belongs to
    pub page: usize,
    /// Top-left corner in page points
    pub position: (f32, f32),
    /// Size in page points
    pub size: (f32, f32),
    /// Text content for text boxes
    pub text: String,
    pub font_size: f32,
}

/// A 2D canvas that owns drawables and paints document pages.
pub trait RenderSurface {
    /// Create a drawable and hand back a non-owning reference to it.
    fn add_drawable(&mut self, spec: DrawableSpec) -> DrawableRef;

    /// Replace the geometry/content of an existing drawable.
    /// Returns false when the handle is unknown.
    fn update_drawable(&mut self, handle: ObjectHandle, spec: DrawableSpec) -> bool;

    /// Remove a drawable. Returns false when the handle is unknown.
    fn remove_drawable(&mut self, handle: ObjectHandle) -> bool;

    fn contains(&self, handle: ObjectHandle) -> bool;

    /// Paint a rendered page under the drawables at the given view transform.
    fn draw_page(&mut self, page: &PageRender, transform: ViewTransform);

    /// Topmost drawable on `page` containing `point` (page coordinates).
    fn hit_test(&self, page: usize, point: CanvasPoint) -> Option<ObjectHandle>;

    /// Drop every drawable and the current page.
    fn clear(&mut self);
}
