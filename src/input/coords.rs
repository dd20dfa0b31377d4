//! Coordinate conversion between screen space and page space.
//!
//! Screen coordinates are relative to the viewer's top-left corner; page
//! coordinates are PDF points with the origin at the page's top-left.

use crate::constants::{DEFAULT_ZOOM, MAX_ZOOM, MIN_ZOOM};
use crate::types::CanvasPoint;

/// Zoom and pan applied when painting a page.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    pub zoom: f32,
    /// Pan offset in screen pixels
    pub offset: (f32, f32),
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            zoom: DEFAULT_ZOOM,
            offset: (0.0, 0.0),
        }
    }
}

/// Whether `value` can serve as a zoom level or zoom factor.
pub fn is_usable_scale(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

impl ViewTransform {
    /// Clamp `zoom` into range. Unusable zooms fall back to the default and
    /// non-finite offsets to the origin.
    pub fn new(zoom: f32, offset: (f32, f32)) -> Self {
        let zoom = if is_usable_scale(zoom) { zoom } else { DEFAULT_ZOOM };
        let offset = if offset.0.is_finite() && offset.1.is_finite() {
            offset
        } else {
            (0.0, 0.0)
        };
        Self {
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            offset,
        }
    }

    /// Zoom by `factor` keeping the screen point `anchor` fixed.
    /// Returns false when the zoom is already at its limit or the factor or
    /// anchor is unusable.
    pub fn zoom_around(&mut self, factor: f32, anchor: CanvasPoint) -> bool {
        if !is_usable_scale(factor) || !anchor.x.is_finite() || !anchor.y.is_finite() {
            return false;
        }
        let new_zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        if (new_zoom - self.zoom).abs() < f32::EPSILON {
            return false;
        }
        let page_anchor = CoordinateConverter::screen_to_page(anchor, self);
        self.zoom = new_zoom;
        self.offset = (
            anchor.x - page_anchor.x * new_zoom,
            anchor.y - page_anchor.y * new_zoom,
        );
        true
    }
}

pub struct CoordinateConverter;

impl CoordinateConverter {
    #[inline]
    pub fn screen_to_page(screen: CanvasPoint, transform: &ViewTransform) -> CanvasPoint {
        CanvasPoint::new(
            (screen.x - transform.offset.0) / transform.zoom,
            (screen.y - transform.offset.1) / transform.zoom,
        )
    }

    #[inline]
    pub fn page_to_screen(page: CanvasPoint, transform: &ViewTransform) -> CanvasPoint {
        CanvasPoint::new(
            page.x * transform.zoom + transform.offset.0,
            page.y * transform.zoom + transform.offset.1,
        )
    }

    /// Convert a screen delta to a page delta (for drag operations)
    #[inline]
    pub fn delta_screen_to_page(delta: (f32, f32), zoom: f32) -> (f32, f32) {
        (delta.0 / zoom, delta.1 / zoom)
    }
}
