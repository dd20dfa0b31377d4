//! Viewer transformations - zoom and pan.
//!
//! NaN, infinite and non-positive inputs are rejected with
//! `InvalidTransform` and leave the view unchanged.

use crate::canvas::RenderSurface;
use crate::constants::{DEFAULT_ZOOM, ZOOM_STEP};
use crate::error::{ViewerError, ViewerResult};
use crate::input::coords::{ViewTransform, is_usable_scale};
use crate::types::CanvasPoint;
use crate::viewer::Viewer;

impl<S: RenderSurface> Viewer<S> {
    pub fn zoom_in(&mut self) -> ViewerResult<bool> {
        self.zoom_at(ZOOM_STEP, CanvasPoint::default())
    }

    pub fn zoom_out(&mut self) -> ViewerResult<bool> {
        self.zoom_at(1.0 / ZOOM_STEP, CanvasPoint::default())
    }

    /// Zoom by `factor` keeping the screen point `anchor` fixed. Returns
    /// false when the zoom is already at its limit.
    pub fn zoom_at(&mut self, factor: f32, anchor: CanvasPoint) -> ViewerResult<bool> {
        self.ensure_open()?;
        if !is_usable_scale(factor) {
            return Err(ViewerError::InvalidTransform(format!("zoom factor {}", factor)));
        }
        if !anchor.x.is_finite() || !anchor.y.is_finite() {
            return Err(ViewerError::InvalidTransform(format!("zoom anchor {:?}", anchor)));
        }
        if !self.transform.zoom_around(factor, anchor) {
            return Ok(false);
        }
        self.refresh()?;
        Ok(true)
    }

    /// Set the zoom level, clamped to the supported range.
    pub fn set_zoom(&mut self, zoom: f32) -> ViewerResult<()> {
        self.ensure_open()?;
        if !is_usable_scale(zoom) {
            return Err(ViewerError::InvalidTransform(format!("zoom {}", zoom)));
        }
        self.transform = ViewTransform::new(zoom, self.transform.offset);
        self.refresh()
    }

    pub fn zoom_reset(&mut self) -> ViewerResult<()> {
        self.ensure_open()?;
        self.transform = ViewTransform::new(DEFAULT_ZOOM, (0.0, 0.0));
        self.refresh()
    }

    /// Pan by a screen-space delta.
    pub fn pan_by(&mut self, dx: f32, dy: f32) -> ViewerResult<()> {
        self.ensure_open()?;
        let offset = (self.transform.offset.0 + dx, self.transform.offset.1 + dy);
        if !offset.0.is_finite() || !offset.1.is_finite() {
            return Err(ViewerError::InvalidTransform(format!("pan by ({}, {})", dx, dy)));
        }
        self.transform.offset = offset;
        self.refresh()
    }

    fn ensure_open(&self) -> ViewerResult<()> {
        if self.state.is_closed() {
            return Err(self.not_ready());
        }
        Ok(())
    }
}
