//! Pointer move handling - field dragging and resizing.
//!
//! ## Performance Notes
//!
//! Pointer move fires on every frame of a drag. Idle moves exit before any
//! coordinate math; active moves touch one field and one drawable.
//!
//! Drags and resizes stop at the page edge instead of failing.
//!
//! Enable profiling with `cargo build --features profiling` to see timing.

use crate::canvas::RenderSurface;
use crate::constants::MIN_FIELD_SIZE;
use crate::error::ViewerResult;
use crate::input::coords::CoordinateConverter;
use crate::input::state::InputState;
use crate::profile_scope;
use crate::types::{CanvasPoint, Placement};
use crate::viewer::Viewer;

impl<S: RenderSurface> Viewer<S> {
    /// Continue the active drag or resize. Returns whether a field changed.
    pub fn pointer_move(&mut self, screen: CanvasPoint) -> ViewerResult<bool> {
        profile_scope!("pointer_move");

        match self.input.clone() {
            InputState::Idle => Ok(false),

            InputState::DraggingField { id, grab_offset } => {
                let Some(current) = self.fields.get(&id).map(|f| f.placement) else {
                    self.input.reset();
                    return Ok(false);
                };
                let page_size = self.page_bounds(current.page)?;
                let point = CoordinateConverter::screen_to_page(screen, &self.transform);
                let target = Placement {
                    position: (point.x - grab_offset.0, point.y - grab_offset.1),
                    ..current
                };
                self.move_field(&id, target.clamped_to(page_size).position)?;
                Ok(true)
            }

            InputState::ResizingField {
                id,
                start_size,
                start_pointer,
            } => {
                let (dx, dy) = CoordinateConverter::delta_screen_to_page(
                    (screen.x - start_pointer.x, screen.y - start_pointer.y),
                    self.transform.zoom,
                );
                let Some(current) = self.fields.get(&id).map(|f| f.placement) else {
                    self.input.reset();
                    return Ok(false);
                };
                let page_size = self.page_bounds(current.page)?;
                let room = (
                    page_size.0 - current.position.0,
                    page_size.1 - current.position.1,
                );
                let size = (
                    (start_size.0 + dx).max(MIN_FIELD_SIZE).min(room.0),
                    (start_size.1 + dy).max(MIN_FIELD_SIZE).min(room.1),
                );
                self.resize_field(&id, size)?;
                Ok(true)
            }
        }
    }
}
