//! Pointer down handling - field selection, drag/resize start.

use crate::canvas::RenderSurface;
use crate::constants::RESIZE_HANDLE_SIZE;
use crate::error::ViewerResult;
use crate::input::coords::CoordinateConverter;
use crate::input::state::InputState;
use crate::profile_scope;
use crate::types::{CanvasPoint, FieldId};
use crate::viewer::Viewer;
use tracing::debug;

impl<S: RenderSurface> Viewer<S> {
    /// Select the topmost field under `screen` on the current page.
    ///
    /// Pressing within the resize handle at a field's bottom-right corner
    /// starts a resize, anywhere else on the field a drag. Read-only viewers
    /// only select. Returns the selected field, `None` when the press hit
    /// empty page.
    pub fn pointer_down(&mut self, screen: CanvasPoint) -> ViewerResult<Option<FieldId>> {
        profile_scope!("pointer_down");

        self.ensure_ready()?;
        self.input.reset();
        let Some(page) = self.current_page else {
            return Ok(None);
        };
        let point = CoordinateConverter::screen_to_page(screen, &self.transform);

        if let Some(id) = self.resize_handle_at(page, point) {
            self.selected = Some(id.clone());
            if !self.is_read_only()
                && let Some(field) = self.fields.get(&id)
            {
                debug!(%id, "resize started");
                self.input = InputState::ResizingField {
                    id: id.clone(),
                    start_size: field.placement.size,
                    start_pointer: screen,
                };
            }
            return Ok(Some(id));
        }

        let hit = self.field_at_page_point(page, point).map(|field| {
            let grab_offset = (
                point.x - field.placement.position.0,
                point.y - field.placement.position.1,
            );
            (field.id.clone(), grab_offset)
        });

        match hit {
            Some((id, grab_offset)) => {
                self.selected = Some(id.clone());
                if !self.is_read_only() {
                    debug!(%id, "drag started");
                    self.input = InputState::DraggingField {
                        id: id.clone(),
                        grab_offset,
                    };
                }
                Ok(Some(id))
            }
            None => {
                self.selected = None;
                Ok(None)
            }
        }
    }

    /// The field drawn under a screen point on the current page.
    pub fn field_at(&self, screen: CanvasPoint) -> Option<&crate::field::PdfField> {
        let page = self.current_page?;
        let point = CoordinateConverter::screen_to_page(screen, &self.transform);
        self.field_at_page_point(page, point)
    }

    fn field_at_page_point(&self, page: usize, point: CanvasPoint) -> Option<&crate::field::PdfField> {
        let handle = self.surface.hit_test(page, point)?;
        self.fields
            .on_page(page)
            .find(|field| field.object.handle() == Some(handle))
    }

    /// Topmost field on `page` whose resize handle contains `point`.
    fn resize_handle_at(&self, page: usize, point: CanvasPoint) -> Option<FieldId> {
        // Handle size is constant on screen
        let tolerance = RESIZE_HANDLE_SIZE / self.transform.zoom;
        self.fields
            .on_page(page)
            .filter(|field| {
                let (right, bottom) = field.placement.bottom_right();
                (point.x - right).abs() <= tolerance && (point.y - bottom).abs() <= tolerance
            })
            .last()
            .map(|field| field.id.clone())
    }
}
