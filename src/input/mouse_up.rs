//! Pointer up handling - finalize drag and resize.

use crate::canvas::RenderSurface;
use crate::types::FieldId;
use crate::viewer::Viewer;
use tracing::debug;

impl<S: RenderSurface> Viewer<S> {
    /// End the active operation, returning the field it acted on.
    pub fn pointer_up(&mut self) -> Option<FieldId> {
        let finished = self.input.active_field().cloned();
        if let Some(id) = &finished {
            let placement = self.fields.get(id).map(|field| field.placement);
            debug!(%id, ?placement, "pointer operation finished");
        }
        self.input.reset();
        finished
    }
}
