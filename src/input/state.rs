//! Input state machine for pointer interactions.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> DraggingField   (pointer down on a field body)
//! Idle -> ResizingField   (pointer down on a field's resize handle)
//!
//! Any -> Idle             (pointer up - finalizes operation)
//! ```

use crate::types::{CanvasPoint, FieldId};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum InputState {
    /// No active pointer operation
    #[default]
    Idle,

    /// Moving a field with the pointer
    DraggingField {
        id: FieldId,
        /// Offset from the field's top-left to the pointer, in page points
        grab_offset: (f32, f32),
    },

    /// Resizing a field from its bottom-right handle
    ResizingField {
        id: FieldId,
        /// Field size when the resize started
        start_size: (f32, f32),
        /// Pointer position (screen) when the resize started
        start_pointer: CanvasPoint,
    },
}

impl InputState {
    pub fn is_idle(&self) -> bool {
        matches!(self, InputState::Idle)
    }

    pub fn dragging_field(&self) -> Option<&FieldId> {
        match self {
            InputState::DraggingField { id, .. } => Some(id),
            _ => None,
        }
    }

    pub fn resizing_field(&self) -> Option<&FieldId> {
        match self {
            InputState::ResizingField { id, .. } => Some(id),
            _ => None,
        }
    }

    /// The field the current operation acts on, if any
    pub fn active_field(&self) -> Option<&FieldId> {
        match self {
            InputState::Idle => None,
            InputState::DraggingField { id, .. } | InputState::ResizingField { id, .. } => Some(id),
        }
    }

    pub fn reset(&mut self) {
        *self = InputState::Idle;
    }
}
