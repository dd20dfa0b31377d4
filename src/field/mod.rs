//! Field model: construction, validation and the tracked-fields collection.
//!
//! A [`PdfField`] ties a logical form field to the canvas object drawing it.
//! Construction checks the type/object precondition up front so rendering
//! code never sees an `Input` field backed by a bare point.

mod tracked;

pub use tracked::TrackedFields;

use crate::constants::{DEFAULT_FONT_SIZE, MAX_FONT_SIZE, MIN_FONT_SIZE};
use crate::error::FieldError;
use crate::types::{CanvasObject, FieldId, FieldType, Placement};
use serde::{Deserialize, Serialize};

/// Check that `object` can back a field of `field_type`.
pub fn validate_object(field_type: FieldType, object: &CanvasObject) -> Result<(), FieldError> {
    if field_type.accepts(object) {
        Ok(())
    } else {
        Err(FieldError::IncompatibleObject {
            field_type,
            object: object.kind_name(),
        })
    }
}

/// One interactive field overlaid on a document page.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PdfField {
    /// Unique within the owning viewer
    pub id: FieldId,
    /// Immutable after creation
    pub field_type: FieldType,
    /// The canvas object drawing this field (non-owning)
    pub object: CanvasObject,
    /// Page and rectangle in page points
    pub placement: Placement,
    /// Partial field name written as `/T`; defaults to the id
    pub name: String,
    /// Default text value
    pub value: String,
    /// Font size in points
    pub font_size: f32,
}

impl PdfField {
    pub fn new(
        id: FieldId,
        field_type: FieldType,
        object: CanvasObject,
        placement: Placement,
    ) -> Result<Self, FieldError> {
        validate_object(field_type, &object)?;
        placement.validate()?;

        Ok(Self {
            name: id.to_string(),
            id,
            field_type,
            object,
            placement,
            value: String::new(),
            font_size: DEFAULT_FONT_SIZE,
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn with_font_size(mut self, font_size: f32) -> Self {
        self.font_size = font_size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
        self
    }

    pub fn page(&self) -> usize {
        self.placement.page
    }
}
