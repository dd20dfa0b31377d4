//! Field layout export.
//!
//! A layout is the flat, serializable view of the tracked fields that a
//! [`FormWriter`] turns into AcroForm fields. Coordinates stay in page space
//! (points, top-left origin); the writer owns the flip into PDF user space.

use crate::document::FormWriter;
use crate::error::{DocumentError, ExportError};
use crate::field::PdfField;
use crate::types::{FieldId, FieldType};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::info;

/// One field as handed to the document writer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldLayoutEntry {
    pub id: FieldId,
    pub name: String,
    pub field_type: FieldType,
    pub page: usize,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub value: String,
    pub font_size: f32,
}

impl From<&PdfField> for FieldLayoutEntry {
    fn from(field: &PdfField) -> Self {
        let placement = &field.placement;
        Self {
            id: field.id.clone(),
            name: field.name.clone(),
            field_type: field.field_type,
            page: placement.page,
            x: placement.position.0,
            y: placement.position.1,
            width: placement.size.0,
            height: placement.size.1,
            value: field.value.clone(),
            font_size: field.font_size,
        }
    }
}

impl FieldLayoutEntry {
    /// Both corners of the rectangle are finite numbers.
    pub fn has_finite_rect(&self) -> bool {
        [self.x, self.y, self.x + self.width, self.y + self.height]
            .iter()
            .all(|v| v.is_finite())
    }
}

pub fn layout_to_json(layout: &[FieldLayoutEntry]) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(layout)?)
}

pub fn layout_from_json(json: &str) -> Result<Vec<FieldLayoutEntry>, ExportError> {
    Ok(serde_json::from_str(json)?)
}

/// Write `layout` into a copy of `bytes` through `writer`.
///
/// An entry pointing past the last page is reported as
/// [`ExportError::MissingPage`] naming the offending field. Entries whose
/// corners are not finite are refused before the writer sees them.
pub fn write_fields(
    writer: &dyn FormWriter,
    bytes: &[u8],
    layout: &[FieldLayoutEntry],
) -> Result<Vec<u8>, ExportError> {
    if let Some(entry) = layout.iter().find(|entry| !entry.has_finite_rect()) {
        return Err(ExportError::InvalidGeometry {
            name: entry.name.clone(),
        });
    }

    writer.write_fields(bytes, layout).map_err(|e| match e {
        DocumentError::PageIndex(page) => match layout.iter().find(|entry| entry.page == page) {
            Some(entry) => ExportError::MissingPage {
                name: entry.name.clone(),
                page,
            },
            None => ExportError::Document(DocumentError::PageIndex(page)),
        },
        other => ExportError::Document(other),
    })
}

/// Write `bytes` to `path` via a temp file in the same directory, so readers
/// never observe a partially written document.
pub fn write_pdf_atomically(path: &Path, bytes: &[u8]) -> Result<(), ExportError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(bytes)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| e.error)?;

    info!(path = %path.display(), bytes = bytes.len(), "wrote document");
    Ok(())
}
