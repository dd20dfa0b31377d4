//! Error types for the viewer, field model, document engines and export.
//!
//! Load failures surface as [`ViewerError::DocumentLoad`] so a host can show
//! a message. Failures drawing an already loaded document are
//! [`ViewerError::Render`]. Index and precondition errors fail fast with their
//! own variants.

use crate::types::{FieldId, FieldType};
use crate::viewer::ViewerState;
use thiserror::Error;

/// Errors returned by [`crate::Viewer`] operations.
#[derive(Error, Debug)]
pub enum ViewerError {
    /// The document source could not be read or parsed
    #[error("failed to load document: {0}")]
    DocumentLoad(#[from] DocumentError),

    /// Drawing a page of the loaded document failed
    #[error("failed to render page {index}: {source}")]
    Render {
        index: usize,
        #[source]
        source: DocumentError,
    },

    /// A page index outside `[0, page_count)`
    #[error("page index {index} out of range (document has {page_count} pages)")]
    OutOfRange { index: i64, page_count: usize },

    /// The operation needs a loaded document
    #[error("viewer is not ready (state: {state:?})")]
    NotReady { state: ViewerState },

    /// A zoom factor or pan delta that is not a usable number
    #[error("invalid view transform: {0}")]
    InvalidTransform(String),

    /// Authoring is disabled by the `read_only` option
    #[error("viewer is read-only")]
    ReadOnly,

    /// Field construction or lookup failed
    #[error(transparent)]
    Field(#[from] FieldError),

    /// Writing the field layout failed
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Result type alias for viewer operations
pub type ViewerResult<T> = Result<T, ViewerError>;

/// Errors raised by document engines.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// IO error while reading a document from disk
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Low-level PDF object model error
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// The bytes are not a parseable document
    #[error("parse error: {0}")]
    Parse(String),

    /// The document is encrypted and cannot be edited
    #[error("document is encrypted")]
    Encrypted,

    /// The document parsed but has no pages
    #[error("document has no pages")]
    NoPages,

    /// A page lookup inside the engine failed
    #[error("page {0} not found in document")]
    PageIndex(usize),

    /// Rasterization through pdfium failed
    #[error("rasterization failed: {0}")]
    Raster(String),
}

/// Result type alias for document engine operations
pub type DocumentResult<T> = Result<T, DocumentError>;

/// Precondition violations of the field model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FieldError {
    /// The canvas object cannot back a field of this type
    #[error("{field_type:?} fields cannot be backed by a {object}")]
    IncompatibleObject {
        field_type: FieldType,
        object: &'static str,
    },

    /// Placement geometry is not usable
    #[error("invalid placement: {0}")]
    InvalidPlacement(String),

    /// A field with this id is already tracked
    #[error("duplicate field id: {0}")]
    DuplicateId(FieldId),

    /// No tracked field has this id
    #[error("no field with id {0}")]
    NotFound(FieldId),
}

/// Errors raised while exporting or writing a field layout.
#[derive(Error, Debug)]
pub enum ExportError {
    /// JSON (de)serialization of a layout
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error while writing the output file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The document engine rejected the write
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// A layout entry refers to a page the document does not have
    #[error("layout entry {name} refers to missing page {page}")]
    MissingPage { name: String, page: usize },

    /// A layout entry whose rectangle has non-finite corners
    #[error("layout entry {name} has unusable geometry")]
    InvalidGeometry { name: String },
}

impl From<lopdf::Error> for ExportError {
    fn from(e: lopdf::Error) -> Self {
        ExportError::Document(DocumentError::Pdf(e))
    }
}
