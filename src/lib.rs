//! Fieldboard: a PDF form-field authoring viewer.
//!
//! The [`Viewer`] loads a document through an injected [`DocumentEngine`],
//! draws its pages onto an injected [`RenderSurface`] and tracks the text
//! fields the user places on top of them. The placed fields are exported as a
//! layout that a [`FormWriter`] turns back into AcroForm fields.
//!
//! ## Modules
//!
//! - `types` - Geometry, field classification and the canvas object union
//! - `field` - `PdfField` construction, validation and the tracked collection
//! - `canvas` - Rendering surface trait and the in-memory `SceneCanvas`
//! - `document` - Document engine traits, lopdf engine, pdfium rasterizer
//! - `viewer` - The viewer state machine and its load lifecycle
//! - `input` - Pointer-driven selection, drag and resize
//! - `export` - Field layout entries and the document write handoff
//! - `ui` - gpui widget hosting a viewer (feature `gpui`)

pub mod canvas;
pub mod constants;
pub mod document;
pub mod error;
pub mod export;
pub mod field;
pub mod input;
pub mod logging;
pub mod perf;
pub mod spatial_index;
pub mod types;
pub mod viewer;

#[cfg(feature = "gpui")]
pub mod ui;

pub use canvas::{RenderSurface, SceneCanvas};
pub use document::{DocumentEngine, FormWriter, LoadedDocument, LopdfEngine, PageRasterizer};
pub use error::{DocumentError, ExportError, FieldError, ViewerError};
pub use export::FieldLayoutEntry;
pub use field::{PdfField, TrackedFields};
pub use types::{CanvasObject, FieldId, FieldType, Placement};
pub use viewer::{DocumentSource, LoadTicket, Viewer, ViewerOptions, ViewerState};
