//! Viewer-wide constants.
//!
//! Centralizes zoom limits, field defaults and input tolerances.

// ============================================================================
// Zoom & Pan
// ============================================================================

/// Minimum zoom level
pub const MIN_ZOOM: f32 = 0.1;

/// Maximum zoom level
pub const MAX_ZOOM: f32 = 5.0;

/// Default zoom level
pub const DEFAULT_ZOOM: f32 = 1.0;

/// Multiplicative zoom step for zoom in/out
pub const ZOOM_STEP: f32 = 1.2;

// ============================================================================
// Field Defaults
// ============================================================================

/// Default size of a text field in page points (width, height)
pub const DEFAULT_FIELD_SIZE: (f32, f32) = (200.0, 24.0);

/// Minimum field width/height in page points
pub const MIN_FIELD_SIZE: f32 = 4.0;

/// Default font size for text fields
pub const DEFAULT_FONT_SIZE: f32 = 12.0;

/// Minimum font size for text fields
pub const MIN_FONT_SIZE: f32 = 4.0;

/// Maximum font size for text fields
pub const MAX_FONT_SIZE: f32 = 144.0;

// ============================================================================
// Input Handling
// ============================================================================

/// Size of the resize handle at a field's bottom-right corner, in screen pixels
pub const RESIZE_HANDLE_SIZE: f32 = 8.0;

// ============================================================================
// Document
// ============================================================================

/// PDF points per inch
pub const PDF_POINTS_PER_INCH: f32 = 72.0;

/// US Letter page size in points, used when a page has no usable MediaBox
pub const FALLBACK_PAGE_SIZE: (f32, f32) = (612.0, 792.0);

/// Default appearance font resource name written into AcroForm fields
pub const FORM_FONT_RESOURCE: &str = "Helv";
