//! Core types for the field authoring system.
//!
//! This module defines the field classification, field identity, page-space
//! geometry and the union of canvas objects a field can be backed by.

use crate::constants::{DEFAULT_FIELD_SIZE, MIN_FIELD_SIZE};
use crate::error::FieldError;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Field Identity & Classification
// ============================================================================

/// Unique identifier of a field within one viewer session.
///
/// Generated as a UUID v4 string. Ids are not stable across sessions; the
/// field `name` is what survives an export/re-load round trip.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldId(String);

impl FieldId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FieldId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for FieldId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for FieldId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Classification of a form field.
///
/// Only `Input` exists today. Consumers match exhaustively so that adding a
/// kind (checkbox, signature, date) forces every match site to handle it.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldType {
    /// Single-line text entry, backed by a text box drawable
    #[default]
    Input,
}

impl FieldType {
    pub fn all() -> &'static [FieldType] {
        &[FieldType::Input]
    }

    /// The AcroForm `/FT` name for this field type
    pub fn pdf_field_type(&self) -> &'static str {
        match self {
            FieldType::Input => "Tx",
        }
    }

    /// Map an AcroForm `/FT` name back to a field type
    pub fn from_pdf_field_type(name: &[u8]) -> Option<Self> {
        match name {
            b"Tx" => Some(FieldType::Input),
            _ => None,
        }
    }

    /// The drawable kind created on the canvas for a new field of this type
    pub fn drawable_kind(&self) -> DrawableKind {
        match self {
            FieldType::Input => DrawableKind::TextBox,
        }
    }

    /// Whether `object` can back a field of this type
    pub fn accepts(&self, object: &CanvasObject) -> bool {
        match self {
            FieldType::Input => matches!(
                object,
                CanvasObject::Drawable(DrawableRef {
                    kind: DrawableKind::TextBox,
                    ..
                })
            ),
        }
    }
}

// ============================================================================
// Canvas Objects
// ============================================================================

/// Handle of a drawable owned by a render surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectHandle(pub u64);

/// Shape types a surface can draw
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeKind {
    #[default]
    Rectangle,
    Ellipse,
}

/// The kind of a drawable on the canvas
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrawableKind {
    /// Editable text box
    TextBox,
    /// Non-text shape
    Shape(ShapeKind),
}

/// Non-owning reference to a drawable. The surface owns its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawableRef {
    pub handle: ObjectHandle,
    pub kind: DrawableKind,
}

/// A point in page space
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CanvasPoint {
    pub x: f32,
    pub y: f32,
}

impl CanvasPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<(f32, f32)> for CanvasPoint {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

/// Outcome of intersecting two pieces of geometry
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntersectionStatus {
    Intersection,
    Coincident,
    Parallel,
    None,
}

/// An intersection-of-geometry value
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Intersection {
    pub status: IntersectionStatus,
    pub points: Vec<CanvasPoint>,
}

impl Intersection {
    pub fn none() -> Self {
        Self {
            status: IntersectionStatus::None,
            points: Vec::new(),
        }
    }

    /// Intersect two line segments `a1-a2` and `b1-b2`.
    pub fn of_segments(a1: CanvasPoint, a2: CanvasPoint, b1: CanvasPoint, b2: CanvasPoint) -> Self {
        let ua_t = (b2.x - b1.x) * (a1.y - b1.y) - (b2.y - b1.y) * (a1.x - b1.x);
        let ub_t = (a2.x - a1.x) * (a1.y - b1.y) - (a2.y - a1.y) * (a1.x - b1.x);
        let u_b = (b2.y - b1.y) * (a2.x - a1.x) - (b2.x - b1.x) * (a2.y - a1.y);

        if u_b != 0.0 {
            let ua = ua_t / u_b;
            let ub = ub_t / u_b;
            if (0.0..=1.0).contains(&ua) && (0.0..=1.0).contains(&ub) {
                return Self {
                    status: IntersectionStatus::Intersection,
                    points: vec![CanvasPoint::new(
                        a1.x + ua * (a2.x - a1.x),
                        a1.y + ua * (a2.y - a1.y),
                    )],
                };
            }
            return Self::none();
        }

        let status = if ua_t == 0.0 || ub_t == 0.0 {
            IntersectionStatus::Coincident
        } else {
            IntersectionStatus::Parallel
        };
        Self {
            status,
            points: Vec::new(),
        }
    }

    /// Overlap of two axis-aligned rectangles given as (position, size).
    ///
    /// The points are the corners of the overlapping region, clockwise from
    /// the top-left.
    pub fn of_rects(a: ((f32, f32), (f32, f32)), b: ((f32, f32), (f32, f32))) -> Self {
        let left = a.0.0.max(b.0.0);
        let top = a.0.1.max(b.0.1);
        let right = (a.0.0 + a.1.0).min(b.0.0 + b.1.0);
        let bottom = (a.0.1 + a.1.1).min(b.0.1 + b.1.1);

        if left >= right || top >= bottom {
            return Self::none();
        }

        let status = if a == b {
            IntersectionStatus::Coincident
        } else {
            IntersectionStatus::Intersection
        };
        Self {
            status,
            points: vec![
                CanvasPoint::new(left, top),
                CanvasPoint::new(right, top),
                CanvasPoint::new(right, bottom),
                CanvasPoint::new(left, bottom),
            ],
        }
    }
}

/// The rendering-engine object underlying a field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CanvasObject {
    Drawable(DrawableRef),
    Point(CanvasPoint),
    Intersection(Intersection),
}

impl CanvasObject {
    pub fn kind_name(&self) -> &'static str {
        match self {
            CanvasObject::Drawable(DrawableRef {
                kind: DrawableKind::TextBox,
                ..
            }) => "text box",
            CanvasObject::Drawable(DrawableRef {
                kind: DrawableKind::Shape(_),
                ..
            }) => "shape",
            CanvasObject::Point(_) => "point",
            CanvasObject::Intersection(_) => "intersection",
        }
    }

    pub fn handle(&self) -> Option<ObjectHandle> {
        match self {
            CanvasObject::Drawable(drawable) => Some(drawable.handle),
            CanvasObject::Point(_) | CanvasObject::Intersection(_) => None,
        }
    }
}

// ============================================================================
// Placement Geometry
// ============================================================================

/// Where a field sits: page index plus a rectangle in page points.
///
/// Page space has its origin at the top-left corner with y growing down.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// Zero-based page index
    pub page: usize,
    /// Top-left corner (x, y)
    pub position: (f32, f32),
    /// Size (width, height)
    pub size: (f32, f32),
}

impl Placement {
    pub fn new(page: usize, position: (f32, f32), size: (f32, f32)) -> Self {
        Self {
            page,
            position,
            size,
        }
    }

    /// A placement of the default text field size.
    pub fn with_default_size(page: usize, position: (f32, f32)) -> Self {
        Self::new(page, position, DEFAULT_FIELD_SIZE)
    }

    pub fn validate(&self) -> Result<(), FieldError> {
        let values = [self.position.0, self.position.1, self.size.0, self.size.1];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(FieldError::InvalidPlacement(format!(
                "non-finite geometry {:?} {:?}",
                self.position, self.size
            )));
        }
        if self.size.0 < MIN_FIELD_SIZE || self.size.1 < MIN_FIELD_SIZE {
            return Err(FieldError::InvalidPlacement(format!(
                "size {:?} is below the minimum of {}",
                self.size, MIN_FIELD_SIZE
            )));
        }
        Ok(())
    }

    /// [`Placement::validate`] plus: the rectangle lies on a page of
    /// `page_size` points, edges included.
    pub fn validate_within(&self, page_size: (f32, f32)) -> Result<(), FieldError> {
        self.validate()?;
        let (right, bottom) = self.bottom_right();
        if !right.is_finite() || !bottom.is_finite() {
            return Err(FieldError::InvalidPlacement(format!(
                "rectangle {:?} {:?} overflows",
                self.position, self.size
            )));
        }
        let on_page = self.position.0 >= 0.0
            && self.position.1 >= 0.0
            && right <= page_size.0
            && bottom <= page_size.1;
        if !on_page {
            return Err(FieldError::InvalidPlacement(format!(
                "rectangle {:?} {:?} is outside the {:?} page",
                self.position, self.size, page_size
            )));
        }
        Ok(())
    }

    /// Shift the rectangle so it lies on a page of `page_size` points,
    /// shrinking it first if it is larger than the page.
    pub fn clamped_to(&self, page_size: (f32, f32)) -> Placement {
        let width = self.size.0.min(page_size.0);
        let height = self.size.1.min(page_size.1);
        Placement {
            page: self.page,
            position: (
                self.position.0.min(page_size.0 - width).max(0.0),
                self.position.1.min(page_size.1 - height).max(0.0),
            ),
            size: (width, height),
        }
    }

    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        x >= self.position.0
            && x <= self.position.0 + self.size.0
            && y >= self.position.1
            && y <= self.position.1 + self.size.1
    }

    pub fn bottom_right(&self) -> (f32, f32) {
        (self.position.0 + self.size.0, self.position.1 + self.size.1)
    }
}
