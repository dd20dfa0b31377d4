//! Pointer and zoom input for the viewer.
//!
//! The input system uses an explicit state machine (`InputState`) to track
//! the current interaction mode. A pointer down selects the topmost field
//! and starts a drag or resize; moves update the field and its drawable;
//! pointer up returns to `Idle`.
//!
//! ## Modules
//!
//! - `coords` - Screen/page coordinate conversion and the view transform
//! - `state` - Input state machine enum and helper methods
//! - `mouse_down` - Pointer down handling (selection, drag/resize start)
//! - `drag` - Pointer move handling (drag, resize)
//! - `mouse_up` - Pointer up handling (finalize operations)
//! - `transform` - Zoom and pan of the viewer

pub mod coords;
mod drag;
mod mouse_down;
mod mouse_up;
mod state;
mod transform;

pub use coords::{CoordinateConverter, ViewTransform};
pub use state::InputState;
