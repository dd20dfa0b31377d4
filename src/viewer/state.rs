//! Viewer lifecycle states.
//!
//! ```text
//! Empty -> Loading -> Loaded -> Editing (every add/remove/move)
//!          Loading -> Error
//! Error/Loaded/Editing -> Loading   (new load)
//! any -> Closed                     (dispose, terminal)
//! ```

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub enum ViewerState {
    /// No document has been requested yet
    #[default]
    Empty,
    /// A load is in flight
    Loading,
    /// A document is present and renderable
    Loaded,
    /// Fields have been placed or manipulated
    Editing,
    /// The last load failed
    Error(String),
    /// The viewer was disposed
    Closed,
}

impl ViewerState {
    /// Whether pages can be rendered and fields authored
    pub fn is_ready(&self) -> bool {
        matches!(self, ViewerState::Loaded | ViewerState::Editing)
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, ViewerState::Closed)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ViewerState::Loading)
    }
}
