//! Drawable hit index.
//!
//! One R-tree per page holds drawable boxes tagged with their z-order, so a
//! point query answers "which drawable is on top here" without scanning the
//! page. A handle lives on exactly one page at a time.

use crate::types::{CanvasPoint, ObjectHandle};
use rstar::primitives::{GeomWithData, Rectangle};
use rstar::RTree;
use std::collections::HashMap;

/// Where a handle sits: its page and stacking position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Slot {
    pub handle: ObjectHandle,
    /// Larger values paint later, i.e. on top
    pub z: u64,
}

type PlacedBox = GeomWithData<Rectangle<[f32; 2]>, Slot>;

#[derive(Default)]
pub struct SpatialIndex {
    pages: HashMap<usize, RTree<PlacedBox>>,
    placed: HashMap<ObjectHandle, (usize, PlacedBox)>,
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place `handle` on `page`, replacing wherever it was before.
    pub fn insert(&mut self, slot: Slot, page: usize, position: (f32, f32), size: (f32, f32)) {
        self.remove(slot.handle);

        let corner = [position.0 + size.0, position.1 + size.1];
        let placed = PlacedBox::new(Rectangle::from_corners([position.0, position.1], corner), slot);
        self.pages.entry(page).or_default().insert(placed);
        self.placed.insert(slot.handle, (page, placed));
    }

    pub fn remove(&mut self, handle: ObjectHandle) -> bool {
        let Some((page, placed)) = self.placed.remove(&handle) else {
            return false;
        };
        if let Some(tree) = self.pages.get_mut(&page) {
            tree.remove(&placed);
            if tree.size() == 0 {
                self.pages.remove(&page);
            }
        }
        true
    }

    /// The highest-z handle on `page` whose box contains `point`. Edges count.
    pub fn topmost_at(&self, page: usize, point: CanvasPoint) -> Option<ObjectHandle> {
        self.pages
            .get(&page)?
            .locate_all_at_point(&[point.x, point.y])
            .max_by_key(|placed| placed.data.z)
            .map(|placed| placed.data.handle)
    }

    pub fn page_of(&self, handle: ObjectHandle) -> Option<usize> {
        self.placed.get(&handle).map(|(page, _)| *page)
    }

    pub fn len(&self) -> usize {
        self.placed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placed.is_empty()
    }

    pub fn clear(&mut self) {
        self.pages.clear();
        self.placed.clear();
    }
}
