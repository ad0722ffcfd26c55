//! "Cell height changed" notifications for the layout system.

use smallvec::SmallVec;

use crate::item::{CellHeights, ItemId};

/// How a height was obtained.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeightSource {
    /// Computed synchronously by the size computer.
    Computed,
    /// Combined with a height reported by the renderer.
    Rendered,
    /// The render timed out or failed.
    Fallback,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeightChange {
    pub item: ItemId,
    pub heights: CellHeights,
    pub source: HeightSource,
}

pub type HeightChangeListener = Box<dyn FnMut(&HeightChange) + 'static>;

/// Listeners are few (usually one layout observer), so they live inline.
#[derive(Default)]
pub(crate) struct Listeners {
    entries: SmallVec<[HeightChangeListener; 2]>,
}

impl Listeners {
    pub(crate) fn push(&mut self, listener: HeightChangeListener) {
        self.entries.push(listener);
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn take(&mut self) -> SmallVec<[HeightChangeListener; 2]> {
        std::mem::take(&mut self.entries)
    }

    /// Puts dispatched listeners back ahead of any registered meanwhile.
    pub(crate) fn restore(&mut self, mut dispatched: SmallVec<[HeightChangeListener; 2]>) {
        dispatched.extend(self.entries.drain(..));
        self.entries = dispatched;
    }
}
