//! Measurement jobs and their results.

use std::collections::VecDeque;
use std::fmt;

use rustc_hash::FxHashMap;

use crate::item::{CellHeights, ItemId, MeasurableItem};

/// Callback fired exactly once when every item of a job has a height.
pub type CompletionCallback = Box<dyn FnOnce(MeasuredBatch) + 'static>;

/// Heights computed for one job, in measurement order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeasuredBatch {
    width: f32,
    entries: Vec<(ItemId, CellHeights)>,
    index: FxHashMap<ItemId, usize>,
}

impl MeasuredBatch {
    pub fn new(width: f32) -> Self {
        Self {
            width,
            entries: Vec::new(),
            index: FxHashMap::default(),
        }
    }

    pub(crate) fn with_capacity(width: f32, capacity: usize) -> Self {
        Self {
            width,
            entries: Vec::with_capacity(capacity),
            index: FxHashMap::default(),
        }
    }

    /// Width the job was measured at.
    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Heights for `id`. When an id appears twice in a job the later
    /// measurement wins.
    pub fn get(&self, id: ItemId) -> Option<CellHeights> {
        self.index.get(&id).map(|&position| self.entries[position].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ItemId, CellHeights)> + '_ {
        self.entries.iter().copied()
    }

    /// Item ids in the order their heights were written.
    pub fn order(&self) -> Vec<ItemId> {
        self.entries.iter().map(|(id, _)| *id).collect()
    }

    /// Writes every result into caller-owned storage.
    pub fn apply(&self, heights: &mut FxHashMap<ItemId, CellHeights>) {
        for (id, value) in self.iter() {
            heights.insert(id, value);
        }
    }

    pub(crate) fn record(&mut self, id: ItemId, heights: CellHeights) {
        self.index.insert(id, self.entries.len());
        self.entries.push((id, heights));
    }
}

/// An ordered batch of items sharing a width and one completion callback.
pub struct MeasurementJob {
    items: VecDeque<MeasurableItem>,
    width: f32,
    results: MeasuredBatch,
    on_complete: Option<CompletionCallback>,
}

impl MeasurementJob {
    pub fn new(
        items: impl IntoIterator<Item = MeasurableItem>,
        width: f32,
        on_complete: impl FnOnce(MeasuredBatch) + 'static,
    ) -> Self {
        let items: VecDeque<MeasurableItem> = items.into_iter().collect();
        let results = MeasuredBatch::with_capacity(width, items.len());
        Self {
            items,
            width,
            results,
            on_complete: Some(Box::new(on_complete)),
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    /// Number of items not yet taken for measurement.
    pub fn remaining(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub(crate) fn set_width(&mut self, width: f32) {
        self.width = width;
        self.results.width = width;
    }

    /// Removes the next item. Taken items are never revisited.
    pub(crate) fn take_next(&mut self) -> Option<MeasurableItem> {
        self.items.pop_front()
    }

    pub(crate) fn record(&mut self, id: ItemId, heights: CellHeights) {
        self.results.record(id, heights);
    }

    /// Consumes the job and fires its callback.
    pub(crate) fn complete(mut self) {
        let results = std::mem::take(&mut self.results);
        if let Some(callback) = self.on_complete.take() {
            callback(results);
        }
    }
}

impl fmt::Debug for MeasurementJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MeasurementJob")
            .field("remaining", &self.items.len())
            .field("width", &self.width)
            .field("measured", &self.results.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ItemContent;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn item(id: u64) -> MeasurableItem {
        MeasurableItem::new(ItemId(id), ItemContent::Unmeasurable)
    }

    #[test]
    fn take_next_is_destructive_and_ordered() {
        let mut job = MeasurementJob::new(vec![item(1), item(2)], 320.0, |_| {});
        assert_eq!(job.take_next().map(|item| item.id()), Some(ItemId(1)));
        assert_eq!(job.remaining(), 1);
        assert_eq!(job.take_next().map(|item| item.id()), Some(ItemId(2)));
        assert!(job.take_next().is_none());
    }

    #[test]
    fn complete_hands_results_to_callback() {
        let received = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&received);
        let mut job = MeasurementJob::new(vec![item(7)], 100.0, move |batch| {
            *sink.borrow_mut() = Some(batch);
        });
        job.take_next();
        job.record(ItemId(7), CellHeights::uniform(42.0));
        job.complete();

        let batch = received.borrow_mut().take().expect("callback fired");
        assert_eq!(batch.width(), 100.0);
        assert_eq!(batch.get(ItemId(7)), Some(CellHeights::uniform(42.0)));
    }

    #[test]
    fn later_measurement_of_duplicate_id_wins() {
        let mut batch = MeasuredBatch::new(10.0);
        batch.record(ItemId(1), CellHeights::uniform(5.0));
        batch.record(ItemId(1), CellHeights::uniform(9.0));
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.get(ItemId(1)), Some(CellHeights::uniform(9.0)));
        assert_eq!(batch.order(), vec![ItemId(1), ItemId(1)]);
    }

    #[test]
    fn apply_writes_into_caller_storage() {
        let mut batch = MeasuredBatch::new(10.0);
        batch.record(ItemId(1), CellHeights::uniform(5.0));
        batch.record(ItemId(2), CellHeights::uniform(6.0));
        let mut storage = FxHashMap::default();
        storage.insert(ItemId(1), CellHeights::ZERO);
        batch.apply(&mut storage);
        assert_eq!(storage[&ItemId(1)], CellHeights::uniform(5.0));
        assert_eq!(storage[&ItemId(2)], CellHeights::uniform(6.0));
    }
}
