use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use cellsize_core::{MeasurableItem, MeasuredBatch, MeasurementQueue, QueueConfig, SizeComputer};

use crate::doubles::{FakeRenderer, HeightRecorder, ManualClock, RecordingScheduler};

/// Receives the batch of one submitted job.
#[derive(Clone, Default)]
pub struct BatchSlot {
    batch: Rc<RefCell<Option<MeasuredBatch>>>,
    completions: Rc<Cell<u32>>,
}

impl BatchSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Completion callback that stores the batch in this slot.
    pub fn callback(&self) -> impl FnOnce(MeasuredBatch) + 'static {
        let batch = Rc::clone(&self.batch);
        let completions = Rc::clone(&self.completions);
        move |result| {
            completions.set(completions.get() + 1);
            *batch.borrow_mut() = Some(result);
        }
    }

    pub fn is_complete(&self) -> bool {
        self.batch.borrow().is_some()
    }

    /// Number of times the callback ran. Anything but 0 or 1 is a bug.
    pub fn completions(&self) -> u32 {
        self.completions.get()
    }

    pub fn batch(&self) -> MeasuredBatch {
        self.batch
            .borrow()
            .clone()
            .unwrap_or_else(|| panic!("job has not completed"))
    }
}

/// Headless harness around a [`MeasurementQueue`] with fake collaborators.
///
/// Owns a [`FakeRenderer`], a [`ManualClock`] and a [`RecordingScheduler`],
/// and records every height change, so tests can drive renders and time by
/// hand.
pub struct MeasurementTestRule<S: SizeComputer + 'static> {
    queue: MeasurementQueue<S, FakeRenderer, ManualClock>,
    renderer: FakeRenderer,
    clock: ManualClock,
    scheduler: Arc<RecordingScheduler>,
    heights: HeightRecorder,
}

impl<S: SizeComputer + 'static> MeasurementTestRule<S> {
    pub fn new(sizer: S) -> Self {
        Self::with_config(QueueConfig::default(), sizer)
    }

    pub fn with_config(config: QueueConfig, sizer: S) -> Self {
        Self::with_renderer(config, sizer, FakeRenderer::new())
    }

    pub fn with_renderer(config: QueueConfig, sizer: S, renderer: FakeRenderer) -> Self {
        let clock = ManualClock::new();
        let scheduler = Arc::new(RecordingScheduler::new());
        let queue = MeasurementQueue::with_config(
            config,
            sizer,
            renderer.clone(),
            clock.clone(),
            scheduler.clone(),
        );
        let heights = HeightRecorder::new();
        queue.on_height_changed(heights.listener());
        Self {
            queue,
            renderer,
            clock,
            scheduler,
            heights,
        }
    }

    pub fn queue(&self) -> &MeasurementQueue<S, FakeRenderer, ManualClock> {
        &self.queue
    }

    pub fn renderer(&self) -> &FakeRenderer {
        &self.renderer
    }

    pub fn clock(&self) -> &ManualClock {
        &self.clock
    }

    pub fn scheduler(&self) -> &RecordingScheduler {
        &self.scheduler
    }

    pub fn heights(&self) -> &HeightRecorder {
        &self.heights
    }

    pub fn submit(&self, items: impl IntoIterator<Item = MeasurableItem>, width: f32) -> BatchSlot {
        let slot = BatchSlot::new();
        self.queue.submit(items, width, slot.callback());
        slot
    }

    /// Resolves the pending render and pumps the queue once it asked for a
    /// frame. Returns false when no render was pending.
    pub fn resolve_render(&self, height: f32) -> bool {
        if !self.renderer.resolve(height) {
            return false;
        }
        self.pump_until_idle();
        true
    }

    pub fn fail_render(&self, reason: &str) -> bool {
        if !self.renderer.fail(reason) {
            return false;
        }
        self.pump_until_idle();
        true
    }

    /// Moves the clock forward and pumps once so timeouts can fire.
    pub fn advance_time(&self, by: Duration) -> bool {
        self.clock.advance(by);
        self.queue.pump()
    }

    /// Pumps for as long as the queue keeps requesting frames.
    pub fn pump_until_idle(&self) {
        let mut frames = 0;
        while self.scheduler.take_frame_request() {
            frames += 1;
            if frames > 100 {
                panic!("pump_until_idle looped too many times");
            }
            self.queue.pump();
        }
    }
}
