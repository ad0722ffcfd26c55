//! Deterministic stand-ins for the queue's collaborators.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::task::{Context, Poll, Waker};
use std::time::Duration;

use cellsize_core::{
    AsyncRenderer, Clock, HeightChange, ItemContent, RenderError, RenderFuture, RenderRequest,
    RenderSpec, RuntimeScheduler, SizeComputer, SizeOutcome,
};

/// What the next render request should do.
#[derive(Clone, Debug, PartialEq)]
pub enum ScriptedRender {
    /// Resolve immediately with this height.
    Height(f32),
    /// Resolve immediately with [`RenderError::Failed`].
    Fail(String),
    /// Stay pending until resolved by hand.
    Hang,
}

#[derive(Default)]
struct FakeSlot {
    result: Option<Result<f32, RenderError>>,
    waker: Option<Waker>,
    dropped: bool,
}

#[derive(Default)]
struct FakeRendererState {
    script: VecDeque<ScriptedRender>,
    requests: Vec<RenderRequest>,
    slots: Vec<Rc<RefCell<FakeSlot>>>,
    max_outstanding: usize,
}

impl FakeRendererState {
    fn outstanding(&self) -> usize {
        self.slots.iter().filter(|slot| !slot.borrow().dropped).count()
    }

    fn next_manual_slot(&self) -> Option<Rc<RefCell<FakeSlot>>> {
        self.slots
            .iter()
            .find(|slot| {
                let slot = slot.borrow();
                slot.result.is_none() && !slot.dropped
            })
            .cloned()
    }
}

/// Renderer whose answers are scripted or given by hand.
///
/// Requests without a script entry stay pending until [`FakeRenderer::resolve`]
/// or [`FakeRenderer::fail`] is called. Clones share state, so a test can keep
/// one handle while the queue owns another.
#[derive(Clone, Default)]
pub struct FakeRenderer {
    state: Rc<RefCell<FakeRendererState>>,
}

impl FakeRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scripted(script: impl IntoIterator<Item = ScriptedRender>) -> Self {
        let renderer = Self::new();
        renderer.state.borrow_mut().script.extend(script);
        renderer
    }

    pub fn push_script(&self, render: ScriptedRender) {
        self.state.borrow_mut().script.push_back(render);
    }

    /// Resolves the oldest pending request. Returns false when none is pending.
    pub fn resolve(&self, height: f32) -> bool {
        self.complete(Ok(height))
    }

    pub fn fail(&self, reason: &str) -> bool {
        self.complete(Err(RenderError::Failed {
            reason: reason.to_string(),
        }))
    }

    fn complete(&self, result: Result<f32, RenderError>) -> bool {
        let Some(slot) = self.state.borrow().next_manual_slot() else {
            return false;
        };
        let waker = {
            let mut slot = slot.borrow_mut();
            slot.result = Some(result);
            slot.waker.take()
        };
        if let Some(waker) = waker {
            waker.wake();
        }
        true
    }

    pub fn requests(&self) -> Vec<RenderRequest> {
        self.state.borrow().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.state.borrow().requests.len()
    }

    pub fn last_request(&self) -> Option<RenderRequest> {
        self.state.borrow().requests.last().cloned()
    }

    /// Futures handed out and not yet dropped.
    pub fn outstanding(&self) -> usize {
        self.state.borrow().outstanding()
    }

    /// Highest value [`FakeRenderer::outstanding`] ever reached.
    pub fn max_outstanding(&self) -> usize {
        self.state.borrow().max_outstanding
    }
}

impl AsyncRenderer for FakeRenderer {
    fn render(&mut self, request: RenderRequest) -> RenderFuture {
        let mut state = self.state.borrow_mut();
        let result = match state.script.pop_front() {
            Some(ScriptedRender::Height(height)) => Some(Ok(height)),
            Some(ScriptedRender::Fail(reason)) => Some(Err(RenderError::Failed { reason })),
            Some(ScriptedRender::Hang) | None => None,
        };
        let slot = Rc::new(RefCell::new(FakeSlot {
            result,
            ..FakeSlot::default()
        }));
        state.requests.push(request);
        state.slots.push(Rc::clone(&slot));
        let outstanding = state.outstanding();
        state.max_outstanding = state.max_outstanding.max(outstanding);
        Box::pin(FakeRenderFuture { slot })
    }
}

struct FakeRenderFuture {
    slot: Rc<RefCell<FakeSlot>>,
}

impl Future for FakeRenderFuture {
    type Output = Result<f32, RenderError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut slot = self.slot.borrow_mut();
        match slot.result.take() {
            Some(result) => Poll::Ready(result),
            None => {
                slot.waker = Some(cx.waker().clone());
                Poll::Pending
            }
        }
    }
}

impl Drop for FakeRenderFuture {
    fn drop(&mut self) {
        self.slot.borrow_mut().dropped = true;
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    millis: Rc<Cell<u64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        let by = u64::try_from(by.as_millis()).unwrap_or(u64::MAX);
        self.millis.set(self.millis.get().saturating_add(by));
    }

    pub fn now_millis(&self) -> u64 {
        self.millis.get()
    }
}

impl Clock for ManualClock {
    type Instant = u64;

    fn now(&self) -> u64 {
        self.millis.get()
    }

    fn elapsed_millis(&self, since: u64) -> u64 {
        self.millis.get().saturating_sub(since)
    }
}

/// Counts frame requests.
#[derive(Debug, Default)]
pub struct RecordingScheduler {
    frames: AtomicUsize,
    pending: AtomicBool,
}

impl RecordingScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames_requested(&self) -> usize {
        self.frames.load(Ordering::SeqCst)
    }

    /// Returns whether a frame has been requested since the last call.
    pub fn take_frame_request(&self) -> bool {
        self.pending.swap(false, Ordering::SeqCst)
    }
}

impl RuntimeScheduler for RecordingScheduler {
    fn schedule_frame(&self) {
        self.frames.fetch_add(1, Ordering::SeqCst);
        self.pending.store(true, Ordering::SeqCst);
    }
}

/// Collects every height change a queue reports.
#[derive(Clone, Default)]
pub struct HeightRecorder {
    changes: Rc<RefCell<Vec<HeightChange>>>,
}

impl HeightRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Listener to pass to `MeasurementQueue::on_height_changed`.
    pub fn listener(&self) -> impl FnMut(&HeightChange) + 'static {
        let changes = Rc::clone(&self.changes);
        move |change| changes.borrow_mut().push(*change)
    }

    pub fn changes(&self) -> Vec<HeightChange> {
        self.changes.borrow().clone()
    }

    /// Raw ids in the order they were written.
    pub fn order(&self) -> Vec<u64> {
        self.changes.borrow().iter().map(|change| change.item.0).collect()
    }

    pub fn len(&self) -> usize {
        self.changes.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.borrow().is_empty()
    }

    pub fn last(&self) -> Option<HeightChange> {
        self.changes.borrow().last().copied()
    }
}

/// Size computer with predictable answers.
///
/// Announcements are ready immediately; a header that parses as a number is
/// used as the height, anything else yields `ready_height`. Page headers
/// request a render of their subheader and add `chrome` to the rendered
/// height. Unmeasurable content is 0.
#[derive(Debug)]
pub struct ScriptedSizer {
    pub ready_height: f32,
    pub chrome: f32,
    pub fallback: Option<f32>,
    computed: RefCell<Vec<&'static str>>,
}

impl Default for ScriptedSizer {
    fn default() -> Self {
        Self {
            ready_height: 10.0,
            chrome: 0.0,
            fallback: None,
            computed: RefCell::new(Vec::new()),
        }
    }
}

impl ScriptedSizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chrome(mut self, chrome: f32) -> Self {
        self.chrome = chrome;
        self
    }

    pub fn with_fallback(mut self, fallback: f32) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Kinds of content passed to `compute`, in call order.
    pub fn computed_kinds(&self) -> Vec<&'static str> {
        self.computed.borrow().clone()
    }
}

impl SizeComputer for ScriptedSizer {
    fn compute(&self, content: &ItemContent, width: f32) -> SizeOutcome {
        self.computed.borrow_mut().push(content.kind_name());
        match content {
            ItemContent::Announcement(announcement) => {
                SizeOutcome::Ready(announcement.header.parse().unwrap_or(self.ready_height))
            }
            ItemContent::PageHeader(header) => SizeOutcome::Pending(RenderSpec {
                markup: header.subheader.clone(),
                width,
            }),
            ItemContent::Unmeasurable => SizeOutcome::Ready(0.0),
        }
    }

    fn finish(&self, _content: &ItemContent, _width: f32, rendered_height: f32) -> f32 {
        rendered_height + self.chrome
    }

    fn fallback(&self, _content: &ItemContent, _width: f32) -> Option<f32> {
        self.fallback
    }
}
