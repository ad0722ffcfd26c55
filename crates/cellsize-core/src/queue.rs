//! The serialized measurement queue.
//!
//! Jobs run strictly FIFO and items within a job strictly in order. An item
//! whose size computer answers [`SizeOutcome::Pending`] is handed to the
//! renderer and the queue suspends until that one render resolves; no other
//! item or job starts in the meantime.
//!
//! All state lives behind an `Rc` and is touched from one thread only.
//! Borrows are released before completion callbacks and listeners run, so
//! both may call [`MeasurementQueue::submit`] again; such jobs wait behind
//! the active one.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::future::Future;
use std::rc::Rc;
use std::sync::Arc;
use std::task::{Context, Poll, Waker};

use crate::config::QueueConfig;
use crate::events::{HeightChange, HeightSource, Listeners};
use crate::item::{CellHeights, MeasurableItem};
use crate::job::{MeasuredBatch, MeasurementJob};
use crate::platform::{Clock, RuntimeScheduler};
use crate::render::{AsyncRenderer, RenderError, RenderFuture, RenderRequest};
use crate::sizing::{sanitize_height, SizeComputer, SizeOutcome};

/// Counters describing what a queue has done so far.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QueueStats {
    pub jobs_submitted: u64,
    pub jobs_completed: u64,
    pub items_measured: u64,
    pub renders_issued: u64,
    pub renders_timed_out: u64,
    pub renders_failed: u64,
    /// Renders currently outstanding. Never exceeds one.
    pub in_flight: u32,
    /// Highest value `in_flight` ever reached.
    pub peak_in_flight: u32,
}

/// A render the queue is waiting on.
struct InFlightRender<I> {
    item: MeasurableItem,
    width: f32,
    started: I,
    future: RenderFuture,
}

/// Only `Measuring` may issue a render, and the render itself is stored in
/// `AwaitingRender`, so a second concurrent request cannot be expressed.
enum QueueState<I> {
    Idle,
    Measuring,
    AwaitingRender(InFlightRender<I>),
}

impl<I> QueueState<I> {
    fn is_awaiting(&self) -> bool {
        matches!(self, QueueState::AwaitingRender(_))
    }
}

enum Step {
    Continue,
    Suspended,
    Idle,
}

enum RenderResolution {
    Rendered(f32),
    Failed(RenderError),
    TimedOut,
}

struct QueueInner<S, R, C: Clock> {
    sizer: S,
    renderer: RefCell<R>,
    clock: C,
    config: QueueConfig,
    waker: Waker,
    jobs: RefCell<VecDeque<MeasurementJob>>,
    state: RefCell<QueueState<C::Instant>>,
    draining: Cell<bool>,
    listeners: RefCell<Listeners>,
    stats: Cell<QueueStats>,
}

/// Serializes measurement jobs over one size computer and one renderer.
///
/// Cloning yields another handle to the same queue.
pub struct MeasurementQueue<S, R, C>
where
    S: SizeComputer + 'static,
    R: AsyncRenderer + 'static,
    C: Clock + 'static,
{
    inner: Rc<QueueInner<S, R, C>>,
}

impl<S, R, C> Clone for MeasurementQueue<S, R, C>
where
    S: SizeComputer + 'static,
    R: AsyncRenderer + 'static,
    C: Clock + 'static,
{
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<S, R, C> MeasurementQueue<S, R, C>
where
    S: SizeComputer + 'static,
    R: AsyncRenderer + 'static,
    C: Clock + 'static,
{
    pub fn new(sizer: S, renderer: R, clock: C, scheduler: Arc<dyn RuntimeScheduler>) -> Self {
        Self::with_config(QueueConfig::default(), sizer, renderer, clock, scheduler)
    }

    pub fn with_config(
        config: QueueConfig,
        sizer: S,
        renderer: R,
        clock: C,
        scheduler: Arc<dyn RuntimeScheduler>,
    ) -> Self {
        let inner = QueueInner {
            sizer,
            renderer: RefCell::new(renderer),
            clock,
            config,
            waker: QueueWaker::new(scheduler).into_waker(),
            jobs: RefCell::new(VecDeque::new()),
            state: RefCell::new(QueueState::Idle),
            draining: Cell::new(false),
            listeners: RefCell::new(Listeners::default()),
            stats: Cell::new(QueueStats::default()),
        };
        Self {
            inner: Rc::new(inner),
        }
    }

    /// Queues `items` for measurement at `width`.
    ///
    /// An empty batch completes before this returns without touching the
    /// renderer. Otherwise, if no job is active, processing starts on the
    /// caller's stack and runs until the first pending render.
    pub fn submit(
        &self,
        items: impl IntoIterator<Item = MeasurableItem>,
        width: f32,
        on_complete: impl FnOnce(MeasuredBatch) + 'static,
    ) {
        self.submit_job(MeasurementJob::new(items, width, on_complete));
    }

    pub fn submit_job(&self, mut job: MeasurementJob) {
        let width = sanitize_width(job.width());
        job.set_width(width);
        self.inner.update_stats(|stats| stats.jobs_submitted += 1);

        if job.is_empty() {
            log::trace!("empty measurement job completed synchronously");
            self.inner.update_stats(|stats| stats.jobs_completed += 1);
            job.complete();
            return;
        }

        let was_empty = {
            let mut jobs = self.inner.jobs.borrow_mut();
            let was_empty = jobs.is_empty();
            log::debug!(
                "queued measurement job of {} items at width {} ({} ahead)",
                job.remaining(),
                width,
                jobs.len()
            );
            jobs.push_back(job);
            was_empty
        };
        if was_empty {
            self.inner.drive();
        }
    }

    /// Polls the in-flight render, enforces the render timeout and resumes
    /// processing. Hosts call this whenever the scheduler asks for a frame,
    /// and periodically while a render is in flight so timeouts can fire.
    ///
    /// Returns whether any item or job completed.
    pub fn pump(&self) -> bool {
        let before = self.inner.stats.get();
        self.inner.drive();
        let after = self.inner.stats.get();
        after.items_measured != before.items_measured
            || after.jobs_completed != before.jobs_completed
    }

    /// Registers a listener for every height written by the queue.
    pub fn on_height_changed(&self, listener: impl FnMut(&HeightChange) + 'static) {
        self.inner.listeners.borrow_mut().push(Box::new(listener));
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    /// True when no job is queued or active.
    pub fn is_idle(&self) -> bool {
        self.inner.jobs.borrow().is_empty()
    }

    /// Jobs queued or active.
    pub fn pending_jobs(&self) -> usize {
        self.inner.jobs.borrow().len()
    }

    pub fn has_render_in_flight(&self) -> bool {
        self.inner.state.borrow().is_awaiting()
    }

    pub fn stats(&self) -> QueueStats {
        self.inner.stats.get()
    }

    pub fn config(&self) -> &QueueConfig {
        &self.inner.config
    }

    pub fn sizer(&self) -> &S {
        &self.inner.sizer
    }
}

impl<S, R, C> fmt::Debug for MeasurementQueue<S, R, C>
where
    S: SizeComputer + 'static,
    R: AsyncRenderer + 'static,
    C: Clock + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MeasurementQueue")
            .field("pending_jobs", &self.pending_jobs())
            .field("render_in_flight", &self.has_render_in_flight())
            .field("stats", &self.stats())
            .finish()
    }
}

impl<S, R, C> QueueInner<S, R, C>
where
    S: SizeComputer,
    R: AsyncRenderer,
    C: Clock,
{
    fn update_stats(&self, update: impl FnOnce(&mut QueueStats)) {
        let mut stats = self.stats.get();
        update(&mut stats);
        self.stats.set(stats);
    }

    /// Runs until the queue is idle or suspended on a render. Nested calls
    /// from callbacks return immediately; the outer loop picks up their work.
    fn drive(&self) {
        let Some(_guard) = DrainGuard::enter(&self.draining) else {
            return;
        };
        loop {
            let awaiting = self.state.borrow().is_awaiting();
            let step = if awaiting {
                self.poll_in_flight()
            } else {
                self.process_next()
            };
            match step {
                Step::Continue => continue,
                Step::Suspended | Step::Idle => break,
            }
        }
    }

    fn process_next(&self) -> Step {
        let next = {
            let mut jobs = self.jobs.borrow_mut();
            match jobs.front_mut() {
                Some(job) => job.take_next().map(|item| (item, job.width())),
                None => {
                    self.state.replace(QueueState::Idle);
                    return Step::Idle;
                }
            }
        };

        let Some((item, width)) = next else {
            self.finish_head_job();
            return Step::Continue;
        };

        self.state.replace(QueueState::Measuring);
        match self.sizer.compute(item.content(), width) {
            SizeOutcome::Ready(height) => {
                log::trace!("{} {} measured synchronously", item.content().kind_name(), item.id());
                self.assign(&item, sanitize_height(height), HeightSource::Computed);
            }
            SizeOutcome::Pending(spec) => {
                let request = RenderRequest {
                    item: item.id(),
                    markup: spec.markup,
                    width: sanitize_width(spec.width),
                };
                log::trace!("{} waiting on render at width {}", item.id(), request.width);
                let future = self.renderer.borrow_mut().render(request);
                self.update_stats(|stats| {
                    stats.renders_issued += 1;
                    stats.in_flight += 1;
                    stats.peak_in_flight = stats.peak_in_flight.max(stats.in_flight);
                });
                self.state.replace(QueueState::AwaitingRender(InFlightRender {
                    item,
                    width,
                    started: self.clock.now(),
                    future,
                }));
            }
        }
        Step::Continue
    }

    fn poll_in_flight(&self) -> Step {
        let mut in_flight = match self.state.replace(QueueState::Measuring) {
            QueueState::AwaitingRender(in_flight) => in_flight,
            other => {
                self.state.replace(other);
                return Step::Continue;
            }
        };

        let mut cx = Context::from_waker(&self.waker);
        let resolution = match in_flight.future.as_mut().poll(&mut cx) {
            Poll::Ready(Ok(height)) => RenderResolution::Rendered(height),
            Poll::Ready(Err(error)) => RenderResolution::Failed(error),
            Poll::Pending => {
                let expired = self
                    .config
                    .timeout_millis()
                    .is_some_and(|limit| self.clock.elapsed_millis(in_flight.started) >= limit);
                if !expired {
                    self.state.replace(QueueState::AwaitingRender(in_flight));
                    return Step::Suspended;
                }
                RenderResolution::TimedOut
            }
        };

        let InFlightRender {
            item,
            width,
            future,
            ..
        } = in_flight;
        drop(future);
        self.update_stats(|stats| stats.in_flight = stats.in_flight.saturating_sub(1));

        let (height, source) = match resolution {
            RenderResolution::Rendered(rendered) => {
                let rendered = sanitize_height(rendered);
                let height = self.sizer.finish(item.content(), width, rendered);
                (height, HeightSource::Rendered)
            }
            RenderResolution::Failed(error) => {
                log::warn!("render for {} failed, using fallback height: {error}", item.id());
                self.update_stats(|stats| stats.renders_failed += 1);
                (self.fallback_height(&item, width), HeightSource::Fallback)
            }
            RenderResolution::TimedOut => {
                log::warn!(
                    "render for {} exceeded {:?}, using fallback height",
                    item.id(),
                    self.config.render_timeout
                );
                self.update_stats(|stats| stats.renders_timed_out += 1);
                (self.fallback_height(&item, width), HeightSource::Fallback)
            }
        };
        self.assign(&item, sanitize_height(height), source);
        Step::Continue
    }

    fn fallback_height(&self, item: &MeasurableItem, width: f32) -> f32 {
        self.sizer
            .fallback(item.content(), width)
            .unwrap_or(self.config.fallback_height)
    }

    fn assign(&self, item: &MeasurableItem, height: f32, source: HeightSource) {
        let heights = CellHeights::uniform(height);
        if let Some(job) = self.jobs.borrow_mut().front_mut() {
            job.record(item.id(), heights);
        }
        self.update_stats(|stats| stats.items_measured += 1);
        self.notify(HeightChange {
            item: item.id(),
            heights,
            source,
        });
    }

    fn notify(&self, change: HeightChange) {
        let mut dispatched = self.listeners.borrow_mut().take();
        for listener in dispatched.iter_mut() {
            listener(&change);
        }
        self.listeners.borrow_mut().restore(dispatched);
    }

    fn finish_head_job(&self) {
        let job = self.jobs.borrow_mut().pop_front();
        if let Some(job) = job {
            log::debug!("measurement job at width {} complete", job.width());
            self.update_stats(|stats| stats.jobs_completed += 1);
            job.complete();
        }
    }
}

fn sanitize_width(width: f32) -> f32 {
    if width.is_finite() && width >= 0.0 {
        width
    } else {
        log::warn!("measurement width {width} is invalid, clamping to 0");
        0.0
    }
}

/// Marks the queue as draining for as long as it lives.
struct DrainGuard<'a> {
    flag: &'a Cell<bool>,
}

impl<'a> DrainGuard<'a> {
    fn enter(flag: &'a Cell<bool>) -> Option<Self> {
        if flag.replace(true) {
            None
        } else {
            Some(Self { flag })
        }
    }
}

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}

struct QueueWaker {
    scheduler: Arc<dyn RuntimeScheduler>,
}

impl QueueWaker {
    fn new(scheduler: Arc<dyn RuntimeScheduler>) -> Self {
        Self { scheduler }
    }

    fn into_waker(self) -> Waker {
        futures_task::waker(Arc::new(self))
    }
}

impl futures_task::ArcWake for QueueWaker {
    fn wake_by_ref(arc_self: &Arc<Self>) {
        arc_self.scheduler.schedule_frame();
    }
}

#[cfg(test)]
#[path = "tests/queue_tests.rs"]
mod tests;
