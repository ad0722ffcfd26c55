//! Host services for running a [`cellsize_core::MeasurementQueue`] on a
//! plain thread.
//!
//! The queue asks for a frame whenever a render resolves. [`StdScheduler`]
//! keeps that request until the host picks it up, either by polling
//! [`StdRuntime::take_frame_request`] from its own loop or by blocking in
//! [`StdRuntime::wait_for_frame`]. [`ThreadRenderer`] measures markup on a
//! worker thread.

mod renderer;

pub use renderer::*;

use std::fmt;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use cellsize_core::{Clock, RuntimeScheduler};
use web_time::Instant;

type FrameWaker = Arc<dyn Fn() + Send + Sync + 'static>;

#[derive(Default)]
struct FrameState {
    pending: bool,
    waker: Option<FrameWaker>,
}

/// Holds the queue's outstanding request for a `pump` call.
///
/// Requests raised before the host gets to them collapse into one. Render
/// workers raise them too, so every method is callable from any thread.
#[derive(Default)]
pub struct StdScheduler {
    frame: Mutex<FrameState>,
    raised: Condvar,
}

impl StdScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn frame(&self) -> MutexGuard<'_, FrameState> {
        self.frame.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Consumes the pending request, if any.
    pub fn take_frame_request(&self) -> bool {
        std::mem::take(&mut self.frame().pending)
    }

    /// Blocks until a request is pending or `timeout` passes, then consumes
    /// it. Returns false on timeout.
    pub fn wait_for_frame(&self, timeout: Duration) -> bool {
        let frame = self.frame();
        let (mut frame, _) = self
            .raised
            .wait_timeout_while(frame, timeout, |frame| !frame.pending)
            .unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut frame.pending)
    }

    /// Calls `waker` each time a request is raised, for hosts with their own
    /// event loop. It runs on whichever thread raised the request.
    pub fn set_frame_waker(&self, waker: impl Fn() + Send + Sync + 'static) {
        self.frame().waker = Some(Arc::new(waker));
    }

    pub fn clear_frame_waker(&self) {
        self.frame().waker = None;
    }
}

impl fmt::Debug for StdScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let frame = self.frame();
        f.debug_struct("StdScheduler")
            .field("pending", &frame.pending)
            .field("has_waker", &frame.waker.is_some())
            .finish()
    }
}

impl RuntimeScheduler for StdScheduler {
    fn schedule_frame(&self) {
        let waker = {
            let mut frame = self.frame();
            frame.pending = true;
            frame.waker.clone()
        };
        self.raised.notify_all();
        if let Some(waker) = waker {
            waker();
        }
    }
}

/// Clock implementation backed by [`web_time`], which is [`std::time`] on
/// native targets.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdClock;

impl Clock for StdClock {
    type Instant = Instant;

    fn now(&self) -> Self::Instant {
        Instant::now()
    }

    fn elapsed_millis(&self, since: Self::Instant) -> u64 {
        u64::try_from(since.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

impl StdClock {
    /// Returns the elapsed time as a [`Duration`] for convenience.
    pub fn elapsed(&self, since: Instant) -> Duration {
        since.elapsed()
    }
}

/// Scheduler and clock to hand to a queue, shared with the host loop.
#[derive(Clone, Default)]
pub struct StdRuntime {
    scheduler: Arc<StdScheduler>,
    clock: StdClock,
}

impl StdRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the scheduler implementation.
    pub fn scheduler(&self) -> Arc<StdScheduler> {
        Arc::clone(&self.scheduler)
    }

    pub fn clock(&self) -> StdClock {
        self.clock
    }

    pub fn take_frame_request(&self) -> bool {
        self.scheduler.take_frame_request()
    }

    /// See [`StdScheduler::wait_for_frame`].
    pub fn wait_for_frame(&self, timeout: Duration) -> bool {
        self.scheduler.wait_for_frame(timeout)
    }

    pub fn set_frame_waker(&self, waker: impl Fn() + Send + Sync + 'static) {
        self.scheduler.set_frame_waker(waker);
    }

    pub fn clear_frame_waker(&self) {
        self.scheduler.clear_frame_waker();
    }
}

impl fmt::Debug for StdRuntime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StdRuntime")
            .field("scheduler", &self.scheduler)
            .field("clock", &self.clock)
            .finish()
    }
}

#[cfg(test)]
#[path = "tests/std_runtime_tests.rs"]
mod tests;
