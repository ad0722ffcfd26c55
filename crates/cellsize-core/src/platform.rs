//! Platform abstraction traits for the measurement queue.
//!
//! The queue never sleeps or spawns. It asks the host to schedule a frame
//! when a pending render makes progress and reads time from a [`Clock`] to
//! enforce the render timeout, which keeps it usable on any event loop.

/// Schedules work on behalf of the queue.
///
/// Implementations must be safe to call from any thread because render
/// futures may be woken from a worker thread.
pub trait RuntimeScheduler: Send + Sync {
    /// Request that the host call [`crate::MeasurementQueue::pump`] soon.
    fn schedule_frame(&self);
}

/// Provides timing information for the queue.
pub trait Clock {
    /// Instant type produced by this clock implementation.
    type Instant: Copy;

    /// Returns the current instant.
    fn now(&self) -> Self::Instant;

    /// Returns the number of milliseconds elapsed since `since`.
    fn elapsed_millis(&self, since: Self::Instant) -> u64;
}

/// Scheduler that ignores frame requests.
///
/// Suitable when the host already pumps the queue every frame.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultScheduler;

impl RuntimeScheduler for DefaultScheduler {
    fn schedule_frame(&self) {}
}
