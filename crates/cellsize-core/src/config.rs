use std::time::Duration;

/// How long a render may stay in flight before the item falls back.
pub const DEFAULT_RENDER_TIMEOUT: Duration = Duration::from_secs(5);

/// Tuning for a [`crate::MeasurementQueue`].
#[derive(Clone, Debug, PartialEq)]
pub struct QueueConfig {
    /// Maximum age of an in-flight render. `None` waits forever, which lets
    /// a silent renderer stall every later job.
    pub render_timeout: Option<Duration>,

    /// Height written when a render times out or fails and the size
    /// computer has no fallback of its own.
    pub fallback_height: f32,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            render_timeout: Some(DEFAULT_RENDER_TIMEOUT),
            fallback_height: 0.0,
        }
    }
}

impl QueueConfig {
    pub fn with_render_timeout(mut self, timeout: Duration) -> Self {
        self.render_timeout = Some(timeout);
        self
    }

    pub fn without_timeout(mut self) -> Self {
        self.render_timeout = None;
        self
    }

    pub fn with_fallback_height(mut self, height: f32) -> Self {
        self.fallback_height = height;
        self
    }

    pub(crate) fn timeout_millis(&self) -> Option<u64> {
        self.render_timeout
            .map(|timeout| u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX))
    }
}
