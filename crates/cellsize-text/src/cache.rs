use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::measurer::{TextMeasurer, TextMetrics};
use crate::style::{FontWeight, TextStyle};

pub const DEFAULT_CACHE_CAPACITY: usize = 256;

#[derive(Clone, PartialEq, Eq, Hash)]
struct MeasureKey {
    text: Arc<str>,
    style: (u32, u32, FontWeight, bool),
    /// `None` for unwrapped measurement.
    max_width: Option<u32>,
}

/// Wraps a measurer with an LRU cache of recent results.
///
/// Feeds re-measure the same captions at the same widths on every rotation
/// and pagination, so most lookups hit.
pub struct CachedTextMeasurer<M> {
    inner: M,
    cache: Mutex<LruCache<MeasureKey, TextMetrics>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<M: TextMeasurer> CachedTextMeasurer<M> {
    pub fn new(inner: M) -> Self {
        Self::with_capacity(inner, DEFAULT_CACHE_CAPACITY)
    }

    pub fn with_capacity(inner: M, capacity: usize) -> Self {
        let size = NonZeroUsize::new(capacity).unwrap_or_else(|| {
            log::warn!("text cache capacity must be positive, using 1");
            NonZeroUsize::MIN
        });
        Self {
            inner,
            cache: Mutex::new(LruCache::new(size)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn inner(&self) -> &M {
        &self.inner
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        log::trace!("clearing {} cached text measurements", self.len());
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LruCache<MeasureKey, TextMetrics>> {
        // A panic inside a measurer leaves the cache itself consistent.
        self.cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn get_or_measure(
        &self,
        text: &str,
        style: &TextStyle,
        max_width: Option<f32>,
        measure: impl FnOnce() -> TextMetrics,
    ) -> TextMetrics {
        let key = MeasureKey {
            text: Arc::from(text),
            style: style.key(),
            max_width: max_width.map(f32::to_bits),
        };
        if let Some(metrics) = self.lock().get(&key).copied() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return metrics;
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        let metrics = measure();
        self.lock().put(key, metrics);
        metrics
    }
}

impl<M: TextMeasurer> TextMeasurer for CachedTextMeasurer<M> {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics {
        self.get_or_measure(text, style, None, || self.inner.measure(text, style))
    }

    fn measure_wrapped(&self, text: &str, style: &TextStyle, max_width: f32) -> TextMetrics {
        self.get_or_measure(text, style, Some(max_width), || {
            self.inner.measure_wrapped(text, style, max_width)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measurer::MonospacedTextMeasurer;

    #[test]
    fn repeated_measurement_hits_cache() {
        let measurer = CachedTextMeasurer::new(MonospacedTextMeasurer);
        let style = TextStyle::white();

        let first = measurer.measure_wrapped("Hello World", &style, 50.0);
        let second = measurer.measure_wrapped("Hello World", &style, 50.0);

        assert_eq!(first, second);
        assert_eq!(measurer.misses(), 1);
        assert_eq!(measurer.hits(), 1);
    }

    #[test]
    fn width_and_style_are_part_of_the_key() {
        let measurer = CachedTextMeasurer::new(MonospacedTextMeasurer);
        measurer.measure_wrapped("Hello World", &TextStyle::white(), 50.0);
        measurer.measure_wrapped("Hello World", &TextStyle::white(), 60.0);
        measurer.measure_wrapped("Hello World", &TextStyle::bold_white(), 50.0);
        measurer.measure("Hello World", &TextStyle::white());
        assert_eq!(measurer.misses(), 4);
        assert_eq!(measurer.hits(), 0);
        assert_eq!(measurer.len(), 4);
    }

    #[test]
    fn capacity_evicts_least_recent() {
        let measurer = CachedTextMeasurer::with_capacity(MonospacedTextMeasurer, 1);
        let style = TextStyle::white();
        measurer.measure("a", &style);
        measurer.measure("b", &style);
        measurer.measure("a", &style);
        assert_eq!(measurer.misses(), 3);
        assert_eq!(measurer.len(), 1);
        measurer.clear();
        assert!(measurer.is_empty());
    }
}
