//! Strategies mapping an item and a width to a height.

use crate::item::ItemContent;

/// What the renderer has to draw before a height can be known.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderSpec {
    pub markup: String,
    /// Width of the rendering surface, which may be narrower than the cell.
    pub width: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SizeOutcome {
    /// Final height, known synchronously.
    Ready(f32),
    /// Cannot answer synchronously; render this first.
    Pending(RenderSpec),
}

pub trait SizeComputer {
    fn compute(&self, content: &ItemContent, width: f32) -> SizeOutcome;

    /// Final height once the renderer reported `rendered_height` for the
    /// [`RenderSpec`] returned by [`SizeComputer::compute`].
    fn finish(&self, content: &ItemContent, width: f32, rendered_height: f32) -> f32 {
        let _ = (content, width);
        rendered_height
    }

    /// Height used when the render timed out or failed. `None` defers to
    /// [`crate::QueueConfig::fallback_height`].
    fn fallback(&self, content: &ItemContent, width: f32) -> Option<f32> {
        let _ = (content, width);
        None
    }
}

impl<S: SizeComputer + ?Sized> SizeComputer for Box<S> {
    fn compute(&self, content: &ItemContent, width: f32) -> SizeOutcome {
        (**self).compute(content, width)
    }

    fn finish(&self, content: &ItemContent, width: f32, rendered_height: f32) -> f32 {
        (**self).finish(content, width, rendered_height)
    }

    fn fallback(&self, content: &ItemContent, width: f32) -> Option<f32> {
        (**self).fallback(content, width)
    }
}

/// Clamps heights coming back from strategies or renderers to a usable value.
pub(crate) fn sanitize_height(height: f32) -> f32 {
    if height.is_finite() && height > 0.0 {
        height
    } else {
        0.0
    }
}
