//! The asynchronous renderer the queue delegates rich content to.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use crate::item::ItemId;

/// Future resolving to the rendered content height.
pub type RenderFuture = Pin<Box<dyn Future<Output = Result<f32, RenderError>> + 'static>>;

/// One request to measure rendered markup.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderRequest {
    /// Item the request belongs to.
    pub item: ItemId,
    /// Opaque markup handed to the renderer as-is.
    pub markup: String,
    /// Width of the rendering surface.
    pub width: f32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// The renderer reported a failure.
    Failed { reason: String },
    /// The renderer went away before answering.
    Disconnected,
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::Failed { reason } => write!(f, "render failed: {reason}"),
            RenderError::Disconnected => write!(f, "renderer disconnected before answering"),
        }
    }
}

impl std::error::Error for RenderError {}

/// Off-thread component that measures rendered content height.
///
/// The queue holds at most one returned future at a time and never calls
/// `render` again until that future resolved or was dropped on timeout.
/// Dropping the future must be treated as cancellation.
pub trait AsyncRenderer {
    fn render(&mut self, request: RenderRequest) -> RenderFuture;
}

impl<R: AsyncRenderer + ?Sized> AsyncRenderer for Box<R> {
    fn render(&mut self, request: RenderRequest) -> RenderFuture {
        (**self).render(request)
    }
}
