//! Serialized asynchronous cell-height measurement.
//!
//! A [`MeasurementQueue`] takes batches of [`MeasurableItem`]s, asks a
//! [`SizeComputer`] for each item's height and, when the computer cannot
//! answer synchronously, hands the item to an [`AsyncRenderer`] and waits for
//! the rendered content height before moving on. Jobs and items are processed
//! strictly in order and at most one render is outstanding at any time.

mod config;
mod events;
mod item;
mod job;
mod platform;
mod queue;
mod render;
mod sizing;

pub use config::*;
pub use events::*;
pub use item::*;
pub use job::*;
pub use platform::*;
pub use queue::*;
pub use render::*;
pub use sizing::*;

pub mod prelude {
    pub use crate::config::QueueConfig;
    pub use crate::item::{CellHeights, ItemContent, ItemId, MeasurableItem};
    pub use crate::job::MeasuredBatch;
    pub use crate::queue::MeasurementQueue;
    pub use crate::render::{AsyncRenderer, RenderError, RenderFuture, RenderRequest};
    pub use crate::sizing::{RenderSpec, SizeComputer, SizeOutcome};
}
