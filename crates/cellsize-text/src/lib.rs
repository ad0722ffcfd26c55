//! Text metrics and height-for-width primitives for cellsize

mod cache;
mod geometry;
mod measurer;
mod style;
mod styled;

pub use cache::*;
pub use geometry::*;
pub use measurer::*;
pub use style::*;
pub use styled::*;

pub mod prelude {
    pub use crate::geometry::Size;
    pub use crate::measurer::{MonospacedTextMeasurer, TextMeasurer, TextMetrics};
    pub use crate::style::{FontWeight, TextStyle};
    pub use crate::styled::StyledText;
}
