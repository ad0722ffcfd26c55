//! Testing utilities and harness for cellsize

pub mod assertions;
pub mod doubles;
pub mod fixtures;
pub mod rule;

pub use assertions::*;
pub use doubles::*;
pub use fixtures::*;
pub use rule::*;

pub mod prelude {
    pub use crate::assertions::{assert_approx_eq, assert_batch_height, assert_order};
    pub use crate::doubles::*;
    pub use crate::fixtures::*;
    pub use crate::rule::{BatchSlot, MeasurementTestRule};
}
