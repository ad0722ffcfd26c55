//! Size strategies for stream cells.
//!
//! [`AnnouncementSizer`] is purely synchronous. [`PromotionalHeaderSizer`]
//! sizes category headers synchronously and hands editorial markup to the
//! renderer. [`StreamCellSizer`] routes mixed content to the right one.

mod announcement;
mod device;
mod html;
mod promotional;
mod stream;

pub use announcement::*;
pub use device::*;
pub use html::*;
pub use promotional::*;
pub use stream::*;
