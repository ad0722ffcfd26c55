use std::sync::Arc;

use cellsize_core::{ItemContent, SizeComputer, SizeOutcome};
use cellsize_text::TextMeasurer;

use crate::announcement::AnnouncementSizer;
use crate::device::DeviceClass;
use crate::promotional::PromotionalHeaderSizer;

/// Routes each item of a mixed stream to the strategy for its content.
///
/// Content no strategy understands measures 0.
#[derive(Clone, Default)]
pub struct StreamCellSizer {
    announcements: AnnouncementSizer,
    headers: PromotionalHeaderSizer,
}

impl StreamCellSizer {
    /// Both strategies share `measurer`.
    pub fn new(measurer: Arc<dyn TextMeasurer>, device: DeviceClass) -> Self {
        Self {
            announcements: AnnouncementSizer::new(measurer.clone()),
            headers: PromotionalHeaderSizer::new(measurer, device),
        }
    }

    pub fn from_parts(announcements: AnnouncementSizer, headers: PromotionalHeaderSizer) -> Self {
        Self {
            announcements,
            headers,
        }
    }

    pub fn announcements(&self) -> &AnnouncementSizer {
        &self.announcements
    }

    pub fn headers(&self) -> &PromotionalHeaderSizer {
        &self.headers
    }

    fn strategy_for(&self, content: &ItemContent) -> Option<&dyn SizeComputer> {
        match content {
            ItemContent::Announcement(_) => Some(&self.announcements),
            ItemContent::PageHeader(_) => Some(&self.headers),
            ItemContent::Unmeasurable => None,
        }
    }
}

impl SizeComputer for StreamCellSizer {
    fn compute(&self, content: &ItemContent, width: f32) -> SizeOutcome {
        match self.strategy_for(content) {
            Some(strategy) => strategy.compute(content, width),
            None => SizeOutcome::Ready(0.0),
        }
    }

    fn finish(&self, content: &ItemContent, width: f32, rendered_height: f32) -> f32 {
        match self.strategy_for(content) {
            Some(strategy) => strategy.finish(content, width, rendered_height),
            None => 0.0,
        }
    }

    fn fallback(&self, content: &ItemContent, width: f32) -> Option<f32> {
        self.strategy_for(content)
            .and_then(|strategy| strategy.fallback(content, width))
    }
}
