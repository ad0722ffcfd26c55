use std::sync::Arc;

use cellsize_core::{Announcement, ItemContent, SizeComputer, SizeOutcome};
use cellsize_text::{MonospacedTextMeasurer, StyledText, TextMeasurer, TextStyle};

/// Fixed metrics of the announcement banner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnnouncementLayout {
    /// Outer margin, applied above and below the content.
    pub margins: f32,
    /// Width of the thumbnail; its height follows the attachment's ratio.
    pub image_size: f32,
    /// Gap between the thumbnail and the text column.
    pub text_leading_margin: f32,
    /// Gap between title, body and call to action.
    pub text_vertical_margin: f32,
    pub close_button_size: f32,
}

impl Default for AnnouncementLayout {
    fn default() -> Self {
        Self {
            margins: 15.0,
            image_size: 60.0,
            text_leading_margin: 15.0,
            text_vertical_margin: 10.0,
            close_button_size: 30.0,
        }
    }
}

impl AnnouncementLayout {
    /// Width left for the text column of a cell `cell_width` wide.
    pub fn text_width(&self, cell_width: f32) -> f32 {
        (cell_width
            - self.margins
            - self.image_size
            - self.text_leading_margin
            - self.close_button_size)
            .max(0.0)
    }
}

/// Sizes announcement banners from text metrics alone. Never renders.
#[derive(Clone)]
pub struct AnnouncementSizer {
    measurer: Arc<dyn TextMeasurer>,
    layout: AnnouncementLayout,
}

impl Default for AnnouncementSizer {
    fn default() -> Self {
        Self::new(Arc::new(MonospacedTextMeasurer))
    }
}

impl AnnouncementSizer {
    pub fn new(measurer: Arc<dyn TextMeasurer>) -> Self {
        Self {
            measurer,
            layout: AnnouncementLayout::default(),
        }
    }

    pub fn with_layout(mut self, layout: AnnouncementLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn layout(&self) -> &AnnouncementLayout {
        &self.layout
    }

    pub fn announcement_height(&self, announcement: &Announcement, cell_width: f32) -> f32 {
        let layout = &self.layout;
        let measurer = self.measurer.as_ref();
        let text_width = layout.text_width(cell_width);

        let title = StyledText::new(announcement.header.as_str(), TextStyle::bold_white());
        let body = StyledText::new(announcement.body.as_str(), TextStyle::white());
        let cta = StyledText::new(announcement.cta_caption.as_str(), TextStyle::white_underlined());

        let text_height = title.height_for_width(measurer, text_width)
            + layout.text_vertical_margin
            + body.height_for_width(measurer, text_width)
            + layout.text_vertical_margin
            + cta.height_for_width(measurer, text_width);

        let image_height = announcement
            .preferred_attachment
            .and_then(|attachment| attachment.scaled_height(layout.image_size))
            .unwrap_or(0.0);

        2.0 * layout.margins + text_height.max(image_height)
    }
}

impl SizeComputer for AnnouncementSizer {
    fn compute(&self, content: &ItemContent, width: f32) -> SizeOutcome {
        match content {
            ItemContent::Announcement(announcement) => {
                SizeOutcome::Ready(self.announcement_height(announcement, width))
            }
            other => {
                log::trace!("announcement sizer skipping {} content", other.kind_name());
                SizeOutcome::Ready(0.0)
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/announcement_tests.rs"]
mod tests;
