//! Promotional and editorial page headers.
//!
//! Category headers carry plain text and are sized from text metrics.
//! Every other kind carries markup whose height only the renderer knows;
//! those answer [`SizeOutcome::Pending`] and are finished once the rendered
//! height arrives. Either way the result never drops below the device's
//! minimum header height.

use std::sync::Arc;

use cellsize_core::{ItemContent, PageHeader, RenderSpec, SizeComputer, SizeOutcome};
use cellsize_text::{MonospacedTextMeasurer, Size, StyledText, TextMeasurer, TextStyle};

use crate::device::DeviceClass;
use crate::html::editorial_html;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PromotionalHeaderLayout {
    pub top_margin: f32,
    /// Horizontal inset of the text column and bottom margin.
    pub default_margin: f32,
    pub body_spacing: f32,
    /// Gap between call to action and credit when they do not fit side by side.
    pub stacked_margin: f32,
    pub min_phone_height: f32,
    pub min_tablet_height: f32,
}

impl Default for PromotionalHeaderLayout {
    fn default() -> Self {
        Self {
            top_margin: 30.0,
            default_margin: 15.0,
            body_spacing: 12.0,
            stacked_margin: 8.0,
            min_phone_height: 150.0,
            min_tablet_height: 300.0,
        }
    }
}

impl PromotionalHeaderLayout {
    pub fn text_width(&self, cell_width: f32) -> f32 {
        (cell_width - 2.0 * self.default_margin).max(0.0)
    }

    pub fn minimum_height(&self, device: DeviceClass) -> f32 {
        match device {
            DeviceClass::Phone => self.min_phone_height,
            DeviceClass::Tablet => self.min_tablet_height,
        }
    }
}

/// Styled pieces of a header, derived from its model.
struct HeaderText {
    has_markup: bool,
    title: StyledText,
    body: Option<StyledText>,
    call_to_action: Option<StyledText>,
    posted_by: Option<StyledText>,
}

impl HeaderText {
    fn new(header: &PageHeader) -> Self {
        let has_markup = header.kind.has_markup();
        Self {
            has_markup,
            title: StyledText::new(header.header.as_str(), TextStyle::title()),
            body: (!has_markup).then(|| StyledText::new(header.subheader.as_str(), TextStyle::white())),
            call_to_action: header
                .cta_caption
                .as_deref()
                .map(|caption| StyledText::new(caption, TextStyle::white_underlined())),
            posted_by: header
                .posted_by
                .as_deref()
                .map(|username| StyledText::new(format!("Posted by @{username}"), TextStyle::caption())),
        }
    }
}

#[derive(Clone)]
pub struct PromotionalHeaderSizer {
    measurer: Arc<dyn TextMeasurer>,
    layout: PromotionalHeaderLayout,
    device: DeviceClass,
}

impl Default for PromotionalHeaderSizer {
    fn default() -> Self {
        Self::new(Arc::new(MonospacedTextMeasurer), DeviceClass::Phone)
    }
}

impl PromotionalHeaderSizer {
    pub fn new(measurer: Arc<dyn TextMeasurer>, device: DeviceClass) -> Self {
        Self {
            measurer,
            layout: PromotionalHeaderLayout::default(),
            device,
        }
    }

    pub fn with_layout(mut self, layout: PromotionalHeaderLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn layout(&self) -> &PromotionalHeaderLayout {
        &self.layout
    }

    pub fn device(&self) -> DeviceClass {
        self.device
    }

    pub fn minimum_height(&self) -> f32 {
        self.layout.minimum_height(self.device)
    }

    /// Final clamp. Applied after the content height was fully computed.
    pub fn apply_minimum(&self, computed_height: f32) -> f32 {
        self.minimum_height().max(computed_height)
    }

    /// Unclamped content height. `html_height` is the rendered markup height
    /// and is ignored for headers without markup.
    pub fn computed_height(&self, header: &PageHeader, html_height: Option<f32>, cell_width: f32) -> f32 {
        let layout = &self.layout;
        let measurer = self.measurer.as_ref();
        let text = HeaderText::new(header);
        let text_width = layout.text_width(cell_width);

        let mut height = layout.top_margin;
        height += text.title.height_for_width(measurer, text_width);

        match (html_height, &text.body) {
            (Some(html_height), _) if text.has_markup => height += html_height,
            (_, Some(body)) if !text.has_markup => {
                height += layout.body_spacing;
                height += body.height_for_width(measurer, text_width);
            }
            _ => {}
        }

        let cta = text
            .call_to_action
            .as_ref()
            .map_or(Size::ZERO, |cta| cta.bounding_size(measurer, text_width));
        let posted_by = text
            .posted_by
            .as_ref()
            .map_or(Size::ZERO, |credit| credit.bounding_size(measurer, text_width));

        height += layout.body_spacing;
        if cta.width + posted_by.width > text_width {
            height += cta.height + layout.stacked_margin + posted_by.height;
        } else {
            height += cta.height.max(posted_by.height);
        }

        height += layout.default_margin;
        height
    }

    /// Width of the surface editorial markup is rendered at.
    pub fn render_width(&self, cell_width: f32) -> f32 {
        self.layout.text_width(cell_width)
    }
}

impl SizeComputer for PromotionalHeaderSizer {
    fn compute(&self, content: &ItemContent, width: f32) -> SizeOutcome {
        let ItemContent::PageHeader(header) = content else {
            log::trace!("promotional sizer skipping {} content", content.kind_name());
            return SizeOutcome::Ready(0.0);
        };
        if header.kind.has_markup() {
            SizeOutcome::Pending(RenderSpec {
                markup: editorial_html(&header.subheader),
                width: self.render_width(width),
            })
        } else {
            SizeOutcome::Ready(self.apply_minimum(self.computed_height(header, None, width)))
        }
    }

    fn finish(&self, content: &ItemContent, width: f32, rendered_height: f32) -> f32 {
        match content {
            ItemContent::PageHeader(header) => {
                self.apply_minimum(self.computed_height(header, Some(rendered_height), width))
            }
            _ => rendered_height,
        }
    }

    fn fallback(&self, content: &ItemContent, width: f32) -> Option<f32> {
        match content {
            ItemContent::PageHeader(header) => {
                Some(self.apply_minimum(self.computed_height(header, None, width)))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "tests/promotional_tests.rs"]
mod tests;
