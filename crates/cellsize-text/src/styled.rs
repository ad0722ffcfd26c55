use crate::geometry::Size;
use crate::measurer::TextMeasurer;
use crate::style::TextStyle;

/// A string paired with the style it is drawn in.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct StyledText {
    pub text: String,
    pub style: TextStyle,
}

impl StyledText {
    pub fn new(text: impl Into<String>, style: TextStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Wrapped height at `width`, rounded up to whole points.
    pub fn height_for_width(&self, measurer: &dyn TextMeasurer, width: f32) -> f32 {
        measurer
            .measure_wrapped(&self.text, &self.style, width)
            .height
            .ceil()
    }

    /// Integral size of the wrapped text inside a box `width` wide.
    pub fn bounding_size(&self, measurer: &dyn TextMeasurer, width: f32) -> Size {
        let metrics = measurer.measure_wrapped(&self.text, &self.style, width);
        Size::new(metrics.width, metrics.height).integral()
    }
}
