use crate::style::{FontWeight, TextStyle};

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct TextMetrics {
    pub width: f32,
    pub height: f32,
    /// Height of a single line of text
    pub line_height: f32,
    /// Number of lines in the text
    pub line_count: usize,
}

impl TextMetrics {
    fn empty(style: &TextStyle) -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            line_height: style.line_height,
            line_count: 0,
        }
    }
}

pub trait TextMeasurer: Send + Sync + 'static {
    /// Measures `text` without wrapping. Explicit newlines start new lines.
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics;

    /// Measures `text` wrapped at word boundaries to fit `max_width`.
    ///
    /// Words wider than `max_width` are broken between characters.
    fn measure_wrapped(&self, text: &str, style: &TextStyle, max_width: f32) -> TextMetrics {
        wrap_greedy(self, text, style, max_width)
    }
}

/// Greedy line filling on top of [`TextMeasurer::measure`].
pub fn wrap_greedy<M: TextMeasurer + ?Sized>(
    measurer: &M,
    text: &str,
    style: &TextStyle,
    max_width: f32,
) -> TextMetrics {
    if text.is_empty() {
        return TextMetrics::empty(style);
    }
    let max_width = max_width.max(0.0);
    let space = measurer.measure(" ", style).width;
    let mut lines = 0usize;
    let mut widest = 0.0_f32;

    for paragraph in text.split('\n') {
        let mut line: Option<f32> = None;
        for word in paragraph.split_whitespace() {
            let word_width = measurer.measure(word, style).width;
            if let Some(current) = line {
                if current + space + word_width <= max_width {
                    line = Some(current + space + word_width);
                    continue;
                }
                widest = widest.max(current);
                lines += 1;
            }
            if word_width <= max_width {
                line = Some(word_width);
            } else {
                let broken = break_word(measurer, word, style, max_width);
                lines += broken.full_lines;
                widest = widest.max(broken.widest);
                line = Some(broken.remainder);
            }
        }
        widest = widest.max(line.unwrap_or(0.0));
        lines += 1;
    }

    TextMetrics {
        width: widest,
        height: lines as f32 * style.line_height,
        line_height: style.line_height,
        line_count: lines,
    }
}

struct BrokenWord {
    full_lines: usize,
    widest: f32,
    remainder: f32,
}

fn break_word<M: TextMeasurer + ?Sized>(
    measurer: &M,
    word: &str,
    style: &TextStyle,
    max_width: f32,
) -> BrokenWord {
    let mut broken = BrokenWord {
        full_lines: 0,
        widest: 0.0,
        remainder: 0.0,
    };
    let mut buffer = [0u8; 4];
    for ch in word.chars() {
        let glyph = measurer.measure(ch.encode_utf8(&mut buffer), style).width;
        if broken.remainder > 0.0 && broken.remainder + glyph > max_width {
            broken.widest = broken.widest.max(broken.remainder);
            broken.full_lines += 1;
            broken.remainder = 0.0;
        }
        broken.remainder += glyph;
    }
    broken
}

/// Deterministic measurer: every glyph is half the font size wide, bold
/// glyphs ten percent wider.
#[derive(Clone, Copy, Debug, Default)]
pub struct MonospacedTextMeasurer;

impl MonospacedTextMeasurer {
    const ADVANCE_RATIO: f32 = 0.5;
    const BOLD_RATIO: f32 = 1.1;

    pub fn advance(style: &TextStyle) -> f32 {
        let advance = style.font_size * Self::ADVANCE_RATIO;
        match style.weight {
            FontWeight::Regular => advance,
            FontWeight::Bold => advance * Self::BOLD_RATIO,
        }
    }
}

impl TextMeasurer for MonospacedTextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics {
        if text.is_empty() {
            return TextMetrics::empty(style);
        }
        let advance = Self::advance(style);
        let mut line_count = 0;
        let mut width = 0.0_f32;
        for line in text.split('\n') {
            line_count += 1;
            width = width.max(line.chars().count() as f32 * advance);
        }
        TextMetrics {
            width,
            height: line_count as f32 * style.line_height,
            line_height: style.line_height,
            line_count,
        }
    }
}

#[cfg(test)]
#[path = "tests/measurer_tests.rs"]
mod tests;
