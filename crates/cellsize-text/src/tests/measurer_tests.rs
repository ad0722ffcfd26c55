use super::*;

// 14pt regular: 7pt per glyph, 20pt lines.
const STYLE: TextStyle = TextStyle::white();

#[test]
fn empty_text_has_no_lines() {
    let metrics = MonospacedTextMeasurer.measure("", &STYLE);
    assert_eq!(metrics.line_count, 0);
    assert_eq!(metrics.height, 0.0);
    let wrapped = MonospacedTextMeasurer.measure_wrapped("", &STYLE, 100.0);
    assert_eq!(wrapped.height, 0.0);
}

#[test]
fn measure_counts_explicit_lines() {
    let metrics = MonospacedTextMeasurer.measure("Hello\nWorld!", &STYLE);
    assert_eq!(metrics.line_count, 2);
    assert_eq!(metrics.width, 42.0);
    assert_eq!(metrics.height, 40.0);
}

#[test]
fn bold_glyphs_are_wider() {
    let regular = MonospacedTextMeasurer.measure("abc", &STYLE).width;
    let bold = MonospacedTextMeasurer
        .measure("abc", &TextStyle::bold_white())
        .width;
    assert!(bold > regular);
}

#[test]
fn wrap_keeps_short_text_on_one_line() {
    let metrics = MonospacedTextMeasurer.measure_wrapped("Hello World", &STYLE, 200.0);
    assert_eq!(metrics.line_count, 1);
    assert_eq!(metrics.width, 77.0);
}

#[test]
fn wrap_breaks_at_word_boundaries() {
    // "Hello" is 35pt wide; "Hello World" needs 77pt.
    let metrics = MonospacedTextMeasurer.measure_wrapped("Hello World", &STYLE, 50.0);
    assert_eq!(metrics.line_count, 2);
    assert_eq!(metrics.width, 35.0);
    assert_eq!(metrics.height, 40.0);
}

#[test]
fn wrap_breaks_long_words_between_characters() {
    // Ten glyphs at 7pt into 21pt lines: 3 + 3 + 3 + 1.
    let metrics = MonospacedTextMeasurer.measure_wrapped("abcdefghij", &STYLE, 21.0);
    assert_eq!(metrics.line_count, 4);
    assert_eq!(metrics.width, 21.0);
}

#[test]
fn wrap_preserves_blank_paragraphs() {
    let metrics = MonospacedTextMeasurer.measure_wrapped("a\n\nb", &STYLE, 100.0);
    assert_eq!(metrics.line_count, 3);
}

#[test]
fn wrap_with_zero_width_puts_each_glyph_on_its_own_line() {
    let metrics = MonospacedTextMeasurer.measure_wrapped("ab cd", &STYLE, 0.0);
    assert_eq!(metrics.line_count, 4);
}
