//! Text metrics for layout
//!
//! Exact glyph metrics depend on the fonts available when the SVG is finally
//! drawn, so widths here are estimates in display columns scaled by font size.
//! They only need to be close enough to size the tight bounding box and the
//! legend.

use unicode_width::UnicodeWidthStr;

/// Average advance of a regular sans-serif glyph, in ems
const REGULAR_ADVANCE: f64 = 0.56;

/// Average advance of a bold sans-serif glyph, in ems
const BOLD_ADVANCE: f64 = 0.62;

/// Estimated rendered width of `text` in pixels
///
/// # Example
/// ```
/// use scdgraph::core::text_width;
///
/// assert!(text_width("Baseline", 12.0, false) > text_width("A", 12.0, false));
/// assert_eq!(text_width("", 12.0, true), 0.0);
/// ```
pub fn text_width(text: &str, font_size: f64, bold: bool) -> f64 {
    let advance = if bold { BOLD_ADVANCE } else { REGULAR_ADVANCE };
    UnicodeWidthStr::width(text) as f64 * font_size * advance
}

/// Height of one line of text in pixels
pub fn line_height(font_size: f64) -> f64 {
    font_size * 1.2
}

/// Format an axis value the way tick labels show it
///
/// Whole numbers drop the fraction; other values keep up to four decimals with
/// trailing zeros trimmed.
pub fn format_tick(value: f64) -> String {
    let value = if value.abs() < 1e-9 { 0.0 } else { value };
    if (value - value.round()).abs() < 1e-9 {
        return format!("{}", value.round() as i64);
    }
    let mut s = format!("{:.4}", value);
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_scales_with_font() {
        let small = text_width("Sessions", 10.0, false);
        let large = text_width("Sessions", 20.0, false);
        assert!((large - 2.0 * small).abs() < 1e-9);
    }

    #[test]
    fn test_bold_is_wider() {
        assert!(text_width("Phase 1", 12.0, true) > text_width("Phase 1", 12.0, false));
    }

    #[test]
    fn test_wide_characters_count_double() {
        assert_eq!(
            text_width("日本", 10.0, false),
            text_width("abcd", 10.0, false)
        );
    }

    #[test]
    fn test_format_tick() {
        assert_eq!(format_tick(10.0), "10");
        assert_eq!(format_tick(-0.0), "0");
        assert_eq!(format_tick(2.5), "2.5");
        assert_eq!(format_tick(0.1 + 0.2), "0.3");
        assert_eq!(format_tick(1e-12), "0");
    }
}
