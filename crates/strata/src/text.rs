//! Label measurement.

use crate::geom::Size;
use unicode_width::UnicodeWidthStr;

/// Measures a label in the given font. Implementations may cache; the layout engine does not.
pub trait TextMeasurer {
    fn measure(&self, text: &str, font_name: &str, font_size: f64) -> Size;
}

/// Font-independent measurer based on terminal display width.
///
/// Useful for tests and headless runs where real font metrics are unavailable. Zero factors
/// fall back to `0.6` (width per display column, in ems) and `1.2` (line height, in ems).
#[derive(Debug, Clone, Default)]
pub struct DeterministicTextMeasurer {
    pub char_width_factor: f64,
    pub line_height_factor: f64,
}

impl DeterministicTextMeasurer {
    pub fn lines(text: &str) -> impl Iterator<Item = &str> {
        text.split('\n').map(|l| l.strip_suffix('\r').unwrap_or(l))
    }
}

impl TextMeasurer for DeterministicTextMeasurer {
    fn measure(&self, text: &str, _font_name: &str, font_size: f64) -> Size {
        if text.is_empty() {
            return Size::ZERO;
        }
        let char_width_factor = if self.char_width_factor == 0.0 {
            0.6
        } else {
            self.char_width_factor
        };
        let line_height_factor = if self.line_height_factor == 0.0 {
            1.2
        } else {
            self.line_height_factor
        };

        let font_size = font_size.max(1.0);
        let mut columns = 0usize;
        let mut line_count = 0usize;
        for line in Self::lines(text) {
            columns = columns.max(line.width());
            line_count += 1;
        }

        Size::new(
            columns as f64 * font_size * char_width_factor,
            line_count as f64 * font_size * line_height_factor,
        )
    }
}
