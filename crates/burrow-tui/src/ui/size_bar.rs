//! Size bar widget for visualizing relative sizes.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::Widget;

/// A horizontal bar showing relative size.
pub struct SizeBar {
    /// Value to display (0.0 - 1.0).
    ratio: f64,
    filled_style: Style,
    empty_style: Style,
    filled_char: char,
    empty_char: char,
}

impl SizeBar {
    /// Create a new size bar.
    pub fn new(ratio: f64) -> Self {
        Self {
            ratio: ratio.clamp(0.0, 1.0),
            filled_style: Style::default(),
            empty_style: Style::default(),
            filled_char: '█',
            empty_char: '░',
        }
    }

    /// Plain characters for terminals without Unicode.
    pub fn ascii(ratio: f64) -> Self {
        Self::new(ratio).chars('#', ' ')
    }

    /// Set the style for the filled portion.
    pub fn filled_style(mut self, style: Style) -> Self {
        self.filled_style = style;
        self
    }

    /// Set the style for the empty portion.
    pub fn empty_style(mut self, style: Style) -> Self {
        self.empty_style = style;
        self
    }

    /// Set custom characters.
    pub fn chars(mut self, filled: char, empty: char) -> Self {
        self.filled_char = filled;
        self.empty_char = empty;
        self
    }
}

impl Widget for SizeBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let filled_width = (area.width as f64 * self.ratio).round() as u16;

        for x in 0..area.width {
            let (char, style) = if x < filled_width {
                (self.filled_char, self.filled_style)
            } else {
                (self.empty_char, self.empty_style)
            };

            buf[(area.x + x, area.y)].set_char(char).set_style(style);
        }
    }
}
