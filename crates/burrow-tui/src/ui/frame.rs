//! Box frame drawn from cached glyphs.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::widgets::Widget;

use crate::glyph::Glyphs;

/// A one-cell border around an area, drawn with the explorer's [`Glyphs`].
pub struct GlyphFrame<'a> {
    glyphs: &'a Glyphs,
    title: Option<Line<'a>>,
    style: Style,
}

impl<'a> GlyphFrame<'a> {
    /// Create a frame using `glyphs`.
    pub fn new(glyphs: &'a Glyphs) -> Self {
        Self {
            glyphs,
            title: None,
            style: Style::default(),
        }
    }

    /// Title drawn over the top line.
    pub fn title(mut self, title: impl Into<Line<'a>>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Style of the border cells.
    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Area left inside the border.
    pub fn inner(area: Rect) -> Rect {
        if area.width < 2 || area.height < 2 {
            return Rect::new(area.x, area.y, 0, 0);
        }
        Rect::new(area.x + 1, area.y + 1, area.width - 2, area.height - 2)
    }
}

impl Widget for GlyphFrame<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = area.intersection(buf.area);
        if area.width < 2 || area.height < 2 {
            return;
        }
        let left = area.x;
        let right = area.right() - 1;
        let top = area.y;
        let bottom = area.bottom() - 1;
        let g = self.glyphs;

        for x in left + 1..right {
            buf[(x, top)].set_char(g.horizontal.as_char()).set_style(self.style);
            buf[(x, bottom)].set_char(g.horizontal.as_char()).set_style(self.style);
        }
        for y in top + 1..bottom {
            buf[(left, y)].set_char(g.vertical.as_char()).set_style(self.style);
            buf[(right, y)].set_char(g.vertical.as_char()).set_style(self.style);
        }
        buf[(left, top)].set_char(g.top_left.as_char()).set_style(self.style);
        buf[(right, top)].set_char(g.top_right.as_char()).set_style(self.style);
        buf[(left, bottom)].set_char(g.bottom_left.as_char()).set_style(self.style);
        buf[(right, bottom)].set_char(g.bottom_right.as_char()).set_style(self.style);

        if let Some(title) = &self.title {
            if area.width > 4 {
                buf.set_line(left + 2, top, title, area.width - 4);
            }
        }
    }
}
