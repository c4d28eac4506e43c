//! Directory listing widget.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::widgets::{StatefulWidget, Widget};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::explorer::Row;
use crate::glyph::Glyphs;
use crate::theme::Theme;
use crate::ui::{GlyphFrame, SizeBar, format_size};

const FLAG_WIDTH: u16 = 2;
const SIZE_WIDTH: u16 = 11;
const PERCENT_WIDTH: u16 = 7;
const BAR_WIDTH: u16 = 12;
const ITEMS_WIDTH: u16 = 9;

/// Scroll position of the listing.
#[derive(Debug, Default, Clone)]
pub struct ListingState {
    pub offset: usize,
}

impl ListingState {
    /// Adjust the offset so that `selected` is inside the viewport.
    pub fn ensure_visible(&mut self, selected: usize, viewport_height: usize) {
        if viewport_height == 0 {
            return;
        }
        if selected < self.offset {
            self.offset = selected;
        } else if selected >= self.offset + viewport_height {
            self.offset = selected + 1 - viewport_height;
        }
    }
}

/// Rows of the current directory inside a glyph frame.
pub struct ListingView<'a> {
    rows: &'a [Row],
    selected: Option<usize>,
    theme: &'a Theme,
    glyphs: &'a Glyphs,
    title: Option<Line<'a>>,
}

impl<'a> ListingView<'a> {
    pub fn new(rows: &'a [Row], theme: &'a Theme, glyphs: &'a Glyphs) -> Self {
        Self {
            rows,
            selected: None,
            theme,
            glyphs,
            title: None,
        }
    }

    pub fn selected(mut self, selected: Option<usize>) -> Self {
        self.selected = selected;
        self
    }

    pub fn title(mut self, title: impl Into<Line<'a>>) -> Self {
        self.title = Some(title.into());
        self
    }

    fn render_row(&self, row: &Row, area: Rect, buf: &mut Buffer, selected: bool) {
        let mut x = area.x;
        let right = area.right();
        let y = area.y;

        let flag = row.flag.to_string();
        buf.set_stringn(x, y, &flag, FLAG_WIDTH as usize, self.theme.flag);
        x += FLAG_WIDTH;

        if row.pending {
            let text = format!("{:>width$}", "scanning", width = SIZE_WIDTH as usize - 1);
            buf.set_stringn(x, y, text, right.saturating_sub(x) as usize, self.theme.pending);
            x += SIZE_WIDTH + PERCENT_WIDTH + BAR_WIDTH + ITEMS_WIDTH;
        } else {
            let size = format!("{:>width$}", format_size(row.size), width = SIZE_WIDTH as usize - 1);
            buf.set_stringn(x, y, size, right.saturating_sub(x) as usize, Style::new().fg(self.theme.foreground));
            x += SIZE_WIDTH;

            if x + PERCENT_WIDTH <= right {
                let percent = format!("{:>5.1}%", row.ratio * 100.0);
                buf.set_stringn(x, y, percent, PERCENT_WIDTH as usize, Style::new().fg(self.theme.muted));
            }
            x += PERCENT_WIDTH;

            if x + BAR_WIDTH <= right {
                let bar_area = Rect::new(x, y, BAR_WIDTH - 2, 1);
                let bar = if self.glyphs.horizontal.as_char().is_ascii() {
                    SizeBar::ascii(row.ratio)
                } else {
                    SizeBar::new(row.ratio)
                };
                bar.filled_style(self.theme.size_bar_style(row.ratio))
                    .empty_style(self.theme.progress_bg)
                    .render(bar_area, buf);
            }
            x += BAR_WIDTH;

            if row.is_dir() && x + ITEMS_WIDTH <= right {
                let items = format!("{:>width$}", row.aggregate.item_count, width = ITEMS_WIDTH as usize - 1);
                buf.set_stringn(x, y, items, ITEMS_WIDTH as usize, Style::new().fg(self.theme.muted));
            }
            x += ITEMS_WIDTH;
        }

        if x < right {
            let mut name = row.name.to_string();
            if row.is_dir() {
                name.push('/');
            }
            let width = right.saturating_sub(x) as usize;
            buf.set_stringn(x, y, truncate(&name, width), width, self.theme.entry_style(&row.kind));
        }

        if selected {
            buf.set_style(area, self.theme.selected);
        }
    }
}

impl StatefulWidget for ListingView<'_> {
    type State = ListingState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let mut frame = GlyphFrame::new(self.glyphs).style(self.theme.border);
        if let Some(title) = self.title.clone() {
            frame = frame.title(title);
        }
        frame.render(area, buf);

        let inner = GlyphFrame::inner(area);
        if inner.area() == 0 {
            return;
        }

        if self.rows.is_empty() {
            buf.set_stringn(
                inner.x + 1,
                inner.y,
                "(empty directory)",
                inner.width.saturating_sub(1) as usize,
                Style::new().fg(self.theme.muted),
            );
            return;
        }

        let height = inner.height as usize;
        if let Some(selected) = self.selected {
            state.ensure_visible(selected, height);
        }
        state.offset = state.offset.min(self.rows.len().saturating_sub(1));

        for (i, row) in self.rows.iter().enumerate().skip(state.offset).take(height) {
            let y = inner.y + (i - state.offset) as u16;
            let line = Rect::new(inner.x, y, inner.width, 1);
            self.render_row(row, line, buf, self.selected == Some(i));
        }
    }
}

/// Cut `text` to `width` display columns, marking the cut with `~`.
fn truncate(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        used += w;
        out.push(ch);
    }
    out.push('~');
    out
}
