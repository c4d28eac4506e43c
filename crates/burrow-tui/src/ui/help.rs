//! Help overlay widget.

use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Clear, Widget};

use crate::event::{HelpSection, get_help_sections};
use crate::glyph::Glyphs;
use crate::theme::Theme;
use crate::ui::{GlyphFrame, popup_area};

/// Help overlay showing key bindings organized by section.
pub struct HelpOverlay<'a> {
    theme: &'a Theme,
    glyphs: &'a Glyphs,
}

impl<'a> HelpOverlay<'a> {
    pub fn new(theme: &'a Theme, glyphs: &'a Glyphs) -> Self {
        Self { theme, glyphs }
    }

    fn render_sections(&self, sections: &[HelpSection], area: Rect, buf: &mut Buffer) {
        let bottom = area.y + area.height;
        let mut y = area.y;

        for section in sections {
            if y >= bottom {
                break;
            }
            let title = Line::from(Span::styled(
                section.title,
                Style::new().fg(self.theme.info).add_modifier(Modifier::BOLD),
            ));
            buf.set_line(area.x, y, &title, area.width);
            y += 1;

            for binding in &section.bindings {
                if y >= bottom {
                    break;
                }
                let line = Line::from(vec![
                    Span::styled(format!("{:>11}", binding.keys), self.theme.help_key),
                    Span::styled(format!(" {}", binding.description), self.theme.help_desc),
                ]);
                buf.set_line(area.x, y, &line, area.width);
                y += 1;
            }
            y += 1;
        }
    }
}

impl Widget for HelpOverlay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let popup = popup_area(area, 80, 22);
        Clear.render(popup, buf);
        GlyphFrame::new(self.glyphs)
            .style(self.theme.border)
            .title(Span::styled(" Help - ? or Esc to close ", self.theme.title))
            .render(popup, buf);
        let inner = GlyphFrame::inner(popup);

        let [left, right] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .areas(inner);

        let mut sections = get_help_sections();
        let right_sections = sections.split_off(sections.len().min(2));
        self.render_sections(&sections, left, buf);
        self.render_sections(&right_sections, right, buf);
    }
}
