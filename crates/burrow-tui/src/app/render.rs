//! Drawing the application.

use ratatui::Frame;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use burrow_scan::ScanProgress;

use crate::explorer::{Explorer, ExplorerState};
use crate::glyph::Glyphs;
use crate::theme::Theme;
use crate::ui::modals::{DeleteConfirmModal, InfoPanel, ScanProgressModal, WarningsList};
use crate::ui::{AppLayout, HelpOverlay, ListingView, format_size};

use super::App;
use super::state::AppMode;

impl App {
    pub(super) fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();

        let Some(explorer) = self.explorer.as_mut() else {
            let glyphs = Glyphs::from_provider(&self.glyphs);
            if let Some(progress) = &self.progress {
                frame.render_widget(
                    ScanProgressModal::new(&self.theme, &glyphs, &self.scan_config.root, progress),
                    area,
                );
            }
            return;
        };

        let layout = AppLayout::new(area, self.show_info);
        let rows = explorer.listing();
        let selected = explorer.index_in(&rows);
        let totals = explorer.current_totals();
        let current_path = explorer.current_path();
        let glyphs = *explorer.glyphs();

        // Header
        let config = explorer.config();
        let header = Line::from(vec![
            Span::styled(" burrow ", self.theme.title),
            Span::raw(format!(
                " sort: {}  metric: {}{} ",
                config.sort,
                config.metric.label(),
                if config.show_hidden { "" } else { "  hidden: off" },
            )),
        ]);
        frame.render_widget(Paragraph::new(header).style(self.theme.header), layout.header);

        // Listing
        let title = Span::styled(format!(" {} ", current_path.display()), self.theme.title);
        frame.render_stateful_widget(
            ListingView::new(&rows, &self.theme, &glyphs)
                .selected(selected)
                .title(title),
            layout.main,
            &mut self.listing_state,
        );

        // Info panel
        if let (Some(details), Some(id)) = (layout.details, explorer.selected()) {
            let tree = explorer.tree();
            if let (Some(entry), Some(path)) = (tree.entry(id), explorer.absolute_path(id)) {
                let aggregate = tree.aggregate(id).unwrap_or_default();
                frame.render_widget(
                    InfoPanel::new(&self.theme, &glyphs, &path, entry, aggregate),
                    details,
                );
            }
        }

        // Footer
        let footer = footer_line(
            explorer,
            &self.theme,
            totals.size(config.metric),
            totals.item_count,
            self.progress.as_ref(),
        );
        frame.render_widget(Paragraph::new(footer).style(self.theme.footer), layout.footer);

        // Overlays
        if let ExplorerState::ConfirmingDelete { target } = explorer.state() {
            let target = *target;
            let size = rows
                .iter()
                .find(|r| r.id == target)
                .map_or(0, |r| r.size);
            let tree = explorer.tree();
            if let (Some(entry), Some(path)) = (tree.entry(target), explorer.absolute_path(target)) {
                let aggregate = tree.aggregate(target).unwrap_or_default();
                frame.render_widget(
                    DeleteConfirmModal::new(&self.theme, &glyphs, &path, entry, aggregate, size),
                    area,
                );
            }
        }

        match self.mode {
            AppMode::Help => frame.render_widget(HelpOverlay::new(&self.theme, &glyphs), area),
            AppMode::Warnings => frame.render_widget(
                WarningsList::new(&self.theme, &glyphs, explorer.warnings())
                    .offset(self.warnings_offset),
                area,
            ),
            AppMode::Normal | AppMode::Quit => {}
        }
    }
}

fn footer_line(
    explorer: &Explorer,
    theme: &Theme,
    total: u64,
    items: u64,
    progress: Option<&ScanProgress>,
) -> Line<'static> {
    if let ExplorerState::Scanning { path, .. } = explorer.state() {
        let counted = progress.map_or(0, |p| p.total_items());
        return Line::from(vec![
            Span::styled(" Rescanning ", Style::new().fg(theme.warning).add_modifier(Modifier::BOLD)),
            Span::raw(format!("{} ({counted} items)  Esc to stop", path.display())),
        ]);
    }

    if let Some(status) = explorer.status() {
        let color = if status.success { theme.success } else { theme.error };
        return Line::from(Span::styled(format!(" {}", status.message), Style::new().fg(color)));
    }

    let mut spans = vec![Span::raw(format!(
        " Total {}: {}  Items: {}",
        explorer.config().metric.label(),
        format_size(total),
        items
    ))];
    if !explorer.is_complete() {
        spans.push(Span::styled("  [incomplete]", Style::new().fg(theme.warning)));
    }
    if !explorer.warnings().is_empty() {
        spans.push(Span::styled(
            format!("  {} warnings (w)", explorer.warnings().len()),
            Style::new().fg(theme.muted),
        ));
    }
    spans.push(Span::styled("  ? help", Style::new().fg(theme.muted)));
    Line::from(spans)
}
