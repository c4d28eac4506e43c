//! Modal dialogs and side panels.

use std::path::Path;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Clear, Paragraph, Widget, Wrap};

use burrow_core::{Aggregate, Entry, EntryKind, ScanWarning, WarningKind};
use burrow_scan::ScanProgress;

use crate::glyph::Glyphs;
use crate::theme::Theme;
use crate::ui::{GlyphFrame, format_duration, format_size, format_time, popup_area};

/// Confirmation dialog for deleting one entry.
pub struct DeleteConfirmModal<'a> {
    theme: &'a Theme,
    glyphs: &'a Glyphs,
    path: &'a Path,
    entry: &'a Entry,
    aggregate: Aggregate,
    size: u64,
}

impl<'a> DeleteConfirmModal<'a> {
    pub fn new(
        theme: &'a Theme,
        glyphs: &'a Glyphs,
        path: &'a Path,
        entry: &'a Entry,
        aggregate: Aggregate,
        size: u64,
    ) -> Self {
        Self {
            theme,
            glyphs,
            path,
            entry,
            aggregate,
            size,
        }
    }
}

impl Widget for DeleteConfirmModal<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let popup = popup_area(area, 64, 9);
        Clear.render(popup, buf);
        GlyphFrame::new(self.glyphs)
            .style(Style::new().fg(self.theme.error))
            .title(Span::styled(
                " Confirm deletion ",
                Style::new().fg(self.theme.error).add_modifier(Modifier::BOLD),
            ))
            .render(popup, buf);
        let inner = GlyphFrame::inner(popup);

        let what = if self.entry.is_dir() {
            format!(
                "Delete directory {} and its {} items ({})?",
                self.entry.name,
                self.aggregate.item_count,
                format_size(self.size)
            )
        } else {
            format!("Delete {} ({})?", self.entry.name, format_size(self.size))
        };

        let lines = vec![
            Line::styled(
                what,
                Style::new().fg(self.theme.warning).add_modifier(Modifier::BOLD),
            ),
            Line::raw(""),
            Line::styled(self.path.display().to_string(), Style::new().fg(self.theme.muted)),
            Line::raw("This cannot be undone."),
            Line::raw(""),
            Line::from(vec![
                Span::styled(" y ", self.theme.help_key),
                Span::raw("Delete  "),
                Span::styled(" n/Esc ", self.theme.help_key),
                Span::raw("Cancel"),
            ]),
        ];
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}

/// Live counters of a running scan.
pub struct ScanProgressModal<'a> {
    theme: &'a Theme,
    glyphs: &'a Glyphs,
    root: &'a Path,
    progress: &'a ScanProgress,
}

impl<'a> ScanProgressModal<'a> {
    pub fn new(
        theme: &'a Theme,
        glyphs: &'a Glyphs,
        root: &'a Path,
        progress: &'a ScanProgress,
    ) -> Self {
        Self {
            theme,
            glyphs,
            root,
            progress,
        }
    }
}

impl Widget for ScanProgressModal<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let popup = popup_area(area, 70, 10);
        Clear.render(popup, buf);
        GlyphFrame::new(self.glyphs)
            .style(self.theme.border)
            .title(Span::styled(
                format!(" Scanning {} ", self.root.display()),
                self.theme.title,
            ))
            .render(popup, buf);
        let inner = GlyphFrame::inner(popup);

        let p = self.progress;
        let label = |text: &'static str| Span::styled(format!("{text:>10} "), self.theme.help_desc);
        let current = p.current_path.display().to_string();

        let mut lines = vec![
            Line::from(vec![
                label("Items"),
                Span::raw(format!(
                    "{} ({} files, {} dirs)",
                    p.total_items(),
                    p.files_scanned,
                    p.dirs_scanned
                )),
            ]),
            Line::from(vec![label("Size"), Span::raw(format_size(p.bytes_scanned))]),
            Line::from(vec![
                label("Elapsed"),
                Span::raw(format!(
                    "{} ({:.0} items/s)",
                    format_duration(p.elapsed),
                    p.items_per_second()
                )),
            ]),
        ];
        if p.errors_count > 0 {
            lines.push(Line::from(vec![
                label("Errors"),
                Span::styled(p.errors_count.to_string(), Style::new().fg(self.theme.error)),
            ]));
        }
        lines.push(Line::from(vec![
            label("Current"),
            Span::styled(current, Style::new().fg(self.theme.muted)),
        ]));
        lines.push(Line::raw(""));
        lines.push(Line::from(vec![
            Span::styled(" Esc ", self.theme.help_key),
            Span::raw("Stop scanning"),
        ]));

        Paragraph::new(lines).render(inner, buf);
    }
}

/// Details of one entry, shown beside the listing.
pub struct InfoPanel<'a> {
    theme: &'a Theme,
    glyphs: &'a Glyphs,
    path: &'a Path,
    entry: &'a Entry,
    aggregate: Aggregate,
}

impl<'a> InfoPanel<'a> {
    pub fn new(
        theme: &'a Theme,
        glyphs: &'a Glyphs,
        path: &'a Path,
        entry: &'a Entry,
        aggregate: Aggregate,
    ) -> Self {
        Self {
            theme,
            glyphs,
            path,
            entry,
            aggregate,
        }
    }

    fn field(&self, name: &'static str, value: String) -> Line<'static> {
        Line::from(vec![
            Span::styled(format!("{name:<12}"), self.theme.help_desc),
            Span::raw(value),
        ])
    }
}

impl Widget for InfoPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);
        GlyphFrame::new(self.glyphs)
            .style(self.theme.border)
            .title(Span::styled(" Info ", self.theme.title))
            .render(area, buf);
        let inner = GlyphFrame::inner(area);

        let entry = self.entry;
        let kind = match &entry.kind {
            EntryKind::File => "file".to_string(),
            EntryKind::Directory => "directory".to_string(),
            EntryKind::Symlink { target } => format!("symlink -> {target}"),
            EntryKind::Other => "other".to_string(),
        };

        let mut lines = vec![
            Line::styled(entry.name.to_string(), self.theme.entry_style(&entry.kind)),
            Line::styled(self.path.display().to_string(), Style::new().fg(self.theme.muted)),
            Line::raw(""),
            self.field("Type", kind),
        ];
        if entry.is_dir() {
            lines.push(self.field("Apparent", format_size(self.aggregate.apparent_size)));
            lines.push(self.field("Disk usage", format_size(self.aggregate.disk_usage)));
            lines.push(self.field("Items", self.aggregate.item_count.to_string()));
        } else {
            lines.push(self.field("Apparent", format_size(entry.apparent_size)));
            lines.push(self.field("Disk usage", format_size(entry.disk_usage)));
        }
        lines.push(self.field("Links", entry.nlink.to_string()));
        lines.push(self.field(
            "Dev/Inode",
            format!("{}/{}", entry.inode.device, entry.inode.inode),
        ));
        lines.push(self.field("Mode", entry.permissions_string()));
        lines.push(self.field(
            "Modified",
            entry.modified.map_or_else(|| "-".to_string(), format_time),
        ));

        let mut flags = Vec::new();
        if entry.flags.read_error {
            flags.push("read error");
        } else if self.aggregate.has_error {
            flags.push("errors below");
        }
        if entry.flags.excluded {
            flags.push("excluded");
        }
        if entry.flags.mount_point {
            flags.push("mount point");
        }
        if entry.flags.shared_hardlink {
            flags.push("hardlink counted elsewhere");
        }
        if !flags.is_empty() {
            lines.push(Line::from(vec![
                Span::styled(format!("{:<12}", "Flags"), self.theme.help_desc),
                Span::styled(flags.join(", "), self.theme.flag),
            ]));
        }

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}

/// Problems collected while scanning.
pub struct WarningsList<'a> {
    theme: &'a Theme,
    glyphs: &'a Glyphs,
    warnings: &'a [ScanWarning],
    offset: usize,
}

impl<'a> WarningsList<'a> {
    pub fn new(theme: &'a Theme, glyphs: &'a Glyphs, warnings: &'a [ScanWarning]) -> Self {
        Self {
            theme,
            glyphs,
            warnings,
            offset: 0,
        }
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    fn kind_label(kind: WarningKind) -> &'static str {
        match kind {
            WarningKind::PermissionDenied => "denied",
            WarningKind::Io => "io",
            WarningKind::NotFound => "vanished",
            WarningKind::CrossDeviceBoundary => "mount",
        }
    }
}

impl Widget for WarningsList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let popup = popup_area(area, 100, area.height.saturating_sub(4));
        Clear.render(popup, buf);
        GlyphFrame::new(self.glyphs)
            .style(self.theme.border)
            .title(Span::styled(
                format!(" Warnings ({}) ", self.warnings.len()),
                self.theme.title,
            ))
            .render(popup, buf);
        let inner = GlyphFrame::inner(popup);

        if self.warnings.is_empty() {
            Paragraph::new(Line::styled(
                "No problems were met while scanning.",
                Style::new().fg(self.theme.success),
            ))
            .render(inner, buf);
            return;
        }

        let lines: Vec<Line> = self
            .warnings
            .iter()
            .skip(self.offset)
            .take(inner.height as usize)
            .map(|w| {
                let color = if w.kind.is_error() {
                    self.theme.error
                } else {
                    self.theme.info
                };
                Line::from(vec![
                    Span::styled(
                        format!("{:<9}", Self::kind_label(w.kind)),
                        Style::new().fg(color),
                    ),
                    Span::raw(w.path.display().to_string()),
                    Span::styled(format!("  {}", w.message), Style::new().fg(self.theme.muted)),
                ])
            })
            .collect();
        Paragraph::new(lines).render(inner, buf);
    }
}
