//! UI components and widgets.

mod frame;
mod help;
mod listing;
pub mod modals;
mod size_bar;

pub use frame::GlyphFrame;
pub use help::HelpOverlay;
pub use listing::{ListingState, ListingView};
pub use size_bar::SizeBar;

use std::time::{Duration, SystemTime};

use chrono::{DateTime, Local};
use ratatui::layout::{Constraint, Layout, Rect};

/// Layout areas for the application.
#[derive(Debug, Clone, Copy)]
pub struct AppLayout {
    pub header: Rect,
    pub main: Rect,
    pub details: Option<Rect>,
    pub footer: Rect,
}

impl AppLayout {
    /// Compute layout from terminal area.
    pub fn new(area: Rect, show_details: bool) -> Self {
        let min_main_width = 50;
        let details_width = 36;

        let [header, content, footer] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .areas(area);

        let (main, details) = if show_details && area.width >= min_main_width + details_width {
            let [main, details] = Layout::horizontal([
                Constraint::Min(min_main_width),
                Constraint::Length(details_width),
            ])
            .areas(content);
            (main, Some(details))
        } else {
            (content, None)
        };

        Self {
            header,
            main,
            details,
            footer,
        }
    }
}

/// Format a byte size in human-readable form.
pub fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}

/// Format a duration in human-readable form.
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs < 60 {
        format!("{:.1}s", duration.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    }
}

/// Format a timestamp in local time.
pub fn format_time(time: SystemTime) -> String {
    DateTime::<Local>::from(time)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// Centered popup of at most `width` x `height` inside `area`.
pub fn popup_area(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.width.saturating_sub(width) / 2 + area.x;
    let y = area.height.saturating_sub(height) / 2 + area.y;
    Rect::new(x, y, width, height)
}
