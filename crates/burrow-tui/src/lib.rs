//! Terminal user interface for burrow.
//!
//! The interesting part is [`Explorer`]: a terminal-independent state
//! machine over a scanned [`DirTree`](burrow_core::DirTree) that knows how
//! to navigate, sort, delete and rescan. Everything else in this crate maps
//! keys onto it and draws its listing with ratatui.
//!
//! # Usage
//!
//! ```rust,no_run
//! use burrow_core::ScanConfig;
//! use burrow_tui::ExplorerConfig;
//!
//! burrow_tui::run(ScanConfig::new("/var"), ExplorerConfig::default()).unwrap();
//! ```
//!
//! # Driving the explorer without a terminal
//!
//! ```rust,no_run
//! use burrow_core::ScanConfig;
//! use burrow_scan::Scanner;
//! use burrow_tui::{AsciiGlyphs, Explorer, ExplorerConfig, FsRemover};
//!
//! let report = Scanner::new().scan(&ScanConfig::new("/tmp/data")).unwrap();
//! let mut explorer = Explorer::new(report, ExplorerConfig::default(), &AsciiGlyphs);
//! for row in explorer.listing() {
//!     println!("{} {}", row.size, row.name);
//! }
//! explorer.delete_selected(&FsRemover).unwrap();
//! ```
//!
//! # Keyboard
//!
//! - `j`/`k` - Move down/up
//! - `l`/`Enter` - Open directory
//! - `h`/`Backspace` - Parent directory
//! - `d` - Delete
//! - `r`/`R` - Rescan directory/everything
//! - `?` - Help
//! - `q` - Quit

pub mod app;
mod event;
pub mod explorer;
pub mod glyph;
mod theme;
mod ui;

pub use app::{App, AppResult};
pub use explorer::{
    Explorer, ExplorerConfig, ExplorerError, ExplorerState, FsRemover, Remover, RescanJob,
    RescanOutcome, Row, SortKey, SortOrder, SortSpec, Status,
};
pub use glyph::{AsciiGlyphs, Glyph, GlyphProvider, Glyphs, TerminalGlyphs, UnicodeGlyphs};
pub use theme::Theme;

use burrow_core::ScanConfig;

/// Scan `scan_config.root` and explore it until the user quits.
pub fn run(scan_config: ScanConfig, explorer_config: ExplorerConfig) -> AppResult<()> {
    let rt = tokio::runtime::Runtime::new()?;

    let app = App::new(scan_config, explorer_config, TerminalGlyphs::detect());
    let terminal = ratatui::init();
    let result = rt.block_on(app.run(terminal));
    ratatui::restore();

    // don't wait for a walk that is winding down
    rt.shutdown_timeout(std::time::Duration::from_millis(100));

    result
}
