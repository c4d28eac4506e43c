//! Main application state and event loop.

mod constants;
mod render;
mod scanning;
pub mod state;

use std::time::Duration;

use color_eyre::eyre::eyre;
use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;
use ratatui::DefaultTerminal;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use burrow_core::{ScanConfig, ScanError};
use burrow_scan::ScanProgress;

use crate::event::KeyAction;
use crate::explorer::{
    Explorer, ExplorerConfig, ExplorerError, ExplorerState, FsRemover, PAGE_SIZE, SortSpec,
    Status,
};
use crate::glyph::TerminalGlyphs;
use crate::theme::Theme;
use crate::ui::ListingState;

use self::constants::{SCAN_CHANNEL_SIZE, TICK_INTERVAL_MS};
use self::state::{AppMode, ScanMessage};

/// Application result type.
pub type AppResult<T> = color_eyre::Result<T>;

/// Main application state.
pub struct App {
    scan_config: ScanConfig,
    explorer_config: ExplorerConfig,
    glyphs: TerminalGlyphs,
    theme: Theme,
    /// Present once the startup scan has produced a tree.
    explorer: Option<Explorer>,
    mode: AppMode,
    show_info: bool,
    listing_state: ListingState,
    warnings_offset: usize,
    /// Latest progress of the running scan, startup or rescan.
    progress: Option<ScanProgress>,
    startup_token: CancellationToken,
    scan_tx: mpsc::Sender<ScanMessage>,
    scan_rx: mpsc::Receiver<ScanMessage>,
    /// The startup scan failed at its root.
    fatal: Option<ScanError>,
    needs_redraw: bool,
}

impl App {
    /// Create the application. Nothing is scanned until [`App::run`].
    pub fn new(scan_config: ScanConfig, explorer_config: ExplorerConfig, glyphs: TerminalGlyphs) -> Self {
        let (scan_tx, scan_rx) = mpsc::channel(SCAN_CHANNEL_SIZE);
        Self {
            scan_config,
            explorer_config,
            glyphs,
            theme: Theme::default(),
            explorer: None,
            mode: AppMode::Normal,
            show_info: false,
            listing_state: ListingState::default(),
            warnings_offset: 0,
            progress: None,
            startup_token: CancellationToken::new(),
            scan_tx,
            scan_rx,
            fatal: None,
            needs_redraw: true,
        }
    }

    /// Run the application with async event loop.
    pub async fn run(mut self, mut terminal: DefaultTerminal) -> AppResult<()> {
        self.progress = Some(ScanProgress::new());
        scanning::start_scan(
            self.scan_config.clone(),
            self.startup_token.clone(),
            self.scan_tx.clone(),
        );

        let mut interval = tokio::time::interval(Duration::from_millis(TICK_INTERVAL_MS));
        let mut events = EventStream::new();

        while self.mode != AppMode::Quit {
            if self.needs_redraw {
                terminal.draw(|frame| self.render(frame))?;
                self.needs_redraw = false;
            }

            tokio::select! {
                biased;

                Some(Ok(event)) = events.next() => {
                    match event {
                        Event::Key(key) if key.kind == KeyEventKind::Press => {
                            self.handle_action(KeyAction::from_key_event(key));
                        }
                        Event::Resize(..) => {}
                        _ => continue,
                    }
                    self.needs_redraw = true;
                }

                Some(message) = self.scan_rx.recv() => {
                    self.handle_scan_message(message);
                    self.needs_redraw = true;
                }

                _ = interval.tick() => {}
            }
        }

        // stop any walk still running before the runtime goes away
        self.startup_token.cancel();
        if let Some(explorer) = self.explorer.as_mut() {
            explorer.cancel();
        }

        match self.fatal {
            Some(err) => Err(eyre!(err)),
            None => Ok(()),
        }
    }

    fn handle_scan_message(&mut self, message: ScanMessage) {
        match message {
            ScanMessage::Progress(progress) => {
                self.progress = Some(progress);
            }
            ScanMessage::ScanComplete(Ok(report)) => {
                self.progress = None;
                self.explorer = Some(Explorer::new(report, self.explorer_config, &self.glyphs));
            }
            ScanMessage::ScanComplete(Err(err)) => {
                tracing::warn!(error = %err, "scan failed");
                self.progress = None;
                self.fatal = Some(err);
                self.mode = AppMode::Quit;
            }
            ScanMessage::RescanComplete(outcome) => {
                self.progress = None;
                if let Some(explorer) = self.explorer.as_mut() {
                    // failures are already on the status line
                    let _ = explorer.finish_rescan(outcome);
                }
            }
        }
    }

    fn handle_action(&mut self, action: KeyAction) {
        if action == KeyAction::ForceQuit {
            self.mode = AppMode::Quit;
            return;
        }

        let Some(explorer) = self.explorer.as_mut() else {
            // startup scan still running
            match action {
                KeyAction::Cancel => self.startup_token.cancel(),
                KeyAction::Quit => self.mode = AppMode::Quit,
                _ => {}
            }
            return;
        };

        match self.mode {
            AppMode::Help => {
                if matches!(action, KeyAction::ToggleHelp | KeyAction::Cancel | KeyAction::Quit) {
                    self.mode = AppMode::Normal;
                }
                return;
            }
            AppMode::Warnings => {
                match action {
                    KeyAction::MoveDown => self.warnings_offset += 1,
                    KeyAction::MoveUp => self.warnings_offset = self.warnings_offset.saturating_sub(1),
                    KeyAction::ToggleWarnings | KeyAction::Cancel | KeyAction::Quit => {
                        self.mode = AppMode::Normal;
                    }
                    _ => {}
                }
                let max = explorer.warnings().len().saturating_sub(1);
                self.warnings_offset = self.warnings_offset.min(max);
                return;
            }
            AppMode::Normal | AppMode::Quit => {}
        }

        if matches!(explorer.state(), ExplorerState::ConfirmingDelete { .. }) {
            match action {
                KeyAction::Confirm | KeyAction::Enter => {
                    // failure is reported through the status line
                    let _ = explorer.confirm_delete(&FsRemover);
                }
                KeyAction::Cancel | KeyAction::Quit => explorer.cancel(),
                _ => {}
            }
            return;
        }

        let result = match action {
            KeyAction::MoveUp | KeyAction::MoveDown | KeyAction::PageUp | KeyAction::PageDown => {
                let delta = match action {
                    KeyAction::MoveUp => -1,
                    KeyAction::MoveDown => 1,
                    KeyAction::PageUp => -(PAGE_SIZE as isize),
                    _ => PAGE_SIZE as isize,
                };
                explorer.move_selection(delta);
                Ok(())
            }
            KeyAction::JumpToTop => {
                explorer.select_first();
                Ok(())
            }
            KeyAction::JumpToBottom => {
                explorer.select_last();
                Ok(())
            }
            KeyAction::Enter => match explorer.enter_selected() {
                Ok(()) => {
                    self.listing_state = ListingState::default();
                    Ok(())
                }
                // entering a file does nothing
                Err(ExplorerError::NotADirectory { .. } | ExplorerError::NothingSelected) => Ok(()),
                Err(e) => Err(e),
            },
            KeyAction::Back => {
                explorer.up();
                Ok(())
            }
            KeyAction::Delete => {
                if explorer.config().confirm_delete {
                    explorer.request_delete().map(|_| ())
                } else {
                    explorer.delete_selected(&FsRemover).map(|_| ())
                }
            }
            KeyAction::Rescan => {
                let current = explorer.current();
                explorer.begin_rescan(current).map(|job| {
                    self.progress = Some(ScanProgress::new());
                    scanning::start_rescan(job, self.scan_tx.clone());
                })
            }
            KeyAction::RescanRoot => {
                let root = explorer.tree().root();
                explorer.begin_rescan(root).map(|job| {
                    self.progress = Some(ScanProgress::new());
                    scanning::start_rescan(job, self.scan_tx.clone());
                })
            }
            KeyAction::CycleSort => {
                let key = explorer.config().sort.key.next();
                explorer.set_sort(SortSpec::new(key, key.natural_order()));
                Ok(())
            }
            KeyAction::ReverseSort => {
                let sort = explorer.config().sort.reversed();
                explorer.set_sort(sort);
                Ok(())
            }
            KeyAction::ToggleMetric => {
                let metric = explorer.toggle_metric();
                explorer.set_status(Status::ok(format!("Showing {}", metric.label())));
                Ok(())
            }
            KeyAction::ToggleHidden => {
                explorer.toggle_hidden();
                Ok(())
            }
            KeyAction::ToggleDirsFirst => {
                explorer.toggle_dirs_first();
                Ok(())
            }
            KeyAction::ToggleInfo => {
                self.show_info = !self.show_info;
                Ok(())
            }
            KeyAction::ToggleWarnings => {
                self.warnings_offset = 0;
                self.mode = AppMode::Warnings;
                Ok(())
            }
            KeyAction::ToggleHelp => {
                self.mode = AppMode::Help;
                Ok(())
            }
            KeyAction::Cancel => {
                if explorer.state().is_scanning() {
                    explorer.cancel();
                } else {
                    explorer.clear_status();
                }
                Ok(())
            }
            KeyAction::Quit => {
                self.mode = AppMode::Quit;
                Ok(())
            }
            KeyAction::Confirm | KeyAction::ForceQuit | KeyAction::None => Ok(()),
        };

        if let Err(err) = result {
            explorer.set_status(Status::error(err.to_string()));
        }
    }
}
