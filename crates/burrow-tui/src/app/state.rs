//! Application state types.

use burrow_core::{ScanError, ScanReport};
use burrow_scan::ScanProgress;

use crate::explorer::RescanOutcome;

/// Which overlay currently owns the keyboard.
///
/// Deletion confirmation and rescans are tracked by the explorer's own
/// state machine; these are the app-level overlays on top of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppMode {
    #[default]
    Normal,
    Help,
    Warnings,
    Quit,
}

/// Message from a background scan task.
#[derive(Debug)]
pub enum ScanMessage {
    Progress(ScanProgress),
    /// The startup scan finished, was cancelled, or failed at its root.
    ScanComplete(Result<ScanReport, ScanError>),
    /// A subtree rescan finished; hand it to the explorer.
    RescanComplete(RescanOutcome),
}
