//! Explorer errors.

use std::path::PathBuf;

use thiserror::Error;

use burrow_core::{ScanError, TreeError};

/// Errors returned by [`Explorer`](super::Explorer) operations.
#[derive(Debug, Error)]
pub enum ExplorerError {
    /// Only directories can be entered or rescanned.
    #[error("Not a directory: {name}")]
    NotADirectory { name: String },

    /// The directory was deliberately left out of the scan.
    #[error("{name} is {reason}, it was not scanned")]
    NotScanned { name: String, reason: &'static str },

    /// The operation is not valid in the current state.
    #[error("Cannot {operation} while {state}")]
    InvalidState {
        operation: &'static str,
        state: &'static str,
    },

    /// A rescan is already running.
    #[error("A scan is already in progress")]
    ScanInProgress,

    /// The current directory is empty.
    #[error("Nothing selected")]
    NothingSelected,

    /// Removing from the filesystem failed; the tree was left unchanged.
    #[error("Cannot delete {path}: {source}")]
    Delete {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The rescan walk failed at its root.
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// Tree mutation failed.
    #[error(transparent)]
    Tree(#[from] TreeError),
}
