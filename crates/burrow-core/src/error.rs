//! Error types for scanning and tree operations.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that abort a scan. Only problems with the scan root end up here;
/// everything below the root is recorded as a [`ScanWarning`] instead.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Permission denied for the scan root.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Scan root does not exist.
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Root path is not a directory.
    #[error("Root path is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Other error.
    #[error("{message}")]
    Other { message: String },
}

impl ScanError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }
}

/// Kind of per-entry problem met during a walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningKind {
    /// Permission was denied.
    PermissionDenied,
    /// Transient read failure.
    Io,
    /// Entry vanished between listing and stat.
    NotFound,
    /// Directory is on another filesystem. Informational.
    CrossDeviceBoundary,
}

impl WarningKind {
    /// Classify an I/O error.
    pub fn from_io(error: &std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied,
            std::io::ErrorKind::NotFound => Self::NotFound,
            _ => Self::Io,
        }
    }

    /// Whether this kind marks the entry as failed.
    pub fn is_error(&self) -> bool {
        !matches!(self, Self::CrossDeviceBoundary)
    }
}

/// Non-fatal warning encountered during a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanWarning {
    /// Path where the warning occurred.
    pub path: PathBuf,
    /// Human-readable message.
    pub message: String,
    /// Kind of warning.
    pub kind: WarningKind,
}

impl ScanWarning {
    /// Create a new scan warning.
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>, kind: WarningKind) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            kind,
        }
    }

    /// Create a warning from an I/O error.
    pub fn from_io(path: impl Into<PathBuf>, error: &std::io::Error) -> Self {
        let path = path.into();
        let kind = WarningKind::from_io(error);
        Self {
            message: format!("{}: {error}", path.display()),
            path,
            kind,
        }
    }

    /// Create a mount point crossing notice.
    pub fn cross_device(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            message: format!("Different filesystem: {}", path.display()),
            path,
            kind: WarningKind::CrossDeviceBoundary,
        }
    }
}

/// Errors raised by [`DirTree`](crate::DirTree) mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TreeError {
    /// The node id does not refer to a live node.
    #[error("Node no longer exists in the tree")]
    StaleNode,

    /// Children can only be attached to directories.
    #[error("Node is not a directory")]
    NotADirectory,

    /// The root can be replaced but not removed.
    #[error("The root directory cannot be removed")]
    RootRemoval,
}
