//! Subtree rescans.

use std::path::{Path, PathBuf};

use tokio_util::sync::CancellationToken;

use burrow_core::{NodeId, ScanConfig, ScanError, ScanReport};
use burrow_scan::Scanner;

/// A rescan handed out by [`Explorer::begin_rescan`](super::Explorer::begin_rescan).
///
/// The job owns everything the walk needs and no reference into the tree,
/// so it can run on another thread while the explorer keeps serving reads.
#[derive(Debug, Clone)]
pub struct RescanJob {
    target: NodeId,
    config: ScanConfig,
    token: CancellationToken,
}

impl RescanJob {
    pub(crate) fn new(target: NodeId, config: ScanConfig, token: CancellationToken) -> Self {
        Self {
            target,
            config,
            token,
        }
    }

    /// Node being rescanned.
    pub fn target(&self) -> NodeId {
        self.target
    }

    /// Directory being walked.
    pub fn path(&self) -> &Path {
        &self.config.root
    }

    /// Token that stops the walk.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Walk with a fresh scanner. Blocks until done or cancelled.
    pub fn run(self) -> RescanOutcome {
        self.run_with(&Scanner::new())
    }

    /// Walk with `scanner`, so callers can subscribe to its progress.
    pub fn run_with(self, scanner: &Scanner) -> RescanOutcome {
        let result = scanner.scan_with_cancel(&self.config, &self.token);
        RescanOutcome {
            target: self.target,
            path: self.config.root,
            result,
        }
    }
}

/// Result of a [`RescanJob`].
#[derive(Debug)]
pub struct RescanOutcome {
    pub target: NodeId,
    pub path: PathBuf,
    pub result: Result<ScanReport, ScanError>,
}
