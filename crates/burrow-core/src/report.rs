//! Scan result container and statistics.

use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

use crate::config::ScanConfig;
use crate::error::ScanWarning;
use crate::tree::{Aggregate, DirTree};

/// Counters collected while a tree is built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStats {
    /// Regular files.
    pub files: u64,
    /// Directories, root included.
    pub dirs: u64,
    /// Symbolic links.
    pub symlinks: u64,
    /// Sockets, fifos and devices.
    pub others: u64,
    /// Entries flagged as excluded.
    pub excluded: u64,
    /// Entries that failed to read.
    pub errors: u64,
    /// Links whose disk usage was already counted elsewhere.
    pub shared_hardlinks: u64,
    /// Deepest level reached (root = 0).
    pub max_depth: u32,
}

impl ScanStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of entries seen.
    pub fn total_items(&self) -> u64 {
        self.files + self.dirs + self.symlinks + self.others
    }

    /// Record the deepest level reached.
    pub fn record_depth(&mut self, depth: u32) {
        self.max_depth = self.max_depth.max(depth);
    }
}

/// A scanned tree together with how it was obtained.
#[derive(Debug, Clone)]
pub struct ScanReport {
    /// The tree, aggregates up to date.
    pub tree: DirTree,

    /// Canonical root path that was scanned.
    pub root_path: PathBuf,

    /// When this scan was performed.
    pub scanned_at: SystemTime,

    /// Duration of the scan.
    pub scan_duration: Duration,

    /// Scan configuration used.
    pub config: ScanConfig,

    /// Summary counters.
    pub stats: ScanStats,

    /// Per-entry problems met during the walk.
    pub warnings: Vec<ScanWarning>,

    /// False when the walk was cancelled before it finished.
    pub complete: bool,
}

impl ScanReport {
    /// Wrap an already aggregated tree with default bookkeeping.
    pub fn new(tree: DirTree, root_path: impl Into<PathBuf>) -> Self {
        let root_path = root_path.into();
        Self {
            tree,
            config: ScanConfig::new(&root_path),
            root_path,
            scanned_at: SystemTime::now(),
            scan_duration: Duration::ZERO,
            stats: ScanStats::new(),
            warnings: Vec::new(),
            complete: true,
        }
    }

    /// Totals of the root directory.
    pub fn totals(&self) -> Option<Aggregate> {
        self.tree.aggregate(self.tree.root())
    }

    /// Check if there were any warnings during scanning.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
