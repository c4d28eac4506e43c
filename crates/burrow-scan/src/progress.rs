//! Scan progress reporting.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use burrow_core::Entry;

/// Progress information during a scan.
#[derive(Debug, Clone, Default)]
pub struct ScanProgress {
    /// Non-directory entries seen so far.
    pub files_scanned: u64,
    /// Directories seen so far.
    pub dirs_scanned: u64,
    /// Bytes seen so far, in the metric the scan was configured for.
    pub bytes_scanned: u64,
    /// Last path handled.
    pub current_path: PathBuf,
    /// Entries that failed to read.
    pub errors_count: u64,
    /// Time elapsed since the scan started.
    pub elapsed: Duration,
}

impl ScanProgress {
    /// Create initial progress state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries per second.
    pub fn items_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.total_items() as f64 / secs
        } else {
            0.0
        }
    }

    /// Get total items scanned (files + dirs).
    pub fn total_items(&self) -> u64 {
        self.files_scanned + self.dirs_scanned
    }
}

/// Running counters behind the progress snapshots.
#[derive(Debug)]
pub(crate) struct ProgressTracker {
    start_time: Instant,
    apparent: bool,
    files_scanned: u64,
    dirs_scanned: u64,
    bytes_scanned: u64,
    errors_count: u64,
    current_path: PathBuf,
}

impl ProgressTracker {
    pub fn new(apparent: bool) -> Self {
        Self {
            start_time: Instant::now(),
            apparent,
            files_scanned: 0,
            dirs_scanned: 0,
            bytes_scanned: 0,
            errors_count: 0,
            current_path: PathBuf::new(),
        }
    }

    pub fn record(&mut self, path: &Path, entry: &Entry) {
        if entry.is_dir() {
            self.dirs_scanned += 1;
        } else {
            self.files_scanned += 1;
            self.bytes_scanned += if self.apparent {
                entry.apparent_size
            } else if entry.flags.shared_hardlink {
                0
            } else {
                entry.disk_usage
            };
        }
        if entry.flags.read_error {
            self.errors_count += 1;
        }
        self.current_path.clear();
        self.current_path.push(path);
    }

    pub fn record_error(&mut self) {
        self.errors_count += 1;
    }

    pub fn total_items(&self) -> u64 {
        self.files_scanned + self.dirs_scanned
    }

    pub fn snapshot(&self) -> ScanProgress {
        ScanProgress {
            files_scanned: self.files_scanned,
            dirs_scanned: self.dirs_scanned,
            bytes_scanned: self.bytes_scanned,
            current_path: self.current_path.clone(),
            errors_count: self.errors_count,
            elapsed: self.start_time.elapsed(),
        }
    }
}
