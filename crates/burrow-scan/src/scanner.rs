//! Scanner facade: walk, build, aggregate.

use std::time::{Instant, SystemTime};

use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use burrow_core::{ScanConfig, ScanError, ScanReport, settle};

use crate::builder::TreeBuilder;
use crate::progress::{ProgressTracker, ScanProgress};
use crate::walker::{Walked, Walker};

/// Items between two progress broadcasts.
const PROGRESS_INTERVAL: u64 = 1000;

/// Runs complete scans and reports progress to subscribers.
pub struct Scanner {
    progress_tx: broadcast::Sender<ScanProgress>,
}

impl Scanner {
    /// Create a new scanner.
    pub fn new() -> Self {
        let (progress_tx, _) = broadcast::channel(100);
        Self { progress_tx }
    }

    /// Subscribe to scan progress updates.
    pub fn subscribe(&self) -> broadcast::Receiver<ScanProgress> {
        self.progress_tx.subscribe()
    }

    /// Scan `config.root` to completion.
    pub fn scan(&self, config: &ScanConfig) -> Result<ScanReport, ScanError> {
        self.run(config, None)
    }

    /// Scan until done or until `token` is cancelled.
    ///
    /// A cancelled scan still returns the entries found so far as a fully
    /// aggregated tree, with [`ScanReport::complete`] set to `false`.
    pub fn scan_with_cancel(
        &self,
        config: &ScanConfig,
        token: &CancellationToken,
    ) -> Result<ScanReport, ScanError> {
        self.run(config, Some(token.clone()))
    }

    fn run(
        &self,
        config: &ScanConfig,
        token: Option<CancellationToken>,
    ) -> Result<ScanReport, ScanError> {
        let start = Instant::now();
        let walker = Walker::new(config)?;
        let mut walk = match token {
            Some(token) => walker.walk_with_cancel(token)?,
            None => walker.walk()?,
        };
        let root_path = walk.root().to_path_buf();

        let mut builder = TreeBuilder::new(&root_path);
        let mut tracker = ProgressTracker::new(config.apparent_size);

        for item in walk.by_ref() {
            match &item {
                Walked::Entry { path, entry, .. } => tracker.record(path, entry),
                Walked::ReadError { .. } => tracker.record_error(),
            }
            builder.push(item);

            if tracker.total_items() % PROGRESS_INTERVAL == 0 {
                let _ = self.progress_tx.send(tracker.snapshot());
            }
        }
        let complete = !walk.was_cancelled();
        let hardlinks = walk.registry().len();
        drop(walk);

        let (mut tree, stats, warnings) = builder.finish();
        settle(&mut tree);
        let _ = self.progress_tx.send(tracker.snapshot());

        let scan_duration = start.elapsed();
        if let Some(totals) = tree.aggregate(tree.root()) {
            tracing::info!(
                root = %root_path.display(),
                items = totals.item_count,
                disk_usage = totals.disk_usage,
                apparent_size = totals.apparent_size,
                hardlinks,
                warnings = warnings.len(),
                complete,
                elapsed_ms = scan_duration.as_millis() as u64,
                "scan finished"
            );
        }

        Ok(ScanReport {
            tree,
            config: config.with_root(&root_path),
            root_path,
            scanned_at: SystemTime::now(),
            scan_duration,
            stats,
            warnings,
            complete,
        })
    }
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_tree() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();

        fs::create_dir(root.join("dir1")).unwrap();
        fs::create_dir(root.join("dir2")).unwrap();
        fs::create_dir(root.join("dir1/subdir")).unwrap();

        fs::write(root.join("file1.txt"), "hello").unwrap();
        fs::write(root.join("dir1/file2.txt"), "world world world").unwrap();
        fs::write(root.join("dir1/subdir/file3.txt"), "test").unwrap();
        fs::write(root.join("dir2/file4.txt"), "another file here").unwrap();

        temp
    }

    #[test]
    fn test_basic_scan() {
        let temp = create_test_tree();
        let report = Scanner::new().scan(&ScanConfig::new(temp.path())).unwrap();

        assert!(report.complete);
        assert_eq!(report.stats.files, 4);
        // root, dir1, dir2, subdir
        assert_eq!(report.stats.dirs, 4);

        let totals = report.totals().unwrap();
        assert_eq!(totals.apparent_size, 5 + 17 + 4 + 17);
        assert_eq!(totals.item_count, 7);
        assert!(!totals.has_error);
    }

    #[test]
    fn test_insertion_order_is_name_order() {
        let temp = create_test_tree();
        let report = Scanner::new().scan(&ScanConfig::new(temp.path())).unwrap();
        let tree = &report.tree;
        let names: Vec<_> = tree
            .children(tree.root())
            .iter()
            .map(|&c| tree.entry(c).unwrap().name.to_string())
            .collect();
        assert_eq!(names, ["dir1", "dir2", "file1.txt"]);
    }

    #[test]
    fn test_exclude_patterns() {
        let temp = create_test_tree();
        let config = ScanConfig::builder()
            .root(temp.path())
            .exclude_patterns(vec!["dir2".to_string()])
            .build()
            .unwrap();

        let report = Scanner::new().scan(&config).unwrap();
        let tree = &report.tree;
        let dir2 = tree.find_child(tree.root(), "dir2").unwrap();

        assert!(tree.entry(dir2).unwrap().flags.excluded);
        assert!(tree.children(dir2).is_empty());
        assert_eq!(report.stats.excluded, 1);

        let totals = report.totals().unwrap();
        assert_eq!(totals.apparent_size, 5 + 17 + 4);
        // dir2 still counts as one item
        assert_eq!(totals.item_count, 6);
    }

    #[test]
    fn test_progress_is_broadcast() {
        let temp = create_test_tree();
        let scanner = Scanner::new();
        let mut rx = scanner.subscribe();
        scanner.scan(&ScanConfig::new(temp.path())).unwrap();

        let mut last = None;
        while let Ok(progress) = rx.try_recv() {
            last = Some(progress);
        }
        let last = last.unwrap();
        assert_eq!(last.total_items(), 8);
    }

    #[test]
    fn test_cancelled_scan_is_incomplete_but_aggregated() {
        let temp = create_test_tree();
        let token = CancellationToken::new();
        token.cancel();

        let report = Scanner::new()
            .scan_with_cancel(&ScanConfig::new(temp.path()), &token)
            .unwrap();
        assert!(!report.complete);
        assert_eq!(report.tree.node_count(), 1);
        assert_eq!(report.totals().unwrap().item_count, 0);
    }
}
