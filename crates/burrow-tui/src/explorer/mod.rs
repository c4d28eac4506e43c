//! The interactive explorer.
//!
//! [`Explorer`] owns the scanned tree and everything needed to browse it:
//! the current directory, the selection, sort settings and the
//! Browsing / ConfirmingDelete / Scanning state machine. It has no
//! terminal dependency; the app layer maps keys onto these operations and
//! renders [`Explorer::listing`].
//!
//! Every mutation (deletion, splicing in a rescan) settles the stale
//! aggregates before returning, and [`Explorer::listing`] settles again
//! before building rows, so totals shown are never stale.

mod deletion;
mod error;
mod navigation;
mod scanning;
mod state;

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use tokio_util::sync::CancellationToken;

use burrow_core::{
    Aggregate, DirTree, Entry, EntryKind, NodeId, ScanConfig, ScanReport, ScanWarning,
    SizeMetric, TreeError, settle,
};

use crate::glyph::{GlyphProvider, Glyphs};
use crate::ui::format_size;

pub use deletion::{FsRemover, Remover};
pub use error::ExplorerError;
pub use navigation::{Cursor, ListNavigator, PAGE_SIZE};
pub use scanning::{RescanJob, RescanOutcome};
pub use state::{ExplorerConfig, ExplorerState, Row, SortKey, SortOrder, SortSpec, Status};

/// Cursor-driven view over a scanned tree.
#[derive(Debug)]
pub struct Explorer {
    tree: DirTree,
    root_path: PathBuf,
    scan_config: ScanConfig,
    config: ExplorerConfig,
    glyphs: Glyphs,
    current: NodeId,
    selected: Option<NodeId>,
    state: ExplorerState,
    status: Option<Status>,
    warnings: Vec<ScanWarning>,
    complete: bool,
}

impl Explorer {
    /// Open a finished scan. The glyphs are queried once and cached.
    pub fn new(
        report: ScanReport,
        config: ExplorerConfig,
        glyphs: &(impl GlyphProvider + ?Sized),
    ) -> Self {
        let mut explorer = Self::with_tree(report.tree, report.root_path, config, glyphs);
        explorer.scan_config = report.config;
        explorer.warnings = report.warnings;
        explorer.complete = report.complete;
        if !explorer.complete {
            explorer.status = Some(Status::error("Scan was cancelled, totals are incomplete"));
        }
        explorer
    }

    /// Open a tree that did not come from a [`ScanReport`].
    pub fn with_tree(
        mut tree: DirTree,
        root_path: impl Into<PathBuf>,
        config: ExplorerConfig,
        glyphs: &(impl GlyphProvider + ?Sized),
    ) -> Self {
        settle(&mut tree);
        let root_path = root_path.into();
        let current = tree.root();
        let mut explorer = Self {
            tree,
            scan_config: ScanConfig::new(&root_path),
            root_path,
            config,
            glyphs: Glyphs::from_provider(glyphs),
            current,
            selected: None,
            state: ExplorerState::Browsing,
            status: None,
            warnings: Vec::new(),
            complete: true,
        };
        explorer.select_first();
        explorer
    }

    /// Use the settings of the scan that produced the tree. They decide how
    /// rescans walk and which mount points count as not descended.
    pub fn with_scan_config(mut self, scan_config: ScanConfig) -> Self {
        self.scan_config = scan_config;
        self
    }

    // Accessors

    /// The scanned tree.
    pub fn tree(&self) -> &DirTree {
        &self.tree
    }

    /// Path of the tree root on disk.
    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    /// Settings used for rescans.
    pub fn scan_config(&self) -> &ScanConfig {
        &self.scan_config
    }

    /// Display settings.
    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    /// Cached drawing glyphs.
    pub fn glyphs(&self) -> &Glyphs {
        &self.glyphs
    }

    /// Directory being shown.
    pub fn current(&self) -> NodeId {
        self.current
    }

    /// Highlighted entry of the current directory.
    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    /// Entry of the highlighted row.
    pub fn selected_entry(&self) -> Option<&Entry> {
        self.selected.and_then(|id| self.tree.entry(id))
    }

    /// State machine position.
    pub fn state(&self) -> &ExplorerState {
        &self.state
    }

    /// Last inline message.
    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    /// Replace the inline message.
    pub fn set_status(&mut self, status: Status) {
        self.status = Some(status);
    }

    /// Drop the inline message.
    pub fn clear_status(&mut self) {
        self.status = None;
    }

    /// Problems collected by the scans behind this tree.
    pub fn warnings(&self) -> &[ScanWarning] {
        &self.warnings
    }

    /// False when the initial scan was cancelled.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Node under rescan, if any.
    pub fn pending_target(&self) -> Option<NodeId> {
        match self.state {
            ExplorerState::Scanning { target, .. } => Some(target),
            _ => None,
        }
    }

    /// Full path of a node.
    pub fn absolute_path(&self, id: NodeId) -> Option<PathBuf> {
        let relative = self.tree.relative_path(id)?;
        if relative.as_os_str().is_empty() {
            Some(self.root_path.clone())
        } else {
            Some(self.root_path.join(relative))
        }
    }

    /// Full path of the current directory.
    pub fn current_path(&self) -> PathBuf {
        self.absolute_path(self.current)
            .unwrap_or_else(|| self.root_path.clone())
    }

    /// Totals of the current directory.
    pub fn current_totals(&mut self) -> Aggregate {
        settle(&mut self.tree);
        self.tree.aggregate(self.current).unwrap_or_default()
    }

    // Listing

    /// Sorted rows of the current directory with settled aggregates.
    pub fn listing(&mut self) -> Vec<Row> {
        settle(&mut self.tree);
        self.rows()
    }

    fn rows(&self) -> Vec<Row> {
        let metric = self.config.metric;
        let total = self
            .tree
            .aggregate(self.current)
            .map(|a| a.size(metric))
            .unwrap_or(0);
        let pending = self.pending_target();

        let mut rows: Vec<Row> = self
            .tree
            .children(self.current)
            .iter()
            .filter_map(|&id| self.row(id, total, pending))
            .collect();
        // stable, so full ties keep walk order
        rows.sort_by(|a, b| self.compare(a, b));
        rows
    }

    fn row(&self, id: NodeId, total: u64, pending: Option<NodeId>) -> Option<Row> {
        let entry = self.tree.entry(id)?;
        if !self.config.show_hidden && entry.is_hidden() {
            return None;
        }
        let aggregate = self.tree.aggregate(id).unwrap_or_default();
        let size = if entry.is_dir() {
            aggregate.size(self.config.metric)
        } else {
            match self.config.metric {
                SizeMetric::DiskUsage => entry.disk_usage,
                SizeMetric::ApparentSize => entry.apparent_size,
            }
        };
        let ratio = if total > 0 {
            (size as f64 / total as f64).min(1.0)
        } else {
            0.0
        };

        Some(Row {
            id,
            name: entry.name.clone(),
            kind: entry.kind.clone(),
            size,
            aggregate,
            modified: entry.modified,
            flag: self.flag(entry, &aggregate),
            ratio,
            pending: pending.is_some_and(|target| self.tree.is_ancestor_or_self(target, id)),
        })
    }

    fn flag(&self, entry: &Entry, aggregate: &Aggregate) -> char {
        let flags = entry.flags;
        if flags.read_error {
            '!'
        } else if flags.excluded {
            '<'
        } else if flags.mount_point && !self.scan_config.cross_filesystems {
            '>'
        } else if aggregate.has_error {
            '.'
        } else if matches!(entry.kind, EntryKind::Other) {
            '@'
        } else if flags.shared_hardlink {
            'H'
        } else if entry.is_dir() && aggregate.item_count == 0 {
            'e'
        } else {
            ' '
        }
    }

    fn compare(&self, a: &Row, b: &Row) -> Ordering {
        if self.config.dirs_first {
            match (a.is_dir(), b.is_dir()) {
                (true, false) => return Ordering::Less,
                (false, true) => return Ordering::Greater,
                _ => {}
            }
        }
        let primary = match self.config.sort.key {
            SortKey::Size => a.size.cmp(&b.size),
            SortKey::Name => a.name.cmp(&b.name),
            SortKey::Items => a.aggregate.item_count.cmp(&b.aggregate.item_count),
            SortKey::Modified => a.modified.cmp(&b.modified),
        };
        let primary = match self.config.sort.order {
            SortOrder::Ascending => primary,
            SortOrder::Descending => primary.reverse(),
        };
        primary.then_with(|| a.name.cmp(&b.name))
    }

    // Navigation

    /// Descend into a directory.
    pub fn enter(&mut self, node: NodeId) -> Result<(), ExplorerError> {
        self.ensure_not_confirming("navigate")?;
        self.ensure_scannable(node)?;
        self.current = node;
        self.select_first();
        Ok(())
    }

    /// Descend into the highlighted directory.
    pub fn enter_selected(&mut self) -> Result<(), ExplorerError> {
        let selected = self.selected.ok_or(ExplorerError::NothingSelected)?;
        self.enter(selected)
    }

    /// Go to the parent directory, keeping the directory we left selected.
    /// Returns `false` at the root.
    pub fn up(&mut self) -> bool {
        if matches!(self.state, ExplorerState::ConfirmingDelete { .. }) {
            return false;
        }
        let Some(parent) = self.tree.parent(self.current) else {
            return false;
        };
        let child = self.current;
        self.current = parent;
        self.selected = Some(child);
        self.fix_selection();
        true
    }

    /// Move the highlight by `delta` rows, clamped to the listing.
    pub fn move_selection(&mut self, delta: isize) {
        let rows = self.listing();
        let index = self.index_in(&rows).unwrap_or(0);
        let mut cursor = Cursor::new(index, rows.len());
        cursor.move_by(delta);
        self.selected = rows.get(cursor.selected()).map(|r| r.id);
    }

    /// Highlight the first row.
    pub fn select_first(&mut self) {
        self.selected = self.listing().first().map(|r| r.id);
    }

    /// Highlight the last row.
    pub fn select_last(&mut self) {
        self.selected = self.listing().last().map(|r| r.id);
    }

    /// Highlight a specific child of the current directory.
    pub fn select(&mut self, node: NodeId) -> bool {
        if self.listing().iter().any(|r| r.id == node) {
            self.selected = Some(node);
            true
        } else {
            false
        }
    }

    /// Position of the highlight within `rows`.
    pub fn index_in(&self, rows: &[Row]) -> Option<usize> {
        let selected = self.selected?;
        rows.iter().position(|r| r.id == selected)
    }

    fn fix_selection(&mut self) {
        let rows = self.listing();
        if self.index_in(&rows).is_none() {
            self.selected = rows.first().map(|r| r.id);
        }
    }

    // Display settings

    /// Change the sort order.
    pub fn set_sort(&mut self, sort: SortSpec) {
        self.config.sort = sort;
    }

    /// Switch between disk usage and apparent size.
    pub fn toggle_metric(&mut self) -> SizeMetric {
        self.config.metric = self.config.metric.toggle();
        self.config.metric
    }

    /// Show or hide dot-entries.
    pub fn toggle_hidden(&mut self) -> bool {
        self.config.show_hidden = !self.config.show_hidden;
        self.fix_selection();
        self.config.show_hidden
    }

    /// Group directories before files.
    pub fn toggle_dirs_first(&mut self) -> bool {
        self.config.dirs_first = !self.config.dirs_first;
        self.config.dirs_first
    }

    // Deletion

    /// Ask to delete the highlighted entry. Browsing -> ConfirmingDelete.
    pub fn request_delete(&mut self) -> Result<NodeId, ExplorerError> {
        match self.state {
            ExplorerState::Browsing => {}
            ExplorerState::Scanning { .. } => return Err(ExplorerError::ScanInProgress),
            ExplorerState::ConfirmingDelete { .. } => {
                return Err(self.invalid_state("request deletion"));
            }
        }
        let target = self
            .selected
            .filter(|&id| self.tree.contains(id))
            .ok_or(ExplorerError::NothingSelected)?;
        self.state = ExplorerState::ConfirmingDelete { target };
        Ok(target)
    }

    /// Carry out the pending deletion. ConfirmingDelete -> Browsing.
    ///
    /// The entry is removed from disk first. If that fails the tree is left
    /// untouched and the error is kept as the inline status. On success the
    /// node leaves the tree, ancestors are re-aggregated and the highlight
    /// moves to the next row, else the previous one.
    pub fn confirm_delete(&mut self, remover: &dyn Remover) -> Result<Entry, ExplorerError> {
        let ExplorerState::ConfirmingDelete { target } = self.state else {
            return Err(self.invalid_state("confirm deletion"));
        };
        self.state = ExplorerState::Browsing;

        let entry = self.tree.entry(target).ok_or(TreeError::StaleNode)?;
        let is_dir = entry.is_dir();
        let name = entry.name.to_string();
        let path = self.absolute_path(target).ok_or(TreeError::StaleNode)?;

        let rows = self.listing();
        let freed = rows.iter().find(|r| r.id == target).map_or(0, |r| r.size);
        let next = rows
            .iter()
            .position(|r| r.id == target)
            .and_then(|i| rows.get(i + 1).or_else(|| i.checked_sub(1).and_then(|p| rows.get(p))))
            .map(|r| r.id);

        if let Err(source) = remover.remove(&path, is_dir) {
            tracing::warn!(path = %path.display(), error = %source, "deletion failed");
            self.status = Some(Status::error(format!(
                "Cannot delete {}: {source}",
                path.display()
            )));
            return Err(ExplorerError::Delete { path, source });
        }

        let removed = self.tree.remove(target)?;
        settle(&mut self.tree);
        self.selected = next;
        self.warnings.retain(|w| !w.path.starts_with(&path));

        tracing::info!(path = %path.display(), freed, "deleted");
        self.status = Some(Status::ok(format!("Deleted {name} ({} freed)", format_size(freed))));
        Ok(removed)
    }

    /// Request and confirm in one step.
    pub fn delete_selected(&mut self, remover: &dyn Remover) -> Result<Entry, ExplorerError> {
        self.request_delete()?;
        self.confirm_delete(remover)
    }

    /// Back out of the current state.
    ///
    /// Dismisses a pending deletion, or asks a running rescan to stop; the
    /// rescan leaves Scanning once its outcome is handed to
    /// [`finish_rescan`](Self::finish_rescan).
    pub fn cancel(&mut self) {
        if matches!(self.state, ExplorerState::ConfirmingDelete { .. }) {
            self.state = ExplorerState::Browsing;
            return;
        }
        if let ExplorerState::Scanning { token, path, .. } = &self.state {
            tracing::debug!(path = %path.display(), "rescan cancel requested");
            token.cancel();
            self.status = Some(Status::ok("Cancelling rescan"));
        }
    }

    // Rescan

    /// Start rescanning a directory. Browsing -> Scanning.
    ///
    /// The returned job runs the walk without touching the tree; hand its
    /// outcome back to [`finish_rescan`](Self::finish_rescan).
    pub fn begin_rescan(&mut self, node: NodeId) -> Result<RescanJob, ExplorerError> {
        match self.state {
            ExplorerState::Browsing => {}
            ExplorerState::Scanning { .. } => return Err(ExplorerError::ScanInProgress),
            ExplorerState::ConfirmingDelete { .. } => return Err(self.invalid_state("rescan")),
        }
        self.ensure_scannable(node)?;
        let path = self.absolute_path(node).ok_or(TreeError::StaleNode)?;
        let token = CancellationToken::new();

        tracing::debug!(path = %path.display(), "rescan started");
        self.state = ExplorerState::Scanning {
            target: node,
            path: path.clone(),
            token: token.clone(),
        };
        Ok(RescanJob::new(node, self.scan_config.with_root(path), token))
    }

    /// Install the result of a rescan. Scanning -> Browsing.
    ///
    /// A cancelled or interrupted rescan is dropped and the old subtree stays
    /// as it was. A finished one replaces the old subtree in one step.
    pub fn finish_rescan(&mut self, outcome: RescanOutcome) -> Result<(), ExplorerError> {
        let (target, token) = match &self.state {
            ExplorerState::Scanning { target, token, .. } if *target == outcome.target => {
                (*target, token.clone())
            }
            _ => return Err(self.invalid_state("finish a rescan")),
        };
        self.state = ExplorerState::Browsing;

        let report = match outcome.result {
            Ok(report) => report,
            Err(err) => {
                tracing::warn!(path = %outcome.path.display(), error = %err, "rescan failed");
                if self.tree.contains(target) {
                    self.tree.update_entry(target, |e| e.flags.read_error = true)?;
                    settle(&mut self.tree);
                }
                self.status = Some(Status::error(format!("Rescan failed: {err}")));
                return Err(err.into());
            }
        };
        if token.is_cancelled() || !report.complete {
            tracing::info!(path = %outcome.path.display(), "rescan cancelled, keeping old tree");
            self.status = Some(Status::ok("Rescan cancelled"));
            return Ok(());
        }

        let mount_point = self
            .tree
            .entry(target)
            .is_some_and(|e| e.flags.mount_point);
        let current_below = self.names_between(target, self.current);
        let selected_name = self.selected_entry().map(|e| e.name.clone());

        let new_id = self.tree.replace_subtree(target, report.tree)?;
        if mount_point {
            self.tree
                .update_entry(new_id, |e| e.flags.mount_point = true)?;
        }
        settle(&mut self.tree);

        if let Some(names) = current_below {
            self.current = self.tree.find_path(new_id, names).unwrap_or(new_id);
        }
        if !self.selected.is_some_and(|id| self.tree.contains(id)) {
            self.selected = selected_name.and_then(|name| self.tree.find_child(self.current, &name));
        }
        self.fix_selection();

        self.warnings.retain(|w| !w.path.starts_with(&outcome.path));
        self.warnings.extend(report.warnings);
        if target == self.tree.root() || self.tree.parent(new_id).is_none() {
            self.complete = true;
        }

        if let Some(totals) = self.tree.aggregate(new_id) {
            tracing::info!(
                path = %outcome.path.display(),
                items = totals.item_count,
                disk_usage = totals.disk_usage,
                "rescan installed"
            );
        }
        self.status = Some(Status::ok(format!("Rescanned {}", outcome.path.display())));
        Ok(())
    }

    /// Rescan a directory on the calling thread.
    pub fn rescan(&mut self, node: NodeId) -> Result<(), ExplorerError> {
        let job = self.begin_rescan(node)?;
        let outcome = job.run();
        self.finish_rescan(outcome)
    }

    /// Names leading from `ancestor` down to `node`, if `node` lies inside.
    fn names_between(&self, ancestor: NodeId, node: NodeId) -> Option<Vec<String>> {
        if !self.tree.is_ancestor_or_self(ancestor, node) {
            return None;
        }
        let mut names = Vec::new();
        let mut id = node;
        while id != ancestor {
            names.push(self.tree.entry(id)?.name.to_string());
            id = self.tree.parent(id)?;
        }
        names.reverse();
        Some(names)
    }

    /// Only directories the scan walked into may be entered or rescanned.
    /// A rescan walks its target as a root, where exclusions and the device
    /// check do not apply.
    fn ensure_scannable(&self, node: NodeId) -> Result<(), ExplorerError> {
        let entry = self.tree.entry(node).ok_or(TreeError::StaleNode)?;
        if !entry.is_dir() {
            return Err(ExplorerError::NotADirectory {
                name: entry.name.to_string(),
            });
        }
        let reason = if entry.flags.excluded {
            Some("excluded")
        } else if entry.flags.mount_point && !self.scan_config.cross_filesystems {
            Some("on another filesystem")
        } else {
            None
        };
        match reason {
            Some(reason) => Err(ExplorerError::NotScanned {
                name: entry.name.to_string(),
                reason,
            }),
            None => Ok(()),
        }
    }

    fn ensure_not_confirming(&self, operation: &'static str) -> Result<(), ExplorerError> {
        match self.state {
            ExplorerState::ConfirmingDelete { .. } => Err(self.invalid_state(operation)),
            _ => Ok(()),
        }
    }

    fn invalid_state(&self, operation: &'static str) -> ExplorerError {
        ExplorerError::InvalidState {
            operation,
            state: self.state.label(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glyph::AsciiGlyphs;
    use burrow_core::EntryFlags;

    fn explorer() -> Explorer {
        let mut tree = DirTree::new(Entry::directory("/data"));
        let root = tree.root();
        tree.insert(root, Entry::file("A", 100, 100)).unwrap();
        tree.insert(root, Entry::file("B", 200, 200)).unwrap();
        let d = tree.insert(root, Entry::directory("D")).unwrap();
        tree.insert(d, Entry::file("C", 50, 50)).unwrap();
        tree.insert(root, Entry::file(".hidden", 1, 1)).unwrap();
        Explorer::with_tree(tree, "/data", ExplorerConfig::default(), &AsciiGlyphs)
    }

    fn names(rows: &[Row]) -> Vec<String> {
        rows.iter().map(|r| r.name.to_string()).collect()
    }

    #[test]
    fn test_default_sort_is_size_descending() {
        let mut explorer = explorer();
        let rows = explorer.listing();
        assert_eq!(names(&rows), ["B", "A", "D", ".hidden"]);
        assert_eq!(explorer.selected(), Some(rows[0].id));
        assert_eq!(explorer.glyphs().top_left.as_char(), '+');
    }

    #[test]
    fn test_sort_by_name_and_dirs_first() {
        let mut explorer = explorer();
        explorer.set_sort(SortSpec::new(SortKey::Name, SortOrder::Ascending));
        assert_eq!(names(&explorer.listing()), [".hidden", "A", "B", "D"]);

        explorer.toggle_dirs_first();
        assert_eq!(names(&explorer.listing()), ["D", ".hidden", "A", "B"]);
    }

    #[test]
    fn test_hidden_toggle_keeps_totals() {
        let mut explorer = explorer();
        explorer.toggle_hidden();
        assert_eq!(names(&explorer.listing()), ["B", "A", "D"]);
        assert_eq!(explorer.current_totals().apparent_size, 351);
    }

    #[test]
    fn test_percentages() {
        let mut explorer = explorer();
        let rows = explorer.listing();
        let b = rows.iter().find(|r| r.name == "B").unwrap();
        assert!((b.ratio - 200.0 / 351.0).abs() < 1e-9);
    }

    #[test]
    fn test_enter_file_fails() {
        let mut explorer = explorer();
        let rows = explorer.listing();
        let a = rows.iter().find(|r| r.name == "A").unwrap().id;
        assert!(matches!(
            explorer.enter(a),
            Err(ExplorerError::NotADirectory { .. })
        ));
    }

    #[test]
    fn test_enter_and_up_restore_selection() {
        let mut explorer = explorer();
        let root = explorer.current();
        let d = explorer.tree().find_child(root, "D").unwrap();

        explorer.enter(d).unwrap();
        assert_eq!(names(&explorer.listing()), ["C"]);
        assert_eq!(explorer.current_path(), PathBuf::from("/data/D"));

        assert!(explorer.up());
        assert_eq!(explorer.current(), root);
        assert_eq!(explorer.selected(), Some(d));
        assert!(!explorer.up());
    }

    #[test]
    fn test_move_selection_clamps() {
        let mut explorer = explorer();
        explorer.move_selection(2);
        assert_eq!(explorer.selected_entry().unwrap().name, "D");
        explorer.move_selection(100);
        assert_eq!(explorer.selected_entry().unwrap().name, ".hidden");
        explorer.move_selection(-100);
        assert_eq!(explorer.selected_entry().unwrap().name, "B");
    }

    #[test]
    fn test_flags() {
        let mut tree = DirTree::new(Entry::directory("/f"));
        let root = tree.root();
        let broken = Entry::directory("broken").with_flags(EntryFlags {
            read_error: true,
            ..EntryFlags::default()
        });
        tree.insert(root, broken).unwrap();
        let outer = tree.insert(root, Entry::directory("outer")).unwrap();
        tree.insert(
            outer,
            Entry::file("bad", 0, 0).with_flags(EntryFlags {
                read_error: true,
                ..EntryFlags::default()
            }),
        )
        .unwrap();
        tree.insert(root, Entry::directory("empty")).unwrap();
        tree.insert(root, Entry::other("fifo")).unwrap();
        let mut explorer = Explorer::with_tree(tree, "/f", ExplorerConfig::default(), &AsciiGlyphs);

        let rows = explorer.listing();
        let flag = |name: &str| rows.iter().find(|r| r.name == name).unwrap().flag;
        assert_eq!(flag("broken"), '!');
        assert_eq!(flag("outer"), '.');
        assert_eq!(flag("empty"), 'e');
        assert_eq!(flag("fifo"), '@');
    }

    fn mounted_tree() -> DirTree {
        let mut tree = DirTree::new(Entry::directory("/m"));
        let root = tree.root();
        let mnt = Entry::directory("mnt").with_flags(EntryFlags {
            mount_point: true,
            ..EntryFlags::default()
        });
        let mnt = tree.insert(root, mnt).unwrap();
        tree.insert(mnt, Entry::file("disk.img", 10, 10)).unwrap();
        tree
    }

    #[test]
    fn test_mount_point_not_descended() {
        let config = ScanConfig::new("/m");
        let mut explorer =
            Explorer::with_tree(mounted_tree(), "/m", ExplorerConfig::default(), &AsciiGlyphs)
                .with_scan_config(config);
        let rows = explorer.listing();
        assert_eq!(rows[0].flag, '>');

        let mnt = rows[0].id;
        assert!(matches!(
            explorer.enter(mnt),
            Err(ExplorerError::NotScanned { .. })
        ));
        assert!(matches!(
            explorer.begin_rescan(mnt),
            Err(ExplorerError::NotScanned { .. })
        ));
        assert!(explorer.state().is_browsing());
        assert_eq!(explorer.current(), explorer.tree().root());
    }

    #[test]
    fn test_mount_point_crossed() {
        let config = ScanConfig::builder()
            .root("/m")
            .cross_filesystems(true)
            .build()
            .unwrap();
        let mut explorer =
            Explorer::with_tree(mounted_tree(), "/m", ExplorerConfig::default(), &AsciiGlyphs)
                .with_scan_config(config);
        let rows = explorer.listing();
        assert_eq!(rows[0].flag, ' ');

        explorer.enter(rows[0].id).unwrap();
        assert_eq!(names(&explorer.listing()), ["disk.img"]);
    }

    #[test]
    fn test_flag_precedence() {
        let mut tree = DirTree::new(Entry::directory("/p"));
        let root = tree.root();
        let both = Entry::directory("both").with_flags(EntryFlags {
            excluded: true,
            mount_point: true,
            ..EntryFlags::default()
        });
        tree.insert(root, both).unwrap();
        let mnt = Entry::directory("mnt").with_flags(EntryFlags {
            mount_point: true,
            ..EntryFlags::default()
        });
        let mnt = tree.insert(root, mnt).unwrap();
        tree.insert(
            mnt,
            Entry::file("bad", 0, 0).with_flags(EntryFlags {
                read_error: true,
                ..EntryFlags::default()
            }),
        )
        .unwrap();
        let mut explorer = Explorer::with_tree(tree, "/p", ExplorerConfig::default(), &AsciiGlyphs);

        let rows = explorer.listing();
        let flag = |name: &str| rows.iter().find(|r| r.name == name).unwrap().flag;
        assert_eq!(flag("both"), '<');
        assert_eq!(flag("mnt"), '>');
    }

    #[test]
    fn test_cancel_delete_is_noop() {
        let mut explorer = explorer();
        let before = explorer.tree().node_count();
        explorer.request_delete().unwrap();
        assert!(matches!(
            explorer.state(),
            ExplorerState::ConfirmingDelete { .. }
        ));
        assert!(explorer.request_delete().is_err());

        explorer.cancel();
        assert!(explorer.state().is_browsing());
        assert_eq!(explorer.tree().node_count(), before);
    }

    #[test]
    fn test_confirm_without_request_fails() {
        let mut explorer = explorer();
        assert!(matches!(
            explorer.confirm_delete(&FsRemover),
            Err(ExplorerError::InvalidState { .. })
        ));
    }
}
