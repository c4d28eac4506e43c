//! Links walk results into a [`DirTree`].

use std::path::{Path, PathBuf};

use burrow_core::{DirTree, Entry, EntryKind, NodeId, ScanStats, ScanWarning};

use crate::walker::Walked;

/// Incrementally builds a tree from depth-first walk output.
///
/// The builder keeps the chain of open directories from the root down to
/// the last directory seen. Walk output arrives parents first, so the parent
/// of an entry at depth `d` is the open directory at depth `d - 1`.
#[derive(Debug)]
pub struct TreeBuilder {
    tree: DirTree,
    root_path: PathBuf,
    open: Vec<(usize, NodeId, PathBuf)>,
    stats: ScanStats,
    warnings: Vec<ScanWarning>,
}

impl TreeBuilder {
    /// Start a tree for the walk rooted at `root_path`.
    pub fn new(root_path: impl Into<PathBuf>) -> Self {
        let root_path = root_path.into();
        let tree = DirTree::new(Entry::directory(root_path.to_string_lossy()));
        let open = vec![(0, tree.root(), root_path.clone())];
        Self {
            tree,
            root_path,
            open,
            stats: ScanStats::new(),
            warnings: Vec::new(),
        }
    }

    /// Feed one walk result.
    pub fn push(&mut self, item: Walked) {
        match item {
            Walked::Entry {
                depth,
                path,
                entry,
                warning,
            } => {
                if let Some(warning) = warning {
                    self.warnings.push(warning);
                }
                self.add_entry(depth, path, entry);
            }
            Walked::ReadError { path, warning } => {
                self.stats.errors += 1;
                self.warnings.push(warning);
                match self.locate(&path) {
                    Some(id) => {
                        // locate only returns live ids
                        let _ = self.tree.update_entry(id, |e| e.flags.read_error = true);
                    }
                    None => tracing::debug!(path = %path.display(), "read error outside built tree"),
                }
            }
        }
    }

    fn add_entry(&mut self, depth: usize, path: PathBuf, entry: Entry) {
        self.record(depth, &entry);

        if depth == 0 {
            let root = self.tree.root();
            let _ = self.tree.update_entry(root, |e| *e = entry);
            return;
        }

        while self.open.last().is_some_and(|(d, ..)| *d >= depth) {
            self.open.pop();
        }
        let parent = match self.open.last() {
            Some((_, id, dir)) if path.parent() == Some(dir.as_path()) => Some(*id),
            _ => path.parent().and_then(|p| self.locate(p)),
        };
        let Some(parent) = parent else {
            tracing::debug!(path = %path.display(), "no parent for walked entry");
            return;
        };

        let is_dir = entry.is_dir();
        match self.tree.insert(parent, entry) {
            Ok(id) if is_dir => self.open.push((depth, id, path)),
            Ok(_) => {}
            Err(err) => tracing::debug!(path = %path.display(), error = %err, "entry not linked"),
        }
    }

    fn record(&mut self, depth: usize, entry: &Entry) {
        match entry.kind {
            EntryKind::File => self.stats.files += 1,
            EntryKind::Directory => self.stats.dirs += 1,
            EntryKind::Symlink { .. } => self.stats.symlinks += 1,
            EntryKind::Other => self.stats.others += 1,
        }
        if entry.flags.excluded {
            self.stats.excluded += 1;
        }
        if entry.flags.read_error {
            self.stats.errors += 1;
        }
        if entry.flags.shared_hardlink {
            self.stats.shared_hardlinks += 1;
        }
        self.stats.record_depth(depth as u32);
    }

    /// Resolve a full path to a node, preferring the open directory chain.
    fn locate(&self, path: &Path) -> Option<NodeId> {
        if let Some((_, id, _)) = self.open.iter().rev().find(|(_, _, p)| p == path) {
            return Some(*id);
        }
        let relative = path.strip_prefix(&self.root_path).ok()?;
        let names: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        self.tree.find_path(self.tree.root(), names)
    }

    /// Counters collected so far.
    pub fn stats(&self) -> &ScanStats {
        &self.stats
    }

    /// Finish building. Aggregates are left stale.
    pub fn finish(self) -> (DirTree, ScanStats, Vec<ScanWarning>) {
        (self.tree, self.stats, self.warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burrow_core::{WarningKind, settle};

    fn entry(depth: usize, path: &str, entry: Entry) -> Walked {
        Walked::Entry {
            depth,
            path: PathBuf::from(path),
            entry,
            warning: None,
        }
    }

    #[test]
    fn test_builds_nested_tree() {
        let mut builder = TreeBuilder::new("/r");
        builder.push(entry(0, "/r", Entry::directory("/r")));
        builder.push(entry(1, "/r/A", Entry::file("A", 100, 100)));
        builder.push(entry(1, "/r/D", Entry::directory("D")));
        builder.push(entry(2, "/r/D/C", Entry::file("C", 50, 50)));
        builder.push(entry(1, "/r/B", Entry::file("B", 200, 200)));

        let (mut tree, stats, warnings) = builder.finish();
        settle(&mut tree);

        let root = tree.root();
        let names: Vec<_> = tree
            .children(root)
            .iter()
            .map(|&c| tree.entry(c).unwrap().name.to_string())
            .collect();
        assert_eq!(names, ["A", "D", "B"]);
        assert!(tree.find_path(root, ["D", "C"]).is_some());
        assert_eq!(tree.aggregate(root).unwrap().apparent_size, 350);
        assert_eq!(stats.files, 3);
        assert_eq!(stats.dirs, 2);
        assert_eq!(stats.max_depth, 2);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_read_error_flags_directory() {
        let mut builder = TreeBuilder::new("/r");
        builder.push(entry(0, "/r", Entry::directory("/r")));
        builder.push(entry(1, "/r/locked", Entry::directory("locked")));
        builder.push(entry(1, "/r/ok", Entry::file("ok", 1, 1)));
        builder.push(Walked::ReadError {
            path: PathBuf::from("/r/locked"),
            warning: ScanWarning::new("/r/locked", "denied", WarningKind::PermissionDenied),
        });

        let (mut tree, stats, warnings) = builder.finish();
        settle(&mut tree);

        let locked = tree.find_child(tree.root(), "locked").unwrap();
        assert!(tree.entry(locked).unwrap().flags.read_error);
        assert!(tree.aggregate(tree.root()).unwrap().has_error);
        assert_eq!(stats.errors, 1);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_root_read_error() {
        let mut builder = TreeBuilder::new("/r");
        builder.push(entry(0, "/r", Entry::directory("/r")));
        builder.push(Walked::ReadError {
            path: PathBuf::from("/r"),
            warning: ScanWarning::new("/r", "gone", WarningKind::NotFound),
        });
        let (tree, _, _) = builder.finish();
        assert!(tree.entry(tree.root()).unwrap().flags.read_error);
    }
}
