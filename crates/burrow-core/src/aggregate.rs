//! Bottom-up computation of subtree totals.
//!
//! Children are always visited in their stored insertion order, so two
//! identical trees produce identical snapshots.

use crate::entry::Entry;
use crate::error::TreeError;
use crate::tree::{Aggregate, DirTree, NodeId};

/// Which size figure to display and sort by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SizeMetric {
    /// Allocated blocks.
    #[default]
    DiskUsage,
    /// Logical file length.
    ApparentSize,
}

impl SizeMetric {
    /// Switch to the other metric.
    pub fn toggle(self) -> Self {
        match self {
            Self::DiskUsage => Self::ApparentSize,
            Self::ApparentSize => Self::DiskUsage,
        }
    }

    /// Short label for status lines.
    pub fn label(&self) -> &'static str {
        match self {
            Self::DiskUsage => "disk usage",
            Self::ApparentSize => "apparent size",
        }
    }
}

/// Totals an entry contributes by itself, before any children.
///
/// Directories contribute nothing of their own. Excluded entries contribute
/// nothing. A shared hard link keeps its apparent size but its disk usage
/// was already counted at the canonical link.
pub fn own_aggregate(entry: &Entry) -> Aggregate {
    let mut own = Aggregate {
        has_error: entry.flags.read_error,
        ..Aggregate::default()
    };
    if entry.is_dir() || entry.flags.excluded {
        return own;
    }
    own.apparent_size = entry.apparent_size;
    if !entry.flags.shared_hardlink {
        own.disk_usage = entry.disk_usage;
    }
    own
}

/// Recompute every aggregate in the subtree rooted at `node`.
///
/// Each node in the subtree is computed exactly once, children before
/// parents. Ancestors of `node` are left as they are; call [`settle`] to
/// bring the whole tree up to date.
pub fn recompute(tree: &mut DirTree, node: NodeId) -> Result<Aggregate, TreeError> {
    let (aggregate, count) = run(tree, node, false)?;
    tracing::trace!(nodes = count, "recomputed subtree aggregates");
    Ok(aggregate)
}

/// Recompute only the stale aggregates of the whole tree.
///
/// Clean subtrees are reused as they are, so after a single removal only the
/// chain of ancestors is touched. Returns the number of nodes recomputed.
pub fn settle(tree: &mut DirTree) -> usize {
    let root = tree.root();
    match run(tree, root, true) {
        Ok((_, count)) => {
            if count > 0 {
                tracing::trace!(nodes = count, "settled stale aggregates");
            }
            count
        }
        Err(err) => {
            tracing::debug!(error = %err, "tree root is stale, nothing to settle");
            0
        }
    }
}

fn run(tree: &mut DirTree, start: NodeId, only_dirty: bool) -> Result<(Aggregate, usize), TreeError> {
    if !tree.contains(start) {
        return Err(TreeError::StaleNode);
    }
    if only_dirty {
        if let Some(aggregate) = tree.aggregate(start) {
            return Ok((aggregate, 0));
        }
    }

    let mut count = 0;
    let mut stack = vec![(start, false)];
    while let Some((id, expanded)) = stack.pop() {
        if !expanded {
            stack.push((id, true));
            for &child in tree.children(id).iter().rev() {
                if !only_dirty || tree.is_dirty(child) {
                    stack.push((child, false));
                }
            }
            continue;
        }

        let Some(node) = tree.get(id) else { continue };
        let mut total = own_aggregate(node.entry());
        for &child in node.children() {
            if let Some(sub) = tree.aggregate(child) {
                total.apparent_size += sub.apparent_size;
                total.disk_usage += sub.disk_usage;
                total.item_count += 1 + sub.item_count;
                total.has_error |= sub.has_error;
            }
        }
        tree.set_aggregate(id, total);
        count += 1;
    }

    let aggregate = tree.aggregate(start).ok_or(TreeError::StaleNode)?;
    Ok((aggregate, count))
}
