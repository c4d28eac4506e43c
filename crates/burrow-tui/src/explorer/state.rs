//! Explorer state types.

use std::path::PathBuf;
use std::time::SystemTime;

use compact_str::CompactString;
use strum::{Display, EnumIter, IntoEnumIterator};
use tokio_util::sync::CancellationToken;

use burrow_core::{Aggregate, EntryKind, NodeId, SizeMetric};

/// The explorer's state machine.
#[derive(Debug, Clone, Default)]
pub enum ExplorerState {
    /// Normal navigation.
    #[default]
    Browsing,
    /// Waiting for the user to confirm deletion of `target`.
    ConfirmingDelete { target: NodeId },
    /// `target` is being rescanned in the background.
    Scanning {
        target: NodeId,
        path: PathBuf,
        token: CancellationToken,
    },
}

impl ExplorerState {
    /// Check if browsing.
    pub fn is_browsing(&self) -> bool {
        matches!(self, Self::Browsing)
    }

    /// Check if a rescan is running.
    pub fn is_scanning(&self) -> bool {
        matches!(self, Self::Scanning { .. })
    }

    /// Short label for the status line.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Browsing => "browsing",
            Self::ConfirmingDelete { .. } => "confirm delete",
            Self::Scanning { .. } => "scanning",
        }
    }
}

/// What the current directory's listing is sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumIter)]
pub enum SortKey {
    #[default]
    #[strum(to_string = "size")]
    Size,
    #[strum(to_string = "name")]
    Name,
    #[strum(to_string = "items")]
    Items,
    #[strum(to_string = "mtime")]
    Modified,
}

impl SortKey {
    /// Next key in the cycle.
    pub fn next(self) -> Self {
        let keys: Vec<Self> = Self::iter().collect();
        let index = keys.iter().position(|&k| k == self).unwrap_or(0);
        keys[(index + 1) % keys.len()]
    }

    /// Direction that makes sense when switching to this key.
    pub fn natural_order(self) -> SortOrder {
        match self {
            Self::Name => SortOrder::Ascending,
            Self::Size | Self::Items | Self::Modified => SortOrder::Descending,
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum SortOrder {
    #[strum(to_string = "↑")]
    Ascending,
    #[default]
    #[strum(to_string = "↓")]
    Descending,
}

impl SortOrder {
    /// Flip the direction.
    pub fn reverse(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// Sort key plus direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortSpec {
    pub key: SortKey,
    pub order: SortOrder,
}

impl SortSpec {
    /// Create a sort spec.
    pub fn new(key: SortKey, order: SortOrder) -> Self {
        Self { key, order }
    }

    /// Same key in the other direction.
    pub fn reversed(self) -> Self {
        Self {
            order: self.order.reverse(),
            ..self
        }
    }
}

impl std::fmt::Display for SortSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.key, self.order)
    }
}

/// Display settings of the explorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExplorerConfig {
    pub sort: SortSpec,
    pub metric: SizeMetric,
    /// List directories before everything else.
    pub dirs_first: bool,
    /// Show dot-entries.
    pub show_hidden: bool,
    /// Ask before deleting.
    pub confirm_delete: bool,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            sort: SortSpec::default(),
            metric: SizeMetric::default(),
            dirs_first: false,
            show_hidden: true,
            confirm_delete: true,
        }
    }
}

/// One line of the current directory listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub id: NodeId,
    pub name: CompactString,
    pub kind: EntryKind,
    /// Size in the active metric. Files report their own full size even
    /// when their disk usage was counted at another link.
    pub size: u64,
    /// Subtree totals, zero counts for non-directories.
    pub aggregate: Aggregate,
    pub modified: Option<SystemTime>,
    /// Single-character status marker.
    pub flag: char,
    /// `size` as a share of the current directory total.
    pub ratio: f64,
    /// Inside a subtree that is being rescanned; totals are not final.
    pub pending: bool,
}

impl Row {
    /// Check if this row is a directory.
    pub fn is_dir(&self) -> bool {
        self.kind.is_dir()
    }
}

/// Inline message shown in the footer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub success: bool,
    pub message: String,
}

impl Status {
    /// Create a success message.
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    /// Create an error message.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_key_cycle() {
        assert_eq!(SortKey::Size.next(), SortKey::Name);
        assert_eq!(SortKey::Modified.next(), SortKey::Size);
        assert_eq!(SortKey::Name.natural_order(), SortOrder::Ascending);
    }

    #[test]
    fn test_sort_spec_display() {
        let spec = SortSpec::new(SortKey::Items, SortOrder::Descending);
        assert_eq!(spec.to_string(), "items ↓");
        assert_eq!(spec.reversed().order, SortOrder::Ascending);
    }

    #[test]
    fn test_state_labels() {
        assert!(ExplorerState::default().is_browsing());
        let state = ExplorerState::Scanning {
            target: burrow_core::DirTree::new(burrow_core::Entry::directory("/")).root(),
            path: PathBuf::from("/"),
            token: CancellationToken::new(),
        };
        assert!(state.is_scanning());
        assert_eq!(state.label(), "scanning");
    }
}
