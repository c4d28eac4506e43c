//! Hard link registry for disk usage deduplication.

use std::path::{Path, PathBuf};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use burrow_core::InodeInfo;

/// What is known about one multiply-linked inode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HardlinkRecord {
    /// Path of the first link seen; this one carries the disk usage.
    pub canonical: PathBuf,
    /// Links to this inode met so far in the scan.
    pub links_seen: u64,
    /// Link count reported by the filesystem.
    pub nlink: u64,
}

/// Tracks `(device, inode)` pairs seen during one scan.
///
/// A registry lives exactly as long as the scan that owns it. Rescans build
/// a fresh one, so links are only deduplicated within a single walk.
#[derive(Debug, Default)]
pub struct HardlinkRegistry {
    links: DashMap<InodeInfo, HardlinkRecord>,
}

impl HardlinkRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            links: DashMap::new(),
        }
    }

    /// Register a link. Returns `true` if this is the first link to the
    /// inode, which makes `path` its canonical entry.
    pub fn register(&self, info: InodeInfo, path: &Path, nlink: u64) -> bool {
        match self.links.entry(info) {
            Entry::Occupied(mut occupied) => {
                occupied.get_mut().links_seen += 1;
                false
            }
            Entry::Vacant(vacant) => {
                vacant.insert(HardlinkRecord {
                    canonical: path.to_path_buf(),
                    links_seen: 1,
                    nlink,
                });
                true
            }
        }
    }

    /// Look up the record for an inode.
    pub fn get(&self, info: &InodeInfo) -> Option<HardlinkRecord> {
        self.links.get(info).map(|record| record.clone())
    }

    /// Whether every link of the inode was found inside the scanned tree.
    pub fn fully_contained(&self, info: &InodeInfo) -> bool {
        self.links
            .get(info)
            .is_some_and(|record| record.links_seen >= record.nlink)
    }

    /// Number of distinct inodes registered.
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Check if nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Forget everything.
    pub fn clear(&self) {
        self.links.clear();
    }
}
