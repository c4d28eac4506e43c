//! Filesystem entry types.

use std::time::SystemTime;

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Device and inode pair identifying one physical file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InodeInfo {
    /// Inode number.
    pub inode: u64,
    /// Device ID.
    pub device: u64,
}

impl InodeInfo {
    /// Create new inode info.
    pub fn new(inode: u64, device: u64) -> Self {
        Self { inode, device }
    }
}

/// Type of filesystem object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryKind {
    /// Regular file.
    File,
    /// Directory.
    Directory,
    /// Symbolic link (not followed).
    Symlink {
        /// Link target as read from the filesystem.
        target: CompactString,
    },
    /// Sockets, fifos, device nodes.
    Other,
}

impl EntryKind {
    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        matches!(self, EntryKind::Directory)
    }

    /// Check if this is a regular file.
    pub fn is_file(&self) -> bool {
        matches!(self, EntryKind::File)
    }

    /// Check if this is a symlink.
    pub fn is_symlink(&self) -> bool {
        matches!(self, EntryKind::Symlink { .. })
    }
}

/// Per-entry status flags set by the walker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryFlags {
    /// Matched an exclusion rule; listed but never measured or descended.
    pub excluded: bool,
    /// Reading this entry (its metadata or its directory listing) failed.
    pub read_error: bool,
    /// Directory lives on a different device than its parent.
    pub mount_point: bool,
    /// Another link to the same inode was counted first in this scan.
    pub shared_hardlink: bool,
}

impl EntryFlags {
    /// True when no flag is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// One filesystem object as recorded by a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// File name (not full path).
    pub name: CompactString,
    /// Object type.
    pub kind: EntryKind,
    /// Logical length in bytes.
    pub apparent_size: u64,
    /// Allocated bytes (blocks times block size).
    pub disk_usage: u64,
    /// Device and inode.
    pub inode: InodeInfo,
    /// Hard link count.
    pub nlink: u64,
    /// Unix mode bits (type and permissions), 0 when unknown.
    pub mode: u32,
    /// Last modification time, if it could be read.
    pub modified: Option<SystemTime>,
    /// Status flags.
    pub flags: EntryFlags,
}

impl Entry {
    fn with_kind(name: impl Into<CompactString>, kind: EntryKind) -> Self {
        Self {
            name: name.into(),
            kind,
            apparent_size: 0,
            disk_usage: 0,
            inode: InodeInfo::default(),
            nlink: 1,
            mode: 0,
            modified: None,
            flags: EntryFlags::default(),
        }
    }

    /// Create a regular file entry.
    pub fn file(name: impl Into<CompactString>, apparent_size: u64, disk_usage: u64) -> Self {
        Self {
            apparent_size,
            disk_usage,
            ..Self::with_kind(name, EntryKind::File)
        }
    }

    /// Create a directory entry.
    pub fn directory(name: impl Into<CompactString>) -> Self {
        Self::with_kind(name, EntryKind::Directory)
    }

    /// Create a symlink entry.
    pub fn symlink(name: impl Into<CompactString>, target: impl Into<CompactString>) -> Self {
        Self::with_kind(
            name,
            EntryKind::Symlink {
                target: target.into(),
            },
        )
    }

    /// Create an entry for any other file type.
    pub fn other(name: impl Into<CompactString>) -> Self {
        Self::with_kind(name, EntryKind::Other)
    }

    /// Set device, inode and link count.
    pub fn with_inode(mut self, device: u64, inode: u64, nlink: u64) -> Self {
        self.inode = InodeInfo::new(inode, device);
        self.nlink = nlink;
        self
    }

    /// Set the modification time.
    pub fn with_modified(mut self, modified: SystemTime) -> Self {
        self.modified = Some(modified);
        self
    }

    /// Set the mode bits.
    pub fn with_mode(mut self, mode: u32) -> Self {
        self.mode = mode;
        self
    }

    /// Replace the flags.
    pub fn with_flags(mut self, flags: EntryFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Check if this entry is a directory.
    pub fn is_dir(&self) -> bool {
        self.kind.is_dir()
    }

    /// Check if this entry is a hidden dot-file.
    pub fn is_hidden(&self) -> bool {
        self.name.starts_with('.')
    }

    /// Render the mode bits as `ls -l` does, e.g. `drwxr-xr-x`.
    pub fn permissions_string(&self) -> String {
        let type_char = match self.kind {
            EntryKind::Directory => 'd',
            EntryKind::Symlink { .. } => 'l',
            EntryKind::File => '-',
            EntryKind::Other => '?',
        };
        if self.mode == 0 {
            return format!("{type_char}---------");
        }

        let mut out = String::with_capacity(10);
        out.push(type_char);
        for shift in [6u32, 3, 0] {
            let bits = (self.mode >> shift) & 0o7;
            out.push(if bits & 0o4 != 0 { 'r' } else { '-' });
            out.push(if bits & 0o2 != 0 { 'w' } else { '-' });
            out.push(if bits & 0o1 != 0 { 'x' } else { '-' });
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_entry_creation() {
        let entry = Entry::file("test.txt", 1024, 4096);
        assert!(entry.kind.is_file());
        assert!(!entry.is_dir());
        assert_eq!(entry.apparent_size, 1024);
        assert_eq!(entry.disk_usage, 4096);
        assert_eq!(entry.nlink, 1);
        assert!(entry.flags.is_empty());
    }

    #[test]
    fn test_directory_entry_creation() {
        let entry = Entry::directory("src").with_inode(7, 42, 3);
        assert!(entry.is_dir());
        assert_eq!(entry.inode, InodeInfo::new(42, 7));
        assert_eq!(entry.nlink, 3);
    }

    #[test]
    fn test_hidden() {
        assert!(Entry::file(".gitignore", 1, 1).is_hidden());
        assert!(!Entry::file("Cargo.toml", 1, 1).is_hidden());
    }

    #[test]
    fn test_permissions_string() {
        let entry = Entry::directory("bin").with_mode(0o40755);
        assert_eq!(entry.permissions_string(), "drwxr-xr-x");

        let entry = Entry::file("secret", 0, 0).with_mode(0o100600);
        assert_eq!(entry.permissions_string(), "-rw-------");

        let entry = Entry::other("sock");
        assert_eq!(entry.permissions_string(), "?---------");
    }
}
