//! Filesystem removal.

use std::fs;
use std::io;
use std::path::Path;

/// Removes entries from the filesystem on behalf of the explorer.
pub trait Remover {
    /// Remove `path`. Directories are removed with their whole content.
    fn remove(&self, path: &Path, is_dir: bool) -> io::Result<()>;
}

/// Permanent deletion through `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsRemover;

impl Remover for FsRemover {
    fn remove(&self, path: &Path, is_dir: bool) -> io::Result<()> {
        if is_dir {
            fs::remove_dir_all(path)
        } else {
            // also unlinks symlinks without touching their target
            fs::remove_file(path)
        }
    }
}
