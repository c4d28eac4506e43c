//! Parallel filesystem walker.
//!
//! Directory reads run on a rayon pool through jwalk; results come out in
//! depth-first order, parents before their children, with siblings sorted
//! by name. A `process_read_dir` hook stats every child as soon as its
//! directory has been read, flags exclusions and mount points, and prunes
//! anything that must not be descended.
//!
//! With `follow_symlinks`, links to files are measured as the file they
//! point to. Links to directories are listed but never descended, so the
//! walk cannot loop.

use std::fs::{self, Metadata};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

#[cfg(unix)]
use std::os::unix::fs::MetadataExt;

use compact_str::CompactString;
use jwalk::{Parallelism, WalkDirGeneric};
use tokio_util::sync::CancellationToken;

use burrow_core::{
    Entry, EntryFlags, ExcludeMatcher, InodeInfo, ScanConfig, ScanError, ScanWarning, WarningKind,
};

use crate::registry::HardlinkRegistry;

/// Marker file identifying cache directories.
const CACHEDIR_TAG: &str = "CACHEDIR.TAG";
/// First bytes a valid `CACHEDIR.TAG` must start with.
const CACHEDIR_SIGNATURE: &[u8] = b"Signature: 8a477f597d28d172789f06886806bc55";

/// Per-entry state filled in by the read_dir hook.
#[derive(Debug, Default)]
pub struct EntryMarks {
    excluded: bool,
    mount_point: bool,
    metadata: Option<io::Result<Metadata>>,
}

type WalkState = ((), EntryMarks);
type JwalkIter = Box<dyn Iterator<Item = jwalk::Result<jwalk::DirEntry<WalkState>>>>;

/// One item produced by a walk.
#[derive(Debug)]
pub enum Walked {
    /// An entry with its depth below the root (root = 0) and full path.
    /// Stat failures and mount point crossings come with a warning.
    Entry {
        depth: usize,
        path: PathBuf,
        entry: Entry,
        warning: Option<ScanWarning>,
    },
    /// A directory whose listing could not be read. The directory itself
    /// was already yielded as an entry.
    ReadError { path: PathBuf, warning: ScanWarning },
}

/// Walks one subtree according to a [`ScanConfig`].
#[derive(Debug, Clone)]
pub struct Walker {
    root: PathBuf,
    follow_symlinks: bool,
    cross_filesystems: bool,
    exclude_caches: bool,
    threads: usize,
    matcher: Arc<ExcludeMatcher>,
}

impl Walker {
    /// Prepare a walker. Fails when the exclusion patterns do not compile.
    pub fn new(config: &ScanConfig) -> Result<Self, ScanError> {
        Ok(Self {
            root: config.root.clone(),
            follow_symlinks: config.follow_symlinks,
            cross_filesystems: config.cross_filesystems,
            exclude_caches: config.exclude_caches,
            threads: config.threads,
            matcher: Arc::new(config.exclude_matcher()?),
        })
    }

    /// Start walking.
    ///
    /// Problems with the root itself are fatal and reported here; anything
    /// below the root shows up as flagged entries or [`Walked::ReadError`]s.
    pub fn walk(&self) -> Result<WalkIter, ScanError> {
        self.start(None)
    }

    /// Start a walk that stops early once `token` is cancelled.
    pub fn walk_with_cancel(&self, token: CancellationToken) -> Result<WalkIter, ScanError> {
        self.start(Some(token))
    }

    fn start(&self, token: Option<CancellationToken>) -> Result<WalkIter, ScanError> {
        let root = self
            .root
            .canonicalize()
            .map_err(|e| ScanError::io(&self.root, e))?;
        let metadata = fs::metadata(&root).map_err(|e| ScanError::io(&root, e))?;
        if !metadata.is_dir() {
            return Err(ScanError::NotADirectory { path: root });
        }
        // jwalk would only report this as a per-entry error
        fs::read_dir(&root).map_err(|e| ScanError::io(&root, e))?;

        let parallelism = match self.threads {
            0 => Parallelism::RayonDefaultPool {
                busy_timeout: Duration::from_millis(100),
            },
            n => Parallelism::RayonNewPool(n),
        };

        let hook = ReadDirHook {
            follow_symlinks: self.follow_symlinks,
            cross_filesystems: self.cross_filesystems,
            exclude_caches: self.exclude_caches,
            matcher: Arc::clone(&self.matcher),
            token: token.clone(),
        };

        let walk = WalkDirGeneric::<WalkState>::new(&root)
            .skip_hidden(false)
            .follow_links(false)
            .sort(true)
            .parallelism(parallelism)
            .process_read_dir(move |depth, path, _state, children| {
                hook.process(depth, path, children);
            });

        tracing::debug!(root = %root.display(), "walk started");

        Ok(WalkIter {
            inner: Box::new(walk.into_iter()),
            root,
            registry: HardlinkRegistry::new(),
            follow_symlinks: self.follow_symlinks,
            token,
            yielded_root: false,
            cancelled: false,
        })
    }
}

/// Lazy sequence of walk results.
///
/// The iterator owns the hard link registry for the walk, so dropping it
/// discards every link record.
pub struct WalkIter {
    inner: JwalkIter,
    root: PathBuf,
    registry: HardlinkRegistry,
    follow_symlinks: bool,
    token: Option<CancellationToken>,
    yielded_root: bool,
    cancelled: bool,
}

impl WalkIter {
    /// Canonical path of the walk root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether the walk stopped because its token was cancelled.
    pub fn was_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Hard links recorded so far.
    pub fn registry(&self) -> &HardlinkRegistry {
        &self.registry
    }

    fn convert(&self, dir_entry: jwalk::DirEntry<WalkState>) -> Walked {
        let depth = dir_entry.depth();
        let path = dir_entry.path();
        let name: CompactString = if depth == 0 {
            self.root.to_string_lossy().into()
        } else {
            dir_entry.file_name().to_string_lossy().into()
        };
        let file_type = dir_entry.file_type();
        let marks = dir_entry.client_state;

        let followed_file = file_type.is_symlink()
            && matches!(&marks.metadata, Some(Ok(meta)) if meta.is_file());

        let mut entry = if file_type.is_dir() {
            Entry::directory(name)
        } else if file_type.is_file() || followed_file {
            Entry::file(name, 0, 0)
        } else if file_type.is_symlink() {
            let target = fs::read_link(&path)
                .map(|t| CompactString::from(t.to_string_lossy()))
                .unwrap_or_default();
            Entry::symlink(name, target)
        } else {
            Entry::other(name)
        };
        entry.flags = EntryFlags {
            excluded: marks.excluded,
            mount_point: marks.mount_point,
            ..EntryFlags::default()
        };

        if marks.excluded {
            return Walked::Entry {
                depth,
                path,
                entry,
                warning: None,
            };
        }

        let mut warning = marks
            .mount_point
            .then(|| ScanWarning::cross_device(&path));
        let metadata = match marks.metadata {
            Some(result) => result,
            None => stat(&path, depth == 0),
        };
        match metadata {
            Ok(metadata) => self.fill(&mut entry, &path, &metadata),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "failed to stat entry");
                entry.flags.read_error = true;
                warning = Some(ScanWarning::from_io(&path, &err));
            }
        }
        Walked::Entry {
            depth,
            path,
            entry,
            warning,
        }
    }

    fn fill(&self, entry: &mut Entry, path: &Path, metadata: &Metadata) {
        entry.modified = metadata.modified().ok();
        entry.mode = get_mode(metadata);
        entry.nlink = get_nlink(metadata);
        entry.inode = InodeInfo::new(get_ino(metadata), get_dev(metadata));

        if entry.is_dir() {
            return;
        }
        entry.apparent_size = metadata.len();
        entry.disk_usage = get_blocks(metadata) * 512;

        // followed links may reach a file that is also listed directly
        let track = entry.nlink > 1 || self.follow_symlinks;
        if track && !self.registry.register(entry.inode, path, entry.nlink) {
            entry.flags.shared_hardlink = true;
        }
    }
}

impl Iterator for WalkIter {
    type Item = Walked;

    fn next(&mut self) -> Option<Walked> {
        if self.cancelled {
            return None;
        }
        if self.yielded_root && self.token.as_ref().is_some_and(|t| t.is_cancelled()) {
            tracing::debug!(root = %self.root.display(), "walk cancelled");
            self.cancelled = true;
            return None;
        }

        let item = match self.inner.next()? {
            Ok(dir_entry) => self.convert(dir_entry),
            Err(err) => {
                let path = err
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| self.root.clone());
                let warning = match err.io_error() {
                    Some(io_err) => ScanWarning::from_io(&path, io_err),
                    None => ScanWarning::new(&path, err.to_string(), WarningKind::Io),
                };
                tracing::warn!(path = %path.display(), error = %err, "failed to read directory");
                Walked::ReadError { path, warning }
            }
        };
        self.yielded_root = true;
        Some(item)
    }
}

/// State captured by jwalk's read_dir callback.
struct ReadDirHook {
    follow_symlinks: bool,
    cross_filesystems: bool,
    exclude_caches: bool,
    matcher: Arc<ExcludeMatcher>,
    token: Option<CancellationToken>,
}

impl ReadDirHook {
    fn process(
        &self,
        depth: Option<usize>,
        parent: &Path,
        children: &mut [jwalk::Result<jwalk::DirEntry<WalkState>>],
    ) {
        let cancelled = self.token.as_ref().is_some_and(|t| t.is_cancelled());
        // `None` is the synthetic listing that holds only the root
        let parent_dev = match depth {
            Some(_) => fs::metadata(parent).ok().map(|m| get_dev(&m)),
            None => None,
        };

        for child in children.iter_mut().flatten() {
            if cancelled {
                child.read_children_path = None;
                continue;
            }
            let path = child.path();

            if depth.is_some() {
                let name = child.file_name().to_string_lossy();
                if !self.matcher.is_empty() && self.matcher.is_excluded(&name, &path) {
                    child.client_state.excluded = true;
                    child.read_children_path = None;
                    continue;
                }
            }

            let metadata = if depth.is_none() {
                stat(&path, true)
            } else if self.follow_symlinks && child.file_type().is_symlink() {
                follow_file_link(&path)
            } else {
                stat(&path, false)
            };
            if let Ok(ref meta) = metadata {
                if depth.is_some() {
                    let (mount_point, descend) = classify_child(
                        parent_dev,
                        get_dev(meta),
                        meta.is_dir(),
                        self.cross_filesystems,
                    );
                    child.client_state.mount_point = mount_point;
                    if !descend {
                        child.read_children_path = None;
                    }
                    if meta.is_dir() && self.exclude_caches && is_cache_dir(&path) {
                        child.client_state.excluded = true;
                        child.read_children_path = None;
                        continue;
                    }
                }
            }
            child.client_state.metadata = Some(metadata);
        }
    }
}

/// Decide how a child found in a directory listing is treated.
///
/// Returns `(mount_point, descend)`. A directory whose device differs from
/// its parent's is a mount point and is only descended when crossing
/// filesystems is allowed. An unknown parent device never marks a mount.
fn classify_child(
    parent_dev: Option<u64>,
    child_dev: u64,
    is_dir: bool,
    cross_filesystems: bool,
) -> (bool, bool) {
    if !is_dir {
        return (false, false);
    }
    let mount_point = parent_dev.is_some_and(|dev| dev != child_dev);
    (mount_point, !mount_point || cross_filesystems)
}

/// Stat through a symlink when it points at a file. Links to anything else,
/// dangling links and loops fall back to the link itself; a loop is still
/// reported as an error.
fn follow_file_link(path: &Path) -> io::Result<Metadata> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_file() => Ok(meta),
        Ok(_) => fs::symlink_metadata(path),
        Err(err) if err.kind() == io::ErrorKind::NotFound => fs::symlink_metadata(path),
        Err(err) => Err(err),
    }
}

fn stat(path: &Path, follow: bool) -> io::Result<Metadata> {
    if follow {
        fs::metadata(path)
    } else {
        fs::symlink_metadata(path)
    }
}

/// Check for a `CACHEDIR.TAG` carrying the standard signature.
fn is_cache_dir(dir: &Path) -> bool {
    let Ok(mut file) = fs::File::open(dir.join(CACHEDIR_TAG)) else {
        return false;
    };
    let mut buf = [0u8; CACHEDIR_SIGNATURE.len()];
    file.read_exact(&mut buf).is_ok() && buf == CACHEDIR_SIGNATURE
}

// Cross-platform metadata helpers

#[cfg(unix)]
fn get_dev(metadata: &Metadata) -> u64 {
    metadata.dev()
}

#[cfg(not(unix))]
fn get_dev(_metadata: &Metadata) -> u64 {
    0
}

#[cfg(unix)]
fn get_ino(metadata: &Metadata) -> u64 {
    metadata.ino()
}

#[cfg(not(unix))]
fn get_ino(_metadata: &Metadata) -> u64 {
    0
}

#[cfg(unix)]
fn get_nlink(metadata: &Metadata) -> u64 {
    metadata.nlink()
}

#[cfg(not(unix))]
fn get_nlink(_metadata: &Metadata) -> u64 {
    1
}

/// Number of 512-byte blocks.
#[cfg(unix)]
fn get_blocks(metadata: &Metadata) -> u64 {
    metadata.blocks()
}

#[cfg(not(unix))]
fn get_blocks(metadata: &Metadata) -> u64 {
    metadata.len().div_ceil(512)
}

#[cfg(unix)]
fn get_mode(metadata: &Metadata) -> u32 {
    metadata.mode()
}

#[cfg(not(unix))]
fn get_mode(_metadata: &Metadata) -> u32 {
    0
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entries(walker: &Walker) -> Vec<(usize, PathBuf, Entry)> {
        walker
            .walk()
            .unwrap()
            .filter_map(|item| match item {
                Walked::Entry {
                    depth, path, entry, ..
                } => Some((depth, path, entry)),
                Walked::ReadError { .. } => None,
            })
            .collect()
    }

    #[test]
    fn test_depth_first_sorted_order() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir(root.join("b")).unwrap();
        fs::write(root.join("b/inner"), "x").unwrap();
        fs::write(root.join("a"), "hello").unwrap();
        fs::write(root.join("c"), "!").unwrap();

        let walker = Walker::new(&ScanConfig::new(root)).unwrap();
        let seen: Vec<(usize, String)> = entries(&walker)
            .into_iter()
            .skip(1)
            .map(|(depth, _, entry)| (depth, entry.name.to_string()))
            .collect();

        assert_eq!(
            seen,
            vec![
                (1, "a".to_string()),
                (1, "b".to_string()),
                (2, "inner".to_string()),
                (1, "c".to_string()),
            ]
        );
    }

    #[test]
    fn test_root_named_by_full_path() {
        let temp = TempDir::new().unwrap();
        let walker = Walker::new(&ScanConfig::new(temp.path())).unwrap();
        let all = entries(&walker);
        let canonical = temp.path().canonicalize().unwrap();
        assert_eq!(all[0].0, 0);
        assert_eq!(all[0].2.name.as_str(), canonical.to_string_lossy());
        assert!(all[0].2.is_dir());
    }

    #[test]
    fn test_file_sizes() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("data"), vec![0u8; 3000]).unwrap();

        let walker = Walker::new(&ScanConfig::new(temp.path())).unwrap();
        let all = entries(&walker);
        let (_, _, file) = &all[1];
        assert_eq!(file.apparent_size, 3000);
        assert!(file.modified.is_some());
        assert!(!file.flags.read_error);
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let temp = TempDir::new().unwrap();
        let walker = Walker::new(&ScanConfig::new(temp.path().join("nope"))).unwrap();
        assert!(matches!(walker.walk(), Err(ScanError::NotFound { .. })));
    }

    #[test]
    fn test_file_root_is_fatal() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("plain");
        fs::write(&file, "x").unwrap();
        let walker = Walker::new(&ScanConfig::new(&file)).unwrap();
        assert!(matches!(walker.walk(), Err(ScanError::NotADirectory { .. })));
    }

    #[test]
    fn test_cache_dir_signature() {
        let temp = TempDir::new().unwrap();
        let good = temp.path().join("good");
        let bad = temp.path().join("bad");
        fs::create_dir(&good).unwrap();
        fs::create_dir(&bad).unwrap();
        fs::write(
            good.join(CACHEDIR_TAG),
            "Signature: 8a477f597d28d172789f06886806bc55\n# cache",
        )
        .unwrap();
        fs::write(bad.join(CACHEDIR_TAG), "not a signature").unwrap();

        assert!(is_cache_dir(&good));
        assert!(!is_cache_dir(&bad));
        assert!(!is_cache_dir(temp.path()));
    }

    #[test]
    fn test_classify_same_device_directory() {
        assert_eq!(classify_child(Some(7), 7, true, false), (false, true));
        assert_eq!(classify_child(Some(7), 7, true, true), (false, true));
    }

    #[test]
    fn test_classify_mount_point() {
        // pruned unless crossing is allowed, flagged either way
        assert_eq!(classify_child(Some(7), 9, true, false), (true, false));
        assert_eq!(classify_child(Some(7), 9, true, true), (true, true));
    }

    #[test]
    fn test_classify_files_and_unknown_parent() {
        assert_eq!(classify_child(Some(7), 9, false, false), (false, false));
        assert_eq!(classify_child(None, 9, true, false), (false, true));
    }

    #[test]
    fn test_cancelled_walk_yields_root_only() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a"), "x").unwrap();
        fs::write(temp.path().join("b"), "y").unwrap();

        let token = CancellationToken::new();
        token.cancel();
        let walker = Walker::new(&ScanConfig::new(temp.path())).unwrap();
        let mut iter = walker.walk_with_cancel(token).unwrap();

        assert!(matches!(iter.next(), Some(Walked::Entry { depth: 0, .. })));
        assert!(iter.next().is_none());
        assert!(iter.was_cancelled());
    }
}
