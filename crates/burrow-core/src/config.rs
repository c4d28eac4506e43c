//! Scan configuration types.

use std::path::{Path, PathBuf};

use derive_builder::Builder;
use globset::{Glob, GlobBuilder, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};

use crate::error::ScanError;

/// Configuration for scanning operations.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct ScanConfig {
    /// Root path to scan.
    pub root: PathBuf,

    /// Follow symbolic links.
    #[builder(default = "false")]
    #[serde(default)]
    pub follow_symlinks: bool,

    /// Descend into directories on other filesystems.
    #[builder(default = "false")]
    #[serde(default)]
    pub cross_filesystems: bool,

    /// Show apparent size instead of disk usage.
    #[builder(default = "false")]
    #[serde(default)]
    pub apparent_size: bool,

    /// Glob patterns to exclude. Patterns without a `/` match the entry
    /// name, patterns with one match the full path.
    #[builder(default)]
    #[serde(default)]
    pub exclude_patterns: Vec<String>,

    /// Skip directories tagged with a `CACHEDIR.TAG` file.
    #[builder(default = "false")]
    #[serde(default)]
    pub exclude_caches: bool,

    /// Number of threads for directory reads (0 = auto-detect).
    #[builder(default = "0")]
    #[serde(default)]
    pub threads: usize,
}

impl ScanConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        match self.root {
            Some(ref root) if root.as_os_str().is_empty() => {
                return Err("Root path cannot be empty".to_string());
            }
            None => return Err("Root path is required".to_string()),
            Some(_) => {}
        }
        if let Some(ref patterns) = self.exclude_patterns {
            ExcludeMatcher::new(patterns).map_err(|e| e.to_string())?;
        }
        Ok(())
    }
}

impl ScanConfig {
    /// Create a new scan config builder.
    pub fn builder() -> ScanConfigBuilder {
        ScanConfigBuilder::default()
    }

    /// Create a simple config for scanning a path.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            follow_symlinks: false,
            cross_filesystems: false,
            apparent_size: false,
            exclude_patterns: Vec::new(),
            exclude_caches: false,
            threads: 0,
        }
    }

    /// Same settings, different root. Used for rescans of a subtree.
    pub fn with_root(&self, root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..self.clone()
        }
    }

    /// Compile the exclusion patterns.
    pub fn exclude_matcher(&self) -> Result<ExcludeMatcher, ScanError> {
        ExcludeMatcher::new(&self.exclude_patterns).map_err(|e| ScanError::InvalidConfig {
            message: e.to_string(),
        })
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::new(".")
    }
}

/// Compiled exclusion patterns.
#[derive(Debug, Clone)]
pub struct ExcludeMatcher {
    names: GlobSet,
    paths: GlobSet,
}

impl ExcludeMatcher {
    /// Compile a list of glob patterns.
    pub fn new(patterns: &[String]) -> Result<Self, globset::Error> {
        let mut names = GlobSetBuilder::new();
        let mut paths = GlobSetBuilder::new();
        for pattern in patterns {
            if pattern.contains('/') {
                paths.add(GlobBuilder::new(pattern).literal_separator(true).build()?);
            } else {
                names.add(Glob::new(pattern)?);
            }
        }
        Ok(Self {
            names: names.build()?,
            paths: paths.build()?,
        })
    }

    /// Check whether an entry should be excluded.
    pub fn is_excluded(&self, name: &str, path: &Path) -> bool {
        self.names.is_match(name) || self.paths.is_match(path)
    }

    /// True when there are no patterns at all.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty() && self.paths.is_empty()
    }
}
