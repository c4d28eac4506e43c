//! Filesystem scanning for burrow.
//!
//! This crate walks a directory hierarchy in parallel with jwalk and turns
//! the result into an aggregated [`DirTree`](burrow_core::DirTree).
//!
//! - [`Walker`] yields one [`Walked`] item per entry, depth-first. Read
//!   failures below the root never stop the walk.
//! - [`HardlinkRegistry`] makes sure each multiply-linked inode is counted
//!   once for disk usage within a walk.
//! - [`TreeBuilder`] links walk output into a tree.
//! - [`Scanner`] ties the three together, broadcasts progress and honours a
//!   cancellation token.
//!
//! # Example
//!
//! ```rust,no_run
//! use burrow_scan::{ScanConfig, Scanner};
//!
//! let config = ScanConfig::new("/path/to/scan");
//! let report = Scanner::new().scan(&config).unwrap();
//!
//! if let Some(totals) = report.totals() {
//!     println!("{} bytes in {} items", totals.disk_usage, totals.item_count);
//! }
//! ```
//!
//! # Progress Monitoring
//!
//! ```rust,no_run
//! use burrow_scan::Scanner;
//!
//! let scanner = Scanner::new();
//! let mut progress_rx = scanner.subscribe();
//!
//! tokio::spawn(async move {
//!     while let Ok(progress) = progress_rx.recv().await {
//!         println!("Scanned {} items", progress.total_items());
//!     }
//! });
//! ```

mod builder;
mod progress;
mod registry;
mod scanner;
mod walker;

pub use builder::TreeBuilder;
pub use progress::ScanProgress;
pub use registry::{HardlinkRecord, HardlinkRegistry};
pub use scanner::Scanner;
pub use walker::{EntryMarks, WalkIter, Walked, Walker};

pub use burrow_core::{ScanConfig, ScanError, ScanReport, ScanWarning, WarningKind};
