//! Core types for burrow.
//!
//! This crate holds the in-memory model of a scanned directory hierarchy:
//! filesystem [`Entry`] records, the arena-backed [`DirTree`] with its
//! staleness tracking, the [`aggregate`] engine that rolls sizes and counts
//! up the tree, and the configuration and error types shared by the scanner
//! and the explorer.

pub mod aggregate;
mod config;
mod entry;
mod error;
mod report;
mod tree;

pub use aggregate::{SizeMetric, own_aggregate, recompute, settle};
pub use config::{ExcludeMatcher, ScanConfig, ScanConfigBuilder, ScanConfigBuilderError};
pub use entry::{Entry, EntryFlags, EntryKind, InodeInfo};
pub use error::{ScanError, ScanWarning, TreeError, WarningKind};
pub use report::{ScanReport, ScanStats};
pub use tree::{Aggregate, Ancestors, Descendants, DirTree, Node, NodeId};
