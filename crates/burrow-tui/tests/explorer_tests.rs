//! Explorer behavior against real directory trees.

use std::cell::RefCell;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use burrow_core::{NodeId, ScanConfig, SizeMetric};
use burrow_scan::Scanner;
use burrow_tui::{
    AsciiGlyphs, Explorer, ExplorerConfig, ExplorerError, ExplorerState, FsRemover, Remover,
    SortKey, SortOrder, SortSpec,
};

/// root/A (100), root/B (200), root/D/C (50)
fn fixture() -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("A"), vec![b'a'; 100]).unwrap();
    fs::write(temp.path().join("B"), vec![b'b'; 200]).unwrap();
    fs::create_dir(temp.path().join("D")).unwrap();
    fs::write(temp.path().join("D/C"), vec![b'c'; 50]).unwrap();
    temp
}

fn open(temp: &TempDir) -> Explorer {
    let report = Scanner::new().scan(&ScanConfig::new(temp.path())).unwrap();
    let config = ExplorerConfig {
        metric: SizeMetric::ApparentSize,
        ..ExplorerConfig::default()
    };
    Explorer::new(report, config, &AsciiGlyphs)
}

fn child(explorer: &Explorer, name: &str) -> NodeId {
    let tree = explorer.tree();
    tree.find_child(tree.root(), name).unwrap()
}

fn root_totals(explorer: &mut Explorer) -> (u64, u64) {
    let totals = explorer.current_totals();
    (totals.apparent_size, totals.item_count)
}

fn names(explorer: &mut Explorer) -> Vec<String> {
    explorer.listing().iter().map(|r| r.name.to_string()).collect()
}

struct DeniedRemover;

impl Remover for DeniedRemover {
    fn remove(&self, _path: &Path, _is_dir: bool) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
    }
}

#[derive(Default)]
struct RecordingRemover {
    calls: RefCell<Vec<(PathBuf, bool)>>,
}

impl Remover for RecordingRemover {
    fn remove(&self, path: &Path, is_dir: bool) -> io::Result<()> {
        self.calls.borrow_mut().push((path.to_path_buf(), is_dir));
        Ok(())
    }
}

#[test]
fn test_scenario_delete_file() {
    let temp = fixture();
    let mut explorer = open(&temp);
    assert_eq!(root_totals(&mut explorer), (350, 4));

    let a = child(&explorer, "A");
    assert!(explorer.select(a));
    let removed = explorer.delete_selected(&FsRemover).unwrap();

    assert_eq!(removed.name, "A");
    assert!(!temp.path().join("A").exists());
    assert_eq!(root_totals(&mut explorer), (250, 3));
    assert!(explorer.status().is_some_and(|s| s.success));
}

#[test]
fn test_delete_passes_absolute_path() {
    let temp = fixture();
    let mut explorer = open(&temp);
    let d = child(&explorer, "D");
    explorer.select(d);

    let remover = RecordingRemover::default();
    explorer.delete_selected(&remover).unwrap();

    let calls = remover.calls.borrow();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, temp.path().canonicalize().unwrap().join("D"));
    assert!(calls[0].1);
    assert_eq!(root_totals(&mut explorer), (300, 2));
}

#[test]
fn test_failed_delete_leaves_tree_unchanged() {
    let temp = fixture();
    let mut explorer = open(&temp);
    let nodes = explorer.tree().node_count();
    let b = child(&explorer, "B");
    explorer.select(b);

    explorer.request_delete().unwrap();
    let err = explorer.confirm_delete(&DeniedRemover).unwrap_err();

    assert!(matches!(err, ExplorerError::Delete { .. }));
    assert!(explorer.state().is_browsing());
    assert_eq!(explorer.tree().node_count(), nodes);
    assert_eq!(root_totals(&mut explorer), (350, 4));
    assert!(explorer.status().is_some_and(|s| !s.success));
}

#[test]
fn test_selection_after_delete() {
    let temp = fixture();
    let mut explorer = open(&temp);
    // size descending: B, A, D
    assert_eq!(names(&mut explorer), ["B", "A", "D"]);

    let a = child(&explorer, "A");
    let d = child(&explorer, "D");
    explorer.select(a);
    explorer.delete_selected(&RecordingRemover::default()).unwrap();
    assert_eq!(explorer.selected(), Some(d));

    // last row falls back to the previous one
    let b = child(&explorer, "B");
    explorer.delete_selected(&RecordingRemover::default()).unwrap();
    assert_eq!(explorer.selected(), Some(b));

    explorer.delete_selected(&RecordingRemover::default()).unwrap();
    assert_eq!(explorer.selected(), None);
    assert!(matches!(
        explorer.request_delete(),
        Err(ExplorerError::NothingSelected)
    ));
}

#[test]
fn test_state_transitions() {
    let temp = fixture();
    let mut explorer = open(&temp);
    let d = child(&explorer, "D");

    explorer.request_delete().unwrap();
    assert!(matches!(
        explorer.begin_rescan(d),
        Err(ExplorerError::InvalidState { .. })
    ));
    assert!(matches!(
        explorer.enter(d),
        Err(ExplorerError::InvalidState { .. })
    ));
    explorer.cancel();
    assert!(explorer.state().is_browsing());

    let job = explorer.begin_rescan(d).unwrap();
    assert!(explorer.state().is_scanning());
    assert!(matches!(
        explorer.request_delete(),
        Err(ExplorerError::ScanInProgress)
    ));
    assert!(matches!(
        explorer.begin_rescan(d),
        Err(ExplorerError::ScanInProgress)
    ));

    explorer.finish_rescan(job.run()).unwrap();
    assert!(explorer.state().is_browsing());
}

#[test]
fn test_cancel_after_walk_still_discards() {
    let temp = fixture();
    let mut explorer = open(&temp);
    let d = child(&explorer, "D");

    let job = explorer.begin_rescan(d).unwrap();
    fs::write(temp.path().join("D/E"), vec![b'e'; 30]).unwrap();
    let outcome = job.run();
    explorer.cancel();
    explorer.finish_rescan(outcome).unwrap();

    assert_eq!(root_totals(&mut explorer), (350, 4));
}

#[test]
fn test_finish_while_browsing_is_rejected() {
    let temp = fixture();
    let mut explorer = open(&temp);
    let outcome = {
        let mut other = open(&temp);
        let d = child(&other, "D");
        other.begin_rescan(d).unwrap().run()
    };

    assert!(matches!(
        explorer.finish_rescan(outcome),
        Err(ExplorerError::InvalidState { .. })
    ));
}

#[test]
fn test_rescan_picks_up_changes() {
    let temp = fixture();
    let mut explorer = open(&temp);
    fs::write(temp.path().join("D/E"), vec![b'e'; 30]).unwrap();

    let d = child(&explorer, "D");
    explorer.rescan(d).unwrap();

    assert_eq!(root_totals(&mut explorer), (380, 5));
    let d = child(&explorer, "D");
    let totals = explorer.tree().aggregate(d).unwrap();
    assert_eq!((totals.apparent_size, totals.item_count), (80, 2));
    assert_eq!(explorer.tree().entry(d).unwrap().name, "D");
}

#[test]
fn test_cancelled_rescan_keeps_old_subtree() {
    let temp = fixture();
    let mut explorer = open(&temp);
    fs::write(temp.path().join("D/E"), vec![b'e'; 30]).unwrap();

    let d = child(&explorer, "D");
    let job = explorer.begin_rescan(d).unwrap();
    explorer.cancel();
    assert!(job.token().is_cancelled());
    // still scanning until the outcome comes back
    assert!(explorer.state().is_scanning());

    explorer.finish_rescan(job.run()).unwrap();
    assert!(explorer.state().is_browsing());
    assert_eq!(root_totals(&mut explorer), (350, 4));
    assert!(explorer.tree().contains(d));
}

#[test]
fn test_pending_rows_during_rescan() {
    let temp = fixture();
    let mut explorer = open(&temp);
    let d = child(&explorer, "D");

    let job = explorer.begin_rescan(d).unwrap();
    let rows = explorer.listing();
    let pending: Vec<_> = rows.iter().filter(|r| r.pending).map(|r| r.name.to_string()).collect();
    assert_eq!(pending, ["D"]);

    // the rest of the tree stays browsable
    explorer.enter(d).unwrap();
    assert!(explorer.listing().iter().all(|r| r.pending));
    assert!(explorer.up());

    explorer.finish_rescan(job.run()).unwrap();
    assert!(explorer.listing().iter().all(|r| !r.pending));
}

#[test]
fn test_rescan_keeps_view_inside_target() {
    let temp = fixture();
    let mut explorer = open(&temp);
    let d = child(&explorer, "D");
    explorer.enter(d).unwrap();
    assert_eq!(explorer.selected_entry().unwrap().name, "C");

    explorer.rescan(d).unwrap();

    let new_d = child(&explorer, "D");
    assert_eq!(explorer.current(), new_d);
    assert_eq!(explorer.selected_entry().unwrap().name, "C");
}

#[test]
fn test_rescan_root_replaces_tree() {
    let temp = fixture();
    let mut explorer = open(&temp);
    fs::remove_file(temp.path().join("B")).unwrap();

    let root = explorer.tree().root();
    explorer.rescan(root).unwrap();

    assert_eq!(root_totals(&mut explorer), (150, 3));
    assert_eq!(names(&mut explorer), ["A", "D"]);
}

#[test]
fn test_failed_rescan_flags_directory() {
    let temp = fixture();
    let mut explorer = open(&temp);
    let d = child(&explorer, "D");

    let job = explorer.begin_rescan(d).unwrap();
    fs::remove_dir_all(temp.path().join("D")).unwrap();
    let err = explorer.finish_rescan(job.run()).unwrap_err();

    assert!(matches!(err, ExplorerError::Scan(_)));
    assert!(explorer.state().is_browsing());
    let row = explorer.listing().into_iter().find(|r| r.id == d).unwrap();
    assert_eq!(row.flag, '!');
    // old figures stay until a successful rescan
    assert_eq!(root_totals(&mut explorer), (350, 4));
}

#[test]
fn test_excluded_directory_stays_unmeasured() {
    let temp = fixture();
    fs::create_dir(temp.path().join("node_modules")).unwrap();
    fs::write(temp.path().join("node_modules/pkg.js"), vec![b'j'; 5000]).unwrap();
    let config = ScanConfig::builder()
        .root(temp.path())
        .exclude_patterns(vec!["node_modules".to_string()])
        .build()
        .unwrap();
    let report = Scanner::new().scan(&config).unwrap();
    let explorer_config = ExplorerConfig {
        metric: SizeMetric::ApparentSize,
        ..ExplorerConfig::default()
    };
    let mut explorer = Explorer::new(report, explorer_config, &AsciiGlyphs);
    assert_eq!(root_totals(&mut explorer), (350, 5));

    let nm = child(&explorer, "node_modules");
    assert!(matches!(
        explorer.enter(nm),
        Err(ExplorerError::NotScanned { .. })
    ));
    assert!(matches!(
        explorer.rescan(nm),
        Err(ExplorerError::NotScanned { .. })
    ));
    assert!(explorer.state().is_browsing());
    assert_eq!(explorer.current(), explorer.tree().root());

    let entry = explorer.tree().entry(nm).unwrap();
    assert!(entry.flags.excluded);
    assert!(explorer.tree().children(nm).is_empty());
    assert_eq!(root_totals(&mut explorer), (350, 5));

    // rescanning the parent applies the rules again
    let root = explorer.tree().root();
    explorer.rescan(root).unwrap();
    let nm = child(&explorer, "node_modules");
    assert!(explorer.tree().entry(nm).unwrap().flags.excluded);
    assert_eq!(root_totals(&mut explorer), (350, 5));
}

#[test]
fn test_sort_orders() {
    let temp = fixture();
    let mut explorer = open(&temp);

    explorer.set_sort(SortSpec::new(SortKey::Name, SortOrder::Descending));
    assert_eq!(names(&mut explorer), ["D", "B", "A"]);

    explorer.set_sort(SortSpec::new(SortKey::Size, SortOrder::Ascending));
    assert_eq!(names(&mut explorer), ["D", "A", "B"]);

    explorer.set_sort(SortSpec::new(SortKey::Items, SortOrder::Descending));
    assert_eq!(names(&mut explorer)[0], "D");

    explorer.toggle_metric();
    assert_eq!(explorer.config().metric, SizeMetric::DiskUsage);
}

#[test]
fn test_cancelled_startup_scan_is_incomplete() {
    let temp = fixture();
    let token = tokio_util::sync::CancellationToken::new();
    token.cancel();
    let report = Scanner::new()
        .scan_with_cancel(&ScanConfig::new(temp.path()), &token)
        .unwrap();

    let mut explorer = Explorer::new(report, ExplorerConfig::default(), &AsciiGlyphs);
    assert!(!explorer.is_complete());
    assert!(explorer.listing().is_empty());
    assert!(matches!(explorer.state(), ExplorerState::Browsing));

    let root = explorer.tree().root();
    explorer.rescan(root).unwrap();
    assert!(explorer.is_complete());
    assert_eq!(explorer.listing().len(), 3);
}

#[test]
fn test_glyphs_cached_from_provider() {
    let temp = fixture();
    let explorer = open(&temp);
    let glyphs = explorer.glyphs();
    assert_eq!(glyphs.top_left.as_char(), '+');
    assert_eq!(glyphs.horizontal.as_char(), '-');
    assert_eq!(glyphs.vertical.as_char(), '|');
}
