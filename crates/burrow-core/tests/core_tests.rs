use burrow_core::{
    Aggregate, DirTree, Entry, EntryFlags, NodeId, TreeError, recompute, settle,
};

/// root/{A(100), B(200), D/{C(50)}}
fn scenario() -> (DirTree, NodeId, NodeId, NodeId, NodeId) {
    let mut tree = DirTree::new(Entry::directory("/scenario"));
    let root = tree.root();
    let a = tree.insert(root, Entry::file("A", 100, 100)).unwrap();
    let b = tree.insert(root, Entry::file("B", 200, 200)).unwrap();
    let d = tree.insert(root, Entry::directory("D")).unwrap();
    let c = tree.insert(d, Entry::file("C", 50, 50)).unwrap();
    (tree, a, b, d, c)
}

fn shared(entry: Entry) -> Entry {
    let flags = EntryFlags {
        shared_hardlink: true,
        ..entry.flags
    };
    entry.with_flags(flags)
}

#[test]
fn test_scenario_totals() {
    let (mut tree, _, _, d, _) = scenario();
    let root = tree.root();
    let totals = recompute(&mut tree, root).unwrap();

    assert_eq!(totals.apparent_size, 350);
    assert_eq!(totals.disk_usage, 350);
    // A, B, D and C; a directory never counts itself
    assert_eq!(totals.item_count, 4);
    assert!(!totals.has_error);

    let d_totals = tree.aggregate(d).unwrap();
    assert_eq!(d_totals.apparent_size, 50);
    assert_eq!(d_totals.item_count, 1);
}

#[test]
fn test_scenario_delete_a() {
    let (mut tree, a, _, _, _) = scenario();
    let root = tree.root();
    recompute(&mut tree, root).unwrap();

    tree.remove(a).unwrap();
    assert!(tree.aggregate(root).is_none(), "removal must leave root stale");

    settle(&mut tree);
    let totals = tree.aggregate(root).unwrap();
    assert_eq!(totals.apparent_size, 250);
    assert_eq!(totals.item_count, 3);
}

#[test]
fn test_recompute_is_idempotent() {
    let (mut tree, _, _, d, _) = scenario();
    let root = tree.root();
    let first = recompute(&mut tree, root).unwrap();
    let first_d = tree.aggregate(d).unwrap();
    let second = recompute(&mut tree, root).unwrap();
    assert_eq!(first, second);
    assert_eq!(first_d, tree.aggregate(d).unwrap());
}

#[test]
fn test_recompute_equals_sum_of_children() {
    let (mut tree, _, _, _, _) = scenario();
    let root = tree.root();
    recompute(&mut tree, root).unwrap();

    let ids: Vec<NodeId> = tree.descendants(root).collect();
    for id in ids {
        let node = tree.get(id).unwrap();
        if !node.entry().is_dir() {
            continue;
        }
        let mut expected = Aggregate::default();
        for &child in node.children() {
            let sub = tree.aggregate(child).unwrap();
            expected.apparent_size += sub.apparent_size;
            expected.disk_usage += sub.disk_usage;
            expected.item_count += 1 + sub.item_count;
            expected.has_error |= sub.has_error;
        }
        assert_eq!(tree.aggregate(id).unwrap(), expected);
    }
}

#[test]
fn test_identical_trees_identical_snapshots() {
    let (mut one, ..) = scenario();
    let (mut two, ..) = scenario();
    let r1 = one.root();
    let r2 = two.root();
    assert_eq!(recompute(&mut one, r1).unwrap(), recompute(&mut two, r2).unwrap());
}

#[test]
fn test_hardlink_counted_once_at_common_ancestor() {
    let mut tree = DirTree::new(Entry::directory("/links"));
    let root = tree.root();
    let x = tree.insert(root, Entry::directory("x")).unwrap();
    let y = tree.insert(root, Entry::directory("y")).unwrap();
    let first = tree
        .insert(x, Entry::file("data", 1000, 4096).with_inode(1, 77, 2))
        .unwrap();
    let second = tree
        .insert(y, shared(Entry::file("data", 1000, 4096).with_inode(1, 77, 2)))
        .unwrap();

    let totals = recompute(&mut tree, root).unwrap();
    assert_eq!(totals.disk_usage, 4096);
    assert_eq!(totals.apparent_size, 2000);

    // each link still reports its own full size
    assert_eq!(tree.entry(first).unwrap().disk_usage, 4096);
    assert_eq!(tree.entry(second).unwrap().disk_usage, 4096);
    assert_eq!(tree.entry(second).unwrap().apparent_size, 1000);
}

#[test]
fn test_error_propagates_to_root() {
    let mut tree = DirTree::new(Entry::directory("/err"));
    let root = tree.root();
    let a = tree.insert(root, Entry::directory("a")).unwrap();
    let b = tree.insert(a, Entry::directory("b")).unwrap();
    let sibling = tree.insert(root, Entry::directory("sibling")).unwrap();
    let broken = tree
        .insert(
            b,
            Entry::file("locked", 0, 0).with_flags(EntryFlags {
                read_error: true,
                ..EntryFlags::default()
            }),
        )
        .unwrap();

    recompute(&mut tree, root).unwrap();

    for id in [broken, b, a, root] {
        assert!(tree.aggregate(id).unwrap().has_error);
    }
    assert!(!tree.aggregate(sibling).unwrap().has_error);
}

#[test]
fn test_deletion_decreases_every_ancestor_exactly() {
    let mut tree = DirTree::new(Entry::directory("/del"));
    let root = tree.root();
    let outer = tree.insert(root, Entry::directory("outer")).unwrap();
    let inner = tree.insert(outer, Entry::directory("inner")).unwrap();
    tree.insert(root, Entry::file("keep", 7, 8)).unwrap();
    tree.insert(outer, Entry::file("also", 3, 4)).unwrap();
    let victim = tree.insert(inner, Entry::directory("victim")).unwrap();
    tree.insert(victim, Entry::file("v1", 11, 12)).unwrap();
    tree.insert(victim, Entry::file("v2", 13, 16)).unwrap();

    recompute(&mut tree, root).unwrap();
    let victim_totals = tree.aggregate(victim).unwrap();
    let before: Vec<(NodeId, Aggregate)> = [inner, outer, root]
        .iter()
        .map(|&id| (id, tree.aggregate(id).unwrap()))
        .collect();

    tree.remove(victim).unwrap();
    settle(&mut tree);

    assert!(!tree.children(inner).contains(&victim));
    for (id, old) in before {
        let new = tree.aggregate(id).unwrap();
        assert_eq!(old.apparent_size - new.apparent_size, victim_totals.apparent_size);
        assert_eq!(old.disk_usage - new.disk_usage, victim_totals.disk_usage);
        assert_eq!(old.item_count - new.item_count, victim_totals.item_count + 1);
    }
}

#[test]
fn test_replace_subtree_takes_fresh_aggregates() {
    let (mut tree, _, _, d, _) = scenario();
    let root = tree.root();
    recompute(&mut tree, root).unwrap();

    let mut fresh = DirTree::new(Entry::directory("/scenario/D"));
    let fresh_root = fresh.root();
    fresh.insert(fresh_root, Entry::file("C", 50, 50)).unwrap();
    fresh.insert(fresh_root, Entry::file("E", 25, 25)).unwrap();
    recompute(&mut fresh, fresh_root).unwrap();

    let new_d = tree.replace_subtree(d, fresh).unwrap();
    assert!(tree.aggregate(new_d).is_some(), "spliced branch arrives aggregated");
    assert!(tree.aggregate(root).is_none(), "ancestors become stale");

    settle(&mut tree);
    let totals = tree.aggregate(root).unwrap();
    assert_eq!(totals.apparent_size, 375);
    assert_eq!(totals.item_count, 5);
}

#[test]
fn test_stale_node_errors() {
    let (mut tree, a, _, _, _) = scenario();
    tree.remove(a).unwrap();
    assert_eq!(recompute(&mut tree, a), Err(TreeError::StaleNode));
    assert_eq!(
        tree.insert(a, Entry::file("x", 1, 1)),
        Err(TreeError::StaleNode)
    );
    assert_eq!(
        tree.replace_subtree(a, DirTree::new(Entry::directory("a"))),
        Err(TreeError::StaleNode)
    );
}

#[test]
fn test_update_entry_invalidates() {
    let (mut tree, a, _, _, _) = scenario();
    let root = tree.root();
    recompute(&mut tree, root).unwrap();

    tree.update_entry(a, |entry| entry.flags.read_error = true)
        .unwrap();
    assert!(tree.is_dirty(a));
    assert!(tree.is_dirty(root));

    settle(&mut tree);
    assert!(tree.aggregate(root).unwrap().has_error);
}
