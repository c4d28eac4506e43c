//! Arena-backed directory tree with aggregate staleness tracking.
//!
//! Nodes live in a flat slot vector and refer to each other through
//! [`NodeId`]s. Every id carries the generation of its slot, so ids of
//! removed nodes stop resolving even after the slot has been reused.
//!
//! The tree never computes aggregates. Mutations only mark the touched node
//! and its ancestors dirty; the [`aggregate`](crate::aggregate) module clears
//! the marks. A dirty node always has dirty ancestors, which lets a single
//! bottom-up pass skip clean subtrees entirely.

use std::path::PathBuf;

use compact_str::CompactString;

use crate::aggregate::SizeMetric;
use crate::entry::Entry;
use crate::error::TreeError;

/// Handle to a node inside a [`DirTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    /// Slot index inside the arena.
    pub fn index(self) -> usize {
        self.index as usize
    }
}

/// Rolled-up totals of a subtree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Aggregate {
    /// Sum of apparent sizes.
    pub apparent_size: u64,
    /// Sum of disk usage, each hard-linked inode counted once.
    pub disk_usage: u64,
    /// Number of entries below this node (the node itself excluded).
    pub item_count: u64,
    /// This node or something below it failed to read.
    pub has_error: bool,
}

impl Aggregate {
    /// Size according to the chosen metric.
    pub fn size(&self, metric: SizeMetric) -> u64 {
        match metric {
            SizeMetric::DiskUsage => self.disk_usage,
            SizeMetric::ApparentSize => self.apparent_size,
        }
    }
}

/// A single entry in the tree plus its links and cached totals.
#[derive(Debug, Clone)]
pub struct Node {
    entry: Entry,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    aggregate: Aggregate,
    dirty: bool,
}

impl Node {
    fn new(entry: Entry, parent: Option<NodeId>) -> Self {
        Self {
            entry,
            parent,
            children: Vec::new(),
            aggregate: Aggregate::default(),
            dirty: true,
        }
    }

    /// The filesystem entry.
    pub fn entry(&self) -> &Entry {
        &self.entry
    }

    /// Parent directory, `None` for the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in walk insertion order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Whether the cached aggregate is out of date.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// The scanned hierarchy.
#[derive(Debug, Clone)]
pub struct DirTree {
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: NodeId,
    live: usize,
}

impl DirTree {
    /// Create a tree holding only its root.
    pub fn new(root: Entry) -> Self {
        let mut tree = Self {
            slots: Vec::new(),
            free: Vec::new(),
            root: NodeId {
                index: 0,
                generation: 0,
            },
            live: 0,
        };
        tree.root = tree.alloc(Node::new(root, None));
        tree
    }

    /// Root node id.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of live nodes, root included.
    pub fn node_count(&self) -> usize {
        self.live
    }

    /// Look up a node.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.index())
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    /// Whether the id still refers to a live node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Entry of a node.
    pub fn entry(&self, id: NodeId) -> Option<&Entry> {
        self.get(id).map(Node::entry)
    }

    /// Parent of a node.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(Node::parent)
    }

    /// Children of a node, empty for files and stale ids.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(Node::children).unwrap_or(&[])
    }

    /// Find a direct child by name.
    pub fn find_child(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.children(parent)
            .iter()
            .copied()
            .find(|&child| self.entry(child).is_some_and(|e| e.name == name))
    }

    /// Follow a chain of child names starting at `from`.
    pub fn find_path<I, S>(&self, from: NodeId, names: I) -> Option<NodeId>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .try_fold(from, |node, name| self.find_child(node, name.as_ref()))
    }

    /// Iterate over the ancestors of a node, nearest first.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            current: self.parent(id),
        }
    }

    /// Iterate over a subtree in pre-order, starting with `id` itself.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let stack = if self.contains(id) { vec![id] } else { Vec::new() };
        Descendants { tree: self, stack }
    }

    /// Whether `ancestor` is `id` or one of its ancestors.
    pub fn is_ancestor_or_self(&self, ancestor: NodeId, id: NodeId) -> bool {
        self.contains(id) && (id == ancestor || self.ancestors(id).any(|a| a == ancestor))
    }

    /// Distance from the root.
    pub fn depth(&self, id: NodeId) -> usize {
        self.ancestors(id).count()
    }

    /// Names from just below the root down to `id`, joined as a path.
    pub fn relative_path(&self, id: NodeId) -> Option<PathBuf> {
        let node = self.get(id)?;
        let mut names: Vec<&str> = vec![node.entry.name.as_str()];
        let mut current = node.parent;
        while let Some(parent) = current {
            let parent_node = self.get(parent)?;
            if parent_node.parent.is_none() {
                break;
            }
            names.push(parent_node.entry.name.as_str());
            current = parent_node.parent;
        }
        if node.parent.is_none() {
            return Some(PathBuf::new());
        }
        Some(names.iter().rev().collect())
    }

    /// Whether a node's cached aggregate is stale.
    pub fn is_dirty(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(Node::is_dirty)
    }

    /// Cached aggregate of a node, `None` while it is stale.
    pub fn aggregate(&self, id: NodeId) -> Option<Aggregate> {
        self.get(id).filter(|n| !n.dirty).map(|n| n.aggregate)
    }

    /// Attach a new child at the end of `parent`'s children.
    pub fn insert(&mut self, parent: NodeId, entry: Entry) -> Result<NodeId, TreeError> {
        if !self.node(parent)?.entry.is_dir() {
            return Err(TreeError::NotADirectory);
        }
        let id = self.alloc(Node::new(entry, Some(parent)));
        self.node_mut(parent)?.children.push(id);
        self.mark_dirty(parent);
        Ok(id)
    }

    /// Modify a node's entry in place, invalidating its aggregates.
    pub fn update_entry<F>(&mut self, id: NodeId, update: F) -> Result<(), TreeError>
    where
        F: FnOnce(&mut Entry),
    {
        update(&mut self.node_mut(id)?.entry);
        self.mark_dirty(id);
        Ok(())
    }

    /// Detach a node from its parent and drop its whole subtree.
    ///
    /// Returns the removed node's entry.
    pub fn remove(&mut self, id: NodeId) -> Result<Entry, TreeError> {
        let parent = self.node(id)?.parent.ok_or(TreeError::RootRemoval)?;
        self.node_mut(parent)?.children.retain(|&child| child != id);
        self.mark_dirty(parent);
        self.release_subtree(id).ok_or(TreeError::StaleNode)
    }

    /// Swap a freshly scanned tree in at the position of `id`.
    ///
    /// The new branch keeps the old node's name and sibling position.
    /// Aggregates inside the new branch are taken over as they are; the
    /// ancestors of the splice point are marked dirty. Replacing the root
    /// replaces the whole tree. Returns the id of the new branch root.
    pub fn replace_subtree(&mut self, id: NodeId, subtree: DirTree) -> Result<NodeId, TreeError> {
        let node = self.node(id)?;
        let Some(parent) = node.parent else {
            let new_root = self.graft(subtree, None)?;
            self.root = new_root;
            self.release_subtree(id);
            return Ok(new_root);
        };

        let name = node.entry.name.clone();
        let position = self
            .node(parent)?
            .children
            .iter()
            .position(|&child| child == id)
            .ok_or(TreeError::StaleNode)?;

        let new_id = self.graft(subtree, Some(parent))?;
        self.node_mut(new_id)?.entry.name = name;
        self.node_mut(parent)?.children[position] = new_id;
        self.release_subtree(id);
        self.mark_dirty(parent);
        Ok(new_id)
    }

    /// Rename a node. Aggregates are unaffected.
    pub fn rename(&mut self, id: NodeId, name: impl Into<CompactString>) -> Result<(), TreeError> {
        self.node_mut(id)?.entry.name = name.into();
        Ok(())
    }

    /// Store a computed aggregate and clear the dirty mark.
    pub(crate) fn set_aggregate(&mut self, id: NodeId, aggregate: Aggregate) {
        if let Some(node) = self.get_mut(id) {
            node.aggregate = aggregate;
            node.dirty = false;
        }
    }

    fn node(&self, id: NodeId) -> Result<&Node, TreeError> {
        self.get(id).ok_or(TreeError::StaleNode)
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, TreeError> {
        self.get_mut(id).ok_or(TreeError::StaleNode)
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index())
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    fn mark_dirty(&mut self, id: NodeId) {
        let mut current = Some(id);
        while let Some(cur) = current {
            let Some(node) = self.get_mut(cur) else { break };
            if node.dirty && cur != id {
                break;
            }
            node.dirty = true;
            current = node.parent;
        }
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        self.live += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            NodeId {
                index,
                generation: slot.generation,
            }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                node: Some(node),
            });
            NodeId {
                index,
                generation: 0,
            }
        }
    }

    fn release(&mut self, id: NodeId) -> Option<Node> {
        let slot = self
            .slots
            .get_mut(id.index())
            .filter(|slot| slot.generation == id.generation)?;
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.live -= 1;
        Some(node)
    }

    fn release_subtree(&mut self, id: NodeId) -> Option<Entry> {
        let top = self.release(id)?;
        let mut stack = top.children;
        while let Some(child) = stack.pop() {
            if let Some(node) = self.release(child) {
                stack.extend(node.children);
            }
        }
        Some(top.entry)
    }

    fn take(&mut self, id: NodeId) -> Option<Node> {
        self.slots
            .get_mut(id.index())
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.take())
    }

    /// Move every node of `subtree` into this arena, keeping child order.
    fn graft(&mut self, mut subtree: DirTree, parent: Option<NodeId>) -> Result<NodeId, TreeError> {
        let mut top = subtree.take(subtree.root).ok_or(TreeError::StaleNode)?;
        let top_children = std::mem::take(&mut top.children);
        top.parent = parent;
        let new_root = self.alloc(top);

        let mut stack: Vec<(NodeId, NodeId)> =
            top_children.into_iter().rev().map(|c| (c, new_root)).collect();
        while let Some((old_id, new_parent)) = stack.pop() {
            let Some(mut node) = subtree.take(old_id) else {
                continue;
            };
            let children = std::mem::take(&mut node.children);
            node.parent = Some(new_parent);
            let new_id = self.alloc(node);
            self.node_mut(new_parent)?.children.push(new_id);
            stack.extend(children.into_iter().rev().map(|c| (c, new_id)));
        }
        Ok(new_root)
    }
}

/// Iterator over a node's ancestors.
pub struct Ancestors<'a> {
    tree: &'a DirTree,
    current: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}

/// Pre-order iterator over a subtree.
pub struct Descendants<'a> {
    tree: &'a DirTree,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}
