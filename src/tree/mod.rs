//! The layout tree.
//!
//! A [`Tree`] is an arena of [`Node`]s keyed by [`NodeId`] (a slotmap key),
//! shaped like this:
//!
//! ```text
//! Root
//! └─ Workspace(0)
//!    ├─ Monitor(0)            layout: hsplit
//!    │  ├─ Window 0x1
//!    │  └─ Container          layout: vsplit
//!    │     ├─ Window 0x2
//!    │     └─ Window 0x3
//!    └─ Monitor(1)
//! ```
//!
//! All structural edits funnel through this module (and its `ops`,
//! `clean` and `percent` submodules) so the invariants are enforced in one
//! place:
//!
//! * windows are leaves; only root / workspace / monitor / container nodes
//!   have children;
//! * the percents of the tiled children of a split branch sum to 1.0 after
//!   an arrange pass;
//! * containers never hold a single container child, and empty containers
//!   do not survive a cleanup pass.  Monitors persist even when empty.
//!
//! Parent links are plain keys, so there is no ownership cycle; removing a
//! node frees its whole subtree from the arena.

mod clean;
mod navigate;
mod node;
mod ops;
mod percent;

pub use node::{Branch, Layout, Leaf, Node, NodeData, NodeId, NodeType, WindowId, WindowMode};
pub use percent::{distribute, process_gap};

use crate::geometry::Rect;
use log::debug;
use slotmap::SlotMap;
use std::collections::BTreeMap;

/// Tunables the tree consults while mutating itself.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeSettings {
    /// Layout given to new monitors and to stacked/tabbed containers that
    /// auto-exit.
    pub default_layout: Layout,
    /// Convert a stacked/tabbed container left with one child into a split.
    pub auto_exit_tabbed: bool,
    /// Fraction of a target's width/height that counts as an edge drop zone.
    pub edge_fraction: f64,
}

impl Default for TreeSettings {
    fn default() -> Self {
        Self {
            default_layout: Layout::HSplit,
            auto_exit_tabbed: true,
            edge_fraction: 0.3,
        }
    }
}

/// The layout tree.  See the [module documentation](self).
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: SlotMap<NodeId, Node>,
    root: NodeId,
    workspaces: BTreeMap<usize, NodeId>,
    /// `(workspace, monitor) -> node`
    monitors: BTreeMap<(usize, usize), NodeId>,
    attach_node: Option<NodeId>,
    settings: TreeSettings,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new(TreeSettings::default())
    }
}

impl Tree {
    /// Create a tree holding only the root node.
    pub fn new(settings: TreeSettings) -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Node::new(NodeData::Root(Branch::new(Layout::None))));
        Self {
            nodes,
            root,
            workspaces: BTreeMap::new(),
            monitors: BTreeMap::new(),
            attach_node: None,
            settings,
        }
    }

    //  Accessors

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn settings(&self) -> &TreeSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut TreeSettings {
        &mut self.settings
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of nodes, the root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|n| n.parent)
    }

    /// Children of `id`, or an empty slice for unknown nodes.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Position of `id` among its parent's children.
    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&c| c == id)
    }

    pub fn node_type(&self, id: NodeId) -> Option<NodeType> {
        self.nodes.get(id).map(|n| n.node_type())
    }

    pub fn layout(&self, id: NodeId) -> Option<Layout> {
        self.nodes.get(id).and_then(|n| n.layout())
    }

    pub fn leaf(&self, id: NodeId) -> Option<&Leaf> {
        self.nodes.get(id).and_then(|n| n.data.leaf())
    }

    pub(crate) fn leaf_mut(&mut self, id: NodeId) -> Option<&mut Leaf> {
        self.nodes.get_mut(id).and_then(|n| n.data.leaf_mut())
    }

    pub(crate) fn branch_mut(&mut self, id: NodeId) -> Option<&mut Branch> {
        self.nodes.get_mut(id).and_then(|n| n.data.branch_mut())
    }

    pub fn rect(&self, id: NodeId) -> Option<Rect> {
        self.nodes.get(id).map(|n| n.rect)
    }

    pub fn set_rect(&mut self, id: NodeId, rect: Rect) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.rect = rect;
        }
    }

    pub fn percent(&self, id: NodeId) -> Option<f64> {
        self.nodes.get(id).map(|n| n.percent)
    }

    pub fn set_percent(&mut self, id: NodeId, percent: f64) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.percent = percent;
        }
    }

    /// The stacked/tabbed child currently shown by `id`.
    pub fn last_focused(&self, id: NodeId) -> Option<NodeId> {
        self.nodes
            .get(id)
            .and_then(|n| n.data.branch())
            .and_then(|b| b.last_focused)
    }

    pub fn set_last_focused(&mut self, id: NodeId, child: Option<NodeId>) {
        if let Some(branch) = self.branch_mut(id) {
            branch.last_focused = child;
        }
    }

    /// The container new siblings should attach under, as left by the most
    /// recent mutation.
    pub fn attach_node(&self) -> Option<NodeId> {
        self.attach_node.filter(|&id| self.contains(id))
    }

    pub fn set_attach_node(&mut self, id: Option<NodeId>) {
        self.attach_node = id;
    }

    //  Workspaces and monitors

    /// Create the workspace node for `index`, or return the existing one.
    pub fn add_workspace(&mut self, index: usize) -> NodeId {
        if let Some(&id) = self.workspaces.get(&index) {
            return id;
        }
        let id = self.alloc(NodeData::workspace(index));
        let root = self.root;
        self.attach_at(root, usize::MAX, id);
        self.workspaces.insert(index, id);
        debug!("added workspace {}", index);
        id
    }

    pub fn workspace(&self, index: usize) -> Option<NodeId> {
        self.workspaces.get(&index).copied()
    }

    /// Workspace indices known to the tree, ascending.
    pub fn workspace_indices(&self) -> Vec<usize> {
        self.workspaces.keys().copied().collect()
    }

    /// Remove a workspace with everything on it.
    pub fn remove_workspace(&mut self, index: usize) -> bool {
        match self.workspaces.get(&index).copied() {
            Some(id) => self.remove_node(id),
            None => false,
        }
    }

    /// Create (or resize) the monitor node for `monitor` on `workspace`,
    /// creating the workspace first if needed.
    pub fn add_monitor(&mut self, workspace: usize, monitor: usize, rect: Rect) -> NodeId {
        if let Some(&id) = self.monitors.get(&(workspace, monitor)) {
            self.set_rect(id, rect);
            return id;
        }
        let ws = self.add_workspace(workspace);
        let layout = self.settings.default_layout;
        let id = self.alloc(NodeData::monitor(monitor, layout));
        self.attach_at(ws, usize::MAX, id);
        self.set_rect(id, rect);
        self.monitors.insert((workspace, monitor), id);
        debug!("added monitor {} on workspace {} at {}", monitor, workspace, rect);
        id
    }

    pub fn monitor(&self, workspace: usize, monitor: usize) -> Option<NodeId> {
        self.monitors.get(&(workspace, monitor)).copied()
    }

    /// Monitor indices present on `workspace`, ascending.
    pub fn monitor_indices(&self, workspace: usize) -> Vec<usize> {
        self.monitors
            .keys()
            .filter(|&&(ws, _)| ws == workspace)
            .map(|&(_, mon)| mon)
            .collect()
    }

    /// Every monitor node, ordered by `(workspace, monitor)`.
    pub fn monitors(&self) -> Vec<NodeId> {
        self.monitors.values().copied().collect()
    }

    /// Remove a monitor.  Its windows move to the first remaining monitor
    /// of the same workspace, else to the first monitor of any other
    /// workspace.  A monitor that still holds windows is kept when no other
    /// monitor exists.
    pub fn remove_monitor(&mut self, workspace: usize, monitor: usize) -> bool {
        let Some(id) = self.monitor(workspace, monitor) else {
            return false;
        };
        let fallback = self
            .monitors
            .iter()
            .filter(|(&key, _)| key != (workspace, monitor))
            .min_by_key(|(&(ws, _), _)| ws != workspace)
            .map(|(_, &node)| node);
        match fallback {
            Some(target) => {
                let moved: Vec<NodeId> = self.children(id).to_vec();
                for child in moved {
                    self.append_child(target, child);
                }
                self.reset_sibling_percent(target);
                debug!(
                    "monitor {} on workspace {} removed, windows moved to {:?}",
                    monitor, workspace, target
                );
            }
            None if !self.children(id).is_empty() => {
                debug!(
                    "monitor {} on workspace {} is the last one and holds windows, keeping it",
                    monitor, workspace
                );
                return false;
            }
            None => {}
        }
        self.remove_node(id)
    }

    /// The monitor node `id` lives on (itself for a monitor).
    pub fn monitor_of(&self, id: NodeId) -> Option<NodeId> {
        self.ancestors_inclusive(id)
            .into_iter()
            .find(|&n| self.node_type(n) == Some(NodeType::Monitor))
    }

    //  Creation and removal

    /// Append a new node under `parent`.
    ///
    /// Returns `None` if `parent` does not exist or is a window.
    pub fn create_node(&mut self, parent: NodeId, data: NodeData) -> Option<NodeId> {
        if self.nodes.get(parent)?.data.branch().is_none() {
            return None;
        }
        let kind = data.node_type();
        let index = match &data {
            NodeData::Workspace { index, .. } => Some(*index),
            NodeData::Monitor { index, .. } => Some(*index),
            _ => None,
        };
        let id = self.alloc(data);
        self.attach_at(parent, usize::MAX, id);
        match (kind, index) {
            (NodeType::Workspace, Some(index)) => {
                self.workspaces.insert(index, id);
            }
            (NodeType::Monitor, Some(index)) => {
                if let Some(ws) = self.workspace_index_of(parent) {
                    self.monitors.insert((ws, index), id);
                }
            }
            _ => {}
        }
        Some(id)
    }

    /// Detach `id` from the tree and free its subtree.
    ///
    /// The former parent is cleaned up (an emptied container disappears, a
    /// split container left with one child hands its slot to that child,
    /// a stacked/tabbed one may auto-exit into a split) and the remaining
    /// siblings get their percents reset.  The attach node moves to the
    /// surviving parent.  Returns `false` for the root or unknown nodes.
    pub fn remove_node(&mut self, id: NodeId) -> bool {
        if id == self.root || !self.contains(id) {
            return false;
        }
        let parent = self.parent(id);
        self.detach(id);
        self.free_subtree(id);
        let survivor = parent.and_then(|p| self.prune(p));
        self.attach_node = survivor.or(self.attach_node());
        true
    }

    //  Lookups

    /// Find the node of a host window anywhere in the tree.
    pub fn find_node(&self, window: WindowId) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|(_, n)| n.window() == Some(window))
            .map(|(id, _)| id)
    }

    /// Find the node of a host window within `subtree`.
    pub fn find_node_in(&self, subtree: NodeId, window: WindowId) -> Option<NodeId> {
        self.descendants(subtree)
            .into_iter()
            .find(|&id| self.get(id).and_then(|n| n.window()) == Some(window))
    }

    /// All nodes of the given type, in tree order.
    pub fn nodes_by_type(&self, kind: NodeType) -> Vec<NodeId> {
        self.nodes_by_type_in(self.root, kind)
    }

    /// All nodes of the given type within `subtree` (inclusive), in tree
    /// order.
    pub fn nodes_by_type_in(&self, subtree: NodeId, kind: NodeType) -> Vec<NodeId> {
        self.descendants(subtree)
            .into_iter()
            .filter(|&id| self.node_type(id) == Some(kind))
            .collect()
    }

    /// Window nodes within `subtree`, in tree order.
    pub fn windows_in(&self, subtree: NodeId) -> Vec<NodeId> {
        self.nodes_by_type_in(subtree, NodeType::Window)
    }

    /// `subtree` and all of its descendants, pre-order.
    pub fn descendants(&self, subtree: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if !self.contains(subtree) {
            return out;
        }
        let mut stack = vec![subtree];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }

    /// `id`, its parent, grandparent, ... up to the root.
    pub fn ancestors_inclusive(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut current = Some(id).filter(|&id| self.contains(id));
        while let Some(node) = current {
            out.push(node);
            current = self.parent(node);
        }
        out
    }

    /// Whether `ancestor` is `id` or one of its ancestors.
    pub fn is_ancestor_or_self(&self, ancestor: NodeId, id: NodeId) -> bool {
        self.ancestors_inclusive(id).contains(&ancestor)
    }

    //  Reparenting

    /// Move `node` (with its subtree) to just before `anchor`.
    pub fn insert_before(&mut self, anchor: NodeId, node: NodeId) -> bool {
        self.insert_beside(anchor, node, false)
    }

    /// Move `node` (with its subtree) to just after `anchor`.
    pub fn insert_after(&mut self, anchor: NodeId, node: NodeId) -> bool {
        self.insert_beside(anchor, node, true)
    }

    /// Move `node` to the end of `parent`'s children.
    pub fn append_child(&mut self, parent: NodeId, node: NodeId) -> bool {
        if !self.can_adopt(parent, node) {
            return false;
        }
        self.detach(node);
        self.attach_at(parent, usize::MAX, node);
        true
    }

    /// Move `node` to the front of `parent`'s children.
    pub fn prepend_child(&mut self, parent: NodeId, node: NodeId) -> bool {
        if !self.can_adopt(parent, node) {
            return false;
        }
        self.detach(node);
        self.attach_at(parent, 0, node);
        true
    }

    fn insert_beside(&mut self, anchor: NodeId, node: NodeId, after: bool) -> bool {
        if anchor == node {
            return false;
        }
        let Some(parent) = self.parent(anchor) else {
            return false;
        };
        if !self.can_adopt(parent, node) {
            return false;
        }
        self.detach(node);
        let Some(index) = self.index_of(anchor) else {
            return false;
        };
        self.attach_at(parent, if after { index + 1 } else { index }, node);
        true
    }

    /// `parent` may take `node` as a child without breaking the tree shape.
    fn can_adopt(&self, parent: NodeId, node: NodeId) -> bool {
        let parent_is_branch = self
            .get(parent)
            .is_some_and(|p| p.data.branch().is_some());
        parent_is_branch
            && self.contains(node)
            && node != self.root
            && !self.is_ancestor_or_self(node, parent)
    }

    //  Internal plumbing

    fn alloc(&mut self, data: NodeData) -> NodeId {
        self.nodes.insert(Node::new(data))
    }

    /// Insert an already-detached node into `parent` at `index` (clamped).
    pub(crate) fn attach_at(&mut self, parent: NodeId, index: usize, node: NodeId) {
        let Some(p) = self.nodes.get_mut(parent) else {
            return;
        };
        let index = index.min(p.children.len());
        p.children.insert(index, node);
        if let Some(n) = self.nodes.get_mut(node) {
            n.parent = Some(parent);
        }
    }

    /// Unlink `node` from its parent, keeping its subtree intact.
    pub(crate) fn detach(&mut self, node: NodeId) {
        let Some(parent) = self.parent(node) else {
            return;
        };
        if let Some(p) = self.nodes.get_mut(parent) {
            if let Some(pos) = p.children.iter().position(|&c| c == node) {
                p.children.remove(pos);
                let replacement = p
                    .children
                    .get(pos)
                    .or_else(|| p.children.last())
                    .copied();
                if let Some(branch) = p.data.branch_mut() {
                    if branch.last_focused == Some(node) {
                        branch.last_focused = replacement;
                    }
                }
            }
        }
        if let Some(n) = self.nodes.get_mut(node) {
            n.parent = None;
        }
    }

    /// Put `replacement` (detached) where `old` sits in its parent, and
    /// detach `old`.
    pub(crate) fn replace_in_parent(&mut self, old: NodeId, replacement: NodeId) -> bool {
        let Some(parent) = self.parent(old) else {
            return false;
        };
        let Some(index) = self.index_of(old) else {
            return false;
        };
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children[index] = replacement;
            if let Some(branch) = p.data.branch_mut() {
                if branch.last_focused == Some(old) {
                    branch.last_focused = Some(replacement);
                }
            }
        }
        if let Some(n) = self.nodes.get_mut(replacement) {
            n.parent = Some(parent);
        }
        if let Some(n) = self.nodes.get_mut(old) {
            n.parent = None;
        }
        true
    }

    /// Drop a detached subtree from the arena and the lookup indices.
    pub(crate) fn free_subtree(&mut self, id: NodeId) {
        for node in self.descendants(id) {
            if let Some(removed) = self.nodes.remove(node) {
                match removed.data {
                    NodeData::Workspace { index, .. } => {
                        self.workspaces.remove(&index);
                        self.monitors.retain(|&(ws, _), _| ws != index);
                    }
                    NodeData::Monitor { .. } => {
                        self.monitors.retain(|_, &mut m| m != node);
                    }
                    _ => {}
                }
                if self.attach_node == Some(node) {
                    self.attach_node = None;
                }
            }
        }
    }

    fn workspace_index_of(&self, id: NodeId) -> Option<usize> {
        self.ancestors_inclusive(id)
            .into_iter()
            .find_map(|n| match self.get(n).map(|n| &n.data) {
                Some(NodeData::Workspace { index, .. }) => Some(*index),
                _ => None,
            })
    }

    //  Debugging

    /// Indented text dump of the tree.
    pub fn debug_tree(&self) -> String {
        let mut out = String::new();
        self.debug_node(self.root, 0, &mut out);
        out
    }

    fn debug_node(&self, id: NodeId, depth: usize, out: &mut String) {
        let Some(node) = self.get(id) else {
            return;
        };
        let label = match &node.data {
            NodeData::Root(_) => "root".to_string(),
            NodeData::Workspace { index, .. } => format!("workspace {}", index),
            NodeData::Monitor { index, branch } => format!("monitor {} [{}]", index, branch.layout),
            NodeData::Container(branch) => format!("container [{}]", branch.layout),
            NodeData::Window(leaf) => format!("window {} ({:?})", leaf.window, leaf.mode),
        };
        out.push_str(&format!(
            "{}{} {} {:.3}\n",
            "  ".repeat(depth),
            label,
            node.rect,
            node.percent
        ));
        for &child in &node.children {
            self.debug_node(child, depth + 1, out);
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A tree with one workspace and one 900x600 monitor.
    pub(crate) fn single_monitor() -> (Tree, NodeId) {
        let mut tree = Tree::default();
        let mon = tree.add_monitor(0, 0, Rect::new(0, 0, 900, 600));
        (tree, mon)
    }

    pub(crate) fn add_window(tree: &mut Tree, parent: NodeId, id: u64) -> NodeId {
        tree.create_node(parent, NodeData::window(WindowId(id), WindowMode::Tile))
            .expect("parent accepts windows")
    }

    #[test]
    fn new_tree_has_only_root() {
        let tree = Tree::default();
        assert_eq!(tree.len(), 1);
        assert!(tree.is_empty());
        assert_eq!(tree.node_type(tree.root()), Some(NodeType::Root));
    }

    #[test]
    fn monitors_are_indexed() {
        let mut tree = Tree::default();
        let a = tree.add_monitor(0, 0, Rect::new(0, 0, 1920, 1080));
        let b = tree.add_monitor(0, 1, Rect::new(1920, 0, 1920, 1080));
        assert_eq!(tree.monitor(0, 0), Some(a));
        assert_eq!(tree.monitor(0, 1), Some(b));
        assert_eq!(tree.workspace_indices(), vec![0]);
        assert_eq!(tree.monitors(), vec![a, b]);
        // Re-adding resizes instead of duplicating.
        let again = tree.add_monitor(0, 0, Rect::new(0, 0, 1280, 720));
        assert_eq!(again, a);
        assert_eq!(tree.rect(a), Some(Rect::new(0, 0, 1280, 720)));
    }

    #[test]
    fn windows_cannot_have_children() {
        let (mut tree, mon) = single_monitor();
        let w = add_window(&mut tree, mon, 1);
        assert!(tree
            .create_node(w, NodeData::window(WindowId(2), WindowMode::Tile))
            .is_none());
        assert!(!tree.append_child(w, mon));
    }

    #[test]
    fn find_and_lookup_by_type() {
        let (mut tree, mon) = single_monitor();
        let w1 = add_window(&mut tree, mon, 1);
        let c = tree.create_node(mon, NodeData::container(Layout::VSplit)).unwrap();
        let w2 = add_window(&mut tree, c, 2);
        assert_eq!(tree.find_node(WindowId(2)), Some(w2));
        assert_eq!(tree.find_node_in(c, WindowId(1)), None);
        assert_eq!(tree.nodes_by_type(NodeType::Window), vec![w1, w2]);
        assert_eq!(tree.nodes_by_type(NodeType::Container), vec![c]);
        assert_eq!(tree.monitor_of(w2), Some(mon));
    }

    #[test]
    fn insertion_rejects_cycles() {
        let (mut tree, mon) = single_monitor();
        let c = tree.create_node(mon, NodeData::container(Layout::VSplit)).unwrap();
        let inner = tree.create_node(c, NodeData::container(Layout::HSplit)).unwrap();
        assert!(!tree.append_child(inner, c));
        assert!(!tree.append_child(c, c));
        assert_eq!(tree.parent(inner), Some(c));
    }

    #[test]
    fn insert_before_and_after_reorder_siblings() {
        let (mut tree, mon) = single_monitor();
        let a = add_window(&mut tree, mon, 1);
        let b = add_window(&mut tree, mon, 2);
        let c = add_window(&mut tree, mon, 3);
        assert!(tree.insert_before(a, c));
        assert_eq!(tree.children(mon), &[c, a, b]);
        assert!(tree.insert_after(b, c));
        assert_eq!(tree.children(mon), &[a, b, c]);
    }

    #[test]
    fn remove_window_resets_siblings() {
        let (mut tree, mon) = single_monitor();
        let a = add_window(&mut tree, mon, 1);
        let b = add_window(&mut tree, mon, 2);
        let c = add_window(&mut tree, mon, 3);
        tree.set_percent(a, 0.5);
        tree.set_percent(b, 0.25);
        tree.set_percent(c, 0.25);
        assert!(tree.remove_node(c));
        assert!(!tree.contains(c));
        assert_eq!(tree.percent(a), Some(0.0));
        assert_eq!(tree.percent(b), Some(0.0));
        assert_eq!(tree.attach_node(), Some(mon));
    }

    #[test]
    fn removing_last_child_of_container_removes_container() {
        let (mut tree, mon) = single_monitor();
        let keep = add_window(&mut tree, mon, 1);
        let c = tree.create_node(mon, NodeData::container(Layout::VSplit)).unwrap();
        let w = add_window(&mut tree, c, 2);
        assert!(tree.remove_node(w));
        assert!(!tree.contains(c));
        assert_eq!(tree.children(mon), &[keep]);
    }

    #[test]
    fn split_container_with_one_child_hands_over_its_slot() {
        let (mut tree, mon) = single_monitor();
        let first = add_window(&mut tree, mon, 1);
        let c = tree.create_node(mon, NodeData::container(Layout::VSplit)).unwrap();
        let a = add_window(&mut tree, c, 2);
        let b = add_window(&mut tree, c, 3);
        tree.set_percent(c, 0.6);
        assert!(tree.remove_node(b));
        assert!(!tree.contains(c));
        assert_eq!(tree.children(mon), &[first, a]);
        assert_eq!(tree.percent(a), Some(0.6));
    }

    #[test]
    fn tabbed_auto_exit_on_removal() {
        let (mut tree, mon) = single_monitor();
        let c = tree.create_node(mon, NodeData::container(Layout::Tabbed)).unwrap();
        let a = add_window(&mut tree, c, 1);
        let b = add_window(&mut tree, c, 2);
        tree.set_last_focused(c, Some(b));
        assert!(tree.remove_node(b));
        assert!(tree.contains(c));
        assert_eq!(tree.layout(c), Some(Layout::HSplit));
        assert_eq!(tree.last_focused(c), None);
        assert_eq!(tree.children(c), &[a]);
    }

    #[test]
    fn tabbed_stays_without_auto_exit() {
        let (mut tree, mon) = single_monitor();
        tree.settings_mut().auto_exit_tabbed = false;
        let c = tree.create_node(mon, NodeData::container(Layout::Tabbed)).unwrap();
        let a = add_window(&mut tree, c, 1);
        let b = add_window(&mut tree, c, 2);
        tree.set_last_focused(c, Some(b));
        assert!(tree.remove_node(b));
        assert_eq!(tree.layout(c), Some(Layout::Tabbed));
        assert_eq!(tree.last_focused(c), Some(a));
    }

    #[test]
    fn empty_monitor_survives() {
        let (mut tree, mon) = single_monitor();
        let w = add_window(&mut tree, mon, 1);
        assert!(tree.remove_node(w));
        assert!(tree.contains(mon));
        assert!(tree.children(mon).is_empty());
    }

    #[test]
    fn removing_monitor_rehomes_windows() {
        let mut tree = Tree::default();
        let left = tree.add_monitor(0, 0, Rect::new(0, 0, 1920, 1080));
        let right = tree.add_monitor(0, 1, Rect::new(1920, 0, 1920, 1080));
        let w = add_window(&mut tree, right, 7);
        assert!(tree.remove_monitor(0, 1));
        assert!(!tree.contains(right));
        assert_eq!(tree.monitor(0, 1), None);
        assert_eq!(tree.parent(w), Some(left));
    }

    #[test]
    fn removing_monitor_falls_back_to_other_workspace() {
        let mut tree = Tree::default();
        let other = tree.add_monitor(0, 0, Rect::new(0, 0, 1920, 1080));
        let lone = tree.add_monitor(1, 0, Rect::new(0, 0, 1920, 1080));
        let w = add_window(&mut tree, lone, 7);
        assert!(tree.remove_monitor(1, 0));
        assert!(!tree.contains(lone));
        assert_eq!(tree.parent(w), Some(other));
        assert_eq!(tree.find_node(WindowId(7)), Some(w));
    }

    #[test]
    fn last_monitor_with_windows_is_kept() {
        let (mut tree, mon) = single_monitor();
        let w = add_window(&mut tree, mon, 1);
        assert!(!tree.remove_monitor(0, 0));
        assert!(tree.contains(w));
        assert_eq!(tree.parent(w), Some(mon));

        assert!(tree.remove_node(w));
        assert!(tree.remove_monitor(0, 0));
        assert_eq!(tree.monitor(0, 0), None);
    }

    #[test]
    fn removing_workspace_drops_its_monitors_from_index() {
        let mut tree = Tree::default();
        tree.add_monitor(1, 0, Rect::new(0, 0, 800, 600));
        assert!(tree.remove_workspace(1));
        assert_eq!(tree.workspace(1), None);
        assert_eq!(tree.monitor(1, 0), None);
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn create_node_indexes_monitors() {
        let mut tree = Tree::default();
        let ws = tree.add_workspace(3);
        let mon = tree
            .create_node(ws, NodeData::monitor(2, Layout::VSplit))
            .unwrap();
        assert_eq!(tree.monitor(3, 2), Some(mon));
    }

    #[test]
    fn debug_tree_lists_every_node() {
        let (mut tree, mon) = single_monitor();
        add_window(&mut tree, mon, 1);
        let dump = tree.debug_tree();
        assert!(dump.contains("root"));
        assert!(dump.contains("monitor 0 [hsplit]"));
        assert!(dump.contains("window 0x1"));
    }
}
