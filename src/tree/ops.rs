//! Structural mutations: split, move, swap, layout and mode changes.
//!
//! Every operation reports its outcome through its return value and
//! leaves the tree untouched when it refuses to act.

use super::{Layout, NodeData, NodeId, NodeType, Tree, WindowMode};
use crate::command::{Direction, Orientation};
use log::debug;

impl Tree {
    /// Split `node`'s slot along `orientation`.
    ///
    /// Without `force`, a node that is its parent's only child just flips
    /// the parent to the requested split.  Otherwise `node` is wrapped in a
    /// new container that takes over its rect and percent.  Floating and
    /// dragged windows are left alone.
    ///
    /// Returns the container now holding `node`.
    pub fn split(&mut self, node: NodeId, orientation: Orientation, force: bool) -> Option<NodeId> {
        if let Some(leaf) = self.leaf(node) {
            if leaf.mode != WindowMode::Tile {
                debug!("split: {} is {:?}, ignoring", leaf.window, leaf.mode);
                return None;
            }
        }
        let parent = self.parent(node)?;
        if !matches!(
            self.node_type(parent),
            Some(NodeType::Container | NodeType::Monitor)
        ) {
            return None;
        }
        let layout = orientation.layout();
        if !force && self.children(parent).len() == 1 {
            if let Some(branch) = self.branch_mut(parent) {
                branch.layout = layout;
            }
            self.attach_node = Some(parent);
            debug!("split: {:?} set to {}", parent, layout);
            return Some(parent);
        }
        let container = self.wrap_in_container(node, layout)?;
        debug!("split: wrapped {:?} in {} container {:?}", node, layout, container);
        Some(container)
    }

    /// Put a new `layout` container where `node` is and move `node` into it.
    pub(crate) fn wrap_in_container(&mut self, node: NodeId, layout: Layout) -> Option<NodeId> {
        self.parent(node)?;
        let rect = self.rect(node)?;
        let percent = self.percent(node)?;
        let container = self.alloc(NodeData::container(layout));
        self.set_rect(container, rect);
        self.set_percent(container, percent);
        self.replace_in_parent(node, container);
        self.attach_at(container, 0, node);
        self.set_percent(node, 0.0);
        if layout.is_grouped() {
            self.set_last_focused(container, Some(node));
        }
        self.attach_node = Some(container);
        Some(container)
    }

    /// Move `node` one step in `direction`.
    ///
    /// Swaps places (and percents) with an adjacent sibling, joins a
    /// stacked/tabbed container as a new entry, or leaves its container
    /// to sit next to the node found by [`next`](Tree::next).  Returns
    /// `false` when there is nowhere to go.
    pub fn move_node(&mut self, node: NodeId, direction: Direction) -> bool {
        let Some(dest) = self.next(node, direction) else {
            debug!("move {}: nothing in that direction", direction);
            return false;
        };
        let Some(old_parent) = self.parent(node) else {
            return false;
        };

        let dest_is_group = self.node_type(dest) == Some(NodeType::Container)
            && self.layout(dest).is_some_and(Layout::is_grouped);

        if dest_is_group {
            let joined = if direction.is_backward() {
                self.append_child(dest, node)
            } else {
                self.prepend_child(dest, node)
            };
            if !joined {
                return false;
            }
            self.set_last_focused(dest, Some(node));
            self.reset_sibling_percent(dest);
            debug!("move {}: {:?} joined group {:?}", direction, node, dest);
        } else if self.parent(dest) == Some(old_parent) {
            self.exchange(node, dest);
            let (a, b) = (self.percent(node), self.percent(dest));
            if let (Some(a), Some(b)) = (a, b) {
                self.set_percent(node, b);
                self.set_percent(dest, a);
            }
            debug!("move {}: {:?} swapped with sibling {:?}", direction, node, dest);
            return true;
        } else {
            let Some(dest_parent) = self.parent(dest) else {
                return false;
            };
            let inserted = if direction.is_backward() {
                self.insert_after(dest, node)
            } else {
                self.insert_before(dest, node)
            };
            if !inserted {
                return false;
            }
            self.reset_sibling_percent(dest_parent);
            debug!("move {}: {:?} now beside {:?}", direction, node, dest);
        }

        self.prune(old_parent);
        if let Some(parent) = self.parent(node) {
            self.attach_node = Some(parent);
        }
        true
    }

    /// Whether `node` may take part in a swap.
    pub fn is_swappable(&self, node: NodeId) -> bool {
        self.leaf(node).is_some_and(|l| !l.minimized)
    }

    /// Exchange two windows: positions (across parents), rects, percents
    /// and modes.  Applying it twice restores the original state.
    ///
    /// Returns `false`, doing nothing, unless both are distinct swappable
    /// windows.
    pub fn swap_pairs(&mut self, a: NodeId, b: NodeId) -> bool {
        if a == b || !self.is_swappable(a) || !self.is_swappable(b) {
            debug!("swap: {:?} <-> {:?} not swappable", a, b);
            return false;
        }
        if !self.exchange(a, b) {
            return false;
        }
        let (Some(node_a), Some(node_b)) = (self.get(a), self.get(b)) else {
            return false;
        };
        let (rect_a, rect_b) = (node_a.rect, node_b.rect);
        let (pct_a, pct_b) = (node_a.percent, node_b.percent);
        let (mode_a, mode_b) = (node_a.mode(), node_b.mode());
        self.set_rect(a, rect_b);
        self.set_rect(b, rect_a);
        self.set_percent(a, pct_b);
        self.set_percent(b, pct_a);
        if let (Some(mode_a), Some(mode_b)) = (mode_a, mode_b) {
            self.set_mode(a, mode_b);
            self.set_mode(b, mode_a);
        }
        debug!("swapped {:?} <-> {:?}", a, b);
        true
    }

    /// Swap `node` with the window in `direction`.  A stacked/tabbed or
    /// split neighbour resolves to its visible (or first) window.
    ///
    /// Returns the window `node` swapped with.
    pub fn swap(&mut self, node: NodeId, direction: Direction) -> Option<NodeId> {
        let partner = self.swap_partner(node, direction)?;
        self.swap_pairs(node, partner).then_some(partner)
    }

    /// The window [`swap`](Tree::swap) would trade places with.
    pub fn swap_partner(&self, node: NodeId, direction: Direction) -> Option<NodeId> {
        let dest = self.next(node, direction)?;
        self.window_for(dest)
    }

    /// `node` itself for a window; otherwise the visible child of a
    /// stacked/tabbed container or the first tiled window below it.
    pub fn window_for(&self, node: NodeId) -> Option<NodeId> {
        if self.leaf(node).is_some() {
            return Some(node);
        }
        self.last_focused(node)
            .and_then(|c| self.window_for(c))
            .filter(|&c| self.is_swappable(c))
            .or_else(|| {
                self.windows_in(node)
                    .into_iter()
                    .find(|&w| self.participates(w))
            })
    }

    /// Change the layout of the container holding `node`.
    ///
    /// Entering stacked/tabbed shows `node`.  Returns the container.
    pub fn set_layout(&mut self, node: NodeId, layout: Layout) -> Option<NodeId> {
        if layout == Layout::None {
            return None;
        }
        let parent = self.parent(node)?;
        if !matches!(
            self.node_type(parent),
            Some(NodeType::Container | NodeType::Monitor)
        ) {
            return None;
        }
        let branch = self.branch_mut(parent)?;
        let previous = branch.layout;
        branch.layout = layout;
        if layout.is_grouped() {
            branch.last_focused = Some(node);
        }
        if previous.orientation() != layout.orientation() {
            self.reset_sibling_percent(parent);
        }
        debug!("layout of {:?}: {} -> {}", parent, previous, layout);
        Some(parent)
    }

    /// Flip a window between tiling and floating.  Returns the new mode, or
    /// `None` for non-windows and windows being dragged.
    pub fn toggle_float(&mut self, node: NodeId) -> Option<WindowMode> {
        let mode = match self.leaf(node)?.mode {
            WindowMode::Tile => WindowMode::Float,
            WindowMode::Float => WindowMode::Tile,
            WindowMode::GrabTile => return None,
        };
        self.set_mode(node, mode);
        if let Some(parent) = self.parent(node) {
            self.reset_sibling_percent(parent);
        }
        debug!("{:?} is now {:?}", node, mode);
        Some(mode)
    }

    /// Record the host's minimized state for a window.  Returns whether it
    /// changed.
    pub fn set_minimized(&mut self, node: NodeId, minimized: bool) -> bool {
        let Some(leaf) = self.leaf_mut(node) else {
            return false;
        };
        if leaf.minimized == minimized {
            return false;
        }
        leaf.minimized = minimized;
        if let Some(parent) = self.parent(node) {
            self.reset_sibling_percent(parent);
        }
        true
    }

    pub(crate) fn set_mode(&mut self, node: NodeId, mode: WindowMode) {
        if let Some(leaf) = self.leaf_mut(node) {
            leaf.mode = mode;
        }
    }

    /// Trade the tree positions of two nodes that are not nested in each
    /// other.
    fn exchange(&mut self, a: NodeId, b: NodeId) -> bool {
        if self.is_ancestor_or_self(a, b) || self.is_ancestor_or_self(b, a) {
            return false;
        }
        let (Some(pa), Some(pb)) = (self.parent(a), self.parent(b)) else {
            return false;
        };
        let (Some(ia), Some(ib)) = (self.index_of(a), self.index_of(b)) else {
            return false;
        };
        if let Some(p) = self.get_mut(pa) {
            p.children[ia] = b;
        }
        if let Some(p) = self.get_mut(pb) {
            p.children[ib] = a;
        }
        if let Some(n) = self.get_mut(a) {
            n.parent = Some(pb);
        }
        if let Some(n) = self.get_mut(b) {
            n.parent = Some(pa);
        }
        if pa != pb {
            if self.last_focused(pa) == Some(a) {
                self.set_last_focused(pa, Some(b));
            }
            if self.last_focused(pb) == Some(b) {
                self.set_last_focused(pb, Some(a));
            }
        }
        true
    }
}
