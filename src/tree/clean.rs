//! Keeping containers well-formed.
//!
//! [`Tree::prune`] repairs a single parent right after one of its children
//! left; [`Tree::clean_tree`] sweeps the whole tree.  Both leave monitors,
//! workspaces and the root alone no matter how many children they have.

use super::{NodeId, NodeType, Tree};
use log::debug;

impl Tree {
    /// Restore the container invariants on `parent` after a child left it.
    ///
    /// * an empty container is removed, and its own parent pruned in turn;
    /// * a split container with one child gives that child its slot (rect
    ///   and percent) in the grandparent and disappears;
    /// * a stacked/tabbed container with one child turns into the default
    ///   split when auto-exit is on, and stays grouped otherwise;
    /// * anything else just gets its children's percents reset.
    ///
    /// Returns the node that now holds what `parent` held, if any.
    pub(crate) fn prune(&mut self, parent: NodeId) -> Option<NodeId> {
        let node = self.get(parent)?;
        if !node.is_container() {
            self.reset_sibling_percent(parent);
            return Some(parent);
        }
        let children = node.children.clone();
        let layout = node.layout().unwrap_or_default();

        match children.as_slice() {
            [] => {
                let grandparent = self.parent(parent);
                self.detach(parent);
                self.free_subtree(parent);
                debug!("removed empty container {:?}", parent);
                grandparent.and_then(|gp| self.prune(gp))
            }
            [only] if layout.is_grouped() => {
                if self.settings.auto_exit_tabbed {
                    let default_layout = self.settings.default_layout;
                    if let Some(branch) = self.branch_mut(parent) {
                        branch.layout = default_layout;
                        branch.last_focused = None;
                    }
                    debug!(
                        "{} container {:?} auto-exited to {}",
                        layout, parent, default_layout
                    );
                }
                self.set_percent(*only, 0.0);
                Some(parent)
            }
            [only] => {
                let only = *only;
                let Some(grandparent) = self.parent(parent) else {
                    return Some(parent);
                };
                let rect = self.rect(parent).unwrap_or_default();
                let percent = self.percent(parent).unwrap_or(0.0);
                self.detach(only);
                self.replace_in_parent(parent, only);
                self.set_rect(only, rect);
                self.set_percent(only, percent);
                self.free_subtree(parent);
                debug!("collapsed single-child container {:?}", parent);
                Some(grandparent)
            }
            _ => {
                self.reset_sibling_percent(parent);
                Some(parent)
            }
        }
    }

    /// Sweep the tree bottom-up: drop empty containers and flatten
    /// containers whose only child is another container.
    ///
    /// A flattened container adopts its child's layout and visible child,
    /// and the grandchildren move up keeping their percents.  Containers
    /// holding a single window are kept.  Running it on a clean tree
    /// changes nothing.  Returns whether anything changed.
    pub fn clean_tree(&mut self) -> bool {
        let root = self.root;
        let changed = self.clean_node(root);
        if changed {
            debug!("tree cleaned:\n{}", self.debug_tree());
        }
        changed
    }

    fn clean_node(&mut self, id: NodeId) -> bool {
        let mut changed = false;
        for child in self.children(id).to_vec() {
            changed |= self.clean_node(child);
        }
        if self.node_type(id) != Some(NodeType::Container) {
            return changed;
        }
        if self.children(id).is_empty() {
            self.detach(id);
            self.free_subtree(id);
            return true;
        }
        loop {
            let inner = match self.children(id) {
                [inner] if self.node_type(*inner) == Some(NodeType::Container) => *inner,
                _ => break,
            };
            let layout = self.layout(inner).unwrap_or_default();
            let visible = self.last_focused(inner);
            let grandchildren = self.children(inner).to_vec();
            self.detach(inner);
            for gc in grandchildren {
                self.detach(gc);
                self.attach_at(id, usize::MAX, gc);
            }
            if self.attach_node == Some(inner) {
                self.attach_node = Some(id);
            }
            self.free_subtree(inner);
            if let Some(branch) = self.branch_mut(id) {
                branch.layout = layout;
                branch.last_focused = visible;
            }
            changed = true;
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use crate::tree::tests::{add_window, single_monitor};
    use crate::tree::{Layout, NodeData, NodeType};

    #[test]
    fn nested_single_child_containers_flatten_to_inner_layout() {
        let (mut tree, mon) = single_monitor();
        let outer = tree.create_node(mon, NodeData::container(Layout::HSplit)).unwrap();
        let inner = tree.create_node(outer, NodeData::container(Layout::VSplit)).unwrap();
        let w = add_window(&mut tree, inner, 1);

        assert!(tree.clean_tree());
        assert!(!tree.contains(inner));
        assert_eq!(tree.children(mon), &[outer]);
        assert_eq!(tree.layout(outer), Some(Layout::VSplit));
        assert_eq!(tree.parent(w), Some(outer));
    }

    #[test]
    fn deep_chain_flattens_completely() {
        let (mut tree, mon) = single_monitor();
        let a = tree.create_node(mon, NodeData::container(Layout::HSplit)).unwrap();
        let b = tree.create_node(a, NodeData::container(Layout::VSplit)).unwrap();
        let c = tree.create_node(b, NodeData::container(Layout::Tabbed)).unwrap();
        add_window(&mut tree, c, 1);
        add_window(&mut tree, c, 2);

        tree.clean_tree();
        assert_eq!(tree.nodes_by_type(NodeType::Container), vec![a]);
        assert_eq!(tree.layout(a), Some(Layout::Tabbed));
        assert_eq!(tree.children(a).len(), 2);
    }

    #[test]
    fn empty_containers_are_removed_but_monitors_stay() {
        let (mut tree, mon) = single_monitor();
        let keep = add_window(&mut tree, mon, 1);
        let empty = tree.create_node(mon, NodeData::container(Layout::VSplit)).unwrap();
        let nested = tree.create_node(mon, NodeData::container(Layout::HSplit)).unwrap();
        tree.create_node(nested, NodeData::container(Layout::VSplit)).unwrap();

        assert!(tree.clean_tree());
        assert!(!tree.contains(empty));
        assert!(!tree.contains(nested));
        assert_eq!(tree.children(mon), &[keep]);

        let (mut bare, bare_mon) = single_monitor();
        assert!(!bare.clean_tree());
        assert!(bare.contains(bare_mon));
    }

    #[test]
    fn single_window_containers_survive() {
        let (mut tree, mon) = single_monitor();
        add_window(&mut tree, mon, 1);
        let c = tree.create_node(mon, NodeData::container(Layout::VSplit)).unwrap();
        add_window(&mut tree, c, 2);
        assert!(!tree.clean_tree());
        assert!(tree.contains(c));
    }

    #[test]
    fn cleaning_is_idempotent() {
        let (mut tree, mon) = single_monitor();
        add_window(&mut tree, mon, 1);
        let outer = tree.create_node(mon, NodeData::container(Layout::HSplit)).unwrap();
        let inner = tree.create_node(outer, NodeData::container(Layout::VSplit)).unwrap();
        add_window(&mut tree, inner, 2);
        add_window(&mut tree, inner, 3);
        tree.create_node(mon, NodeData::container(Layout::Stacked)).unwrap();

        assert!(tree.clean_tree());
        let first = tree.debug_tree();
        assert!(!tree.clean_tree());
        assert_eq!(tree.debug_tree(), first);
    }

    #[test]
    fn flattening_keeps_grandchild_percents() {
        let (mut tree, mon) = single_monitor();
        let outer = tree.create_node(mon, NodeData::container(Layout::HSplit)).unwrap();
        let inner = tree.create_node(outer, NodeData::container(Layout::VSplit)).unwrap();
        let a = add_window(&mut tree, inner, 1);
        let b = add_window(&mut tree, inner, 2);
        tree.set_percent(a, 0.7);
        tree.set_percent(b, 0.3);
        tree.clean_tree();
        assert_eq!(tree.children(outer), &[a, b]);
        assert_eq!(tree.percent(a), Some(0.7));
        assert_eq!(tree.percent(b), Some(0.3));
    }
}
