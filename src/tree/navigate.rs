//! Directional lookup.

use super::{Layout, NodeId, NodeType, Tree};
use crate::command::{Direction, Orientation};

impl Tree {
    /// The node a move/focus in `direction` from `node` lands on.
    ///
    /// Walks up from `node` until an ancestor arranges its children along
    /// `direction`'s axis: split branches of the same orientation, stacked
    /// branches for up/down, tabbed branches for left/right.  The adjacent
    /// participating sibling there is the result, resolved down into split
    /// containers (the side nearest to `node`) but not into stacked/tabbed
    /// ones, which count as a unit.  There is no wrap-around, and the walk
    /// never leaves `node`'s monitor.
    pub fn next(&self, node: NodeId, direction: Direction) -> Option<NodeId> {
        let mut current = node;
        loop {
            let parent = self.parent(current)?;
            let kind = self.node_type(parent)?;
            if !matches!(kind, NodeType::Container | NodeType::Monitor) {
                return None;
            }
            let layout = self.layout(parent)?;
            if steps_along(layout, direction) {
                let siblings: Vec<NodeId> = self
                    .children(parent)
                    .iter()
                    .copied()
                    .filter(|&c| c == current || self.participates(c))
                    .collect();
                let index = siblings.iter().position(|&c| c == current)?;
                let neighbour = if direction.is_backward() {
                    index.checked_sub(1).and_then(|i| siblings.get(i))
                } else {
                    siblings.get(index + 1)
                };
                if let Some(&target) = neighbour {
                    return Some(self.descend(target, direction));
                }
            }
            if kind == NodeType::Monitor {
                return None;
            }
            current = parent;
        }
    }

    /// Resolve `node` to the leaf (or stacked/tabbed unit) a move in
    /// `direction` enters first.
    fn descend(&self, node: NodeId, direction: Direction) -> NodeId {
        let mut current = node;
        loop {
            let Some(layout) = self.layout(current) else {
                return current;
            };
            if layout.is_grouped() {
                return current;
            }
            let members = self.participating_children(current);
            let entry = if layout.orientation() == Some(direction.orientation())
                && direction.is_backward()
            {
                members.last()
            } else {
                members.first()
            };
            match entry {
                Some(&child) => current = child,
                None => return current,
            }
        }
    }
}

fn steps_along(layout: Layout, direction: Direction) -> bool {
    match layout {
        Layout::HSplit | Layout::VSplit => layout.orientation() == Some(direction.orientation()),
        Layout::Stacked => direction.orientation() == Orientation::Vertical,
        Layout::Tabbed => direction.orientation() == Orientation::Horizontal,
        Layout::None => false,
    }
}
