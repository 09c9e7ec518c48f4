//! Drag-to-tile.
//!
//! While a window is dragged it sits in [`WindowMode::GrabTile`] and takes
//! no space in the layout.  Every pointer motion re-plans the drop in
//! preview mode (no mutation, just a hint rectangle); releasing the
//! pointer applies the last plan for real.
//!
//! A plan is chosen from the deepest tiled window under the pointer and
//! the [`DropZone`] of the pointer within it:
//!
//! * edge zones put the dragged window beside the target, splitting along
//!   the zone's axis.  A target inside a stacked/tabbed group is replaced
//!   by the group itself, so an edge drop never adds a tab;
//! * the center zone swaps with the target, or groups both windows into a
//!   stacked/tabbed container, depending on [`CenterDrop`];
//! * a monitor without tiled windows simply receives the window.

use crate::command::Orientation;
use crate::geometry::{calculate_drop_regions, detect_drop_zone, DropZone, Rect};
use crate::tree::{Layout, Node, NodeId, NodeType, Tree, WindowMode};
use log::debug;
use serde::{Deserialize, Serialize};

/// What a drop onto the middle of a window does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CenterDrop {
    /// Trade places with the target.
    #[default]
    Swap,
    /// Stack both windows in one stacked container.
    Stacked,
    /// Put both windows in one tabbed container, showing the dropped one.
    Tabbed,
}

/// Where a dragged window would land.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropPlan {
    /// The pointer is over a monitor with no tiled windows.
    Append { monitor: NodeId },
    /// Beside `anchor` (the target window, or the stacked/tabbed group
    /// holding it) on the `zone` side.
    Edge {
        target: NodeId,
        anchor: NodeId,
        zone: DropZone,
    },
    /// Onto the middle of `target`.
    Center { target: NodeId },
}

impl DropPlan {
    /// Area to highlight while previewing the drop.
    pub fn hint(&self, tree: &Tree) -> Option<Rect> {
        match *self {
            DropPlan::Append { monitor } => tree.rect(monitor),
            DropPlan::Center { target } => tree.rect(target),
            DropPlan::Edge { anchor, zone, .. } => {
                let r = tree.rect(anchor)?;
                let (half_w, half_h) = (r.width / 2, r.height / 2);
                match zone {
                    DropZone::Left => Some(Rect::new(r.x, r.y, half_w, r.height)),
                    DropZone::Right => Some(Rect::new(r.right() - half_w, r.y, half_w, r.height)),
                    DropZone::Top => Some(Rect::new(r.x, r.y, r.width, half_h)),
                    DropZone::Bottom => Some(Rect::new(r.x, r.bottom() - half_h, r.width, half_h)),
                    DropZone::Center | DropZone::None => None,
                }
            }
        }
    }
}

/// The deepest tiled window under `(x, y)`, or the monitor under it when
/// that monitor has no tiled windows.  Stacked/tabbed groups resolve to
/// their visible child.
pub fn find_target(tree: &Tree, dragged: NodeId, x: i32, y: i32) -> Option<NodeId> {
    let monitor = tree
        .monitors()
        .into_iter()
        .find(|&m| tree.rect(m).is_some_and(|r| r.contains(x, y)))?;
    let mut current = monitor;
    loop {
        let node = tree.get(current)?;
        if node.is_window() {
            return (current != dragged).then_some(current);
        }
        let members = tree.participating_children(current);
        if members.is_empty() {
            return (current == monitor).then_some(monitor);
        }
        current = if node.layout().is_some_and(Layout::is_grouped) {
            tree.last_focused(current)
                .filter(|c| members.contains(c))
                .or_else(|| members.first().copied())?
        } else {
            members
                .iter()
                .copied()
                .find(|&c| tree.rect(c).is_some_and(|r| r.contains(x, y)))?
        };
    }
}

/// Work out where `dragged` would land if released at `(x, y)`.
pub fn plan_drop(tree: &Tree, dragged: NodeId, x: i32, y: i32) -> Option<DropPlan> {
    let target = find_target(tree, dragged, x, y)?;
    if tree.get(target).is_some_and(Node::is_monitor) {
        return Some(DropPlan::Append { monitor: target });
    }
    let rect = tree.rect(target)?;
    let regions = calculate_drop_regions(rect, tree.settings().edge_fraction);
    match detect_drop_zone(&regions, x, y) {
        DropZone::Center => Some(DropPlan::Center { target }),
        zone if zone.is_edge() => {
            let anchor = tree
                .parent(target)
                .filter(|&p| {
                    tree.node_type(p) == Some(NodeType::Container)
                        && tree.layout(p).is_some_and(Layout::is_grouped)
                })
                .unwrap_or(target);
            Some(DropPlan::Edge {
                target,
                anchor,
                zone,
            })
        }
        _ => None,
    }
}

/// Carry out `plan` for `dragged`.  Returns whether the window moved.
pub fn apply_drop(tree: &mut Tree, dragged: NodeId, plan: DropPlan, center: CenterDrop) -> bool {
    let Some(old_parent) = tree.parent(dragged) else {
        return false;
    };
    let placed = match plan {
        DropPlan::Append { monitor } => tree.append_child(monitor, dragged),
        DropPlan::Edge { anchor, zone, .. } => drop_on_edge(tree, dragged, anchor, zone),
        DropPlan::Center { target } => drop_on_center(tree, dragged, target, center),
    };
    if !placed {
        debug!("drop of {:?} rejected: {:?}", dragged, plan);
        return false;
    }

    let left_group = tree.parent(dragged) != Some(old_parent)
        && tree.layout(old_parent).is_some_and(Layout::is_grouped);
    if left_group {
        if let Some(leaf) = tree.leaf_mut(dragged) {
            leaf.detach_window = true;
        }
        debug!("{:?} detached from group {:?}", dragged, old_parent);
    }

    if tree.contains(old_parent) {
        tree.prune(old_parent);
    }
    if let Some(new_parent) = tree.parent(dragged) {
        tree.reset_sibling_percent(new_parent);
        tree.set_attach_node(Some(new_parent));
    }
    tree.clean_tree();
    if let Some(leaf) = tree.leaf_mut(dragged) {
        leaf.create_con = false;
        leaf.detach_window = false;
    }
    debug!("dropped {:?}: {:?}", dragged, plan);
    true
}

fn drop_on_edge(tree: &mut Tree, dragged: NodeId, anchor: NodeId, zone: DropZone) -> bool {
    let orientation = match zone {
        DropZone::Left | DropZone::Right => Orientation::Horizontal,
        DropZone::Top | DropZone::Bottom => Orientation::Vertical,
        DropZone::Center | DropZone::None => return false,
    };
    let Some(parent) = tree.parent(anchor) else {
        return false;
    };
    let force = tree.leaf(dragged).is_some_and(|l| l.create_con);
    let aligned = tree.layout(parent).and_then(Layout::orientation) == Some(orientation);
    let others = tree
        .children(parent)
        .iter()
        .filter(|&&c| c != dragged)
        .count();

    if force || (!aligned && others >= 2) {
        if tree.wrap_in_container(anchor, orientation.layout()).is_none() {
            return false;
        }
    } else if !aligned {
        if let Some(branch) = tree.branch_mut(parent) {
            branch.layout = orientation.layout();
        }
    }

    if zone.is_before() {
        tree.insert_before(anchor, dragged)
    } else {
        tree.insert_after(anchor, dragged)
    }
}

fn drop_on_center(tree: &mut Tree, dragged: NodeId, target: NodeId, center: CenterDrop) -> bool {
    let layout = match center {
        CenterDrop::Swap => {
            if !tree.swap_pairs(dragged, target) {
                return false;
            }
            // The swap traded modes as well.
            tree.set_mode(target, WindowMode::Tile);
            tree.set_mode(dragged, WindowMode::GrabTile);
            return true;
        }
        CenterDrop::Stacked => Layout::Stacked,
        CenterDrop::Tabbed => Layout::Tabbed,
    };
    let Some(parent) = tree.parent(target) else {
        return false;
    };
    let group = if tree.node_type(parent) == Some(NodeType::Container)
        && tree.layout(parent) == Some(layout)
    {
        parent
    } else {
        match tree.wrap_in_container(target, layout) {
            Some(container) => container,
            None => return false,
        }
    };
    if !tree.insert_after(target, dragged) {
        return false;
    }
    tree.set_last_focused(group, Some(dragged));
    true
}

/// State of the drag in progress, if any.
#[derive(Debug, Default)]
pub struct DragController {
    grabbed: Option<NodeId>,
    cancel_grab: bool,
    center_drop: CenterDrop,
    preview: Option<DropPlan>,
}

impl DragController {
    pub fn new(center_drop: CenterDrop) -> Self {
        Self {
            center_drop,
            ..Self::default()
        }
    }

    pub fn set_center_drop(&mut self, center_drop: CenterDrop) {
        self.center_drop = center_drop;
    }

    /// The window being dragged.
    pub fn grabbed(&self) -> Option<NodeId> {
        self.grabbed
    }

    pub fn is_active(&self) -> bool {
        self.grabbed.is_some()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_grab
    }

    /// The plan shown by the last preview.
    pub fn preview(&self) -> Option<DropPlan> {
        self.preview
    }

    /// Start dragging `node`, a tiled window.
    ///
    /// `force_container` makes edge drops wrap the target in a new
    /// container even when its parent already splits the right way.
    pub fn begin(&mut self, tree: &mut Tree, node: NodeId, force_container: bool) -> bool {
        if self.grabbed.is_some() {
            debug!("drag already in progress");
            return false;
        }
        let Some(leaf) = tree.leaf_mut(node) else {
            return false;
        };
        if leaf.mode != WindowMode::Tile || leaf.minimized {
            return false;
        }
        leaf.mode = WindowMode::GrabTile;
        leaf.create_con = force_container;
        leaf.detach_window = false;
        if let Some(parent) = tree.parent(node) {
            tree.reset_sibling_percent(parent);
        }
        self.grabbed = Some(node);
        self.cancel_grab = false;
        self.preview = None;
        debug!("drag begin {:?} (force container: {})", node, force_container);
        true
    }

    /// Flag the drag for cancellation.  The next step restores the window
    /// instead of dropping it.
    pub fn cancel(&mut self) {
        if self.grabbed.is_some() {
            self.cancel_grab = true;
        }
    }

    /// Plan (and unless `preview_only`, perform) the drop of the dragged
    /// window at `pointer`.
    ///
    /// Does nothing when the drag was cancelled, nothing is dragged, or
    /// there is no valid target under the pointer.
    pub fn move_window_to_pointer(
        &mut self,
        tree: &mut Tree,
        pointer: (i32, i32),
        preview_only: bool,
    ) -> Option<DropPlan> {
        if self.cancel_grab {
            return None;
        }
        let dragged = self.grabbed?;
        if tree.leaf(dragged)?.mode != WindowMode::GrabTile {
            return None;
        }
        let plan = plan_drop(tree, dragged, pointer.0, pointer.1);
        if preview_only {
            self.preview = plan;
            return plan;
        }
        let plan = plan?;
        apply_drop(tree, dragged, plan, self.center_drop).then_some(plan)
    }

    /// Re-plan for a pointer motion and return the hint rectangle.
    pub fn update(&mut self, tree: &mut Tree, pointer: (i32, i32)) -> Option<Rect> {
        let plan = self.move_window_to_pointer(tree, pointer, true)?;
        plan.hint(tree)
    }

    /// Drop at `pointer` and end the drag.  Returns whether the layout
    /// changed.
    pub fn finish(&mut self, tree: &mut Tree, pointer: (i32, i32)) -> bool {
        if self.cancel_grab {
            self.abort(tree);
            return false;
        }
        let Some(node) = self.grabbed else {
            return false;
        };
        let dropped = self.move_window_to_pointer(tree, pointer, false).is_some();
        self.release(tree, node);
        dropped
    }

    /// End the drag without moving the window.
    pub fn abort(&mut self, tree: &mut Tree) -> bool {
        let Some(node) = self.grabbed else {
            return false;
        };
        debug!("drag of {:?} aborted", node);
        self.release(tree, node);
        true
    }

    fn release(&mut self, tree: &mut Tree, node: NodeId) {
        if let Some(leaf) = tree.leaf_mut(node) {
            leaf.mode = WindowMode::Tile;
            leaf.create_con = false;
            leaf.detach_window = false;
        }
        if let Some(parent) = tree.parent(node) {
            tree.reset_sibling_percent(parent);
        }
        self.grabbed = None;
        self.cancel_grab = false;
        self.preview = None;
    }
}
