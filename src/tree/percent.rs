//! Percent bookkeeping and pixel layout.
//!
//! Every child of a split branch owns a `percent` share of its parent's
//! extent along the split axis.  Structural edits zero the shares
//! ([`Tree::reset_sibling_percent`]); the next arrange pass re-derives them
//! from the children's last rects and rescales the whole set back to 1.0
//! ([`Tree::normalize_sibling_percents`]) before converting them into
//! integer pixel sizes that sum exactly to the parent extent
//! ([`distribute`]).

use super::{Layout, NodeId, NodeType, Tree};
use crate::command::Orientation;
use crate::geometry::Rect;
use log::debug;

/// Extent of `rect` along the axis of `orientation`.
fn extent(rect: Rect, orientation: Orientation) -> i32 {
    match orientation {
        Orientation::Horizontal => rect.width,
        Orientation::Vertical => rect.height,
    }
}

/// Split `total` pixels by `percents`.
///
/// Each share is rounded to the nearest pixel; the last share takes
/// whatever is left so the result always sums to exactly `total`.
pub fn distribute(total: i32, percents: &[f64]) -> Vec<i32> {
    let total = total.max(0);
    let Some(last) = percents.len().checked_sub(1) else {
        return Vec::new();
    };
    let mut used = 0;
    let mut sizes = Vec::with_capacity(percents.len());
    for (i, &p) in percents.iter().enumerate() {
        if i == last {
            sizes.push(total - used);
            break;
        }
        let share = if p.is_finite() {
            (total as f64 * p).round() as i32
        } else {
            0
        };
        let share = share.clamp(0, total - used);
        used += share;
        sizes.push(share);
    }
    sizes
}

/// Inset a tiled window's rect by the configured gap (in pixels).
pub fn process_gap(rect: Rect, gap: i32) -> Rect {
    rect.inset(gap)
}

impl Tree {
    /// Whether `id` takes part in its parent's layout: a tiled, visible
    /// window, or a branch holding at least one.
    pub fn participates(&self, id: NodeId) -> bool {
        let Some(node) = self.get(id) else {
            return false;
        };
        if node.is_window() {
            return node.is_tiled_window();
        }
        node.children.iter().any(|&c| self.participates(c))
    }

    /// Participating children of `id`, in order.
    pub fn participating_children(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|&c| self.participates(c))
            .collect()
    }

    /// Zero the percents of `container`'s children so the next arrange pass
    /// derives them afresh.
    ///
    /// Children of the root and of workspaces (workspaces and monitors) are
    /// left alone.
    pub fn reset_sibling_percent(&mut self, container: NodeId) {
        match self.node_type(container) {
            None | Some(NodeType::Root) | Some(NodeType::Workspace) | Some(NodeType::Window) => {
                return
            }
            _ => {}
        }
        let children = self.children(container).to_vec();
        for child in children {
            self.set_percent(child, 0.0);
        }
    }

    /// Fill in unset percents among the participating children of
    /// `container` and rescale the set to sum to 1.0.
    ///
    /// When every child is unset (after a reset) they all get an equal
    /// share.  Otherwise an unset child gets its last rect's extent over
    /// the parent's extent, or an equal share when it has never been laid
    /// out, and rescaling keeps the ratios between children that already
    /// had a share.
    pub fn normalize_sibling_percents(&mut self, container: NodeId) {
        let Some(orientation) = self.layout(container).and_then(Layout::orientation) else {
            return;
        };
        let Some(parent_rect) = self.rect(container) else {
            return;
        };
        let parent_extent = extent(parent_rect, orientation);
        let members = self.participating_children(container);
        if members.is_empty() {
            return;
        }
        let equal = 1.0 / members.len() as f64;
        let is_set = |p: Option<f64>| p.is_some_and(|p| p > 0.0 && p.is_finite());

        if !members.iter().any(|&c| is_set(self.percent(c))) {
            for &child in &members {
                self.set_percent(child, equal);
            }
            return;
        }

        for &child in &members {
            if is_set(self.percent(child)) {
                continue;
            }
            let own = self.rect(child).map(|r| extent(r, orientation)).unwrap_or(0);
            let derived = if own > 0 && parent_extent > 0 {
                own as f64 / parent_extent as f64
            } else {
                equal
            };
            self.set_percent(child, derived);
        }

        let sum: f64 = members.iter().filter_map(|&c| self.percent(c)).sum();
        if sum > 0.0 && sum.is_finite() {
            for &child in &members {
                let p = self.percent(child).unwrap_or(0.0);
                self.set_percent(child, p / sum);
            }
        } else {
            debug!("percent sum {} under {:?} unusable, using equal shares", sum, container);
            for &child in &members {
                self.set_percent(child, equal);
            }
        }
    }

    /// Pixel extent of each participating child of `parent` along its split
    /// axis.  The extents sum to the parent's extent.
    pub fn compute_sizes(&self, parent: NodeId) -> Vec<(NodeId, i32)> {
        let Some(orientation) = self.layout(parent).and_then(Layout::orientation) else {
            return Vec::new();
        };
        let Some(rect) = self.rect(parent) else {
            return Vec::new();
        };
        let members = self.participating_children(parent);
        let percents: Vec<f64> = members
            .iter()
            .map(|&c| self.percent(c).unwrap_or(0.0))
            .collect();
        members
            .into_iter()
            .zip(distribute(extent(rect, orientation), &percents))
            .collect()
    }

    /// Lay out the subtree under `id`, top-down, from `id`'s own rect.
    ///
    /// Split branches place their participating children side by side;
    /// stacked/tabbed branches give each of them the full rect; branches
    /// without a layout leave their children's rects to the host.
    /// Non-participating windows keep the rect they had.
    pub fn arrange(&mut self, id: NodeId) {
        let Some(layout) = self.layout(id) else {
            return;
        };
        let Some(rect) = self.rect(id) else {
            return;
        };
        match layout {
            Layout::HSplit | Layout::VSplit => {
                self.normalize_sibling_percents(id);
                let mut offset = 0;
                for (child, size) in self.compute_sizes(id) {
                    let child_rect = if layout == Layout::HSplit {
                        Rect::new(rect.x + offset, rect.y, size, rect.height)
                    } else {
                        Rect::new(rect.x, rect.y + offset, rect.width, size)
                    };
                    self.set_rect(child, child_rect);
                    offset += size;
                }
            }
            Layout::Stacked | Layout::Tabbed => {
                let members = self.participating_children(id);
                for &child in &members {
                    self.set_rect(child, rect);
                }
                let visible = self.last_focused(id).filter(|c| members.contains(c));
                if visible.is_none() {
                    self.set_last_focused(id, members.first().copied());
                }
            }
            Layout::None => {}
        }
        let children = self.children(id).to_vec();
        for child in children {
            self.arrange(child);
        }
    }

    /// Arrange every monitor.
    pub fn arrange_all(&mut self) {
        for monitor in self.monitors() {
            self.arrange(monitor);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::tests::{add_window, single_monitor};
    use crate::tree::{NodeData, WindowMode};
    use approx::assert_abs_diff_eq;

    fn percent_sum(tree: &Tree, parent: NodeId) -> f64 {
        tree.participating_children(parent)
            .iter()
            .filter_map(|&c| tree.percent(c))
            .sum()
    }

    #[test]
    fn distribute_is_exact() {
        assert_eq!(distribute(900, &[1.0 / 3.0; 3]), vec![300, 300, 300]);
        assert_eq!(distribute(1000, &[1.0 / 3.0; 3]), vec![333, 333, 334]);
        assert_eq!(distribute(7, &[0.5, 0.5]), vec![4, 3]);
        assert_eq!(distribute(100, &[]), Vec::<i32>::new());
        for total in [0, 1, 99, 1919, 2560] {
            let sizes = distribute(total, &[0.2, 0.45, 0.1, 0.25]);
            assert_eq!(sizes.iter().sum::<i32>(), total);
        }
    }

    #[test]
    fn distribute_caps_oversized_shares() {
        let sizes = distribute(100, &[0.8, 0.8, 0.8]);
        assert_eq!(sizes, vec![80, 20, 0]);
    }

    #[test]
    fn three_way_split_sums_to_monitor_width() {
        let (mut tree, mon) = single_monitor();
        for id in 1..=3 {
            add_window(&mut tree, mon, id);
        }
        tree.arrange(mon);
        let sizes = tree.compute_sizes(mon);
        assert_eq!(sizes.iter().map(|(_, s)| s).sum::<i32>(), 900);
        let rects: Vec<Rect> = tree.children(mon).iter().filter_map(|&c| tree.rect(c)).collect();
        assert_eq!(rects[0], Rect::new(0, 0, 300, 600));
        assert_eq!(rects[1], Rect::new(300, 0, 300, 600));
        assert_eq!(rects[2], Rect::new(600, 0, 300, 600));
    }

    #[test]
    fn unset_percents_are_filled_and_normalized() {
        let (mut tree, mon) = single_monitor();
        let a = add_window(&mut tree, mon, 1);
        let b = add_window(&mut tree, mon, 2);
        let c = add_window(&mut tree, mon, 3);
        tree.set_percent(a, 0.5);
        tree.set_percent(b, 0.5);
        tree.normalize_sibling_percents(mon);
        assert_abs_diff_eq!(percent_sum(&tree, mon), 1.0, epsilon = 1e-3);
        assert!(tree.percent(c).unwrap() > 0.0);
    }

    #[test]
    fn percent_sum_holds_for_any_number_of_unset_children() {
        for n in 1..=6u64 {
            let (mut tree, mon) = single_monitor();
            for id in 0..n {
                let w = add_window(&mut tree, mon, id);
                if id % 2 == 0 {
                    tree.set_percent(w, 0.3);
                }
            }
            tree.normalize_sibling_percents(mon);
            assert_abs_diff_eq!(percent_sum(&tree, mon), 1.0, epsilon = 1e-3);
        }
    }

    #[test]
    fn normalization_preserves_ratios() {
        let (mut tree, mon) = single_monitor();
        let a = add_window(&mut tree, mon, 1);
        let b = add_window(&mut tree, mon, 2);
        let c = add_window(&mut tree, mon, 3);
        tree.set_percent(a, 0.5);
        tree.set_percent(b, 0.25);
        tree.set_rect(c, Rect::new(0, 0, 300, 600));
        tree.normalize_sibling_percents(mon);

        let pa = tree.percent(a).unwrap();
        let pb = tree.percent(b).unwrap();
        let pc = tree.percent(c).unwrap();
        assert!(pa > pb);
        assert_abs_diff_eq!(pa / pb, 2.0, epsilon = 1e-9);
        // c started at 300/900 of the parent before the rescale.
        assert_abs_diff_eq!(pc / pb, (1.0 / 3.0) / 0.25, epsilon = 1e-9);
    }

    #[test]
    fn full_reset_ignores_stale_rects() {
        let (mut tree, mon) = single_monitor();
        let a = add_window(&mut tree, mon, 1);
        let b = add_window(&mut tree, mon, 2);
        let c = add_window(&mut tree, mon, 3);
        // Rects left over from a two-way layout, c never laid out.
        tree.set_rect(a, Rect::new(0, 0, 450, 600));
        tree.set_rect(b, Rect::new(450, 0, 450, 600));
        tree.reset_sibling_percent(mon);
        tree.arrange(mon);
        for w in [a, b, c] {
            assert_abs_diff_eq!(tree.percent(w).unwrap(), 1.0 / 3.0, epsilon = 1e-9);
        }
        assert_eq!(tree.rect(c), Some(Rect::new(600, 0, 300, 600)));
    }

    #[test]
    fn non_participants_get_no_space() {
        let (mut tree, mon) = single_monitor();
        let a = add_window(&mut tree, mon, 1);
        let floating = tree
            .create_node(mon, NodeData::window(crate::tree::WindowId(2), WindowMode::Float))
            .unwrap();
        let b = add_window(&mut tree, mon, 3);
        tree.set_rect(floating, Rect::new(50, 50, 200, 200));
        if let Some(leaf) = tree.leaf_mut(b) {
            leaf.minimized = true;
        }
        tree.arrange(mon);
        assert_eq!(tree.rect(a), Some(Rect::new(0, 0, 900, 600)));
        assert_eq!(tree.rect(floating), Some(Rect::new(50, 50, 200, 200)));
        assert_eq!(tree.percent(floating), Some(0.0));
    }

    #[test]
    fn garbage_percents_fall_back_to_equal_shares() {
        let (mut tree, mon) = single_monitor();
        let a = add_window(&mut tree, mon, 1);
        let b = add_window(&mut tree, mon, 2);
        tree.set_percent(a, f64::INFINITY);
        tree.set_percent(b, f64::NAN);
        tree.normalize_sibling_percents(mon);
        assert_abs_diff_eq!(tree.percent(a).unwrap(), 0.5, epsilon = 1e-9);
        assert_abs_diff_eq!(tree.percent(b).unwrap(), 0.5, epsilon = 1e-9);
    }

    #[test]
    fn nested_split_layout() {
        let (mut tree, mon) = single_monitor();
        let left = add_window(&mut tree, mon, 1);
        let c = tree.create_node(mon, NodeData::container(Layout::VSplit)).unwrap();
        let top = add_window(&mut tree, c, 2);
        let bottom = add_window(&mut tree, c, 3);
        tree.arrange(mon);
        assert_eq!(tree.rect(left), Some(Rect::new(0, 0, 450, 600)));
        assert_eq!(tree.rect(top), Some(Rect::new(450, 0, 450, 300)));
        assert_eq!(tree.rect(bottom), Some(Rect::new(450, 300, 450, 300)));
    }

    #[test]
    fn tabbed_children_share_the_rect() {
        let (mut tree, mon) = single_monitor();
        let c = tree.create_node(mon, NodeData::container(Layout::Tabbed)).unwrap();
        let a = add_window(&mut tree, c, 1);
        let b = add_window(&mut tree, c, 2);
        tree.arrange(mon);
        assert_eq!(tree.rect(a), tree.rect(b));
        assert_eq!(tree.rect(a), Some(Rect::new(0, 0, 900, 600)));
        assert_eq!(tree.last_focused(c), Some(a));
    }

    #[test]
    fn reset_stops_at_workspace_level() {
        let mut tree = Tree::default();
        let m0 = tree.add_monitor(0, 0, Rect::new(0, 0, 100, 100));
        let m1 = tree.add_monitor(0, 1, Rect::new(100, 0, 100, 100));
        tree.set_percent(m0, 0.4);
        tree.set_percent(m1, 0.6);
        let ws = tree.workspace(0).unwrap();
        tree.reset_sibling_percent(ws);
        assert_eq!(tree.percent(m0), Some(0.4));
        assert_eq!(tree.percent(m1), Some(0.6));
    }

    #[test]
    fn gap_insets_rect() {
        assert_eq!(process_gap(Rect::new(0, 0, 100, 100), 4), Rect::new(4, 4, 92, 92));
        assert_eq!(process_gap(Rect::new(0, 0, 100, 100), 0), Rect::new(0, 0, 100, 100));
    }
}
