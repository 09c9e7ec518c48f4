//! Node types stored in the [`Tree`](super::Tree) arena.
//!
//! Every node shares the same envelope ([`Node`]: parent, ordered children,
//! rect, percent) and carries a kind-specific payload in [`NodeData`].
//! Only branch kinds have a [`Layout`]; only windows have a
//! [`WindowMode`] and a host handle.

use crate::command::Orientation;
use crate::geometry::Rect;
use serde::{Deserialize, Serialize};
use slotmap::new_key_type;
use std::fmt;

new_key_type! {
    /// Key of a node in the tree arena.
    pub struct NodeId;
}

/// Opaque host window handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WindowId(pub u64);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// How a branch node arranges its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Children keep their own geometry (root, workspaces).
    #[default]
    None,
    /// Children side by side, left to right.
    HSplit,
    /// Children stacked top to bottom.
    VSplit,
    /// Children overlap; one visible at a time, cycled up/down.
    Stacked,
    /// Children overlap with a tab strip; cycled left/right.
    Tabbed,
}

impl Layout {
    /// Split orientation, for `HSplit` / `VSplit` only.
    pub fn orientation(self) -> Option<Orientation> {
        match self {
            Layout::HSplit => Some(Orientation::Horizontal),
            Layout::VSplit => Some(Orientation::Vertical),
            _ => None,
        }
    }

    pub fn is_split(self) -> bool {
        matches!(self, Layout::HSplit | Layout::VSplit)
    }

    /// Stacked or tabbed: the container is treated as one unit.
    pub fn is_grouped(self) -> bool {
        matches!(self, Layout::Stacked | Layout::Tabbed)
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Layout::None => "none",
            Layout::HSplit => "hsplit",
            Layout::VSplit => "vsplit",
            Layout::Stacked => "stacked",
            Layout::Tabbed => "tabbed",
        };
        f.write_str(s)
    }
}

/// Tiling state of a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowMode {
    #[default]
    Tile,
    Float,
    /// The window is being dragged for tiling.
    GrabTile,
}

/// Payload of the nodes that can have children.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Branch {
    pub layout: Layout,
    /// For stacked/tabbed layouts: the child currently shown.
    pub last_focused: Option<NodeId>,
}

impl Branch {
    pub fn new(layout: Layout) -> Self {
        Self {
            layout,
            last_focused: None,
        }
    }
}

/// Payload of a window node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaf {
    pub window: WindowId,
    pub mode: WindowMode,
    pub minimized: bool,
    /// Drag-to-tile: wrap the drop target in a new container even when the
    /// parent orientation already matches.
    pub create_con: bool,
    /// Drag-to-tile: the drop pulled the window out of a stacked/tabbed
    /// group.
    pub detach_window: bool,
}

impl Leaf {
    pub fn new(window: WindowId, mode: WindowMode) -> Self {
        Self {
            window,
            mode,
            minimized: false,
            create_con: false,
            detach_window: false,
        }
    }
}

/// Kind-specific node payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    Root(Branch),
    Workspace { index: usize, branch: Branch },
    Monitor { index: usize, branch: Branch },
    Container(Branch),
    Window(Leaf),
}

impl NodeData {
    pub fn workspace(index: usize) -> Self {
        NodeData::Workspace {
            index,
            branch: Branch::new(Layout::None),
        }
    }

    pub fn monitor(index: usize, layout: Layout) -> Self {
        NodeData::Monitor {
            index,
            branch: Branch::new(layout),
        }
    }

    pub fn container(layout: Layout) -> Self {
        NodeData::Container(Branch::new(layout))
    }

    pub fn window(window: WindowId, mode: WindowMode) -> Self {
        NodeData::Window(Leaf::new(window, mode))
    }

    pub fn node_type(&self) -> NodeType {
        match self {
            NodeData::Root(_) => NodeType::Root,
            NodeData::Workspace { .. } => NodeType::Workspace,
            NodeData::Monitor { .. } => NodeType::Monitor,
            NodeData::Container(_) => NodeType::Container,
            NodeData::Window(_) => NodeType::Window,
        }
    }

    pub fn branch(&self) -> Option<&Branch> {
        match self {
            NodeData::Root(b) | NodeData::Container(b) => Some(b),
            NodeData::Workspace { branch, .. } | NodeData::Monitor { branch, .. } => Some(branch),
            NodeData::Window(_) => None,
        }
    }

    pub fn branch_mut(&mut self) -> Option<&mut Branch> {
        match self {
            NodeData::Root(b) | NodeData::Container(b) => Some(b),
            NodeData::Workspace { branch, .. } | NodeData::Monitor { branch, .. } => Some(branch),
            NodeData::Window(_) => None,
        }
    }

    pub fn leaf(&self) -> Option<&Leaf> {
        match self {
            NodeData::Window(leaf) => Some(leaf),
            _ => None,
        }
    }

    pub fn leaf_mut(&mut self) -> Option<&mut Leaf> {
        match self {
            NodeData::Window(leaf) => Some(leaf),
            _ => None,
        }
    }
}

/// Discriminant of [`NodeData`], used for lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Root,
    Workspace,
    Monitor,
    Container,
    Window,
}

/// A node of the layout tree.
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) data: NodeData,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    /// Last computed geometry.
    pub rect: Rect,
    /// Share of the parent's extent along its split axis; `0.0` means
    /// "derive on the next arrange pass".
    pub percent: f64,
}

impl Node {
    pub(crate) fn new(data: NodeData) -> Self {
        Self {
            data,
            parent: None,
            children: Vec::new(),
            rect: Rect::default(),
            percent: 0.0,
        }
    }

    pub fn data(&self) -> &NodeData {
        &self.data
    }

    pub fn node_type(&self) -> NodeType {
        self.data.node_type()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Layout of a branch node; `None` for windows.
    pub fn layout(&self) -> Option<Layout> {
        self.data.branch().map(|b| b.layout)
    }

    pub fn window(&self) -> Option<WindowId> {
        self.data.leaf().map(|l| l.window)
    }

    pub fn mode(&self) -> Option<WindowMode> {
        self.data.leaf().map(|l| l.mode)
    }

    pub fn is_window(&self) -> bool {
        matches!(self.data, NodeData::Window(_))
    }

    pub fn is_container(&self) -> bool {
        matches!(self.data, NodeData::Container(_))
    }

    pub fn is_monitor(&self) -> bool {
        matches!(self.data, NodeData::Monitor { .. })
    }

    /// A window that takes part in tiling right now.
    pub fn is_tiled_window(&self) -> bool {
        matches!(&self.data, NodeData::Window(l) if l.mode == WindowMode::Tile && !l.minimized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_classification() {
        assert!(Layout::HSplit.is_split());
        assert!(!Layout::Tabbed.is_split());
        assert!(Layout::Stacked.is_grouped());
        assert_eq!(Layout::VSplit.orientation(), Some(Orientation::Vertical));
        assert_eq!(Layout::Tabbed.orientation(), None);
    }

    #[test]
    fn only_branches_have_layouts() {
        let c = Node::new(NodeData::container(Layout::Tabbed));
        assert_eq!(c.layout(), Some(Layout::Tabbed));
        let w = Node::new(NodeData::window(WindowId(1), WindowMode::Tile));
        assert_eq!(w.layout(), None);
        assert_eq!(w.window(), Some(WindowId(1)));
    }

    #[test]
    fn minimized_windows_are_not_tiled() {
        let mut w = Node::new(NodeData::window(WindowId(1), WindowMode::Tile));
        assert!(w.is_tiled_window());
        if let Some(leaf) = w.data.leaf_mut() {
            leaf.minimized = true;
        }
        assert!(!w.is_tiled_window());
    }

    #[test]
    fn layout_wire_names() {
        let l: Layout = serde_json::from_str(r#""hsplit""#).unwrap();
        assert_eq!(l, Layout::HSplit);
        assert_eq!(serde_json::to_string(&Layout::Tabbed).unwrap(), r#""tabbed""#);
    }
}
