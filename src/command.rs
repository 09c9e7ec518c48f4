//! Commands and types used throughout tiletree.
//!
//! This module defines the vocabulary that all components share:
//! [`Command`] describes every action the [`Tiler`](crate::tiler::Tiler)
//! can perform, and [`Direction`] / [`Orientation`] / [`MonitorInfo`] /
//! [`WindowInfo`] provide the supporting data types.
//!
//! Directions and orientations are accepted case-insensitively on the wire
//! (`"left"`, `"Left"`, `"LEFT"`; `"horizontal"`, `"h"`, `"vsplit"`, ...).

use crate::geometry::Rect;
use crate::tree::{Layout, WindowId};
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Direction for navigation, moves and swaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// Orientation of the axis this direction travels along.
    pub fn orientation(self) -> Orientation {
        match self {
            Direction::Left | Direction::Right => Orientation::Horizontal,
            Direction::Up | Direction::Down => Orientation::Vertical,
        }
    }

    /// Whether the direction points towards lower indices (left / up).
    pub fn is_backward(self) -> bool {
        matches!(self, Direction::Left | Direction::Up)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Left => write!(f, "left"),
            Direction::Right => write!(f, "right"),
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
        }
    }
}

fn normalize_token(s: &str) -> String {
    s.trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .flat_map(|c| c.to_lowercase())
        .collect()
}

/// Parse a direction string (case-insensitive).
pub fn parse_direction(s: &str) -> Option<Direction> {
    match normalize_token(s).as_str() {
        "left" => Some(Direction::Left),
        "right" => Some(Direction::Right),
        "up" => Some(Direction::Up),
        "down" => Some(Direction::Down),
        _ => None,
    }
}

impl<'de> Deserialize<'de> for Direction {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_direction(&s).ok_or_else(|| DeError::custom(format!("invalid direction: {:?}", s)))
    }
}

/// Split orientation.  `Horizontal` lays children out left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

impl Orientation {
    /// The split layout with this orientation.
    pub fn layout(self) -> Layout {
        match self {
            Orientation::Horizontal => Layout::HSplit,
            Orientation::Vertical => Layout::VSplit,
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Orientation::Horizontal => write!(f, "horizontal"),
            Orientation::Vertical => write!(f, "vertical"),
        }
    }
}

/// Parse an orientation string (case-insensitive).
pub fn parse_orientation(s: &str) -> Option<Orientation> {
    match normalize_token(s).as_str() {
        "horizontal" | "h" | "hsplit" => Some(Orientation::Horizontal),
        "vertical" | "v" | "vsplit" => Some(Orientation::Vertical),
        _ => None,
    }
}

impl<'de> Deserialize<'de> for Orientation {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_orientation(&s)
            .ok_or_else(|| DeError::custom(format!("invalid orientation: {:?}", s)))
    }
}

/// Every action the tiler can perform.
///
/// Commands are produced by [`CommandSource`](crate::traits::CommandSource)
/// implementations (or directly by host integration code) and consumed by
/// [`Tiler::handle`](crate::tiler::Tiler::handle).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Start tiling a host window.  Its workspace, monitor and float status
    /// are read from the host.
    Track(WindowId),

    /// Forget a destroyed window.
    Untrack(WindowId),

    /// The host minimized or restored a window.
    SetMinimized { window: WindowId, minimized: bool },

    /// Focus the neighbour of the focused window in the given direction.
    Focus(Direction),

    /// Move the focused window one step in the given direction.
    Move(Direction),

    /// Swap the focused window with its neighbour in the given direction.
    Swap(Direction),

    /// Split the focused window's slot.
    Split(Orientation),

    /// Change the layout of the focused window's container.
    SetLayout(Layout),

    /// Flip the focused window between tiled and floating.
    ToggleFloat,

    /// The focused window started being dragged.
    ///
    /// With `force_container` set, an edge drop always wraps the target in a
    /// new container instead of joining a parent that already has the
    /// matching orientation.
    DragBegin {
        #[serde(default)]
        force_container: bool,
    },

    /// The pointer moved during a drag; refreshes the drop preview.
    DragMotion,

    /// The pointer was released; performs the drop.
    DragEnd,

    /// Abort an in-flight drag without touching the layout.
    CancelGrab,

    /// Monitors were added, removed or resized.
    MonitorsChanged,

    /// Run the cleanup pass and re-render.
    Clean,
}

/// Static information about a monitor known to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorInfo {
    /// Host index of the monitor.
    pub index: usize,
    /// Area available for tiling (excludes panels and docks).
    pub work_area: Rect,
}

/// Window type as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowType {
    #[default]
    Normal,
    Dialog,
    ModalDialog,
    Utility,
    Splash,
}

/// What the engine needs to know about a host window when tracking it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowInfo {
    /// Window class (`WM_CLASS` / app id).
    #[serde(default)]
    pub class: String,
    /// Human-readable title.
    #[serde(default)]
    pub title: String,
    /// Workspace index the window lives on.
    #[serde(default)]
    pub workspace: usize,
    /// Monitor index the window lives on.
    #[serde(default)]
    pub monitor: usize,
    #[serde(default)]
    pub window_type: WindowType,
    /// Whether the window is transient for (owned by) another window.
    #[serde(default)]
    pub transient: bool,
    #[serde(default = "default_true")]
    pub resizable: bool,
    #[serde(default)]
    pub minimized: bool,
}

fn default_true() -> bool {
    true
}

impl Default for WindowInfo {
    fn default() -> Self {
        Self {
            class: String::new(),
            title: String::new(),
            workspace: 0,
            monitor: 0,
            window_type: WindowType::Normal,
            transient: false,
            resizable: true,
            minimized: false,
        }
    }
}
