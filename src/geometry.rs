//! Pixel geometry shared by the tree and the drag controller.
//!
//! [`Rect`] is the integer frame rectangle every node carries.  The
//! drop-zone helpers partition a target window's rectangle into five
//! directional regions and classify a pointer position against them; they
//! are pure functions and never touch the tree.

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in global screen pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether `(px, py)` lies inside the rectangle.
    ///
    /// The left/top edges are inclusive and the right/bottom edges are
    /// exclusive, so a zero-area rectangle contains nothing and two
    /// rectangles that share an edge never both claim a point on it.
    pub fn contains(&self, px: i32, py: i32) -> bool {
        px >= self.x && px < self.x + self.width && py >= self.y && py < self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Shrink every side by `amount`, leaving an axis untouched when it is
    /// too small to give up `2 * amount` pixels.
    pub fn inset(&self, amount: i32) -> Rect {
        let mut out = *self;
        if amount <= 0 {
            return out;
        }
        if out.width > amount * 2 {
            out.x += amount;
            out.width -= amount * 2;
        }
        if out.height > amount * 2 {
            out.y += amount;
            out.height -= amount * 2;
        }
        out
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}

/// Error from parsing a `WxH+X+Y` geometry string.
#[derive(Debug, thiserror::Error)]
#[error("invalid geometry {0:?}, expected WxH+X+Y")]
pub struct ParseRectError(String);

impl std::str::FromStr for Rect {
    type Err = ParseRectError;

    /// Parse the `WxH+X+Y` form produced by `Display`.  The offsets may be
    /// omitted (`1920x1080`), and negative offsets use `-`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseRectError(s.to_string());
        let (size, offsets) = match s.find(['+', '-']) {
            Some(i) => s.split_at(i),
            None => (s, ""),
        };
        let (w, h) = size.split_once('x').ok_or_else(err)?;
        let width = w.parse().map_err(|_| err())?;
        let height = h.parse().map_err(|_| err())?;

        let (x, y) = if offsets.is_empty() {
            (0, 0)
        } else {
            let split = offsets[1..].find(['+', '-']).ok_or_else(err)? + 1;
            let (x, y) = offsets.split_at(split);
            let x: i32 = x.trim_start_matches('+').parse().map_err(|_| err())?;
            let y: i32 = y.trim_start_matches('+').parse().map_err(|_| err())?;
            (x, y)
        };
        if width <= 0 || height <= 0 {
            return Err(err());
        }
        Ok(Rect::new(x, y, width, height))
    }
}

//  Drop zones

/// Where a dragged window was released relative to a target window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DropZone {
    Left,
    Right,
    Top,
    Bottom,
    Center,
    None,
}

impl DropZone {
    /// Whether the zone is one of the four edges.
    pub fn is_edge(self) -> bool {
        matches!(
            self,
            DropZone::Left | DropZone::Right | DropZone::Top | DropZone::Bottom
        )
    }

    /// Whether a drop in this zone lands before the target (left or above).
    pub fn is_before(self) -> bool {
        matches!(self, DropZone::Left | DropZone::Top)
    }
}

/// The five regions a target rectangle is split into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropRegions {
    pub left: Rect,
    pub right: Rect,
    pub top: Rect,
    pub bottom: Rect,
    pub center: Rect,
}

/// Partition `rect` into drop regions.
///
/// `left`/`right` take `edge_fraction` of the width over the full height,
/// `top`/`bottom` take `edge_fraction` of the height over the full width,
/// and `center` is what remains in the middle.  At `edge_fraction >= 0.5`
/// the center has zero area.
pub fn calculate_drop_regions(rect: Rect, edge_fraction: f64) -> DropRegions {
    let f = if edge_fraction.is_finite() {
        edge_fraction.max(0.0)
    } else {
        0.0
    };
    let w = rect.width as f64;
    let h = rect.height as f64;

    let edge_w = ((w * f).round() as i32).min(rect.width);
    let edge_h = ((h * f).round() as i32).min(rect.height);
    let center_w = ((w * (1.0 - 2.0 * f)).round() as i32).max(0);
    let center_h = ((h * (1.0 - 2.0 * f)).round() as i32).max(0);

    DropRegions {
        left: Rect::new(rect.x, rect.y, edge_w, rect.height),
        right: Rect::new(rect.right() - edge_w, rect.y, edge_w, rect.height),
        top: Rect::new(rect.x, rect.y, rect.width, edge_h),
        bottom: Rect::new(rect.x, rect.bottom() - edge_h, rect.width, edge_h),
        center: Rect::new(rect.x + edge_w, rect.y + edge_h, center_w, center_h),
    }
}

/// Classify a pointer position against precomputed regions.
///
/// The center is checked first, then left, right, top, bottom.  A corner
/// point that is inside both a side region and a top/bottom region
/// therefore always resolves to the side.
pub fn detect_drop_zone(regions: &DropRegions, x: i32, y: i32) -> DropZone {
    if regions.center.contains(x, y) {
        DropZone::Center
    } else if regions.left.contains(x, y) {
        DropZone::Left
    } else if regions.right.contains(x, y) {
        DropZone::Right
    } else if regions.top.contains(x, y) {
        DropZone::Top
    } else if regions.bottom.contains(x, y) {
        DropZone::Bottom
    } else {
        DropZone::None
    }
}
