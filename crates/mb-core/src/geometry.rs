//! Axis-aligned integer rectangles with inclusive bounds.
//!
//! Every bound is a pixel index: `(0, 0, 9, 1)` covers ten columns and two
//! rows. A rectangle whose left exceeds its right (or top exceeds bottom)
//! is empty and never describes pixels to copy.

use serde::Serialize;
use std::fmt;

/// An inclusive pixel rectangle in some surface's coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Rectangle {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rectangle {
    /// Canonical empty rectangle.
    pub const EMPTY: Rectangle = Rectangle {
        left: 0,
        top: 0,
        right: -1,
        bottom: -1,
    };

    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Footprint of a `width` × `height` surface anchored at the origin.
    ///
    /// A zero dimension yields an empty rectangle, so degenerate surfaces
    /// never produce a row or column to walk.
    pub fn from_size(width: u32, height: u32) -> Self {
        let right = i32::try_from(width).unwrap_or(i32::MAX) - 1;
        let bottom = i32::try_from(height).unwrap_or(i32::MAX) - 1;
        Self::new(0, 0, right, bottom)
    }

    pub fn is_empty(&self) -> bool {
        self.left > self.right || self.top > self.bottom
    }

    /// Number of columns covered, 0 when empty.
    pub fn width(&self) -> u32 {
        if self.is_empty() {
            0
        } else {
            (i64::from(self.right) - i64::from(self.left) + 1) as u32
        }
    }

    /// Number of rows covered, 0 when empty.
    pub fn height(&self) -> u32 {
        if self.is_empty() {
            0
        } else {
            (i64::from(self.bottom) - i64::from(self.top) + 1) as u32
        }
    }

    pub fn contains_point(&self, x: i32, y: i32) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }
}

impl Default for Rectangle {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl fmt::Display for Rectangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {})..=({}, {})",
            self.left, self.top, self.right, self.bottom
        )
    }
}

// ─── Operations ──────────────────────────────────────────────────────────

/// Shift all four bounds by `(dx, dy)`.
///
/// No clamping is applied: the result may lie partly or fully outside any
/// buffer, so callers intersect afterwards.
#[must_use]
pub fn translate(rect: Rectangle, dx: i32, dy: i32) -> Rectangle {
    Rectangle {
        left: rect.left.saturating_add(dx),
        top: rect.top.saturating_add(dy),
        right: rect.right.saturating_add(dx),
        bottom: rect.bottom.saturating_add(dy),
    }
}

/// Largest rectangle contained in both `a` and `b`, or `None` when they
/// share no pixel. Two rectangles touching on a single edge column overlap.
pub fn intersect(a: Rectangle, b: Rectangle) -> Option<Rectangle> {
    let overlap = Rectangle {
        left: a.left.max(b.left),
        top: a.top.max(b.top),
        right: a.right.min(b.right),
        bottom: a.bottom.min(b.bottom),
    };
    if overlap.is_empty() {
        None
    } else {
        Some(overlap)
    }
}

/// Smallest rectangle containing both operands. Empty operands are ignored.
#[must_use]
pub fn combine(a: Rectangle, b: Rectangle) -> Rectangle {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => Rectangle::EMPTY,
        (true, false) => b,
        (false, true) => a,
        (false, false) => Rectangle {
            left: a.left.min(b.left),
            top: a.top.min(b.top),
            right: a.right.max(b.right),
            bottom: a.bottom.max(b.bottom),
        },
    }
}
