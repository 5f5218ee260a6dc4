//! Layout constants and world-space rectangles.
//!
//! All coordinates are `f64` world units: `x` grows to the right, `y` grows
//! downwards (one [`LayoutConfig::level_height`] per tree level).

use serde::Serialize;

/// Geometry knobs for one layout pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    /// Width of a single node box; also the minimum footprint of any subtree.
    pub node_width: f64,
    /// Height of a single node box (only used for bounds and drawing).
    pub node_height: f64,
    /// Horizontal gap between adjacent sibling subtrees.
    pub sibling_spacing: f64,
    /// Vertical distance between consecutive levels.
    pub level_height: f64,
    /// Deepest nesting accepted before the tree is rejected as malformed.
    pub max_depth: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: 150.0,
            node_height: 48.0,
            sibling_spacing: 50.0,
            level_height: 150.0,
            max_depth: 512,
        }
    }
}

/// Axis-aligned bounding box in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Box covering a `width` × `height` rectangle whose top-left is `(x, y)`.
    pub fn from_rect(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Smallest box containing both `self` and `other`.
    pub fn union(self, other: Bounds) -> Bounds {
        Bounds::new(
            self.min_x.min(other.min_x),
            self.min_y.min(other.min_y),
            self.max_x.max(other.max_x),
            self.max_y.max(other.max_y),
        )
    }

    /// Grow every side by `fraction` of the box's own extent, with at least
    /// `min_pad` units so single nodes still get breathing room.
    pub fn padded(self, fraction: f64, min_pad: f64) -> Bounds {
        let pad_x = (self.width() * fraction).max(min_pad);
        let pad_y = (self.height() * fraction).max(min_pad);
        Bounds::new(
            self.min_x - pad_x,
            self.min_y - pad_y,
            self.max_x + pad_x,
            self.max_y + pad_y,
        )
    }
}
