//! The visible window onto world space: pan, zoom and fit-to-bounds.

use crate::core::geometry::Bounds;

/// Fraction of the visible extent moved by one pan step.
const PAN_STEP: f64 = 0.1;
/// Scale factor of one zoom step.
const ZOOM_STEP: f64 = 1.25;
/// Fit leaves this fraction of the graph's extent as margin on each side.
const FIT_MARGIN: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    visible: Bounds,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            visible: Bounds::new(-500.0, -100.0, 500.0, 700.0),
        }
    }
}

impl Viewport {
    /// World rectangle currently shown.
    pub fn visible(&self) -> Bounds {
        self.visible
    }

    /// Show all of `bounds`, with a margin.
    pub fn fit(&mut self, bounds: Bounds) {
        self.visible = bounds.padded(FIT_MARGIN, 10.0);
    }

    /// Move by `dx`/`dy` pan steps (positive = right / down).
    pub fn pan(&mut self, dx: f64, dy: f64) {
        let shift_x = self.visible.width() * PAN_STEP * dx;
        let shift_y = self.visible.height() * PAN_STEP * dy;
        let v = self.visible;
        self.visible = Bounds::new(
            v.min_x + shift_x,
            v.min_y + shift_y,
            v.max_x + shift_x,
            v.max_y + shift_y,
        );
    }

    pub fn zoom_in(&mut self) {
        self.scale(1.0 / ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.scale(ZOOM_STEP);
    }

    /// Grow (`factor > 1`) or shrink the visible extent about its centre.
    fn scale(&mut self, factor: f64) {
        let (cx, cy) = self.visible.center();
        let half_w = self.visible.width() * factor / 2.0;
        let half_h = self.visible.height() * factor / 2.0;
        self.visible = Bounds::new(cx - half_w, cy - half_h, cx + half_w, cy + half_h);
    }
}
