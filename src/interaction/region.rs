use serde::{Deserialize, Serialize};

/// Pointer position in window-relative logical px.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Axis-aligned hit region in window-relative logical px. `right`/`bottom` are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HitRect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl HitRect {
    /// Rect of `width` x `height` whose bottom edge is centred on `(center_x, bottom)`.
    pub fn bottom_centered(center_x: f64, bottom: f64, width: f64, height: f64) -> Self {
        let half = width.max(0.0) * 0.5;
        Self {
            left: center_x - half,
            top: bottom - height.max(0.0),
            right: center_x + half,
            bottom,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.right <= self.left || self.bottom <= self.top
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && x < self.right && y >= self.top && y < self.bottom
    }

    pub fn contains_point(&self, point: Point) -> bool {
        self.contains(point.x, point.y)
    }

    pub fn width(&self) -> f64 {
        (self.right - self.left).max(0.0)
    }

    pub fn height(&self) -> f64 {
        (self.bottom - self.top).max(0.0)
    }

    /// Drop rects reported with non-finite or inverted edges.
    pub fn sanitize(self) -> Option<Self> {
        let finite = self.left.is_finite()
            && self.top.is_finite()
            && self.right.is_finite()
            && self.bottom.is_finite();
        if !finite || self.is_empty() {
            return None;
        }
        Some(self)
    }
}
