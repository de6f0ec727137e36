use serde::Serialize;

/// Horizontal inset between the viewport edge and the sprite's outer edge.
pub const STAGE_MARGIN_X: f64 = 16.0;
/// Gap between the sprite's feet and the bottom of the viewport.
pub const STAGE_MARGIN_BOTTOM: f64 = 12.0;

/// Usable range for the sprite's anchor (bottom-centre), derived from the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageBounds {
    pub left: f64,
    pub right: f64,
    pub bottom_y: f64,
}

impl StageBounds {
    /// Bounds for a viewport of `width` x `height` logical px holding a sprite `sprite_width` wide.
    ///
    /// A viewport too narrow for the sprite collapses the range to its centre line.
    pub fn from_viewport(width: f64, height: f64, sprite_width: f64) -> Self {
        let width = sanitize(width);
        let height = sanitize(height);
        let half = sanitize(sprite_width) * 0.5;

        let mut left = STAGE_MARGIN_X + half;
        let mut right = width - STAGE_MARGIN_X - half;
        if right < left {
            let center = width * 0.5;
            left = center;
            right = center;
        }

        Self {
            left,
            right,
            bottom_y: (height - STAGE_MARGIN_BOTTOM).max(0.0),
        }
    }

    pub fn width(&self) -> f64 {
        (self.right - self.left).max(0.0)
    }

    pub fn clamp(&self, x: f64) -> f64 {
        if !x.is_finite() {
            return self.left;
        }
        x.clamp(self.left, self.right.max(self.left))
    }

    pub fn contains(&self, x: f64) -> bool {
        x >= self.left && x <= self.right
    }
}

fn sanitize(v: f64) -> f64 {
    if v.is_finite() { v.max(0.0) } else { 0.0 }
}
