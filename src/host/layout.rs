use serde::{Deserialize, Serialize};

use crate::interaction::Point;

/// Monitor work area in physical pixels (virtual desktop coordinates).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkArea {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub scale_factor: f64,
}

impl WorkArea {
    pub fn width(&self) -> f64 {
        (self.right - self.left).max(0.0)
    }

    pub fn height(&self) -> f64 {
        (self.bottom - self.top).max(0.0)
    }

    fn scale(&self) -> f64 {
        if self.scale_factor.is_finite() && self.scale_factor > 0.0 {
            self.scale_factor
        } else {
            1.0
        }
    }

    fn margin_px(&self, logical_px: f64) -> f64 {
        (logical_px * self.scale()).max(0.0)
    }
}

/// Outer window rectangle in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl WindowRect {
    pub fn right(&self) -> i64 {
        self.x as i64 + self.width as i64
    }

    pub fn bottom(&self) -> i64 {
        self.y as i64 + self.height as i64
    }
}

/// Default overlay placement: a strip spanning the whole work area width, anchored to its bottom
/// edge.
///
/// `strip_height_logical` and `edge_margin_logical` are logical px; the strip never exceeds the
/// work area.
pub fn default_window_rect(
    work_area: WorkArea,
    strip_height_logical: f64,
    edge_margin_logical: f64,
) -> WindowRect {
    let margin = work_area.margin_px(edge_margin_logical);
    let max_height = (work_area.height() - margin).max(1.0);
    let height = work_area.margin_px(strip_height_logical).clamp(1.0, max_height);
    let width = work_area.width().max(1.0);

    let min_y = work_area.top;
    let y = (work_area.bottom - margin - height).max(min_y);

    WindowRect {
        x: work_area.left.round() as i32,
        y: y.round() as i32,
        width: width.round() as u32,
        height: height.round() as u32,
    }
}

/// Map a physical cursor position to window-relative logical px. `None` while outside the window.
pub fn window_relative_pointer(
    cursor_x: f64,
    cursor_y: f64,
    window: WindowRect,
    scale_factor: f64,
) -> Option<Point> {
    if !(cursor_x.is_finite() && cursor_y.is_finite()) {
        return None;
    }
    let dx = cursor_x - window.x as f64;
    let dy = cursor_y - window.y as f64;
    if dx < 0.0 || dy < 0.0 || dx >= window.width as f64 || dy >= window.height as f64 {
        return None;
    }

    let scale = if scale_factor.is_finite() && scale_factor > 0.0 {
        scale_factor
    } else {
        1.0
    };
    Some(Point {
        x: dx / scale,
        y: dy / scale,
    })
}
