//! Lane grid geometry
//!
//! Lane width depends on the live viewport, so nothing here is cached: the
//! host passes the current [`Viewport`] into every tick and render.

use serde::{Deserialize, Serialize};

/// Drawable area in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Width of a single lane column
    #[inline]
    pub fn lane_width(&self, lane_count: usize) -> f32 {
        self.width / lane_count.max(1) as f32
    }

    /// Horizontal centre line of `lane`
    #[inline]
    pub fn lane_center(&self, lane: usize, lane_count: usize) -> f32 {
        let w = self.lane_width(lane_count);
        lane as f32 * w + w / 2.0
    }

    /// Vertical position of the player glyph
    #[inline]
    pub fn player_row(&self, row_offset: f32) -> f32 {
        self.height - row_offset
    }

    /// Horizontal midpoint used to bisect taps
    #[inline]
    pub fn midpoint(&self) -> f32 {
        self.width / 2.0
    }
}

/// Apply a one-step lane delta, clamped to `[0, lane_count - 1]`
#[inline]
pub fn shift_lane(lane: usize, delta: i32, lane_count: usize) -> usize {
    let last = lane_count.saturating_sub(1) as i64;
    (lane as i64 + delta as i64).clamp(0, last) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lane_centers() {
        let vp = Viewport::new(300.0, 600.0);
        assert_eq!(vp.lane_width(3), 100.0);
        assert_eq!(vp.lane_center(0, 3), 50.0);
        assert_eq!(vp.lane_center(2, 3), 250.0);
        assert_eq!(vp.player_row(100.0), 500.0);
    }

    #[test]
    fn test_shift_lane_clamps() {
        assert_eq!(shift_lane(0, -1, 3), 0);
        assert_eq!(shift_lane(0, 1, 3), 1);
        assert_eq!(shift_lane(2, 1, 3), 2);
        assert_eq!(shift_lane(1, -1, 3), 0);
        assert_eq!(shift_lane(0, 1, 1), 0);
    }
}
