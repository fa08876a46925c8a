//! Hit window tests
//!
//! The hit window is a fixed horizontal band around the player row. Each
//! obstacle is checked against the span it swept this frame, so a fast
//! obstacle cannot jump over the band between two frames.

use super::lanes::Viewport;

/// Vertical band where collisions/collections resolve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitWindow {
    pub top: f32,
    pub bottom: f32,
}

impl HitWindow {
    /// Band centred on the player row for the current viewport
    pub fn for_viewport(viewport: &Viewport, row_offset: f32, half_height: f32) -> Self {
        let row = viewport.player_row(row_offset);
        Self {
            top: row - half_height,
            bottom: row + half_height,
        }
    }

    /// Point test (exclusive edges)
    #[inline]
    pub fn contains(&self, y: f32) -> bool {
        y > self.top && y < self.bottom
    }

    /// True if the motion `prev_y -> y` touched the band
    #[inline]
    pub fn swept(&self, prev_y: f32, y: f32) -> bool {
        self.contains(y) || (prev_y <= self.top && y >= self.bottom)
    }
}

/// Obstacle has scrolled off the bottom edge
#[inline]
pub fn is_past_bottom(y: f32, viewport: &Viewport) -> bool {
    y > viewport.height
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> HitWindow {
        HitWindow::for_viewport(&Viewport::new(300.0, 600.0), 100.0, 50.0)
    }

    #[test]
    fn test_band_geometry() {
        let w = window();
        assert_eq!(w.top, 450.0);
        assert_eq!(w.bottom, 550.0);
    }

    #[test]
    fn test_contains_is_exclusive() {
        let w = window();
        assert!(!w.contains(450.0));
        assert!(w.contains(451.0));
        assert!(w.contains(549.0));
        assert!(!w.contains(550.0));
    }

    #[test]
    fn test_swept_catches_tunneling() {
        let w = window();
        // Jumped straight over the band in one frame
        assert!(w.swept(400.0, 700.0));
        // Entirely above
        assert!(!w.swept(300.0, 440.0));
        // Entirely below
        assert!(!w.swept(560.0, 600.0));
    }

    #[test]
    fn test_past_bottom() {
        let vp = Viewport::new(300.0, 600.0);
        assert!(!is_past_bottom(600.0, &vp));
        assert!(is_past_bottom(600.5, &vp));
    }
}
