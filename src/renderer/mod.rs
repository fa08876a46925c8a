//! 2D rendering
//!
//! The frame painter in `frame` only talks to the [`Surface`] trait. The
//! browser backend (`canvas`) wraps a `CanvasRenderingContext2d`; tests use a
//! recording surface.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod frame;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;
pub use frame::{FrameRenderer, FrameView};

use glam::Vec2;

/// RGBA colour, alpha in 0-1
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// From 0xRRGGBB
    pub const fn hex(rgb: u32) -> Self {
        Self::rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// CSS colour string for canvas fill/stroke styles
    pub fn to_css(&self) -> String {
        format!("rgba({},{},{},{:.3})", self.r, self.g, self.b, self.a)
    }
}

/// Text anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// Minimal immediate-mode drawing target
pub trait Surface {
    /// Global opacity for subsequent draws
    fn set_alpha(&mut self, alpha: f32);
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color);
    fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);
    fn fill_polygon(&mut self, points: &[Vec2], color: Color);
    fn text(&mut self, text: &str, pos: Vec2, size_px: f32, align: TextAlign, color: Color);
}

/// Colours for every layer (the site theme can override these)
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub background: Color,
    pub lane_divider: Color,
    pub grid: Color,
    pub player: Color,
    pub wall: Color,
    pub fragment: Color,
    pub text: Color,
    pub accent: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Color::hex(0x0a0e14),
            lane_divider: Color::hex(0x1f6feb).with_alpha(0.5),
            grid: Color::hex(0x1f6feb).with_alpha(0.18),
            player: Color::hex(0x39ff14),
            wall: Color::hex(crate::consts::WALL_BURST_COLOR),
            fragment: Color::hex(crate::consts::FRAGMENT_BURST_COLOR),
            text: Color::hex(0xe6edf3),
            accent: Color::hex(0xffd60a),
        }
    }
}
