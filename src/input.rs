//! Input translation
//!
//! Raw keyboard and pointer signals become at most one [`LaneShift`] per
//! discrete user action. Signals that arrive while no run is active are
//! dropped, not buffered.

use crate::sim::{LaneShift, Viewport};

/// Map a `KeyboardEvent.key` value to a lane shift
pub fn key_to_shift(key: &str) -> Option<LaneShift> {
    match key {
        "ArrowLeft" | "a" | "A" => Some(LaneShift::Left),
        "ArrowRight" | "d" | "D" => Some(LaneShift::Right),
        _ => None,
    }
}

/// Bisect a tap at the horizontal midpoint of the surface
pub fn pointer_to_shift(x: f32, viewport: &Viewport) -> LaneShift {
    if x < viewport.midpoint() {
        LaneShift::Left
    } else {
        LaneShift::Right
    }
}

/// Only the primary pointer's main button steers
///
/// `button` is the DOM `PointerEvent.button` value: 0 for the left mouse
/// button, a touch contact or a pen tip.
pub fn is_steering_pointer(is_primary: bool, button: i16) -> bool {
    is_primary && button == 0
}

/// Keys typed into form fields belong to the page, not the game
pub fn is_text_entry(tag_name: &str, content_editable: bool) -> bool {
    content_editable
        || ["INPUT", "TEXTAREA", "SELECT"]
            .iter()
            .any(|tag| tag_name.eq_ignore_ascii_case(tag))
}

/// Holds the single pending lane shift between frames
#[derive(Debug, Clone, Default)]
pub struct InputController {
    pending: Option<LaneShift>,
}

impl InputController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key press; `repeat` is true for auto-repeat while a key is held
    pub fn on_key(&mut self, key: &str, repeat: bool, accepting: bool) -> bool {
        if repeat {
            return false;
        }
        match key_to_shift(key) {
            Some(shift) => self.push(shift, accepting),
            None => false,
        }
    }

    /// Tap or click at `x` on the given viewport
    pub fn on_pointer(&mut self, x: f32, viewport: &Viewport, accepting: bool) -> bool {
        self.push(pointer_to_shift(x, viewport), accepting)
    }

    /// Queue a shift; latest wins if one is already pending
    pub fn push(&mut self, shift: LaneShift, accepting: bool) -> bool {
        if !accepting {
            return false;
        }
        self.pending = Some(shift);
        true
    }

    /// Consume the pending shift for this frame
    pub fn take(&mut self) -> Option<LaneShift> {
        self.pending.take()
    }

    /// Drop anything pending (run stopped or reset)
    pub fn clear(&mut self) {
        self.pending = None;
    }
}
