//! Platform abstraction layer
//!
//! Browser host for the game:
//! - Canvas sizing and the 2D surface
//! - `requestAnimationFrame` loop with cancellation
//! - Input listeners that deregister on unmount
//! - LocalStorage-backed high score and settings

#[cfg(target_arch = "wasm32")]
pub mod web;

use thiserror::Error;

use crate::persistence::KeyValueStore;
use crate::screen::{LoopToken, ScreenController};

/// Reasons the game cannot attach to the page
#[derive(Debug, Error)]
pub enum MountError {
    #[error(transparent)]
    Tuning(#[from] crate::tuning::TuningError),
    #[error("no browser window")]
    NoWindow,
    #[error("element `{0}` not found")]
    ElementNotFound(String),
    #[error("element `{0}` is not a canvas")]
    NotACanvas(String),
    #[error("canvas has no 2D context")]
    NoContext,
}

/// Animation-frame bookkeeping for the host loop
///
/// Tracks the active run's token and the pending frame request. A start
/// that the controller refuses leaves the pending frame alone, and once
/// detached the loop never begins another run.
#[derive(Debug, Default)]
pub struct FrameLoop {
    token: Option<LoopToken>,
    pending: Option<i32>,
    detached: bool,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Token the next frame should run with
    pub fn token(&self) -> Option<LoopToken> {
        self.token
    }

    /// Id of the requested, not yet delivered frame
    pub fn pending(&self) -> Option<i32> {
        self.pending
    }

    pub fn is_detached(&self) -> bool {
        self.detached
    }

    /// Start a run; returns true if the caller should request a frame
    ///
    /// `cancel` receives the id of a leftover frame request, only after the
    /// controller has accepted the start.
    pub fn begin<S: KeyValueStore>(
        &mut self,
        controller: &mut ScreenController<S>,
        seed: u64,
        cancel: impl FnOnce(i32),
    ) -> bool {
        if self.detached {
            log::warn!("Start ignored: game is unmounted");
            return false;
        }
        let Some(token) = controller.start(seed) else {
            return false;
        };
        if let Some(id) = self.pending.take() {
            cancel(id);
        }
        self.token = Some(token);
        true
    }

    /// Record the id of a freshly requested frame (None if none was)
    pub fn scheduled(&mut self, id: Option<i32>) {
        self.pending = id;
    }

    /// The run ended or went stale; no more frames for it
    pub fn finish(&mut self) {
        self.token = None;
    }

    /// Cancel anything pending and refuse further runs
    pub fn detach(&mut self, cancel: impl FnOnce(i32)) {
        if let Some(id) = self.pending.take() {
            cancel(id);
        }
        self.token = None;
        self.detached = true;
    }
}
