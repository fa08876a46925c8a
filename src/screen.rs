//! Screen controller
//!
//! Owns the run lifecycle: START -> PLAYING -> GAME_OVER -> PLAYING ...
//!
//! Every start hands out a [`LoopToken`]. The host's frame callback passes
//! its token back on each frame; a token from an earlier run no longer
//! matches and the frame is ignored, so a callback that outlived its run can
//! never touch the fresh state.

use crate::highscores::HighScore;
use crate::input::InputController;
use crate::persistence::KeyValueStore;
use crate::sim::{GameEvent, LaneShift, SimulationState, TickInput, Viewport, tick};
use crate::tuning::Tuning;

/// Which screen is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Nothing played yet
    Start,
    Playing,
    /// Frozen on the final frame of a run
    GameOver { final_score: u64 },
}

/// Generation token tying a frame callback to one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopToken(u64);

/// Result of one frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Token is stale or no run is active; do not reschedule
    Stale,
    /// Keep scheduling frames
    Continue,
    /// Run ended this frame; do not reschedule
    Ended { final_score: u64, new_record: bool },
}

/// Rolling FPS over the last 60 frames
#[derive(Debug, Clone)]
pub struct FrameStats {
    frame_times: [f64; 60],
    frame_index: usize,
    fps: u32,
}

impl Default for FrameStats {
    fn default() -> Self {
        Self {
            frame_times: [0.0; 60],
            frame_index: 0,
            fps: 0,
        }
    }
}

impl FrameStats {
    pub fn record(&mut self, time: f64) {
        self.frame_times[self.frame_index] = time;
        self.frame_index = (self.frame_index + 1) % self.frame_times.len();

        // Slot we are about to overwrite holds the oldest sample
        let oldest = self.frame_times[self.frame_index];
        if oldest > 0.0 {
            let elapsed = time - oldest;
            if elapsed > 0.0 {
                self.fps = ((self.frame_times.len() - 1) as f64 * 1000.0 / elapsed).round() as u32;
            }
        }
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Coordinates runs, input and the high score
pub struct ScreenController<S: KeyValueStore> {
    screen: Screen,
    state: Option<SimulationState>,
    high_score: HighScore<S>,
    input: InputController,
    tuning: Tuning,
    generation: u64,
    stats: FrameStats,
    new_record: bool,
}

impl<S: KeyValueStore> ScreenController<S> {
    /// An invalid `tuning` is replaced by the defaults
    pub fn new(store: S, tuning: Tuning) -> Self {
        let tuning = match tuning.validate() {
            Ok(()) => tuning,
            Err(e) => {
                log::warn!("Falling back to default tuning: {}", e);
                Tuning::default()
            }
        };
        Self {
            screen: Screen::Start,
            state: None,
            high_score: HighScore::load(store),
            input: InputController::new(),
            tuning,
            generation: 0,
            stats: FrameStats::default(),
            new_record: false,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn is_playing(&self) -> bool {
        self.screen == Screen::Playing
    }

    /// Current run (also the frozen run while GAME_OVER)
    pub fn state(&self) -> Option<&SimulationState> {
        self.state.as_ref()
    }

    pub fn high_score(&self) -> u64 {
        self.high_score.get()
    }

    /// Whether the last finished run beat the stored record
    pub fn is_new_record(&self) -> bool {
        self.new_record
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn store_mut(&mut self) -> &mut S {
        self.high_score.store_mut()
    }

    pub fn fps(&self) -> u32 {
        self.stats.fps()
    }

    /// Start or restart; ignored while a run is in progress
    pub fn start(&mut self, seed: u64) -> Option<LoopToken> {
        if self.is_playing() {
            return None;
        }
        // Invalidate any in-flight callback before the reset
        self.generation += 1;
        self.input.clear();
        self.stats.reset();
        self.new_record = false;
        self.state = Some(SimulationState::new(seed, self.tuning.clone()));
        self.screen = Screen::Playing;
        log::info!("Run started (seed {})", seed);
        Some(LoopToken(self.generation))
    }

    /// Tear down an active run (unmount); the screen returns to START
    pub fn stop(&mut self) {
        self.generation += 1;
        self.input.clear();
        if self.is_playing() {
            log::info!("Run stopped");
            self.state = None;
            self.screen = Screen::Start;
        }
    }

    /// Whether `token` still belongs to the active run
    pub fn is_active(&self, token: LoopToken) -> bool {
        self.is_playing() && token.0 == self.generation
    }

    /// Keyboard signal; returns true if it queued a lane shift
    pub fn on_key(&mut self, key: &str, repeat: bool) -> bool {
        let accepting = self.is_playing();
        self.input.on_key(key, repeat, accepting)
    }

    /// Tap/click signal; returns true if it queued a lane shift
    pub fn on_pointer(&mut self, x: f32, viewport: &Viewport) -> bool {
        let accepting = self.is_playing();
        self.input.on_pointer(x, viewport, accepting)
    }

    /// Queue a shift directly (autopilot)
    pub fn push_shift(&mut self, shift: LaneShift) -> bool {
        let accepting = self.is_playing();
        self.input.push(shift, accepting)
    }

    /// Animation-frame entry point
    pub fn frame(&mut self, token: LoopToken, timestamp_ms: f64, viewport: Viewport) -> FrameOutcome {
        if !self.is_active(token) {
            return FrameOutcome::Stale;
        }
        let Some(state) = self.state.as_mut() else {
            return FrameOutcome::Stale;
        };

        self.stats.record(timestamp_ms);
        let input = TickInput {
            delta_ms: state.frame_delta(timestamp_ms),
            lane_shift: self.input.take(),
        };
        let events = tick(state, &input, viewport);

        let final_score = events.iter().find_map(|e| match e {
            GameEvent::RunEnded { final_score } => Some(*final_score),
            _ => None,
        });
        match final_score {
            Some(final_score) => self.end_run(final_score),
            None => FrameOutcome::Continue,
        }
    }

    fn end_run(&mut self, final_score: u64) -> FrameOutcome {
        self.generation += 1;
        self.input.clear();
        self.screen = Screen::GameOver { final_score };
        let new_record = self.high_score.report(final_score);
        self.new_record = new_record;
        FrameOutcome::Ended {
            final_score,
            new_record,
        }
    }
}
