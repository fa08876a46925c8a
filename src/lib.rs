//! Grid Runner - lane runner arcade mini-game
//!
//! Core modules:
//! - `sim`: Simulation core (state, per-frame tick, collisions, particles)
//! - `renderer`: Surface-agnostic frame painter
//! - `input`: Keyboard/pointer to lane-shift translation
//! - `screen`: START / PLAYING / GAME_OVER controller
//! - `persistence`: Key-value storage backends
//! - `platform`: Browser host (canvas, animation frames, listeners)
//! - `tuning`: Data-driven game balance

pub mod autopilot;
pub mod highscores;
pub mod input;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod screen;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::HighScore;
pub use screen::{Screen, ScreenController};
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    /// Number of discrete lanes
    pub const LANE_COUNT: usize = 3;

    /// Obstacle speed at the start of a run (pixels per frame)
    pub const INITIAL_SPEED: f32 = 5.0;
    /// Added to speed every frame, no upper bound
    pub const SPEED_RAMP_RATE: f32 = 0.001;

    /// Spawn interval at score 0 (ms)
    pub const BASE_SPAWN_INTERVAL_MS: f32 = 1500.0;
    /// Spawn interval reduction per point of score (ms)
    pub const SPAWN_ACCELERATION_MS: f32 = 10.0;
    /// Spawn interval floor (ms)
    pub const MIN_SPAWN_INTERVAL_MS: f32 = 400.0;
    /// Chance a spawned obstacle is a wall (rest are data fragments)
    pub const WALL_PROBABILITY: f64 = 0.7;
    /// Spawn height, above the visible top edge
    pub const SPAWN_Y: f32 = -50.0;

    /// Player row, measured up from the bottom edge
    pub const PLAYER_ROW_OFFSET: f32 = 100.0;
    /// Half height of the hit window around the player row
    pub const HIT_WINDOW_HALF_HEIGHT: f32 = 50.0;

    /// Points for collecting a data fragment
    pub const FRAGMENT_REWARD: u64 = 50;
    /// Points for a wall leaving the screen without a hit
    pub const DODGE_BONUS: u64 = 10;

    /// Particles per burst
    pub const PARTICLE_BURST: usize = 12;
    /// Life lost per frame (life starts at 1.0)
    pub const PARTICLE_DECAY: f32 = 0.02;
    /// Max burst particle speed (pixels per frame)
    pub const PARTICLE_MAX_SPEED: f32 = 4.0;
    /// Hard cap on live particles
    pub const MAX_PARTICLES: usize = 256;

    /// Frame deltas above this are clamped (hidden tab, debugger pause)
    pub const MAX_FRAME_DELTA_MS: f32 = 250.0;

    /// Burst colour for wall hits (0xRRGGBB)
    pub const WALL_BURST_COLOR: u32 = 0xff_3b_5c;
    /// Burst colour for fragment pickups (0xRRGGBB)
    pub const FRAGMENT_BURST_COLOR: u32 = 0x00_e5_ff;
}
