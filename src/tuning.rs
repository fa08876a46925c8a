//! Data-driven game balance
//!
//! Every field defaults to the matching constant in [`crate::consts`], so a
//! tuning file only needs to name the values it overrides.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning: {0}")]
    Invalid(&'static str),
}

/// Gameplay constants for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub lane_count: usize,
    pub initial_speed: f32,
    pub speed_ramp_rate: f32,
    pub base_spawn_interval_ms: f32,
    pub spawn_acceleration_ms: f32,
    pub min_spawn_interval_ms: f32,
    pub wall_probability: f64,
    pub spawn_y: f32,
    pub player_row_offset: f32,
    pub hit_window_half_height: f32,
    pub fragment_reward: u64,
    pub dodge_bonus: u64,
    pub particle_burst: usize,
    pub particle_decay: f32,
    pub particle_max_speed: f32,
    pub max_particles: usize,
    pub max_frame_delta_ms: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            lane_count: LANE_COUNT,
            initial_speed: INITIAL_SPEED,
            speed_ramp_rate: SPEED_RAMP_RATE,
            base_spawn_interval_ms: BASE_SPAWN_INTERVAL_MS,
            spawn_acceleration_ms: SPAWN_ACCELERATION_MS,
            min_spawn_interval_ms: MIN_SPAWN_INTERVAL_MS,
            wall_probability: WALL_PROBABILITY,
            spawn_y: SPAWN_Y,
            player_row_offset: PLAYER_ROW_OFFSET,
            hit_window_half_height: HIT_WINDOW_HALF_HEIGHT,
            fragment_reward: FRAGMENT_REWARD,
            dodge_bonus: DODGE_BONUS,
            particle_burst: PARTICLE_BURST,
            particle_decay: PARTICLE_DECAY,
            particle_max_speed: PARTICLE_MAX_SPEED,
            max_particles: MAX_PARTICLES,
            max_frame_delta_ms: MAX_FRAME_DELTA_MS,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON tuning document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values that would break the lane/spawn invariants
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.lane_count == 0 {
            return Err(TuningError::Invalid("lane_count must be at least 1"));
        }
        if !positive(self.initial_speed) {
            return Err(TuningError::Invalid("initial_speed must be positive"));
        }
        if !non_negative(self.speed_ramp_rate) {
            return Err(TuningError::Invalid("speed_ramp_rate must not be negative"));
        }
        if !positive(self.base_spawn_interval_ms) {
            return Err(TuningError::Invalid("base_spawn_interval_ms must be positive"));
        }
        if !non_negative(self.spawn_acceleration_ms) {
            return Err(TuningError::Invalid("spawn_acceleration_ms must not be negative"));
        }
        if !positive(self.min_spawn_interval_ms) {
            return Err(TuningError::Invalid("min_spawn_interval_ms must be positive"));
        }
        if !(0.0..=1.0).contains(&self.wall_probability) {
            return Err(TuningError::Invalid("wall_probability must be within [0, 1]"));
        }
        if !positive(self.hit_window_half_height) {
            return Err(TuningError::Invalid("hit_window_half_height must be positive"));
        }
        if !positive(self.particle_decay) {
            return Err(TuningError::Invalid("particle_decay must be positive"));
        }
        if !non_negative(self.particle_max_speed) {
            return Err(TuningError::Invalid("particle_max_speed must not be negative"));
        }
        if !positive(self.max_frame_delta_ms) {
            return Err(TuningError::Invalid("max_frame_delta_ms must be positive"));
        }
        Ok(())
    }

    /// Spawn threshold for the given score, never below the floor
    pub fn spawn_interval_ms(&self, score: u64) -> f32 {
        let reduction = score as f32 * self.spawn_acceleration_ms;
        (self.base_spawn_interval_ms - reduction).max(self.min_spawn_interval_ms)
    }
}

/// False for NaN
fn positive(v: f32) -> bool {
    v > 0.0
}

/// False for NaN
fn non_negative(v: f32) -> bool {
    v >= 0.0
}
