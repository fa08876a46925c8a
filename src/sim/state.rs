//! Game state and core simulation types
//!
//! A [`SimulationState`] is created fresh for every run and owned by the
//! screen controller; nothing survives from one run into the next.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::lanes::shift_lane;
use crate::tuning::Tuning;

/// Obstacle kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Ends the run on contact, dodge bonus when avoided
    Wall,
    /// Collected on contact for points
    DataFragment,
}

/// An obstacle scrolling toward the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    /// Lane centre line (re-derived from the viewport every tick)
    pub x: f32,
    /// Distance travelled, grows toward the player
    pub y: f32,
    pub lane: usize,
    pub kind: ObstacleKind,
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// 0-1, decreases every frame
    pub life: f32,
    /// 0xRRGGBB
    pub color: u32,
}

/// Discrete lane-change intent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LaneShift {
    Left,
    Right,
}

impl LaneShift {
    pub fn delta(self) -> i32 {
        match self {
            LaneShift::Left => -1,
            LaneShift::Right => 1,
        }
    }
}

/// Things that happened during a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Spawned { id: u32, lane: usize, kind: ObstacleKind },
    FragmentCollected { id: u32, reward: u64 },
    /// Fragment left the screen uncollected
    FragmentMissed { id: u32 },
    WallDodged { id: u32, bonus: u64 },
    WallHit { id: u32 },
    /// Terminal: a wall reached the player
    RunEnded { final_score: u64 },
}

/// Mixed into the run seed for the particle generator
const FX_SEED_SALT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct SimulationState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub player_lane: usize,
    /// Spawn order
    pub obstacles: Vec<Obstacle>,
    /// Visual only, never read by gameplay
    pub particles: Vec<Particle>,
    pub speed: f32,
    pub score: u64,
    /// Milliseconds since the last spawn
    pub spawn_timer: f32,
    /// Host timestamp of the previous frame (None before the first frame)
    pub last_frame_timestamp: Option<f64>,
    pub is_running: bool,
    /// Frames simulated this run
    pub frame: u64,
    /// Gameplay randomness (spawn lane and kind)
    pub(crate) rng: Pcg32,
    /// Particle randomness, kept apart so effects never shift spawns
    pub(crate) fx_rng: Pcg32,
    next_id: u32,
}

impl SimulationState {
    /// Create a fresh running state with the given seed
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        Self {
            seed,
            player_lane: tuning.lane_count / 2,
            obstacles: Vec::new(),
            particles: Vec::new(),
            speed: tuning.initial_speed,
            score: 0,
            spawn_timer: 0.0,
            last_frame_timestamp: None,
            is_running: true,
            frame: 0,
            rng: Pcg32::seed_from_u64(seed),
            fx_rng: Pcg32::seed_from_u64(seed ^ FX_SEED_SALT),
            next_id: 1,
            tuning,
        }
    }

    /// Allocate a new obstacle ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Milliseconds since the previous frame, clamped; 0 on the first frame
    pub fn frame_delta(&mut self, timestamp_ms: f64) -> f32 {
        let delta = match self.last_frame_timestamp {
            Some(last) => ((timestamp_ms - last) as f32).max(0.0).min(self.tuning.max_frame_delta_ms),
            None => 0.0,
        };
        self.last_frame_timestamp = Some(timestamp_ms);
        delta
    }

    /// Apply one clamped lane step
    pub fn apply_shift(&mut self, shift: LaneShift) {
        self.player_lane = shift_lane(self.player_lane, shift.delta(), self.tuning.lane_count);
    }

    /// Push an obstacle (used by the spawner and by tests that stage scenarios)
    pub fn push_obstacle(&mut self, lane: usize, y: f32, kind: ObstacleKind) -> u32 {
        let id = self.next_entity_id();
        self.obstacles.push(Obstacle {
            id,
            x: 0.0,
            y,
            lane: lane.min(self.tuning.lane_count.saturating_sub(1)),
            kind,
        });
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_reset() {
        let state = SimulationState::new(7, Tuning::default());
        assert!(state.is_running);
        assert_eq!(state.player_lane, 1);
        assert_eq!(state.score, 0);
        assert_eq!(state.speed, crate::consts::INITIAL_SPEED);
        assert!(state.obstacles.is_empty());
        assert!(state.particles.is_empty());
    }

    #[test]
    fn test_frame_delta_first_frame_is_zero() {
        let mut state = SimulationState::new(7, Tuning::default());
        assert_eq!(state.frame_delta(1000.0), 0.0);
        assert_eq!(state.frame_delta(1016.0), 16.0);
        // Hidden tab
        assert_eq!(state.frame_delta(60_000.0), crate::consts::MAX_FRAME_DELTA_MS);
        // Clock going backwards is treated as no time
        assert_eq!(state.frame_delta(59_000.0), 0.0);
    }

    #[test]
    fn test_ids_are_unique() {
        let mut state = SimulationState::new(7, Tuning::default());
        let a = state.push_obstacle(0, 0.0, ObstacleKind::Wall);
        let b = state.push_obstacle(9, 0.0, ObstacleKind::DataFragment);
        assert_ne!(a, b);
        assert_eq!(state.obstacles[1].lane, 2);
    }
}
