//! Per-frame simulation tick
//!
//! One call per animation frame. Steps run in a fixed order: speed ramp,
//! spawn, obstacle resolution, particles, then the pending lane shift. The
//! lane shift goes last so hit-window checks in a frame always see the lane
//! the player occupied when the frame began.

use glam::Vec2;
use rand::Rng;

use super::collision::{HitWindow, is_past_bottom};
use super::lanes::Viewport;
use super::particles;
use super::state::{GameEvent, LaneShift, Obstacle, ObstacleKind, SimulationState};
use crate::consts::{FRAGMENT_BURST_COLOR, WALL_BURST_COLOR};

/// Input for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Milliseconds since the previous frame
    pub delta_ms: f32,
    /// At most one pending lane change
    pub lane_shift: Option<LaneShift>,
}

/// What happened to one obstacle this frame
enum Resolution {
    Advance,
    Hit,
    Collected,
    Passed,
}

/// Advance the run by one frame
///
/// Does nothing once the run has ended. The returned events are in the
/// order they happened; `RunEnded` is always last when present.
pub fn tick(state: &mut SimulationState, input: &TickInput, viewport: Viewport) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if !state.is_running {
        return events;
    }
    state.frame += 1;

    state.speed += state.tuning.speed_ramp_rate;

    state.spawn_timer += input.delta_ms.max(0.0);
    if state.spawn_timer > state.tuning.spawn_interval_ms(state.score) {
        state.spawn_timer = 0.0;
        events.push(spawn_obstacle(state, &viewport));
    }

    resolve_obstacles(state, &viewport, &mut events);
    if !state.is_running {
        // Frozen on the frame of impact, burst included
        return events;
    }

    particles::advance(&mut state.particles, state.tuning.particle_decay);

    if let Some(shift) = input.lane_shift {
        state.apply_shift(shift);
    }

    events
}

/// Spawn one obstacle in a random lane above the visible area
fn spawn_obstacle(state: &mut SimulationState, viewport: &Viewport) -> GameEvent {
    let lane_count = state.tuning.lane_count;
    let lane = state.rng.random_range(0..lane_count);
    let kind = if state.rng.random_bool(state.tuning.wall_probability) {
        ObstacleKind::Wall
    } else {
        ObstacleKind::DataFragment
    };
    let id = state.next_entity_id();
    state.obstacles.push(Obstacle {
        id,
        x: viewport.lane_center(lane, lane_count),
        y: state.tuning.spawn_y,
        lane,
        kind,
    });
    log::debug!("Spawned {:?} #{} in lane {}", kind, id, lane);
    GameEvent::Spawned { id, lane, kind }
}

fn resolve_obstacles(state: &mut SimulationState, viewport: &Viewport, events: &mut Vec<GameEvent>) {
    let tuning = &state.tuning;
    let lane_count = tuning.lane_count;
    let window = HitWindow::for_viewport(viewport, tuning.player_row_offset, tuning.hit_window_half_height);

    let obstacles = std::mem::take(&mut state.obstacles);
    let mut kept = Vec::with_capacity(obstacles.len());
    let mut remaining = obstacles.into_iter();

    while let Some(mut obs) = remaining.next() {
        let prev_y = obs.y;
        obs.y += state.speed;
        obs.x = viewport.lane_center(obs.lane, lane_count);

        let in_window = obs.lane == state.player_lane && window.swept(prev_y, obs.y);
        let resolution = match (in_window, obs.kind) {
            (true, ObstacleKind::Wall) => Resolution::Hit,
            (true, ObstacleKind::DataFragment) => Resolution::Collected,
            (false, _) if is_past_bottom(obs.y, viewport) => Resolution::Passed,
            (false, _) => Resolution::Advance,
        };

        match resolution {
            Resolution::Advance => kept.push(obs),
            Resolution::Hit => {
                state.is_running = false;
                emit_burst(state, &obs, WALL_BURST_COLOR);
                events.push(GameEvent::WallHit { id: obs.id });
                log::info!("Run ended: wall #{} in lane {}, score {}", obs.id, obs.lane, state.score);
                events.push(GameEvent::RunEnded {
                    final_score: state.score,
                });
                // Frozen: the rest stay where they were
                kept.extend(remaining.by_ref());
                break;
            }
            Resolution::Collected => {
                let reward = state.tuning.fragment_reward;
                state.score += reward;
                emit_burst(state, &obs, FRAGMENT_BURST_COLOR);
                events.push(GameEvent::FragmentCollected { id: obs.id, reward });
            }
            Resolution::Passed => match obs.kind {
                ObstacleKind::Wall => {
                    let bonus = state.tuning.dodge_bonus;
                    state.score += bonus;
                    events.push(GameEvent::WallDodged { id: obs.id, bonus });
                }
                ObstacleKind::DataFragment => {
                    events.push(GameEvent::FragmentMissed { id: obs.id });
                }
            },
        }
    }

    state.obstacles = kept;
}

fn emit_burst(state: &mut SimulationState, obs: &Obstacle, color: u32) {
    let tuning = &state.tuning;
    particles::burst(
        &mut state.particles,
        &mut state.fx_rng,
        Vec2::new(obs.x, obs.y),
        color,
        tuning.particle_burst,
        tuning.particle_max_speed,
        tuning.max_particles,
    );
}
