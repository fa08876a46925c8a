//! Demo autopilot
//!
//! Plays the game from the current state: steps out of lanes with an
//! incoming wall and drifts toward nearby fragments when that is safe. Used
//! for the attract loop and the native headless demo.

use crate::sim::{HitWindow, LaneShift, ObstacleKind, SimulationState, Viewport};

/// Frames of warning the autopilot wants before a wall reaches the band
const LOOKAHEAD_FRAMES: f32 = 14.0;

/// Pick a lane shift for this frame, if any
pub fn suggest(state: &SimulationState, viewport: &Viewport) -> Option<LaneShift> {
    if !state.is_running {
        return None;
    }
    let tuning = &state.tuning;
    let window = HitWindow::for_viewport(viewport, tuning.player_row_offset, tuning.hit_window_half_height);
    let reach = window.top - state.speed * LOOKAHEAD_FRAMES;

    let threatened = |lane: usize, kind: ObstacleKind| {
        state
            .obstacles
            .iter()
            .any(|o| o.lane == lane && o.kind == kind && o.y > reach && o.y < window.bottom)
    };

    let lane = state.player_lane;
    let neighbours = [
        (LaneShift::Left, lane.checked_sub(1)),
        (LaneShift::Right, (lane + 1 < tuning.lane_count).then_some(lane + 1)),
    ];

    if threatened(lane, ObstacleKind::Wall) {
        return neighbours
            .iter()
            .find_map(|&(shift, target)| target.filter(|&l| !threatened(l, ObstacleKind::Wall)).map(|_| shift));
    }

    neighbours.iter().find_map(|&(shift, target)| {
        target
            .filter(|&l| threatened(l, ObstacleKind::DataFragment) && !threatened(l, ObstacleKind::Wall))
            .map(|_| shift)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{TickInput, tick};
    use crate::tuning::Tuning;

    fn viewport() -> Viewport {
        Viewport::new(300.0, 600.0)
    }

    fn quiet() -> SimulationState {
        SimulationState::new(
            3,
            Tuning {
                base_spawn_interval_ms: 1.0e9,
                min_spawn_interval_ms: 1.0e9,
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_idle_when_clear() {
        assert_eq!(suggest(&quiet(), &viewport()), None);
    }

    #[test]
    fn test_sidesteps_incoming_wall() {
        let mut state = quiet();
        state.push_obstacle(1, 420.0, ObstacleKind::Wall);
        assert_eq!(suggest(&state, &viewport()), Some(LaneShift::Left));

        state.push_obstacle(0, 420.0, ObstacleKind::Wall);
        assert_eq!(suggest(&state, &viewport()), Some(LaneShift::Right));
    }

    #[test]
    fn test_reaches_for_fragment() {
        let mut state = quiet();
        state.push_obstacle(2, 430.0, ObstacleKind::DataFragment);
        assert_eq!(suggest(&state, &viewport()), Some(LaneShift::Right));
    }

    #[test]
    fn test_avoids_single_wall_end_to_end() {
        let mut state = quiet();
        state.push_obstacle(1, 200.0, ObstacleKind::Wall);
        for _ in 0..200 {
            let input = TickInput {
                delta_ms: 16.0,
                lane_shift: suggest(&state, &viewport()),
            };
            tick(&mut state, &input, viewport());
        }
        assert!(state.is_running);
        assert_eq!(state.score, crate::consts::DODGE_BONUS);
    }
}
