//! Simulation module
//!
//! All gameplay logic lives here. This module stays free of rendering and
//! platform code:
//! - Elapsed time comes in through `TickInput`
//! - Seeded RNG only
//! - Viewport geometry is passed in every frame, never cached

pub mod collision;
pub mod lanes;
pub mod particles;
pub mod state;
pub mod tick;

pub use collision::HitWindow;
pub use lanes::{Viewport, shift_lane};
pub use state::{GameEvent, LaneShift, Obstacle, ObstacleKind, Particle, SimulationState};
pub use tick::{TickInput, tick};
