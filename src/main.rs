//! Grid Runner entry point
//!
//! On the web this mounts the game on `#canvas`. Natively it plays headless
//! demo runs with the autopilot steering.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;

    use grid_runner::platform::web::GridRunner;

    thread_local! {
        // The page owns the game for its whole lifetime
        static GAME: RefCell<Option<GridRunner>> = const { RefCell::new(None) };
    }

    pub async fn run() {
        let mut game = match GridRunner::mount("canvas") {
            Ok(game) => game,
            Err(_) => return,
        };
        game.bind_start_button("start-btn");
        log::info!("High score: {}", game.high_score());
        GAME.with(|slot| *slot.borrow_mut() = Some(game));
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use grid_runner::autopilot;
    use grid_runner::persistence::MemoryStore;
    use grid_runner::screen::FrameOutcome;
    use grid_runner::sim::Viewport;
    use grid_runner::{ScreenController, Tuning};

    const FRAME_MS: f64 = 1000.0 / 60.0;
    // Ten minutes of play per run
    const MAX_FRAMES: u32 = 36_000;

    pub fn run(seed: u64, runs: u32) {
        let viewport = Viewport::new(480.0, 800.0);
        let mut ctl = ScreenController::new(MemoryStore::new(), Tuning::default());
        let mut now = 0.0;

        for run in 0..runs {
            let Some(token) = ctl.start(seed.wrapping_add(run as u64)) else {
                log::warn!("Run {} could not start", run + 1);
                continue;
            };

            let mut outcome = FrameOutcome::Continue;
            for _ in 0..MAX_FRAMES {
                if let Some(shift) = ctl.state().and_then(|s| autopilot::suggest(s, &viewport)) {
                    ctl.push_shift(shift);
                }
                now += FRAME_MS;
                outcome = ctl.frame(token, now, viewport);
                if outcome != FrameOutcome::Continue {
                    break;
                }
            }

            match outcome {
                FrameOutcome::Ended {
                    final_score,
                    new_record,
                } => {
                    log::info!(
                        "Run {}: score {}{}",
                        run + 1,
                        final_score,
                        if new_record { " (new record)" } else { "" }
                    );
                }
                _ => {
                    let score = ctl.state().map_or(0, |s| s.score);
                    log::info!("Run {}: survived {} frames, score {}", run + 1, MAX_FRAMES, score);
                    ctl.stop();
                }
            }
            // Gap between runs so the next start sees a fresh first frame
            now += 1000.0;
        }

        log::info!("High score after {} runs: {}", runs, ctl.high_score());
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Grid Runner (native) starting headless demo...");
    log::info!("Run with `trunk serve` for the playable web version");

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);
    let runs = args.next().and_then(|s| s.parse().ok()).unwrap_or(3);
    demo::run(seed, runs);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
