//! Frame painter
//!
//! Read-only projection of the run onto a [`Surface`]. Layers, back to front:
//! background, lane dividers, scrolling grid, player, obstacles, particles,
//! HUD text, then the START / GAME OVER banner when not playing.
//!
//! The grid scroll offset is the only state kept here. It is cosmetic and
//! never feeds back into obstacle positions.

use glam::Vec2;

use super::{Color, Palette, Surface, TextAlign};
use crate::persistence::KeyValueStore;
use crate::screen::{Screen, ScreenController};
use crate::settings::Settings;
use crate::sim::{ObstacleKind, SimulationState, Viewport};

/// Spacing between horizontal grid lines
const GRID_SPACING: f32 = 40.0;
/// Grid pixels scrolled per ms at speed 1 (speed is px per ~16ms frame)
const GRID_SCROLL_PER_MS: f32 = 1.0 / 16.0;
const HUD_FONT_PX: f32 = 16.0;
const BANNER_FONT_PX: f32 = 28.0;
const PARTICLE_RADIUS: f32 = 2.5;
const WALL_HEIGHT: f32 = 20.0;
const FRAGMENT_RADIUS: f32 = 10.0;

/// Everything the painter needs for one frame
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    pub screen: Screen,
    pub state: Option<&'a SimulationState>,
    pub lane_count: usize,
    pub high_score: u64,
    /// The finished run beat the previous record
    pub new_record: bool,
    pub fps: Option<u32>,
}

impl<'a> FrameView<'a> {
    pub fn from_controller<S: KeyValueStore>(
        ctl: &'a ScreenController<S>,
        lane_count: usize,
        settings: &Settings,
    ) -> Self {
        Self {
            screen: ctl.screen(),
            state: ctl.state(),
            lane_count: ctl.state().map_or(lane_count, |s| s.tuning.lane_count),
            high_score: ctl.high_score(),
            new_record: ctl.is_new_record(),
            fps: settings.show_fps.then(|| ctl.fps()),
        }
    }
}

/// Paints frames and owns the cosmetic scroll timer
#[derive(Debug, Clone, Default)]
pub struct FrameRenderer {
    pub palette: Palette,
    scroll_offset: f32,
    last_time_ms: Option<f64>,
}

impl FrameRenderer {
    pub fn new(palette: Palette) -> Self {
        Self {
            palette,
            scroll_offset: 0.0,
            last_time_ms: None,
        }
    }

    pub fn scroll_offset(&self) -> f32 {
        self.scroll_offset
    }

    /// Advance the grid scroll; only moves while a run is playing
    fn advance_scroll(&mut self, view: &FrameView, settings: &Settings, time_ms: f64) {
        let elapsed = self.last_time_ms.map_or(0.0, |last| (time_ms - last).max(0.0) as f32);
        self.last_time_ms = Some(time_ms);

        let speed = match (view.screen, view.state) {
            (Screen::Playing, Some(state)) => state.speed,
            _ => return,
        };
        if settings.reduced_motion {
            return;
        }
        self.scroll_offset = (self.scroll_offset + speed * elapsed * GRID_SCROLL_PER_MS) % GRID_SPACING;
    }

    /// Draw one frame
    pub fn draw<S: Surface>(
        &mut self,
        surface: &mut S,
        view: &FrameView,
        viewport: Viewport,
        settings: &Settings,
        time_ms: f64,
    ) {
        self.advance_scroll(view, settings, time_ms);
        let p = &self.palette;
        let (w, h) = (viewport.width, viewport.height);
        let lane_w = viewport.lane_width(view.lane_count);

        surface.set_alpha(1.0);
        surface.fill_rect(0.0, 0.0, w, h, p.background);

        for i in 1..view.lane_count {
            let x = i as f32 * lane_w;
            surface.line(Vec2::new(x, 0.0), Vec2::new(x, h), 1.0, p.lane_divider);
        }

        let mut y = self.scroll_offset;
        while y < h {
            surface.line(Vec2::new(0.0, y), Vec2::new(w, y), 1.0, p.grid);
            y += GRID_SPACING;
        }

        if let Some(state) = view.state {
            draw_run(surface, p, state, viewport, lane_w, settings);
        }

        let score = view.state.map_or(0, |s| s.score);
        surface.text(
            &format!("SCORE {}", score),
            Vec2::new(12.0, 24.0),
            HUD_FONT_PX,
            TextAlign::Left,
            p.text,
        );
        surface.text(
            &format!("HI {}", view.high_score),
            Vec2::new(w - 12.0, 24.0),
            HUD_FONT_PX,
            TextAlign::Right,
            p.accent,
        );
        if let Some(fps) = view.fps {
            surface.text(
                &format!("{} FPS", fps),
                Vec2::new(w - 12.0, h - 12.0),
                HUD_FONT_PX * 0.75,
                TextAlign::Right,
                p.text.with_alpha(0.6),
            );
        }

        match view.screen {
            Screen::Playing => {}
            Screen::Start => draw_banner(surface, p, viewport, "GRID RUNNER", "PRESS START"),
            Screen::GameOver { final_score } => {
                let detail = if view.new_record {
                    format!("NEW RECORD {}", final_score)
                } else {
                    format!("SCORE {}", final_score)
                };
                draw_banner(surface, p, viewport, "GAME OVER", &detail);
            }
        }
    }
}

fn draw_run<S: Surface>(
    surface: &mut S,
    p: &Palette,
    state: &SimulationState,
    viewport: Viewport,
    lane_w: f32,
    settings: &Settings,
) {
    let tuning = &state.tuning;

    // Player chevron
    let px = viewport.lane_center(state.player_lane, tuning.lane_count);
    let py = viewport.player_row(tuning.player_row_offset);
    let half = (lane_w * 0.3).min(24.0);
    surface.fill_polygon(
        &[
            Vec2::new(px, py - half),
            Vec2::new(px + half, py + half),
            Vec2::new(px, py + half * 0.4),
            Vec2::new(px - half, py + half),
        ],
        p.player,
    );

    for obs in &state.obstacles {
        let x = viewport.lane_center(obs.lane, tuning.lane_count);
        match obs.kind {
            ObstacleKind::Wall => {
                let ww = lane_w * 0.7;
                surface.fill_rect(x - ww / 2.0, obs.y - WALL_HEIGHT / 2.0, ww, WALL_HEIGHT, p.wall);
            }
            ObstacleKind::DataFragment => {
                let r = FRAGMENT_RADIUS;
                surface.fill_polygon(
                    &[
                        Vec2::new(x, obs.y - r),
                        Vec2::new(x + r, obs.y),
                        Vec2::new(x, obs.y + r),
                        Vec2::new(x - r, obs.y),
                    ],
                    p.fragment,
                );
            }
        }
    }

    if settings.particles {
        for particle in &state.particles {
            surface.set_alpha(particle.life.clamp(0.0, 1.0));
            surface.fill_circle(particle.pos, PARTICLE_RADIUS, Color::hex(particle.color));
        }
        surface.set_alpha(1.0);
    }
}

fn draw_banner<S: Surface>(surface: &mut S, p: &Palette, viewport: Viewport, title: &str, detail: &str) {
    let (w, h) = (viewport.width, viewport.height);
    surface.fill_rect(0.0, h / 2.0 - 60.0, w, 110.0, p.background.with_alpha(0.8));
    surface.text(
        title,
        Vec2::new(w / 2.0, h / 2.0 - 10.0),
        BANNER_FONT_PX,
        TextAlign::Center,
        p.accent,
    );
    surface.text(
        detail,
        Vec2::new(w / 2.0, h / 2.0 + 28.0),
        HUD_FONT_PX,
        TextAlign::Center,
        p.text,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Particle, TickInput, tick};
    use crate::tuning::Tuning;

    #[derive(Debug, Clone, PartialEq)]
    enum Cmd {
        Alpha(f32),
        Rect { y: f32, color: Color },
        Line { from: Vec2, to: Vec2 },
        Circle { alpha: f32 },
        Polygon { color: Color },
        Text(String),
    }

    #[derive(Default)]
    struct Recorder {
        alpha: f32,
        cmds: Vec<Cmd>,
    }

    impl Surface for Recorder {
        fn set_alpha(&mut self, alpha: f32) {
            self.alpha = alpha;
            self.cmds.push(Cmd::Alpha(alpha));
        }
        fn fill_rect(&mut self, _x: f32, y: f32, _w: f32, _h: f32, color: Color) {
            self.cmds.push(Cmd::Rect { y, color });
        }
        fn line(&mut self, from: Vec2, to: Vec2, _width: f32, _color: Color) {
            self.cmds.push(Cmd::Line { from, to });
        }
        fn fill_circle(&mut self, _center: Vec2, _radius: f32, _color: Color) {
            self.cmds.push(Cmd::Circle { alpha: self.alpha });
        }
        fn fill_polygon(&mut self, _points: &[Vec2], color: Color) {
            self.cmds.push(Cmd::Polygon { color });
        }
        fn text(&mut self, text: &str, _pos: Vec2, _size_px: f32, _align: TextAlign, _color: Color) {
            self.cmds.push(Cmd::Text(text.to_string()));
        }
    }

    fn viewport() -> Viewport {
        Viewport::new(300.0, 600.0)
    }

    fn index_of(cmds: &[Cmd], pred: impl Fn(&Cmd) -> bool) -> usize {
        cmds.iter().position(pred).expect("command not drawn")
    }

    fn staged_state() -> SimulationState {
        let mut state = SimulationState::new(1, Tuning::default());
        state.push_obstacle(0, 100.0, ObstacleKind::Wall);
        state.push_obstacle(2, 200.0, ObstacleKind::DataFragment);
        state.particles.push(Particle {
            pos: Vec2::new(10.0, 10.0),
            vel: Vec2::ZERO,
            life: 0.25,
            color: 0xffffff,
        });
        state.score = 60;
        state
    }

    fn playing_view(state: &SimulationState) -> FrameView<'_> {
        FrameView {
            screen: Screen::Playing,
            state: Some(state),
            lane_count: 3,
            high_score: 900,
            new_record: false,
            fps: None,
        }
    }

    #[test]
    fn test_layer_order() {
        let state = staged_state();
        let mut surface = Recorder::default();
        let mut renderer = FrameRenderer::default();
        renderer.draw(&mut surface, &playing_view(&state), viewport(), &Settings::default(), 0.0);

        let p = Palette::default();
        let cmds = &surface.cmds;
        let background = index_of(cmds, |c| matches!(c, Cmd::Rect { color, .. } if *color == p.background));
        let divider = index_of(cmds, |c| matches!(c, Cmd::Line { from, to } if from.x == to.x));
        let player = index_of(cmds, |c| matches!(c, Cmd::Polygon { color } if *color == p.player));
        let wall = index_of(cmds, |c| matches!(c, Cmd::Rect { color, .. } if *color == p.wall));
        let fragment = index_of(cmds, |c| matches!(c, Cmd::Polygon { color } if *color == p.fragment));
        let particle = index_of(cmds, |c| matches!(c, Cmd::Circle { .. }));
        let score = index_of(cmds, |c| *c == Cmd::Text("SCORE 60".into()));
        let hi = index_of(cmds, |c| *c == Cmd::Text("HI 900".into()));

        assert_eq!(background, 1);
        assert!(background < divider);
        assert!(divider < player);
        assert!(player < wall && player < fragment);
        assert!(wall < particle && fragment < particle);
        assert!(particle < score && particle < hi);
    }

    #[test]
    fn test_particle_opacity_follows_life() {
        let state = staged_state();
        let mut surface = Recorder::default();
        FrameRenderer::default().draw(&mut surface, &playing_view(&state), viewport(), &Settings::default(), 0.0);
        assert!(surface.cmds.contains(&Cmd::Circle { alpha: 0.25 }));
        // Opacity restored for the HUD
        assert_eq!(surface.alpha, 1.0);
    }

    #[test]
    fn test_particles_can_be_disabled() {
        let state = staged_state();
        let mut surface = Recorder::default();
        let settings = Settings {
            particles: false,
            ..Default::default()
        };
        FrameRenderer::default().draw(&mut surface, &playing_view(&state), viewport(), &settings, 0.0);
        assert!(!surface.cmds.iter().any(|c| matches!(c, Cmd::Circle { .. })));
    }

    #[test]
    fn test_two_lane_dividers_for_three_lanes() {
        let state = staged_state();
        let mut surface = Recorder::default();
        FrameRenderer::default().draw(&mut surface, &playing_view(&state), viewport(), &Settings::default(), 0.0);
        let dividers: Vec<f32> = surface
            .cmds
            .iter()
            .filter_map(|c| match c {
                Cmd::Line { from, to } if from.x == to.x => Some(from.x),
                _ => None,
            })
            .collect();
        assert_eq!(dividers, vec![100.0, 200.0]);
    }

    #[test]
    fn test_grid_scroll_is_cosmetic() {
        let mut state = SimulationState::new(1, Tuning::default());
        state.push_obstacle(1, 50.0, ObstacleKind::DataFragment);
        let before = (state.obstacles[0].y, state.speed, state.score);

        let mut renderer = FrameRenderer::default();
        let mut surface = Recorder::default();
        let settings = Settings::default();
        renderer.draw(&mut surface, &playing_view(&state), viewport(), &settings, 0.0);
        renderer.draw(&mut surface, &playing_view(&state), viewport(), &settings, 100.0);

        assert!(renderer.scroll_offset() > 0.0);
        assert!(renderer.scroll_offset() < GRID_SPACING);
        assert_eq!((state.obstacles[0].y, state.speed, state.score), before);
    }

    #[test]
    fn test_reduced_motion_freezes_grid() {
        let state = SimulationState::new(1, Tuning::default());
        let mut renderer = FrameRenderer::default();
        let mut surface = Recorder::default();
        let settings = Settings {
            reduced_motion: true,
            ..Default::default()
        };
        renderer.draw(&mut surface, &playing_view(&state), viewport(), &settings, 0.0);
        renderer.draw(&mut surface, &playing_view(&state), viewport(), &settings, 500.0);
        assert_eq!(renderer.scroll_offset(), 0.0);
    }

    #[test]
    fn test_banners() {
        let mut surface = Recorder::default();
        let view = FrameView {
            screen: Screen::Start,
            state: None,
            lane_count: 3,
            high_score: 0,
            new_record: false,
            fps: Some(58),
        };
        FrameRenderer::default().draw(&mut surface, &view, viewport(), &Settings::default(), 0.0);
        assert!(surface.cmds.contains(&Cmd::Text("PRESS START".into())));
        assert!(surface.cmds.contains(&Cmd::Text("58 FPS".into())));

        let mut state = SimulationState::new(1, Tuning::default());
        state.score = 40;
        tick(&mut state, &TickInput::default(), viewport());
        let mut surface = Recorder::default();
        let view = FrameView {
            screen: Screen::GameOver { final_score: 40 },
            state: Some(&state),
            lane_count: 3,
            high_score: 40,
            new_record: true,
            fps: None,
        };
        FrameRenderer::default().draw(&mut surface, &view, viewport(), &Settings::default(), 0.0);
        assert!(surface.cmds.contains(&Cmd::Text("GAME OVER".into())));
        assert!(surface.cmds.contains(&Cmd::Text("NEW RECORD 40".into())));

        // Matching the record is not a new one
        let mut surface = Recorder::default();
        let view = FrameView {
            new_record: false,
            ..view
        };
        FrameRenderer::default().draw(&mut surface, &view, viewport(), &Settings::default(), 0.0);
        assert!(surface.cmds.contains(&Cmd::Text("SCORE 40".into())));
        assert!(!surface.cmds.contains(&Cmd::Text("NEW RECORD 40".into())));
    }
}
