//! Scene state management.

use rand::{SeedableRng, rngs::StdRng};
use ratatui::{Frame, widgets::Paragraph};
use tracing::debug;

use clepsydra_core::{AnimationSpeed, SceneMode};

use crate::camera::OrbitCamera;
use crate::canvas::Canvas;
use crate::color;
use crate::depth::{DepthScene, DepthSettings};
use crate::droplet::DropletField;
use crate::water::WaterBody;

/// Longest step the simulation takes after a stall.
const MAX_FRAME_DELTA_MS: u64 = 250;

/// Timings for both scenes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneSettings {
    pub flat_drop_interval_ms: u64,
    pub flat_splash_linger_ms: u64,
    pub depth: DepthSettings,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            flat_drop_interval_ms: 2000,
            flat_splash_linger_ms: 1000,
            depth: DepthSettings::default(),
        }
    }
}

/// Everything animated behind the clock.
#[derive(Debug)]
pub struct SceneState {
    water: WaterBody,
    field: DropletField,
    depth: DepthScene,
    rng: StdRng,
    /// Scaled simulation clock in milliseconds.
    sim_ms: u64,
    /// Sub-millisecond remainder of the scaled clock.
    carry: f32,
    last_elapsed_ms: Option<u64>,
    last_size: (u16, u16),
}

impl Default for SceneState {
    fn default() -> Self {
        Self::new(SceneSettings::default())
    }
}

impl SceneState {
    pub fn new(settings: SceneSettings) -> Self {
        Self::with_rng(settings, StdRng::from_entropy())
    }

    /// Deterministic scene for tests and replays.
    pub fn with_seed(settings: SceneSettings, seed: u64) -> Self {
        Self::with_rng(settings, StdRng::seed_from_u64(seed))
    }

    fn with_rng(settings: SceneSettings, rng: StdRng) -> Self {
        Self {
            water: WaterBody::new(),
            field: DropletField::new(
                settings.flat_drop_interval_ms,
                settings.flat_splash_linger_ms,
            ),
            depth: DepthScene::new(settings.depth),
            rng,
            sim_ms: 0,
            carry: 0.0,
            last_elapsed_ms: None,
            last_size: (0, 0),
        }
    }

    pub fn sim_ms(&self) -> u64 {
        self.sim_ms
    }

    /// Displayed (eased) water level in percent.
    pub fn level(&self) -> f32 {
        self.water.level()
    }

    pub fn droplets(&self) -> &DropletField {
        &self.field
    }

    pub fn depth(&self) -> &DepthScene {
        &self.depth
    }

    pub fn camera_mut(&mut self) -> &mut OrbitCamera {
        self.depth.camera_mut()
    }

    /// Advance the active scene and draw it over the whole frame.
    pub fn render(
        &mut self,
        frame: &mut Frame,
        mode: SceneMode,
        elapsed_ms: u64,
        level: f32,
        speed: AnimationSpeed,
    ) {
        self.advance(mode, elapsed_ms, level, speed);

        let area = frame.area();
        if area.is_empty() {
            return;
        }
        if (area.width, area.height) != self.last_size {
            debug!(width = area.width, height = area.height, "scene resized");
            self.last_size = (area.width, area.height);
        }

        let canvas = self.compose(mode, area.width, area.height);
        frame.render_widget(Paragraph::new(canvas.into_lines()), area);
    }

    /// Step the simulation clock and the active scene.
    pub fn advance(&mut self, mode: SceneMode, elapsed_ms: u64, level: f32, speed: AnimationSpeed) {
        let raw = self
            .last_elapsed_ms
            .map_or(0, |last| elapsed_ms.saturating_sub(last));
        self.last_elapsed_ms = Some(elapsed_ms);

        self.carry += raw.min(MAX_FRAME_DELTA_MS) as f32 * speed.time_scale();
        let delta_ms = self.carry.floor();
        self.carry -= delta_ms;
        let delta_ms = delta_ms as u64;
        self.sim_ms += delta_ms;

        // Level easing follows wall time; only the animation is scaled.
        self.water.set_target(level, elapsed_ms);
        self.water.update(elapsed_ms);
        let displayed = self.water.level();

        match mode {
            SceneMode::Flat => {
                self.field
                    .update(self.sim_ms, delta_ms, displayed, &mut self.rng)
            }
            SceneMode::Depth => {
                self.depth
                    .update(self.sim_ms, delta_ms, displayed / 100.0, &mut self.rng)
            }
        }
    }

    fn compose(&self, mode: SceneMode, width: u16, height: u16) -> Canvas {
        match mode {
            SceneMode::Flat => {
                let mut canvas = Canvas::new(width, height, color::SKY);
                self.water.paint(&mut canvas, self.sim_ms);
                self.field.paint(&mut canvas, self.sim_ms);
                canvas
            }
            SceneMode::Depth => {
                let mut canvas = Canvas::new(width, height, color::DEPTH_BACKGROUND);
                self.depth.paint(&mut canvas, self.water.level() / 100.0);
                canvas
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{Terminal, backend::TestBackend, style::Color};

    fn state() -> SceneState {
        SceneState::with_seed(SceneSettings::default(), 7)
    }

    #[test]
    fn test_first_call_has_no_delta() {
        let mut state = state();
        state.advance(SceneMode::Flat, 5000, 40.0, AnimationSpeed::Medium);
        assert_eq!(state.sim_ms(), 0);
        assert_eq!(state.level(), 40.0);
    }

    #[test]
    fn test_speed_scales_the_clock() {
        let mut state = state();
        state.advance(SceneMode::Flat, 0, 10.0, AnimationSpeed::Medium);
        state.advance(SceneMode::Flat, 100, 10.0, AnimationSpeed::Slow);
        assert_eq!(state.sim_ms(), 50);
        state.advance(SceneMode::Flat, 200, 10.0, AnimationSpeed::Fast);
        assert_eq!(state.sim_ms(), 250);
        state.advance(SceneMode::Flat, 300, 10.0, AnimationSpeed::Medium);
        assert_eq!(state.sim_ms(), 350);
    }

    #[test]
    fn test_slow_speed_keeps_sub_millisecond_remainder() {
        let mut state = state();
        state.advance(SceneMode::Flat, 0, 10.0, AnimationSpeed::Slow);
        for t in 1..=10 {
            state.advance(SceneMode::Flat, t, 10.0, AnimationSpeed::Slow);
        }
        assert_eq!(state.sim_ms(), 5);
    }

    #[test]
    fn test_level_easing_ignores_speed() {
        let mut state = state();
        state.advance(SceneMode::Flat, 0, 10.0, AnimationSpeed::Slow);
        state.advance(SceneMode::Flat, 1000, 20.0, AnimationSpeed::Slow);
        assert_eq!(state.level(), 10.0);

        let mut t = 1000;
        while t < 1500 {
            t += 50;
            state.advance(SceneMode::Flat, t, 20.0, AnimationSpeed::Slow);
        }
        assert!((state.level() - 15.0).abs() < 1e-3);

        while t < 2000 {
            t += 50;
            state.advance(SceneMode::Flat, t, 20.0, AnimationSpeed::Slow);
        }
        assert_eq!(state.level(), 20.0);
    }

    #[test]
    fn test_stall_is_clamped() {
        let mut state = state();
        state.advance(SceneMode::Flat, 0, 10.0, AnimationSpeed::Medium);
        state.advance(SceneMode::Flat, 60_000, 10.0, AnimationSpeed::Medium);
        assert_eq!(state.sim_ms(), MAX_FRAME_DELTA_MS);
    }

    #[test]
    fn test_only_active_mode_advances() {
        let mut state = state();
        for t in 0..=200 {
            state.advance(SceneMode::Flat, t * 50, 30.0, AnimationSpeed::Medium);
        }
        assert!(!state.droplets().droplets().is_empty());
        assert!(state.depth().drops().is_empty());

        let flat_count = state.droplets().droplets().len();
        for t in 201..=400 {
            state.advance(SceneMode::Depth, t * 50, 30.0, AnimationSpeed::Medium);
        }
        assert!(!state.depth().drops().is_empty());
        assert_eq!(state.droplets().droplets().len(), flat_count);
    }

    #[test]
    fn test_render_flat_fills_sky_and_water() {
        let mut state = state();
        let mut terminal = Terminal::new(TestBackend::new(40, 12)).unwrap();
        terminal
            .draw(|f| state.render(f, SceneMode::Flat, 0, 50.0, AnimationSpeed::Medium))
            .unwrap();

        let buffer = terminal.backend().buffer();
        let sky = color::rgb(color::SKY);
        assert_eq!(buffer[(0, 0)].bg, sky);
        assert_ne!(buffer[(0, 11)].bg, sky);
        assert_ne!(buffer[(0, 11)].bg, Color::Reset);
    }

    #[test]
    fn test_render_depth_paints_every_cell() {
        let mut state = state();
        let mut terminal = Terminal::new(TestBackend::new(30, 10)).unwrap();
        terminal
            .draw(|f| state.render(f, SceneMode::Depth, 0, 50.0, AnimationSpeed::Medium))
            .unwrap();

        let buffer = terminal.backend().buffer();
        for y in 0..10u16 {
            for x in 0..30u16 {
                assert_ne!(buffer[(x, y)].bg, Color::Reset);
            }
        }
    }

    #[test]
    fn test_render_zero_size_is_noop() {
        let mut state = state();
        let mut terminal = Terminal::new(TestBackend::new(0, 0)).unwrap();
        terminal
            .draw(|f| state.render(f, SceneMode::Depth, 0, 50.0, AnimationSpeed::Medium))
            .unwrap();
        assert_eq!(state.last_size, (0, 0));
    }

    #[test]
    fn test_resize_keeps_droplets() {
        let mut state = state();
        let mut terminal = Terminal::new(TestBackend::new(40, 12)).unwrap();
        for t in 0..=60 {
            terminal
                .draw(|f| state.render(f, SceneMode::Flat, t * 50, 20.0, AnimationSpeed::Medium))
                .unwrap();
        }
        let before = state.droplets().droplets().len();
        assert!(before > 0);

        terminal.backend_mut().resize(20, 6);
        terminal
            .draw(|f| state.render(f, SceneMode::Flat, 61 * 50, 20.0, AnimationSpeed::Medium))
            .unwrap();
        assert_eq!(state.last_size, (20, 6));
        assert!(!state.droplets().droplets().is_empty());
    }
}
