use std::time::{Duration, Instant};

use clepsydra_config::Config;
use clepsydra_core::{AnimationSpeed, ClockSample, ColorTheme, Interval, SceneMode, TimeFormat};
use clepsydra_fonts::{GLYPH_HEIGHT, render_time, rendered_width};
use clepsydra_scene::{DepthSettings, SceneSettings, SceneState};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Alignment, Constraint, Flex, Layout},
    style::{Style, Stylize},
    text::Line,
    widgets::{Block, BorderType, Clear, Paragraph},
};
use tracing::{debug, info};

mod logging;

/// How often the displayed time is re-read from the system clock.
const CLOCK_REFRESH_MS: u64 = 1000;
/// Event poll timeout, about 30 frames per second.
const FRAME_POLL_MS: u64 = 33;
/// Camera yaw step per arrow key press, in radians.
const ORBIT_STEP: f32 = 0.1;
/// Camera pitch step per arrow key press, in radians.
const TILT_STEP: f32 = 0.05;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let (config, source) = Config::load()?;
    let log_file = logging::init(&config.logging)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        config = ?source,
        log = ?log_file,
        "starting clepsydra"
    );

    let terminal = ratatui::init();
    let result = App::new(&config).run(terminal);
    ratatui::restore();
    info!("stopped");
    result
}

/// The main application which holds the state and logic of the application.
#[derive(Debug)]
pub struct App {
    /// Is the application running?
    running: bool,
    time_format: TimeFormat,
    color_theme: ColorTheme,
    scene_mode: SceneMode,
    speed: AnimationSpeed,
    show_date: bool,
    show_help: bool,
    /// Last sampled time of day.
    clock: ClockSample,
    clock_refresh: Interval,
    clock_source: fn() -> ClockSample,
    scene: SceneState,
    started: Instant,
}

impl App {
    /// Construct a new instance of [`App`] from the loaded configuration.
    pub fn new(config: &Config) -> Self {
        Self::with_scene(config, SceneState::new(scene_settings(config)))
    }

    fn with_scene(config: &Config, scene: SceneState) -> Self {
        Self {
            running: false,
            time_format: config.time_format,
            color_theme: config.color_theme,
            scene_mode: config.scene,
            speed: config.animation_speed,
            show_date: config.show_date,
            show_help: config.show_help,
            clock: ClockSample::now(),
            clock_refresh: Interval::immediate(CLOCK_REFRESH_MS),
            clock_source: ClockSample::now,
            scene,
            started: Instant::now(),
        }
    }

    /// Run the application's main loop.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        terminal.draw(render_loading)?;

        self.running = true;
        while self.running {
            let elapsed_ms = self.started.elapsed().as_millis() as u64;
            terminal.draw(|frame| self.render(frame, elapsed_ms))?;
            self.handle_crossterm_events()?;
        }
        Ok(())
    }

    /// Renders the scene with the clock on top.
    fn render(&mut self, frame: &mut Frame, elapsed_ms: u64) {
        if self.clock_refresh.poll(elapsed_ms) {
            self.clock = (self.clock_source)();
        }

        self.scene.render(
            frame,
            self.scene_mode,
            elapsed_ms,
            self.clock.water_level(),
            self.speed,
        );
        self.render_overlay(frame);
    }

    fn render_overlay(&self, frame: &mut Frame) {
        let color = self.color_theme.color();
        let time_lines = render_time(&self.clock, self.time_format);
        let text_width = time_lines
            .first()
            .map_or(0, |l| l.chars().count())
            .max(rendered_width("00:00:00"));

        // Borders plus one column of padding on each side.
        let bubble_width = text_width as u16 + 4;
        let bubble_height = GLYPH_HEIGHT as u16 + 2;

        let chunks = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(bubble_height),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

        let [bubble] = Layout::horizontal([Constraint::Length(bubble_width)])
            .flex(Flex::Center)
            .areas(chunks[1]);

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::new().fg(color));
        let time_text: Vec<Line> = time_lines
            .into_iter()
            .map(|s| Line::from(s).style(Style::new().fg(color)))
            .collect();
        frame.render_widget(Clear, bubble);
        frame.render_widget(
            Paragraph::new(time_text)
                .alignment(Alignment::Center)
                .block(block),
            bubble,
        );

        if self.show_date {
            let date = Paragraph::new(self.clock.date_label())
                .style(Style::new().fg(color).bold())
                .alignment(Alignment::Center);
            frame.render_widget(date, chunks[3]);
        }

        if self.show_help {
            let help = Line::from(vec![
                "q".bold().fg(color),
                " quit  ".gray(),
                "t".bold().fg(color),
                " 12/24h  ".gray(),
                "c".bold().fg(color),
                " color  ".gray(),
                "v".bold().fg(color),
                format!(" scene ({})  ", self.scene_mode.label()).gray(),
                "s".bold().fg(color),
                format!(" speed ({})  ", self.speed.label()).gray(),
                "d".bold().fg(color),
                " date  ".gray(),
                "←→↑↓".bold().fg(color),
                " camera".gray(),
            ])
            .centered();
            frame.render_widget(help, chunks[5]);
        }
    }

    /// Reads the crossterm events and updates the state of [`App`].
    fn handle_crossterm_events(&mut self) -> color_eyre::Result<()> {
        if event::poll(Duration::from_millis(FRAME_POLL_MS))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
                Event::Resize(width, height) => debug!(width, height, "terminal resized"),
                _ => {}
            }
        }
        Ok(())
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            (_, KeyCode::Char('t')) => {
                self.time_format = self.time_format.toggle();
                debug!(format = ?self.time_format, "time format toggled");
            }
            (_, KeyCode::Char('c')) => {
                self.color_theme = self.color_theme.next();
                debug!(theme = ?self.color_theme, "color theme changed");
            }
            (_, KeyCode::Char('v')) => {
                self.scene_mode = self.scene_mode.toggle();
                info!(scene = self.scene_mode.label(), "scene switched");
            }
            (_, KeyCode::Char('s')) => {
                self.speed = self.speed.next();
                debug!(speed = self.speed.label(), "animation speed changed");
            }
            (_, KeyCode::Char('d')) => self.show_date = !self.show_date,
            (_, KeyCode::Left) => self.scene.camera_mut().orbit(-ORBIT_STEP),
            (_, KeyCode::Right) => self.scene.camera_mut().orbit(ORBIT_STEP),
            (_, KeyCode::Up) => self.scene.camera_mut().tilt(TILT_STEP),
            (_, KeyCode::Down) => self.scene.camera_mut().tilt(-TILT_STEP),
            _ => {}
        }
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        info!("quit requested");
        self.running = false;
    }
}

fn scene_settings(config: &Config) -> SceneSettings {
    SceneSettings {
        flat_drop_interval_ms: config.flat.drop_interval_ms,
        flat_splash_linger_ms: config.flat.splash_linger_ms,
        depth: DepthSettings {
            drop_interval_ms: config.depth.drop_interval_ms,
            splash_linger_ms: config.depth.splash_linger_ms,
            particles_per_splash: config.depth.particles_per_splash,
        },
    }
}

/// Placeholder frame shown until the first scene is drawn.
fn render_loading(frame: &mut Frame) {
    let [middle] = Layout::vertical([Constraint::Length(1)])
        .flex(Flex::Center)
        .areas(frame.area());
    frame.render_widget(
        Paragraph::new("Loading water clock...")
            .style(Style::new().cyan())
            .alignment(Alignment::Center),
        middle,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use ratatui::{Terminal, backend::TestBackend, buffer::Buffer};

    fn fixed_clock() -> ClockSample {
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let time = NaiveTime::from_hms_opt(12, 34, 56).unwrap();
        ClockSample::from_parts(date, &time)
    }

    fn app() -> App {
        let config = Config::default();
        let scene = SceneState::with_seed(scene_settings(&config), 3);
        let mut app = App::with_scene(&config, scene);
        app.clock_source = fixed_clock;
        app.running = true;
        app
    }

    fn press(app: &mut App, code: KeyCode) {
        app.on_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn rows(buffer: &Buffer) -> Vec<String> {
        let area = buffer.area;
        (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buffer[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect()
    }

    #[test]
    fn test_quit_keys() {
        for key in [
            KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE),
            KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE),
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        ] {
            let mut app = app();
            app.on_key_event(key);
            assert!(!app.running);
        }
    }

    #[test]
    fn test_toggle_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Char('t'));
        assert_eq!(app.time_format, TimeFormat::TwelveHour);
        press(&mut app, KeyCode::Char('c'));
        assert_eq!(app.color_theme, ColorTheme::default().next());
        press(&mut app, KeyCode::Char('v'));
        assert_eq!(app.scene_mode, SceneMode::Depth);
        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.speed, AnimationSpeed::Fast);
        press(&mut app, KeyCode::Char('d'));
        assert!(!app.show_date);
        assert!(app.running);
    }

    #[test]
    fn test_arrow_keys_move_camera() {
        let mut app = app();
        let before = *app.scene.depth().camera();
        press(&mut app, KeyCode::Right);
        assert!((app.scene.depth().camera().yaw - ORBIT_STEP).abs() < 1e-6);
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Down);
        assert!(app.scene.depth().camera().pitch() < before.pitch());
    }

    #[test]
    fn test_render_shows_date_and_help() {
        let mut app = app();
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| app.render(f, 0)).unwrap();

        let rows = rows(terminal.backend().buffer());
        assert!(rows.iter().any(|r| r.contains("Monday, October 19, 2026")));
        assert!(rows.iter().any(|r| r.contains("quit")));
        assert!(rows.iter().any(|r| r.contains('╭') && r.contains('╮')));
        assert_eq!(app.clock, fixed_clock());
    }

    #[test]
    fn test_render_hides_date_and_help() {
        let mut app = app();
        app.show_date = false;
        app.show_help = false;
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| app.render(f, 0)).unwrap();

        let rows = rows(terminal.backend().buffer());
        assert!(!rows.iter().any(|r| r.contains("October")));
        assert!(!rows.iter().any(|r| r.contains("quit")));
    }

    #[test]
    fn test_render_depth_scene() {
        let mut app = app();
        press(&mut app, KeyCode::Char('v'));
        let mut terminal = Terminal::new(TestBackend::new(100, 24)).unwrap();
        for t in 0..5 {
            terminal.draw(|f| app.render(f, t * 33)).unwrap();
        }
        let rows = rows(terminal.backend().buffer());
        assert!(rows.iter().any(|r| r.contains("depth")));
    }

    #[test]
    fn test_loading_screen() {
        let mut terminal = Terminal::new(TestBackend::new(40, 5)).unwrap();
        terminal.draw(render_loading).unwrap();
        let rows = rows(terminal.backend().buffer());
        assert!(rows[2].contains("Loading water clock..."));
    }

    #[test]
    fn test_scene_settings_from_config() {
        let config = Config::from_toml_str(
            "[flat]\ndrop_interval_ms = 500\n[depth]\nparticles_per_splash = 7\n",
        )
        .unwrap();
        let settings = scene_settings(&config);
        assert_eq!(settings.flat_drop_interval_ms, 500);
        assert_eq!(settings.flat_splash_linger_ms, 1000);
        assert_eq!(settings.depth.particles_per_splash, 7);
    }
}
