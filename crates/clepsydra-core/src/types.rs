//! Display options chosen from the keyboard or the config file.

use ratatui::style::Color;
use serde::Deserialize;

/// Time format for the clock overlay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum TimeFormat {
    #[default]
    #[serde(rename = "24h")]
    TwentyFourHour,
    #[serde(rename = "12h")]
    TwelveHour,
}

impl TimeFormat {
    /// Toggle between 12-hour and 24-hour format.
    pub fn toggle(&self) -> Self {
        match self {
            TimeFormat::TwentyFourHour => TimeFormat::TwelveHour,
            TimeFormat::TwelveHour => TimeFormat::TwentyFourHour,
        }
    }
}

/// Color theme for the clock overlay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorTheme {
    #[default]
    Cyan,
    Green,
    White,
    Magenta,
    Yellow,
    Red,
    Blue,
}

impl ColorTheme {
    /// Cycle to the next color theme.
    pub fn next(&self) -> Self {
        match self {
            ColorTheme::Cyan => ColorTheme::Green,
            ColorTheme::Green => ColorTheme::Magenta,
            ColorTheme::Magenta => ColorTheme::Yellow,
            ColorTheme::Yellow => ColorTheme::Red,
            ColorTheme::Red => ColorTheme::Blue,
            ColorTheme::Blue => ColorTheme::White,
            ColorTheme::White => ColorTheme::Cyan,
        }
    }

    /// Convert theme to a ratatui color.
    pub fn color(self) -> Color {
        match self {
            ColorTheme::Cyan => Color::Cyan,
            ColorTheme::Green => Color::Green,
            ColorTheme::White => Color::White,
            ColorTheme::Magenta => Color::Magenta,
            ColorTheme::Yellow => Color::Yellow,
            ColorTheme::Red => Color::Red,
            ColorTheme::Blue => Color::Blue,
        }
    }
}

/// Which rendition of the water clock fills the screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SceneMode {
    /// Side-on tank: the water fills the screen from the bottom up.
    #[default]
    Flat,
    /// Perspective view of a pool whose surface rises with the day.
    Depth,
}

impl SceneMode {
    pub fn toggle(&self) -> Self {
        match self {
            SceneMode::Flat => SceneMode::Depth,
            SceneMode::Depth => SceneMode::Flat,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SceneMode::Flat => "flat",
            SceneMode::Depth => "depth",
        }
    }
}

/// Global animation speed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnimationSpeed {
    Slow,
    #[default]
    Medium,
    Fast,
}

impl AnimationSpeed {
    /// Cycle to the next speed.
    pub fn next(&self) -> Self {
        match self {
            AnimationSpeed::Slow => AnimationSpeed::Medium,
            AnimationSpeed::Medium => AnimationSpeed::Fast,
            AnimationSpeed::Fast => AnimationSpeed::Slow,
        }
    }

    /// Multiplier applied to elapsed time before it reaches the simulation.
    pub fn time_scale(&self) -> f32 {
        match self {
            AnimationSpeed::Slow => 0.5,
            AnimationSpeed::Medium => 1.0,
            AnimationSpeed::Fast => 2.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AnimationSpeed::Slow => "slow",
            AnimationSpeed::Medium => "medium",
            AnimationSpeed::Fast => "fast",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_cycle_returns_to_start() {
        let mut theme = ColorTheme::default();
        for _ in 0..7 {
            theme = theme.next();
        }
        assert_eq!(theme, ColorTheme::Cyan);
    }

    #[test]
    fn test_toggles_are_involutions() {
        let format = TimeFormat::default();
        assert_eq!(format.toggle().toggle(), format);
        let mode = SceneMode::default();
        assert_eq!(mode.toggle(), SceneMode::Depth);
        assert_eq!(mode.toggle().toggle(), mode);
    }

    #[test]
    fn test_speed_scales() {
        assert_eq!(AnimationSpeed::default().time_scale(), 1.0);
        assert!(AnimationSpeed::Slow.time_scale() < AnimationSpeed::Fast.time_scale());
        assert_eq!(AnimationSpeed::Fast.next(), AnimationSpeed::Slow);
    }
}
