//! Core types shared across the clepsydra crates.
//!
//! Holds the time-of-day to water-level mapping, the interval timer that
//! drives clock refreshes and droplet spawning, and the small value types
//! (time format, colour theme, scene mode, animation speed) selected from
//! the keyboard or the config file.

mod interval;
mod time;
mod types;

pub use interval::Interval;
pub use time::{
    ClockSample, SECONDS_PER_DAY, format_time, seconds_into_day, water_level_fraction,
    water_level_percent,
};
pub use types::{AnimationSpeed, ColorTheme, SceneMode, TimeFormat};
