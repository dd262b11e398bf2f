//! Configuration for the clepsydra water clock.
//!
//! The config file is optional and read-only: a missing file yields the
//! defaults, and nothing chosen at runtime is ever written back.

mod error;

use std::fs;
use std::path::{Path, PathBuf};

use clepsydra_core::{AnimationSpeed, ColorTheme, SceneMode, TimeFormat};
use directories::ProjectDirs;
use serde::Deserialize;

pub use error::ConfigError;

/// Environment variable that overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "CLEPSYDRA_CONFIG";

const CONFIG_FILE_NAME: &str = "config.toml";
const LOG_FILE_NAME: &str = "clepsydra.log";
const MAX_PARTICLES_PER_SPLASH: usize = 200;

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub time_format: TimeFormat,
    pub color_theme: ColorTheme,
    pub scene: SceneMode,
    pub animation_speed: AnimationSpeed,
    pub show_date: bool,
    pub show_help: bool,
    pub flat: FlatConfig,
    pub depth: DepthConfig,
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            time_format: TimeFormat::default(),
            color_theme: ColorTheme::default(),
            scene: SceneMode::default(),
            animation_speed: AnimationSpeed::default(),
            show_date: true,
            show_help: true,
            flat: FlatConfig::default(),
            depth: DepthConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Timing of the side-on tank scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FlatConfig {
    /// Milliseconds between droplet spawns.
    pub drop_interval_ms: u64,
    /// Milliseconds a splashed droplet stays on screen.
    pub splash_linger_ms: u64,
}

impl Default for FlatConfig {
    fn default() -> Self {
        Self {
            drop_interval_ms: 2000,
            splash_linger_ms: 1000,
        }
    }
}

/// Timing and particle budget of the perspective pool scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DepthConfig {
    pub drop_interval_ms: u64,
    pub splash_linger_ms: u64,
    /// Particles created by each splash.
    pub particles_per_splash: usize,
}

impl Default for DepthConfig {
    fn default() -> Self {
        Self {
            drop_interval_ms: 3000,
            splash_linger_ms: 3000,
            particles_per_splash: 20,
        }
    }
}

/// File logging. The terminal belongs to the UI, so logs only go to a file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub enabled: bool,
    /// `tracing_subscriber::EnvFilter` directive, e.g. `info` or `clepsydra_scene=debug`.
    pub level: String,
    /// Log file path; defaults to the platform data directory.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            level: "info".to_string(),
            file: None,
        }
    }
}

impl LoggingConfig {
    /// The file logs are written to, if one can be determined.
    pub fn resolved_file(&self) -> Option<PathBuf> {
        self.file.clone().or_else(default_log_path)
    }
}

impl Config {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`. Returns `Ok(None)` when the file does not exist.
    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        Self::from_toml_str(&contents).map(Some)
    }

    /// Load from `$CLEPSYDRA_CONFIG` or the platform config directory.
    ///
    /// Returns the config together with the path it was read from, or
    /// `None` as the path when the defaults were used.
    pub fn load() -> Result<(Self, Option<PathBuf>), ConfigError> {
        let path = std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .or_else(default_config_path);

        let Some(path) = path else {
            return Ok((Self::default(), None));
        };

        match Self::load_from(&path)? {
            Some(config) => Ok((config, Some(path))),
            None => Ok((Self::default(), None)),
        }
    }

    /// Check value ranges that the schema cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let timings = [
            ("flat.drop_interval_ms", self.flat.drop_interval_ms),
            ("flat.splash_linger_ms", self.flat.splash_linger_ms),
            ("depth.drop_interval_ms", self.depth.drop_interval_ms),
            ("depth.splash_linger_ms", self.depth.splash_linger_ms),
        ];
        if let Some((key, _)) = timings.iter().find(|(_, ms)| *ms == 0) {
            return Err(ConfigError::Invalid(format!("{key} must be greater than 0")));
        }

        let particles = self.depth.particles_per_splash;
        if !(1..=MAX_PARTICLES_PER_SPLASH).contains(&particles) {
            return Err(ConfigError::Invalid(format!(
                "depth.particles_per_splash must be between 1 and {MAX_PARTICLES_PER_SPLASH}, got {particles}"
            )));
        }
        Ok(())
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "clepsydra")
}

/// Default config file location, e.g. `~/.config/clepsydra/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

/// Default log file location inside the platform data directory.
pub fn default_log_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_dir().join(LOG_FILE_NAME))
}
