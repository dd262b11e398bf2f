//! File logging setup.
//!
//! The terminal belongs to the UI, so events only ever go to a file.

use std::{
    fs::{self, OpenOptions},
    path::PathBuf,
    sync::Mutex,
};

use clepsydra_config::LoggingConfig;
use color_eyre::eyre::eyre;
use tracing_subscriber::EnvFilter;

/// Environment variable holding an `EnvFilter` directive.
pub const LOG_ENV: &str = "CLEPSYDRA_LOG";

/// Filter directive to log with, or `None` when logging is off.
///
/// A non-empty `CLEPSYDRA_LOG` both enables logging and overrides the
/// configured level.
fn directive(config: &LoggingConfig, env: Option<String>) -> Option<String> {
    match env {
        Some(d) if !d.trim().is_empty() => Some(d),
        _ if config.enabled => Some(config.level.clone()),
        _ => None,
    }
}

/// Install the global subscriber. Returns the log file when logging is on.
pub fn init(config: &LoggingConfig) -> color_eyre::Result<Option<PathBuf>> {
    let Some(directive) = directive(config, std::env::var(LOG_ENV).ok()) else {
        return Ok(None);
    };
    let Some(path) = config.resolved_file() else {
        return Ok(None);
    };

    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&directive)?)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| eyre!(e))?;

    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_without_env() {
        assert_eq!(directive(&LoggingConfig::default(), None), None);
    }

    #[test]
    fn test_config_enables_with_its_level() {
        let config = LoggingConfig {
            enabled: true,
            level: "debug".to_string(),
            file: None,
        };
        assert_eq!(directive(&config, None).as_deref(), Some("debug"));
    }

    #[test]
    fn test_env_overrides_and_enables() {
        let config = LoggingConfig::default();
        assert_eq!(
            directive(&config, Some("clepsydra_scene=trace".to_string())).as_deref(),
            Some("clepsydra_scene=trace")
        );
        assert_eq!(directive(&config, Some("  ".to_string())), None);
    }
}
