/// Application configuration
use crate::error::{CliError, Result};
use cadence_control::ControllerConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file picked up from the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "cadence.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub controller: ControllerConfig,

    #[serde(default)]
    pub demo: DemoSettings,
}

/// Simulated track played by `cadence demo`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DemoSettings {
    #[serde(default = "default_track_duration_secs")]
    pub track_duration_secs: f64,

    /// Interval between simulated position updates
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,

    /// Reject play requests the way a browser autoplay policy would
    #[serde(default)]
    pub autoplay_blocked: bool,
}

impl Default for DemoSettings {
    fn default() -> Self {
        Self {
            track_duration_secs: default_track_duration_secs(),
            tick_ms: default_tick_ms(),
            autoplay_blocked: false,
        }
    }
}

fn default_track_duration_secs() -> f64 {
    245.0
}

fn default_tick_ms() -> u64 {
    250
}

impl AppConfig {
    /// Load configuration from a file and environment variables.
    ///
    /// An explicit `path` must exist; otherwise `cadence.toml` in the working
    /// directory is used when present. Variables such as
    /// `CADENCE_DEMO__TICK_MS` override file values.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Field names contain underscores, so nesting uses a double underscore
        settings = settings.add_source(
            config::Environment::with_prefix("CADENCE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: AppConfig = settings.build()?.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.controller.validate()?;

        let duration = self.demo.track_duration_secs;
        if !duration.is_finite() || duration <= 0.0 {
            return Err(CliError::InvalidConfig(format!(
                "demo.track_duration_secs must be a positive number, got {}",
                duration
            )));
        }

        if self.demo.tick_ms == 0 {
            return Err(CliError::InvalidConfig(
                "demo.tick_ms must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Effective configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| CliError::InvalidConfig(e.to_string()))
    }
}
