//! Controller configuration

use crate::error::{ControlError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timing and step configuration for a player session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Debounce window for intermediate seek-drag commits (default: 100)
    pub seek_debounce_ms: u64,

    /// Grace delay before resuming playback after a seek (default: 100)
    pub seek_resume_delay_ms: u64,

    /// Debounce window for repeated skip activations (default: 100)
    pub skip_debounce_ms: u64,

    /// Grace delay before resuming playback after a skip (default: 50)
    pub skip_resume_delay_ms: u64,

    /// Seconds moved by the skip-back button (default: 10)
    pub skip_back_secs: f64,

    /// Seconds moved by the skip-forward button (default: 30)
    pub skip_forward_secs: f64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            seek_debounce_ms: 100,
            seek_resume_delay_ms: 100,
            skip_debounce_ms: 100,
            skip_resume_delay_ms: 50,
            skip_back_secs: 10.0,
            skip_forward_secs: 30.0,
        }
    }
}

impl ControllerConfig {
    pub fn seek_debounce(&self) -> Duration {
        Duration::from_millis(self.seek_debounce_ms)
    }

    pub fn seek_resume_delay(&self) -> Duration {
        Duration::from_millis(self.seek_resume_delay_ms)
    }

    pub fn skip_debounce(&self) -> Duration {
        Duration::from_millis(self.skip_debounce_ms)
    }

    pub fn skip_resume_delay(&self) -> Duration {
        Duration::from_millis(self.skip_resume_delay_ms)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        for (name, secs) in [
            ("skip_back_secs", self.skip_back_secs),
            ("skip_forward_secs", self.skip_forward_secs),
        ] {
            if !secs.is_finite() || secs <= 0.0 {
                return Err(ControlError::InvalidConfig(format!(
                    "{} must be a positive number of seconds, got {}",
                    name, secs
                )));
            }
        }

        Ok(())
    }
}
