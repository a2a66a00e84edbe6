use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Timing and bookkeeping knobs shared by a running tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Default auto-repeat for bound keys; 0 disables it.
    pub repeat_interval_ms: u64,
    pub letter_debounce_ms: u64,
    pub dialog_delay_ms: u64,
    pub startup_delay_ms: u64,
    pub activation_delay_ms: u64,
    pub history_limit: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            repeat_interval_ms: 0,
            letter_debounce_ms: 600,
            dialog_delay_ms: 300,
            startup_delay_ms: 250,
            activation_delay_ms: 250,
            history_limit: 200,
        }
    }
}

impl RuntimeConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn repeat_interval(&self) -> Duration {
        Duration::from_millis(self.repeat_interval_ms)
    }

    pub fn letter_debounce(&self) -> Duration {
        Duration::from_millis(self.letter_debounce_ms)
    }

    pub fn dialog_delay(&self) -> Duration {
        Duration::from_millis(self.dialog_delay_ms)
    }

    pub fn startup_delay(&self) -> Duration {
        Duration::from_millis(self.startup_delay_ms)
    }

    pub fn activation_delay(&self) -> Duration {
        Duration::from_millis(self.activation_delay_ms)
    }
}
