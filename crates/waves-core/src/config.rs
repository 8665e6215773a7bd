//! Player configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::ingest::IngestPolicy;

/// Tunables for a player session.
///
/// Every field has a default, so an empty JSON object is a valid config.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct PlayerConfig {
    /// Which media types the picker accepts.
    pub policy: IngestPolicy,
    /// Volume applied to the media element when the session starts.
    pub initial_volume: f64,
    /// Analyser smoothing time constant (Web Audio default is 0.8).
    pub smoothing: f64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            policy: IngestPolicy::AudioOnly,
            initial_volume: 0.7,
            smoothing: 0.8,
        }
    }
}

impl PlayerConfig {
    /// Parse and validate a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and a range error
    /// when a value falls outside `0.0..=1.0`.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns the first field found outside `0.0..=1.0`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.initial_volume) {
            return Err(ConfigError::Volume(self.initial_volume));
        }
        if !(0.0..=1.0).contains(&self.smoothing) {
            return Err(ConfigError::Smoothing(self.smoothing));
        }
        Ok(())
    }
}
