//! Scheduler engine configuration.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Configuration for a scheduler and its tempo map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub sample_rate: f64,
    pub bpm: f64,
    /// Pending events reserved up front so the audio thread rarely allocates.
    pub event_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44100.0,
            bpm: 120.0,
            event_capacity: 256,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        if !(8000.0..=384000.0).contains(&self.sample_rate) {
            return Err(Error::InvalidSampleRate(self.sample_rate));
        }
        if !self.bpm.is_finite() || self.bpm <= 0.0 {
            return Err(Error::InvalidTempo(self.bpm));
        }
        if self.event_capacity == 0 {
            return Err(Error::InvalidConfig(
                "event_capacity must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
