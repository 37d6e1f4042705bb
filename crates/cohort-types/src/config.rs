//! Configuration types for the Cohort engine.

use serde::{Deserialize, Serialize};

use crate::{CohortError, Result, constants};

/// Which blocked callers the gate wakes when a command departs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WakePolicy {
    /// Wake every waiter; mismatched kinds re-check and keep waiting.
    #[default]
    All,
    /// Wake a single waiter. Eligible waiters of the woken caller's kind
    /// are released in turn when it is admitted.
    One,
}

/// Engine-wide configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Departure wake-up policy of the admission gate.
    pub wake_policy: WakePolicy,
    /// Maximum instrument token length accepted by the decoding layer.
    pub max_instrument_len: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            wake_policy: WakePolicy::All,
            max_instrument_len: constants::DEFAULT_MAX_INSTRUMENT_LEN,
        }
    }
}

impl EngineConfig {
    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_instrument_len == 0 {
            return Err(CohortError::Configuration(
                "max_instrument_len must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
