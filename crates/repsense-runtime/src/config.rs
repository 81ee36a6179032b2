//! Runtime configuration
//!
//! JSON-loadable; every field falls back to its default when absent.

use std::fs;
use std::path::Path;

use repsense_core::{RepsenseError, RepsenseResult};
use repsense_detect::{PlankConfig, PushUpConfig};
use serde::{Deserialize, Serialize};

use crate::BodySide;

/// Exercise tracker configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Body side the landmarks are read from
    pub body_side: BodySide,
    /// Frames whose selected landmarks fall below this visibility are invalid
    pub min_visibility: f32,
    pub push_up: PushUpConfig,
    pub plank: PlankConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        RuntimeConfig {
            body_side: BodySide::Left,
            min_visibility: 0.0,
            push_up: PushUpConfig::default(),
            plank: PlankConfig::default(),
        }
    }
}

impl RuntimeConfig {
    pub fn from_json_str(json: &str) -> RepsenseResult<Self> {
        let config: RuntimeConfig =
            serde_json::from_str(json).map_err(|e| RepsenseError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> RepsenseResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn to_json_pretty(&self) -> RepsenseResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| RepsenseError::Config(e.to_string()))
    }

    pub fn validate(&self) -> RepsenseResult<()> {
        if !(0.0..=1.0).contains(&self.min_visibility) {
            return Err(RepsenseError::Config(format!(
                "min_visibility must be within [0, 1], got {}",
                self.min_visibility
            )));
        }
        self.push_up.validate()?;
        self.plank.validate()?;
        Ok(())
    }
}
