//! Engine configuration: vote thresholds and keyword matching mode.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::detectors::{STATEFUL_DETECTORS, STATELESS_DETECTORS};
use crate::types::{Result, StatecheckError};

/// Default minimum number of stateful signals for a stateful verdict.
pub const DEFAULT_STATEFUL_THRESHOLD: usize = 2;

/// Default minimum number of stateless signals for a stateless verdict.
pub const DEFAULT_STATELESS_THRESHOLD: usize = 1;

/// Tunables for the classification engine.
///
/// Every field has a default, so a config file only needs to name what it
/// changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub stateful_threshold: usize,
    pub stateless_threshold: usize,
    /// Match `xmlhttprequest`, `websocket` and `document.cookie` inside
    /// scripts regardless of case. The `Set-Cookie` marker is always
    /// matched literally.
    pub case_insensitive_keywords: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            stateful_threshold: DEFAULT_STATEFUL_THRESHOLD,
            stateless_threshold: DEFAULT_STATELESS_THRESHOLD,
            case_insensitive_keywords: true,
        }
    }
}

impl EngineConfig {
    /// Parse a config from JSON text and validate it.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a JSON config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&text)
    }

    /// Reject thresholds that would make a battery vacuously true.
    ///
    /// A threshold larger than its battery is accepted but can never be met.
    pub fn validate(&self) -> Result<()> {
        if self.stateful_threshold == 0 {
            return Err(StatecheckError::InvalidConfig(
                "stateful_threshold must be at least 1".into(),
            ));
        }
        if self.stateless_threshold == 0 {
            return Err(StatecheckError::InvalidConfig(
                "stateless_threshold must be at least 1".into(),
            ));
        }

        if self.stateful_threshold > STATEFUL_DETECTORS.len() {
            tracing::warn!(
                "stateful_threshold {} exceeds the {} stateful detectors; pages can never classify as stateful",
                self.stateful_threshold,
                STATEFUL_DETECTORS.len()
            );
        }
        if self.stateless_threshold > STATELESS_DETECTORS.len() {
            tracing::warn!(
                "stateless_threshold {} exceeds the {} stateless detectors; pages can never classify as stateless",
                self.stateless_threshold,
                STATELESS_DETECTORS.len()
            );
        }

        Ok(())
    }
}
