//! Core data types for page classification.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Final three-way label for a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// The page relies on server-side session state.
    Stateful,
    /// The page relies on self-describing, resource-oriented requests.
    Stateless,
    /// Neither battery reached its threshold.
    Undetermined,
}

impl Classification {
    /// Machine-readable name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Stateful => "stateful",
            Classification::Stateless => "stateless",
            Classification::Undetermined => "undetermined",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Classification::Stateful => "Stateful",
            Classification::Stateless => "Stateless",
            Classification::Undetermined => "Undetermined",
        };
        f.write_str(label)
    }
}

impl FromStr for Classification {
    type Err = StatecheckError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stateful" => Ok(Classification::Stateful),
            "stateless" => Ok(Classification::Stateless),
            "undetermined" => Ok(Classification::Undetermined),
            other => Err(StatecheckError::InvalidInput(format!(
                "unknown classification '{other}'"
            ))),
        }
    }
}

/// The hypothesis a battery of detectors argues for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Hypothesis {
    Stateful,
    Stateless,
}

impl Hypothesis {
    pub fn as_str(&self) -> &'static str {
        match self {
            Hypothesis::Stateful => "stateful",
            Hypothesis::Stateless => "stateless",
        }
    }
}

impl fmt::Display for Hypothesis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of a single detector run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Signal {
    /// Stable detector name.
    pub detector: &'static str,
    pub fired: bool,
}

/// Per-battery diagnostics: every signal, the true count, and the verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatteryReport {
    pub hypothesis: Hypothesis,
    pub threshold: usize,
    /// Signals in the battery's declared detector order.
    pub signals: Vec<Signal>,
    pub count: usize,
    pub verdict: bool,
}

impl BatteryReport {
    /// Look up a detector's signal by name.
    pub fn fired(&self, detector: &str) -> Option<bool> {
        self.signals
            .iter()
            .find(|s| s.detector == detector)
            .map(|s| s.fired)
    }
}

/// Full result of analyzing one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Analysis {
    pub classification: Classification,
    pub stateful: BatteryReport,
    pub stateless: BatteryReport,
}

/// Errors raised while loading or validating engine configuration.
///
/// Classification itself never fails.
#[derive(thiserror::Error, Debug)]
pub enum StatecheckError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, StatecheckError>;
