//! Classification engine: runs both batteries and combines their verdicts.
//!
//! The engine holds only immutable configuration, so one instance can be
//! shared freely across threads and each call is independent of every other.
//! Observability is injected per call through a [`SignalSink`] instead of a
//! process-wide logger.

use crate::battery::Battery;
use crate::config::EngineConfig;
use crate::types::{Analysis, BatteryReport, Classification, Hypothesis, Signal};

/// Receives detector results as they are produced.
///
/// Calls may arrive concurrently from several worker threads and in any
/// order; `on_verdict` for a battery always follows all of that battery's
/// `on_signal` calls.
pub trait SignalSink: Send + Sync {
    fn on_signal(&self, _hypothesis: Hypothesis, _signal: &Signal) {}

    fn on_verdict(&self, _report: &BatteryReport) {}
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl SignalSink for NullSink {}

/// Emits each signal and verdict as a `tracing` debug event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl SignalSink for TracingSink {
    fn on_signal(&self, hypothesis: Hypothesis, signal: &Signal) {
        tracing::debug!(
            battery = hypothesis.as_str(),
            detector = signal.detector,
            fired = signal.fired,
            "detector evaluated"
        );
    }

    fn on_verdict(&self, report: &BatteryReport) {
        tracing::debug!(
            battery = report.hypothesis.as_str(),
            count = report.count,
            threshold = report.threshold,
            verdict = report.verdict,
            "{} checks: {}",
            report.hypothesis,
            report.count
        );
    }
}

/// Stateful/stateless page classifier.
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    stateful: Battery,
    stateless: Battery,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        let stateful = Battery::stateful(config.stateful_threshold);
        let stateless = Battery::stateless(config.stateless_threshold);
        Self {
            config,
            stateful,
            stateless,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Classify a document body.
    pub fn classify(&self, body: &str) -> Classification {
        self.analyze(body).classification
    }

    /// Classify a document body and keep every signal for inspection.
    pub fn analyze(&self, body: &str) -> Analysis {
        self.analyze_with(body, &NullSink)
    }

    /// Like [`Engine::analyze`], reporting each signal and verdict to `sink`.
    ///
    /// Both batteries run concurrently; the combinator waits for both.
    pub fn analyze_with(&self, body: &str, sink: &dyn SignalSink) -> Analysis {
        let (stateful, stateless) = rayon::join(
            || self.stateful.evaluate(body, &self.config, sink),
            || self.stateless.evaluate(body, &self.config, sink),
        );

        Analysis {
            classification: combine(stateful.verdict, stateless.verdict),
            stateful,
            stateless,
        }
    }
}

/// Fixed priority: a stateful verdict wins over a stateless one.
pub fn combine(stateful: bool, stateless: bool) -> Classification {
    if stateful {
        Classification::Stateful
    } else if stateless {
        Classification::Stateless
    } else {
        Classification::Undetermined
    }
}

/// Classify with the default configuration.
pub fn classify(body: &str) -> Classification {
    Engine::default().classify(body)
}
