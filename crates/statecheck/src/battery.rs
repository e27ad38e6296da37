//! Detector batteries and the threshold vote.
//!
//! A battery fans its detectors out over the rayon pool, gathers one
//! [`Signal`] per detector, then counts true signals against its threshold.
//! Each detector produces its own result value; nothing is shared or
//! written in place, so evaluation order cannot influence the verdict.

use rayon::prelude::*;

use crate::config::EngineConfig;
use crate::detectors::{Detector, STATEFUL_DETECTORS, STATELESS_DETECTORS};
use crate::engine::SignalSink;
use crate::types::{BatteryReport, Hypothesis, Signal};

/// A named group of detectors supporting one hypothesis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Battery {
    hypothesis: Hypothesis,
    detectors: Vec<Detector>,
    threshold: usize,
}

impl Battery {
    pub fn new(hypothesis: Hypothesis, detectors: Vec<Detector>, threshold: usize) -> Self {
        Self {
            hypothesis,
            detectors,
            threshold,
        }
    }

    /// The seven session-state detectors.
    pub fn stateful(threshold: usize) -> Self {
        Self::new(Hypothesis::Stateful, STATEFUL_DETECTORS.to_vec(), threshold)
    }

    /// The three resource-oriented detectors.
    pub fn stateless(threshold: usize) -> Self {
        Self::new(Hypothesis::Stateless, STATELESS_DETECTORS.to_vec(), threshold)
    }

    pub fn hypothesis(&self) -> Hypothesis {
        self.hypothesis
    }

    pub fn detectors(&self) -> &[Detector] {
        &self.detectors
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Run every detector in parallel and reduce to a verdict.
    pub fn evaluate(
        &self,
        body: &str,
        config: &EngineConfig,
        sink: &dyn SignalSink,
    ) -> BatteryReport {
        let signals: Vec<Signal> = self
            .detectors
            .par_iter()
            .map(|detector| self.run_one(*detector, body, config, sink))
            .collect();

        self.reduce(signals, sink)
    }

    /// Run every detector on the calling thread, in declared order.
    pub fn evaluate_sequential(
        &self,
        body: &str,
        config: &EngineConfig,
        sink: &dyn SignalSink,
    ) -> BatteryReport {
        let signals: Vec<Signal> = self
            .detectors
            .iter()
            .map(|detector| self.run_one(*detector, body, config, sink))
            .collect();

        self.reduce(signals, sink)
    }

    fn run_one(
        &self,
        detector: Detector,
        body: &str,
        config: &EngineConfig,
        sink: &dyn SignalSink,
    ) -> Signal {
        let signal = Signal {
            detector: detector.name(),
            fired: detector.detect(body, config),
        };
        sink.on_signal(self.hypothesis, &signal);
        signal
    }

    fn reduce(&self, signals: Vec<Signal>, sink: &dyn SignalSink) -> BatteryReport {
        let count = signals.iter().filter(|s| s.fired).count();
        let report = BatteryReport {
            hypothesis: self.hypothesis,
            threshold: self.threshold,
            signals,
            count,
            verdict: count >= self.threshold,
        };
        sink.on_verdict(&report);
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::NullSink;

    const MIXED: &str = "Set-Cookie: a=1\n<input type=\"hidden\">\n<script>new WebSocket('x')</script>";

    #[test]
    fn test_stateful_threshold_vote() {
        let config = EngineConfig::default();
        let report = Battery::stateful(2).evaluate(MIXED, &config, &NullSink);
        assert_eq!(report.count, 3);
        assert!(report.verdict);
        assert_eq!(report.signals.len(), 7);
        assert_eq!(report.fired("set_cookie"), Some(true));
        assert_eq!(report.fired("ajax"), Some(false));

        let strict = Battery::stateful(4).evaluate(MIXED, &config, &NullSink);
        assert_eq!(strict.count, 3);
        assert!(!strict.verdict);
    }

    #[test]
    fn test_single_signal_below_threshold() {
        let report = Battery::stateful(2).evaluate(
            r#"<form method="DELETE"></form>"#,
            &EngineConfig::default(),
            &NullSink,
        );
        assert_eq!(report.count, 1);
        assert!(!report.verdict);
    }

    #[test]
    fn test_signals_keep_declared_order() {
        let report = Battery::stateless(1).evaluate("", &EngineConfig::default(), &NullSink);
        let names: Vec<&str> = report.signals.iter().map(|s| s.detector).collect();
        assert_eq!(names, vec!["restful_url", "query_param", "non_standard_method"]);
        assert_eq!(report.count, 0);
        assert!(!report.verdict);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let config = EngineConfig::default();
        let battery = Battery::stateful(2);
        assert_eq!(
            battery.evaluate(MIXED, &config, &NullSink),
            battery.evaluate_sequential(MIXED, &config, &NullSink)
        );
    }

    #[test]
    fn test_permuted_detectors_same_verdict() {
        let config = EngineConfig::default();
        let forward = Battery::stateful(2);
        let mut reversed_detectors = STATEFUL_DETECTORS.to_vec();
        reversed_detectors.reverse();
        let reversed = Battery::new(Hypothesis::Stateful, reversed_detectors, 2);

        let a = forward.evaluate(MIXED, &config, &NullSink);
        let b = reversed.evaluate(MIXED, &config, &NullSink);
        assert_eq!(a.count, b.count);
        assert_eq!(a.verdict, b.verdict);
    }
}
