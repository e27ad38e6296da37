//! Statecheck decides whether a web page relies on server-side session
//! state, on self-describing resource-oriented requests, or neither.
//!
//! The engine runs two batteries of static text detectors over an already
//! fetched document and combines their threshold votes into a
//! [`Classification`].

pub mod battery;
pub mod config;
pub mod detectors;
pub mod engine;
pub mod types;

pub use battery::Battery;
pub use config::EngineConfig;
pub use detectors::{Detector, STATEFUL_DETECTORS, STATELESS_DETECTORS};
pub use engine::{classify, combine, Engine, NullSink, SignalSink, TracingSink};
pub use types::*;
