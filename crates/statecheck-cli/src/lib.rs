//! Statecheck CLI: fetch one page and report whether it is stateful.

pub mod check;
pub mod config;
pub mod fetch;
pub mod output;

pub use check::{run, CheckOptions, Input};
pub use config::{load_engine_config, resolve_config_path, ConfigOverrides};
pub use fetch::{FetchError, FetchedPage, Fetcher};
