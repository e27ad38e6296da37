//! Configuration loading and resolution.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use statecheck::EngineConfig;

/// Environment variable naming a config file.
pub const CONFIG_ENV: &str = "STATECHECK_CONFIG";

/// Config file picked up from the working directory when nothing else is given.
pub const LOCAL_CONFIG_FILE: &str = ".statecheck.json";

/// Per-field overrides taken from command-line flags.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub stateful_threshold: Option<usize>,
    pub stateless_threshold: Option<usize>,
    pub case_sensitive: bool,
}

/// Resolve the config file path: explicit flag > env var > local file.
pub fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    resolve_config_path_from(explicit, std::env::var(CONFIG_ENV).ok(), &cwd)
}

fn resolve_config_path_from(
    explicit: Option<&str>,
    env_path: Option<String>,
    cwd: &Path,
) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(PathBuf::from(path));
    }

    if let Some(path) = env_path.filter(|p| !p.is_empty()) {
        return Some(PathBuf::from(path));
    }

    let local = cwd.join(LOCAL_CONFIG_FILE);
    if local.exists() {
        return Some(local);
    }

    None
}

/// Load the engine config from `path` (or defaults), then apply overrides.
pub fn load_engine_config(path: Option<&Path>, overrides: &ConfigOverrides) -> Result<EngineConfig> {
    let mut config = match path {
        Some(path) => {
            tracing::info!("Loading config from {}", path.display());
            EngineConfig::from_file(path)
                .with_context(|| format!("failed to load config {}", path.display()))?
        }
        None => EngineConfig::default(),
    };

    if let Some(threshold) = overrides.stateful_threshold {
        config.stateful_threshold = threshold;
    }
    if let Some(threshold) = overrides.stateless_threshold {
        config.stateless_threshold = threshold;
    }
    if overrides.case_sensitive {
        config.case_insensitive_keywords = false;
    }

    config.validate().context("invalid engine configuration")?;
    Ok(config)
}
