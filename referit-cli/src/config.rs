//! Resolver configuration for the CLI.
//!
//! Layers, lowest precedence first:
//! - built-in defaults
//! - `--config <file.json>` (a serialized `ResolverConfig`)
//! - `REFERIT_TOLERANCE`
//! - `--tolerance`

use referit_scene::{Error, ResolverConfig, Result};
use std::path::Path;

/// Environment variable overriding the tie tolerance
pub const TOLERANCE_ENV: &str = "REFERIT_TOLERANCE";

/// Environment variable holding a tracing filter directive
pub const LOG_ENV: &str = "REFERIT_LOG";

/// Read a `ResolverConfig` from a JSON file
pub fn load_file(path: &Path) -> Result<ResolverConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::from(e)
            .with_operation("config::load_file")
            .with_context("path", path.display().to_string())
    })?;
    serde_json::from_str(&content).map_err(|e| {
        Error::from(e)
            .with_operation("config::load_file")
            .with_context("path", path.display().to_string())
    })
}

/// Merge the configuration layers and validate the result
pub fn layered(
    file: Option<ResolverConfig>,
    env_tolerance: Option<&str>,
    flag_tolerance: Option<f64>,
) -> Result<ResolverConfig> {
    let mut config = file.unwrap_or_default();

    if let Some(raw) = env_tolerance {
        config.tolerance = raw.trim().parse().map_err(|_| {
            Error::config_invalid(format!("{} is not a number: '{}'", TOLERANCE_ENV, raw))
                .with_operation("config::layered")
        })?;
    }
    if let Some(tolerance) = flag_tolerance {
        config.tolerance = tolerance;
    }

    config.validate()?;
    Ok(config)
}

/// Resolve the effective configuration from the process environment
pub fn from_env(config_path: Option<&Path>, flag_tolerance: Option<f64>) -> Result<ResolverConfig> {
    let file = config_path.map(load_file).transpose()?;
    let env = std::env::var(TOLERANCE_ENV).ok();
    let config = layered(file, env.as_deref(), flag_tolerance)?;
    tracing::debug!(tolerance = config.tolerance, "resolver configuration");
    Ok(config)
}
