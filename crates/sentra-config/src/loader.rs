//! Config file loading.
//!
//! The governance subsystem consumes a single config source per workspace
//! open — no layered merging here. The hosting runtime decides which file
//! wins and hands the path down.

use std::path::Path;

use tracing::debug;

use crate::error::{ConfigError, ConfigResult};
use crate::types::Config;

/// Load configuration from a single TOML file.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the file cannot be read or parsed.
pub fn load_file(path: &Path) -> ConfigResult<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    let config = parse(&content, path)?;
    debug!(path = %path.display(), "Loaded governance config");
    Ok(config)
}

/// Load configuration from a TOML file, falling back to defaults when the
/// file does not exist.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the file exists but cannot be read or parsed.
pub fn load_file_or_default(path: &Path) -> ConfigResult<Config> {
    match std::fs::read_to_string(path) {
        Ok(content) => parse(&content, path),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "No config file, using defaults");
            Ok(Config::default())
        },
        Err(e) => Err(ConfigError::ReadError {
            path: path.display().to_string(),
            source: e,
        }),
    }
}

fn parse(content: &str, path: &Path) -> ConfigResult<Config> {
    toml::from_str(content).map_err(|e| ConfigError::ParseError {
        path: path.display().to_string(),
        source: e,
    })
}
