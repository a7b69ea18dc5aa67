//! Configuration loader for coderag.
//!
//! Reads `coderag.toml` and deserializes it into [`AppConfig`], then layers
//! `CODERAG_*` environment overrides on top. A missing file means defaults;
//! a malformed one is an error so typos are not silently ignored.

use std::path::{Path, PathBuf};

use coderag_types::config::AppConfig;
use coderag_types::error::ConfigError;

/// Default config file name, resolved against the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "coderag.toml";

/// Load configuration from `path`.
///
/// - If the file does not exist, returns [`AppConfig::default()`].
/// - If it cannot be read or parsed, returns a [`ConfigError`].
pub async fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(AppConfig::default());
        }
        Err(err) => {
            return Err(ConfigError::Read {
                path: path.display().to_string(),
                message: err.to_string(),
            });
        }
    };

    let config = toml::from_str::<AppConfig>(&content).map_err(|err| ConfigError::Parse {
        path: path.display().to_string(),
        message: err.to_string(),
    })?;
    tracing::debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// Apply `CODERAG_*` overrides from `lookup` (normally `std::env::var`).
///
/// Recognised keys: `CODERAG_MODEL`, `CODERAG_BASE_URL`, `CODERAG_TOP_K`,
/// `CODERAG_THRESHOLD`, `CODERAG_OUTPUT_DIR`. Empty values are ignored.
pub fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(model) = get("CODERAG_MODEL") {
        config.provider.model = model;
    }
    if let Some(url) = get("CODERAG_BASE_URL") {
        config.provider.base_url = Some(url);
    }
    if let Some(raw) = get("CODERAG_TOP_K") {
        config.retrieval.top_k = parse_value("CODERAG_TOP_K", &raw)?;
    }
    if let Some(raw) = get("CODERAG_THRESHOLD") {
        config.retrieval.threshold = Some(parse_value("CODERAG_THRESHOLD", &raw)?);
    }
    if let Some(dir) = get("CODERAG_OUTPUT_DIR") {
        config.runs.output_dir = PathBuf::from(dir);
    }
    Ok(())
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        key: key.to_string(),
        message: e.to_string(),
    })
}
