//! Configuration management for the chartgen CLI.
//!
//! Settings are layered, highest priority first:
//! 1. Command-line flags
//! 2. Environment variables
//! 3. Config file (`~/.chartgen/config.toml`)
//! 4. Default values

mod schema;

pub use schema::{ChartgenConfig, ConfigIssue, IssueLevel, ProviderConfig, RenderConfig};

use std::path::{Path, PathBuf};

use tracing::{debug, info};

/// Error type for configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
    /// TOML serialization error.
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    /// Invalid value.
    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Get the default config directory path.
#[must_use]
pub fn default_config_dir() -> PathBuf {
    dirs_next::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".chartgen")
}

/// Get the default config file path.
#[must_use]
pub fn config_path() -> PathBuf {
    default_config_dir().join("config.toml")
}

/// Load configuration from `path`, falling back to defaults when it is absent.
///
/// # Errors
///
/// Fails when the file cannot be read or parsed, or when validation reports
/// an error-level issue.
pub async fn load_config_from(path: &Path) -> ConfigResult<ChartgenConfig> {
    let config = if tokio::fs::try_exists(path).await? {
        let content = tokio::fs::read_to_string(path).await?;
        let config: ChartgenConfig = toml::from_str(&content)?;
        debug!(path = %path.display(), "loaded config file");
        config
    } else {
        debug!(path = %path.display(), "config file not found, using defaults");
        ChartgenConfig::default()
    };

    let mut errors = Vec::new();
    for issue in config.validate() {
        match issue.level {
            IssueLevel::Warning => tracing::warn!("{issue}"),
            IssueLevel::Error => errors.push(issue.to_string()),
        }
    }
    if !errors.is_empty() {
        return Err(ConfigError::InvalidValue(errors.join("; ")));
    }

    Ok(config)
}

/// Save configuration to `path`, creating parent directories.
///
/// # Errors
///
/// Fails when the file cannot be serialized or written.
pub async fn save_config_to(config: &ChartgenConfig, path: &Path) -> ConfigResult<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let content = toml::to_string_pretty(config)?;
    tokio::fs::write(path, content).await?;
    info!(path = %path.display(), "saved config file");

    Ok(())
}

/// Write a default config file to `path` unless one exists and `force` is unset.
///
/// Returns `true` when a file was written.
///
/// # Errors
///
/// Fails when the file cannot be written.
pub async fn init_config(path: &Path, force: bool) -> ConfigResult<bool> {
    if !force && tokio::fs::try_exists(path).await? {
        return Ok(false);
    }
    save_config_to(&ChartgenConfig::default(), path).await?;
    Ok(true)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("chartgen-cli-test-{}-{name}", std::process::id()))
            .join("config.toml")
    }

    #[test]
    fn test_default_paths() {
        let cfg_dir = default_config_dir();
        assert!(cfg_dir.ends_with(".chartgen"));

        let cfg_path = config_path();
        assert!(cfg_path.ends_with("config.toml"));
    }

    #[tokio::test]
    async fn missing_file_yields_defaults() {
        let config = load_config_from(&scratch("missing")).await.unwrap();
        assert_eq!(config, ChartgenConfig::default());
    }

    #[tokio::test]
    async fn init_then_load() {
        let path = scratch("init");

        assert!(init_config(&path, false).await.unwrap());
        assert!(!init_config(&path, false).await.unwrap());
        assert!(init_config(&path, true).await.unwrap());

        let config = load_config_from(&path).await.unwrap();
        assert_eq!(config, ChartgenConfig::default());

        if let Some(dir) = path.parent() {
            tokio::fs::remove_dir_all(dir).await.unwrap();
        }
    }

    #[tokio::test]
    async fn invalid_values_are_rejected() {
        let path = scratch("invalid");
        tokio::fs::create_dir_all(path.parent().unwrap()).await.unwrap();
        tokio::fs::write(&path, "[render]\nwidth = 0\n").await.unwrap();

        let err = load_config_from(&path).await.unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_)));

        if let Some(dir) = path.parent() {
            tokio::fs::remove_dir_all(dir).await.unwrap();
        }
    }
}
