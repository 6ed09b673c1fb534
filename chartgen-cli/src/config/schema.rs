//! Configuration schema definitions.

use std::path::PathBuf;

use chartgen::llms::{LlmError, OpenAIConfig};
use serde::{Deserialize, Serialize};

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChartgenConfig {
    /// Generation endpoint settings.
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Output settings.
    #[serde(default)]
    pub render: RenderConfig,
}

/// Generation endpoint settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    /// Base URL of an OpenAI-compatible API; `OPENAI_BASE_URL` wins when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Model name; `OPENAI_MODEL` wins when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Sampling temperature.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            model: None,
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
            temperature: None,
        }
    }
}

fn default_api_key_env() -> String {
    OpenAIConfig::DEFAULT_API_KEY_ENV.to_owned()
}

const fn default_timeout_secs() -> u64 {
    60
}

impl ProviderConfig {
    /// Resolve the client configuration.
    ///
    /// Precedence: `model_flag`, then environment, then this file section,
    /// then built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Auth`] when the API key variable is unset or blank.
    pub fn resolve(&self, model_flag: Option<&str>) -> Result<OpenAIConfig, LlmError> {
        let mut config = OpenAIConfig::from_env_with_key(&self.api_key_env)?
            .with_timeout(self.timeout_secs);

        if std::env::var_os("OPENAI_BASE_URL").is_none()
            && let Some(url) = &self.base_url
        {
            config = config.with_base_url(url);
        }
        if std::env::var_os("OPENAI_MODEL").is_none()
            && let Some(model) = &self.model
        {
            config = config.with_model(model);
        }
        if let Some(model) = model_flag {
            config = config.with_model(model);
        }
        Ok(config)
    }
}

/// Output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RenderConfig {
    /// Canvas width in pixels.
    #[serde(default = "default_width")]
    pub width: u32,

    /// Canvas height in pixels.
    #[serde(default = "default_height")]
    pub height: u32,

    /// SVG file written when no `--output` is given.
    #[serde(default = "default_output")]
    pub output: PathBuf,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            output: default_output(),
        }
    }
}

const fn default_width() -> u32 {
    800
}

const fn default_height() -> u32 {
    450
}

fn default_output() -> PathBuf {
    PathBuf::from("chart.svg")
}

impl ChartgenConfig {
    /// Validate the configuration and return any issues found.
    #[must_use]
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if self.provider.api_key_env.trim().is_empty() {
            issues.push(ConfigIssue::error(
                "provider.api_key_env",
                "API key variable name must not be empty",
            ));
        }

        if self.provider.timeout_secs == 0 {
            issues.push(ConfigIssue::warning(
                "provider.timeout_secs",
                "Timeout is 0, requests will time out immediately",
            ));
        }

        if let Some(temperature) = self.provider.temperature
            && !(0.0..=2.0).contains(&temperature)
        {
            issues.push(ConfigIssue::error(
                "provider.temperature",
                "Temperature must be between 0 and 2",
            ));
        }

        if self.render.width == 0 || self.render.height == 0 {
            issues.push(ConfigIssue::error(
                "render",
                "Canvas width and height must be at least 1",
            ));
        }

        issues
    }

    /// Check if the configuration is valid (no errors).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validate()
            .iter()
            .all(|issue| issue.level != IssueLevel::Error)
    }
}

/// A configuration problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    /// Issue severity level.
    pub level: IssueLevel,
    /// Configuration path (e.g., "render.width").
    pub path: String,
    /// Human-readable message.
    pub message: String,
}

impl ConfigIssue {
    /// Create an error-level issue.
    #[must_use]
    pub fn error(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: IssueLevel::Error,
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a warning-level issue.
    #[must_use]
    pub fn warning(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: IssueLevel::Warning,
            path: path.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let level = match self.level {
            IssueLevel::Error => "ERROR",
            IssueLevel::Warning => "WARN",
        };
        write!(f, "[{level}] {}: {}", self.path, self.message)
    }
}

/// Issue severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueLevel {
    /// Prevents the CLI from running.
    Error,
    /// Reported but tolerated.
    Warning,
}
