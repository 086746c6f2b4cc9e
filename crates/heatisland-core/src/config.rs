//! Configuration loading and typed config structures.
//!
//! The configuration lives in `heatisland.yaml` at the project root. Every
//! section and field has a default, so an empty file (or no file at all)
//! is valid. Credentials and backend selection can be overridden from the
//! environment after parsing.

use std::path::Path;

use heatisland_types::Scenario;
use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration. Mirrors the structure of `heatisland.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DashboardConfig {
    /// Series synthesis settings.
    #[serde(default)]
    pub synthesis: SynthesisConfig,

    /// Narrative analysis (LLM) settings.
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl DashboardConfig {
    /// Load configuration from a YAML file and apply environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&contents)?;
        config.analysis.apply_env_overrides();
        Ok(config)
    }

    /// Like [`DashboardConfig::from_file`], but a missing file yields the
    /// defaults (still with environment overrides applied).
    pub fn from_file_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            return Self::from_file(path);
        }
        let mut config = Self::default();
        config.analysis.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a YAML string without touching the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }
}

/// Series synthesis configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SynthesisConfig {
    /// Fixed noise seed. `None` draws fresh noise every run.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Scenario selected when the dashboard starts.
    #[serde(default = "default_scenario")]
    pub default_scenario: Scenario,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            seed: None,
            default_scenario: default_scenario(),
        }
    }
}

/// Narrative analysis configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnalysisConfig {
    /// Backend type: `gemini`, `openai` (also `deepseek`, `ollama`), or `anthropic`.
    #[serde(default = "default_backend")]
    pub backend: String,

    /// Base API URL. When unset, the backend's public endpoint is used.
    #[serde(default)]
    pub api_url: Option<String>,

    /// Model identifier.
    #[serde(default = "default_model")]
    pub model: String,

    /// API key. Prefer the environment over putting this in the file.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Deadline for one analysis request, in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Directory holding `system.j2` and `user.j2`.
    #[serde(default = "default_templates_dir")]
    pub templates_dir: String,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Maximum tokens in the response.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl AnalysisConfig {
    /// Apply overrides from the process environment.
    ///
    /// - `HEATISLAND_LLM_BACKEND` overrides `backend`
    /// - `HEATISLAND_LLM_API_URL` overrides `api_url`
    /// - `HEATISLAND_LLM_MODEL` overrides `model`
    /// - `API_KEY`, `GEMINI_API_KEY`, `HEATISLAND_LLM_API_KEY` (first set wins)
    ///   override `api_key`
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(val) = lookup("HEATISLAND_LLM_BACKEND") {
            self.backend = val;
        }
        if let Some(val) = lookup("HEATISLAND_LLM_API_URL") {
            self.api_url = Some(val);
        }
        if let Some(val) = lookup("HEATISLAND_LLM_MODEL") {
            self.model = val;
        }
        let key = ["API_KEY", "GEMINI_API_KEY", "HEATISLAND_LLM_API_KEY"]
            .into_iter()
            .find_map(lookup);
        if key.is_some() {
            self.api_key = key;
        }
    }

    /// The configured API URL, or the public endpoint for the backend.
    pub fn effective_api_url(&self) -> String {
        if let Some(url) = &self.api_url {
            return url.trim_end_matches('/').to_owned();
        }
        match self.backend.to_lowercase().as_str() {
            "openai" => "https://api.openai.com/v1".to_owned(),
            "deepseek" => "https://api.deepseek.com/v1".to_owned(),
            "ollama" => "http://localhost:11434/v1".to_owned(),
            "anthropic" | "claude" => "https://api.anthropic.com/v1".to_owned(),
            _ => "https://generativelanguage.googleapis.com/v1beta".to_owned(),
        }
    }

    /// Whether a non-empty API key is configured.
    pub fn has_credentials(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            api_url: None,
            model: default_model(),
            api_key: None,
            request_timeout_ms: default_request_timeout_ms(),
            templates_dir: default_templates_dir(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default `tracing` filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

const fn default_scenario() -> Scenario {
    Scenario::Historical
}

fn default_backend() -> String {
    "gemini".to_owned()
}

fn default_model() -> String {
    "gemini-2.5-flash".to_owned()
}

const fn default_request_timeout_ms() -> u64 {
    30_000
}

fn default_templates_dir() -> String {
    "templates".to_owned()
}

const fn default_temperature() -> f64 {
    0.7
}

const fn default_max_tokens() -> u32 {
    1024
}

fn default_log_level() -> String {
    "info".to_owned()
}
