//! LLM backend configuration for the analyst.
//!
//! The loose, file-facing [`AnalysisConfig`] from `heatisland-core` is
//! validated here into a [`LlmBackendConfig`]: the backend name must be
//! known and an API key must be present.

use std::time::Duration;

use heatisland_core::AnalysisConfig;

use crate::error::AnalystError;

/// Validated configuration for a single LLM backend.
#[derive(Debug, Clone)]
pub struct LlmBackendConfig {
    /// The backend type.
    pub backend_type: BackendType,
    /// Base API URL without a trailing slash.
    pub api_url: String,
    /// API key for authentication.
    pub api_key: String,
    /// Model identifier (e.g. `gemini-2.5-flash`).
    pub model: String,
    /// Sampling temperature.
    pub temperature: f64,
    /// Maximum tokens in the response.
    pub max_tokens: u32,
}

/// Supported LLM backend types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendType {
    /// Google Gemini `generateContent` API with a response schema.
    Gemini,
    /// `OpenAI`-compatible API (works with `OpenAI`, `DeepSeek`, Ollama).
    OpenAi,
    /// Anthropic Messages API.
    Anthropic,
}

impl BackendType {
    /// Parse a backend name as written in config or the environment.
    pub fn parse(name: &str) -> Result<Self, AnalystError> {
        match name.trim().to_lowercase().as_str() {
            "gemini" | "google" => Ok(Self::Gemini),
            "openai" | "deepseek" | "ollama" => Ok(Self::OpenAi),
            "anthropic" | "claude" => Ok(Self::Anthropic),
            other => Err(AnalystError::Config(format!("unknown backend type: {other}"))),
        }
    }
}

impl LlmBackendConfig {
    /// Validate an [`AnalysisConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`AnalystError::MissingCredentials`] when no API key is set
    /// and [`AnalystError::Config`] for an unknown backend.
    pub fn from_analysis_config(config: &AnalysisConfig) -> Result<Self, AnalystError> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(AnalystError::MissingCredentials)?
            .to_owned();

        Ok(Self {
            backend_type: BackendType::parse(&config.backend)?,
            api_url: config.effective_api_url(),
            api_key,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }
}

/// Request deadline from an [`AnalysisConfig`].
pub const fn request_timeout(config: &AnalysisConfig) -> Duration {
    Duration::from_millis(config.request_timeout_ms)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn backend_type_parsing() {
        assert_eq!(BackendType::parse("Gemini").ok(), Some(BackendType::Gemini));
        assert_eq!(BackendType::parse("deepseek").ok(), Some(BackendType::OpenAi));
        assert_eq!(BackendType::parse("claude").ok(), Some(BackendType::Anthropic));
        assert!(BackendType::parse("palm").is_err());
    }

    #[test]
    fn missing_key_is_missing_credentials() {
        let config = AnalysisConfig::default();
        let result = LlmBackendConfig::from_analysis_config(&config);
        assert!(matches!(result, Err(AnalystError::MissingCredentials)));

        let blank = AnalysisConfig {
            api_key: Some("   ".to_owned()),
            ..AnalysisConfig::default()
        };
        let result = LlmBackendConfig::from_analysis_config(&blank);
        assert!(matches!(result, Err(AnalystError::MissingCredentials)));
    }

    #[test]
    fn valid_config_resolves_defaults() {
        let config = AnalysisConfig {
            api_key: Some("test-key".to_owned()),
            ..AnalysisConfig::default()
        };
        let backend = LlmBackendConfig::from_analysis_config(&config).unwrap();
        assert_eq!(backend.backend_type, BackendType::Gemini);
        assert_eq!(backend.model, "gemini-2.5-flash");
        assert!(backend.api_url.starts_with("https://generativelanguage"));
        assert_eq!(request_timeout(&config), Duration::from_secs(30));
    }

    #[test]
    fn unknown_backend_is_config_error() {
        let config = AnalysisConfig {
            backend: "palm".to_owned(),
            api_key: Some("k".to_owned()),
            ..AnalysisConfig::default()
        };
        let result = LlmBackendConfig::from_analysis_config(&config);
        assert!(matches!(result, Err(AnalystError::Config(_))));
    }
}
