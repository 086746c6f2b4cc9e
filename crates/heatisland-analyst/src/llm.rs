//! LLM backend abstraction and implementations.
//!
//! Enum dispatch over the supported HTTP APIs, since async methods are not
//! dyn-compatible. Gemini is the default and is asked for schema-shaped
//! JSON directly; the `OpenAI`-compatible and Anthropic backends rely on
//! the prompt and the lenient parser instead.

use serde_json::{Value, json};

use crate::config::{BackendType, LlmBackendConfig};
use crate::error::AnalystError;
use crate::prompt::RenderedPrompt;

// ---------------------------------------------------------------------------
// Unified backend enum
// ---------------------------------------------------------------------------

/// An LLM backend that turns a prompt into response text.
pub enum LlmBackend {
    /// Google Gemini `generateContent` API.
    Gemini(GeminiBackend),
    /// `OpenAI`-compatible chat completions API.
    OpenAi(OpenAiBackend),
    /// Anthropic Messages API.
    Anthropic(AnthropicBackend),
}

impl LlmBackend {
    /// Send a prompt to the LLM and return the response text.
    ///
    /// # Errors
    ///
    /// Returns [`AnalystError::LlmBackend`] if the HTTP call fails, the
    /// service answers with a non-success status, or the response has no
    /// text.
    pub async fn complete(&self, prompt: &RenderedPrompt) -> Result<String, AnalystError> {
        match self {
            Self::Gemini(backend) => backend.complete(prompt).await,
            Self::OpenAi(backend) => backend.complete(prompt).await,
            Self::Anthropic(backend) => backend.complete(prompt).await,
        }
    }

    /// Human-readable name for logging.
    pub const fn name(&self) -> &str {
        match self {
            Self::Gemini(_) => "gemini",
            Self::OpenAi(_) => "openai-compatible",
            Self::Anthropic(_) => "anthropic",
        }
    }
}

/// POST `body` and return the decoded JSON, mapping transport and status
/// failures to [`AnalystError::LlmBackend`] tagged with `service`.
async fn post_json(
    request: reqwest::RequestBuilder,
    body: &Value,
    service: &str,
) -> Result<Value, AnalystError> {
    let response = request
        .header("Content-Type", "application/json")
        .json(body)
        .send()
        .await
        .map_err(|e| AnalystError::LlmBackend(format!("{service} request failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        let error_body = response
            .text()
            .await
            .unwrap_or_else(|_| "unable to read error body".to_owned());
        return Err(AnalystError::LlmBackend(format!(
            "{service} returned {status}: {error_body}"
        )));
    }

    response
        .json()
        .await
        .map_err(|e| AnalystError::LlmBackend(format!("{service} response parse failed: {e}")))
}

fn build_client() -> Result<reqwest::Client, AnalystError> {
    reqwest::Client::builder()
        .build()
        .map_err(|e| AnalystError::LlmBackend(format!("failed to build HTTP client: {e}")))
}

// ---------------------------------------------------------------------------
// Gemini backend
// ---------------------------------------------------------------------------

/// Backend for the Gemini `generateContent` API.
///
/// Sends to `{api_url}/models/{model}:generateContent` with the key in the
/// `x-goog-api-key` header and a response schema pinning the four analysis
/// fields.
pub struct GeminiBackend {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
    temperature: f64,
    max_tokens: u32,
}

impl GeminiBackend {
    /// Create a new Gemini backend.
    pub fn new(config: &LlmBackendConfig) -> Result<Self, AnalystError> {
        Ok(Self {
            client: build_client()?,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    fn request_body(&self, prompt: &RenderedPrompt) -> Value {
        json!({
            "systemInstruction": {
                "parts": [{"text": prompt.system}]
            },
            "contents": [
                {"role": "user", "parts": [{"text": prompt.user}]}
            ],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": analysis_schema(),
                "temperature": self.temperature,
                "maxOutputTokens": self.max_tokens
            }
        })
    }

    async fn complete(&self, prompt: &RenderedPrompt) -> Result<String, AnalystError> {
        let url = format!("{}/models/{}:generateContent", self.api_url, self.model);
        let request = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key);

        let json = post_json(request, &self.request_body(prompt), "Gemini").await?;
        extract_gemini_content(&json)
    }
}

/// Response schema for the four-field analysis object.
fn analysis_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "scenarioContext": {
                "type": "STRING",
                "description": "A brief header describing the scenario analyzed (e.g. '2050 Business As Usual Projection')"
            },
            "summary": {"type": "STRING"},
            "keyFactors": {"type": "ARRAY", "items": {"type": "STRING"}},
            "recommendations": {"type": "ARRAY", "items": {"type": "STRING"}}
        },
        "required": ["scenarioContext", "summary", "keyFactors", "recommendations"]
    })
}

/// Extract the text from a Gemini `generateContent` response.
fn extract_gemini_content(json: &Value) -> Result<String, AnalystError> {
    json.get("candidates")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.get(0))
        .and_then(|p| p.get("text"))
        .and_then(Value::as_str)
        .filter(|text| !text.trim().is_empty())
        .map(ToOwned::to_owned)
        .ok_or_else(|| {
            AnalystError::LlmBackend(
                "Gemini response missing candidates[0].content.parts[0].text".to_owned(),
            )
        })
}

// ---------------------------------------------------------------------------
// OpenAI-compatible backend
// ---------------------------------------------------------------------------

/// Backend for `OpenAI`-compatible chat completions APIs.
///
/// Works with `OpenAI`, `DeepSeek`, and Ollama endpoints.
/// Sends requests to `{api_url}/chat/completions`.
pub struct OpenAiBackend {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
    temperature: f64,
    max_tokens: u32,
}

impl OpenAiBackend {
    /// Create a new `OpenAI`-compatible backend.
    pub fn new(config: &LlmBackendConfig) -> Result<Self, AnalystError> {
        Ok(Self {
            client: build_client()?,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    async fn complete(&self, prompt: &RenderedPrompt) -> Result<String, AnalystError> {
        let url = format!("{}/chat/completions", self.api_url);

        let body = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": prompt.system},
                {"role": "user", "content": prompt.user}
            ],
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
            "response_format": {"type": "json_object"}
        });

        let request = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key));

        let json = post_json(request, &body, "OpenAI").await?;
        extract_openai_content(&json)
    }
}

/// Extract the text content from an `OpenAI` chat completions response.
fn extract_openai_content(json: &Value) -> Result<String, AnalystError> {
    json.get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(Value::as_str)
        .map(ToOwned::to_owned)
        .ok_or_else(|| {
            AnalystError::LlmBackend(
                "OpenAI response missing choices[0].message.content".to_owned(),
            )
        })
}

// ---------------------------------------------------------------------------
// Anthropic Messages API backend
// ---------------------------------------------------------------------------

/// Backend for the Anthropic Messages API.
///
/// The system prompt is a top-level field and the key travels in
/// `x-api-key`; the text comes back at `content[0].text`.
pub struct AnthropicBackend {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
    temperature: f64,
    max_tokens: u32,
}

impl AnthropicBackend {
    /// Create a new Anthropic Messages API backend.
    pub fn new(config: &LlmBackendConfig) -> Result<Self, AnalystError> {
        Ok(Self {
            client: build_client()?,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    async fn complete(&self, prompt: &RenderedPrompt) -> Result<String, AnalystError> {
        let url = format!("{}/messages", self.api_url);

        let body = json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "temperature": self.temperature,
            "system": prompt.system,
            "messages": [
                {"role": "user", "content": prompt.user}
            ]
        });

        let request = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01");

        let json = post_json(request, &body, "Anthropic").await?;
        extract_anthropic_content(&json)
    }
}

/// Extract the text content from an Anthropic Messages API response.
fn extract_anthropic_content(json: &Value) -> Result<String, AnalystError> {
    json.get("content")
        .and_then(|c| c.get(0))
        .and_then(|b| b.get("text"))
        .and_then(Value::as_str)
        .map(ToOwned::to_owned)
        .ok_or_else(|| {
            AnalystError::LlmBackend("Anthropic response missing content[0].text".to_owned())
        })
}

// ---------------------------------------------------------------------------
// Factory
// ---------------------------------------------------------------------------

/// Create an LLM backend from configuration.
///
/// # Errors
///
/// Returns [`AnalystError::LlmBackend`] if the HTTP client cannot be built.
pub fn create_backend(config: &LlmBackendConfig) -> Result<LlmBackend, AnalystError> {
    Ok(match config.backend_type {
        BackendType::Gemini => LlmBackend::Gemini(GeminiBackend::new(config)?),
        BackendType::OpenAi => LlmBackend::OpenAi(OpenAiBackend::new(config)?),
        BackendType::Anthropic => LlmBackend::Anthropic(AnthropicBackend::new(config)?),
    })
}
