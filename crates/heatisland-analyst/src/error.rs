//! Error types for the analyst.
//!
//! Uses `thiserror` for typed errors that surface through the analysis
//! pipeline: configuration, digest, prompt rendering, LLM calls, and
//! response parsing. The dashboard collapses all of them into one terminal
//! error state.

/// Errors that can occur while producing a narrative analysis.
#[derive(Debug, thiserror::Error)]
pub enum AnalystError {
    /// Configuration is invalid.
    #[error("config error: {0}")]
    Config(String),

    /// No API key is configured for the analysis service.
    #[error("analysis API key is not configured (set API_KEY or GEMINI_API_KEY)")]
    MissingCredentials,

    /// The series to analyse has no records.
    #[error("cannot analyse an empty series")]
    EmptySeries,

    /// Failed to load or render a prompt template.
    #[error("template error: {0}")]
    Template(String),

    /// The LLM backend could not be built, returned an error, or was unreachable.
    #[error("LLM backend error: {0}")]
    LlmBackend(String),

    /// The LLM response could not be parsed into an analysis.
    #[error("response parse error: {0}")]
    Parse(String),

    /// The request exceeded its deadline.
    #[error("timeout: analysis exceeded {0} ms")]
    Timeout(u128),

    /// Another analysis request is still in flight.
    #[error("an analysis request is already in flight")]
    AlreadyInFlight,

    /// Serialization or deserialization failure.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
}
