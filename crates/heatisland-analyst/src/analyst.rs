//! Single-in-flight analysis service.
//!
//! Pipeline per request:
//!
//! ```text
//! series --> digest --> prompt --> LLM backend (timeout) --> parser --> AnalysisResult
//! ```
//!
//! Only one request may run at a time. A second call while one is pending
//! is refused with [`AnalystError::AlreadyInFlight`] instead of queueing.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use heatisland_core::AnalysisConfig;
use heatisland_types::{AnalysisResult, AnnualRecord, Scenario};
use tracing::{debug, info, warn};

use crate::config::{LlmBackendConfig, request_timeout};
use crate::digest::AnalysisDigest;
use crate::error::AnalystError;
use crate::llm::{LlmBackend, create_backend};
use crate::parse::parse_analysis;
use crate::prompt::PromptEngine;

/// Produces narrative analyses of a synthesized series.
pub struct Analyst {
    prompt_engine: PromptEngine,
    backend: LlmBackend,
    timeout: Duration,
    in_flight: AtomicBool,
}

/// Clears the in-flight flag when dropped, on every exit path.
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, AnalystError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_current| AnalystError::AlreadyInFlight)?;
        Ok(Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

impl Analyst {
    /// Assemble an analyst from its parts.
    pub const fn new(prompt_engine: PromptEngine, backend: LlmBackend, timeout: Duration) -> Self {
        Self {
            prompt_engine,
            backend,
            timeout,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Build an analyst from configuration.
    ///
    /// Credentials are checked before templates are touched, so a missing
    /// key is reported as such even when the templates directory is absent.
    ///
    /// # Errors
    ///
    /// [`AnalystError::MissingCredentials`] without an API key, plus any
    /// backend or template loading error.
    pub fn from_config(config: &AnalysisConfig) -> Result<Self, AnalystError> {
        let backend_config = LlmBackendConfig::from_analysis_config(config)?;
        let backend = create_backend(&backend_config)?;
        let prompt_engine = PromptEngine::new(&config.templates_dir)?;

        info!(
            backend = backend.name(),
            model = backend_config.model,
            templates_dir = config.templates_dir,
            timeout_ms = config.request_timeout_ms,
            "analyst configured"
        );

        Ok(Self::new(prompt_engine, backend, request_timeout(config)))
    }

    /// Analyse `series`, generated under `scenario`.
    ///
    /// # Errors
    ///
    /// [`AnalystError::AlreadyInFlight`] if another request is pending;
    /// otherwise any digest, template, backend, timeout or parse failure.
    pub async fn analyze(
        &self,
        series: &[AnnualRecord],
        scenario: Scenario,
    ) -> Result<AnalysisResult, AnalystError> {
        let _guard = InFlightGuard::acquire(&self.in_flight)?;
        let start = Instant::now();

        let digest = AnalysisDigest::from_series(series, scenario)?;
        let prompt = self.prompt_engine.render(&digest)?;
        debug!(
            scenario = %scenario,
            system_len = prompt.system.len(),
            user_len = prompt.user.len(),
            "prompt rendered"
        );

        let raw = tokio::time::timeout(self.timeout, self.backend.complete(&prompt))
            .await
            .map_err(|_elapsed| {
                warn!(
                    backend = self.backend.name(),
                    timeout_ms = self.timeout.as_millis(),
                    "analysis request timed out"
                );
                AnalystError::Timeout(self.timeout.as_millis())
            })??;

        let result = parse_analysis(&raw)?;

        info!(
            scenario = %scenario,
            backend = self.backend.name(),
            latency_ms = start.elapsed().as_millis(),
            key_factors = result.key_factors.len(),
            recommendations = result.recommendations.len(),
            "analysis complete"
        );

        Ok(result)
    }
}
