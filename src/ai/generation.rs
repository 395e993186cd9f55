//! Timed, time-bounded generation calls
//!
//! Wraps a provider so that every call is measured and cut off after the
//! configured timeout. A timeout is reported like any other provider failure.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use super::{AiError, AiResult, LlmClient, DEFAULT_TIMEOUT_SECONDS};

/// Generation client used by the enrichment and insight pipelines
#[derive(Clone)]
pub struct GenerationClient {
    provider: Arc<dyn LlmClient>,
    timeout: Duration,
}

impl GenerationClient {
    pub fn new(provider: Arc<dyn LlmClient>) -> Self {
        Self {
            provider,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn provider_name(&self) -> &str {
        self.provider.provider_name()
    }

    pub fn model_name(&self) -> &str {
        self.provider.model_name()
    }

    /// Single generation call
    pub async fn generate(&self, prompt: &str) -> AiResult<String> {
        self.generate_for("generic", prompt).await
    }

    /// Single generation call, tagged with what it produces for the timing log
    pub async fn generate_for(&self, artifact: &str, prompt: &str) -> AiResult<String> {
        let started = Instant::now();
        let outcome = match tokio::time::timeout(self.timeout, self.provider.generate(prompt)).await
        {
            Ok(result) => result,
            Err(_) => Err(AiError::Timeout(self.timeout)),
        };
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match &outcome {
            Ok(text) => debug!(
                provider = self.provider.provider_name(),
                model = self.provider.model_name(),
                artifact,
                elapsed_ms,
                response_len = text.len(),
                "generation completed"
            ),
            Err(e) => warn!(
                provider = self.provider.provider_name(),
                model = self.provider.model_name(),
                artifact,
                elapsed_ms,
                error = %e,
                "generation failed"
            ),
        }

        outcome
    }
}

impl std::fmt::Debug for GenerationClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationClient")
            .field("provider", &self.provider.provider_name())
            .field("model", &self.provider.model_name())
            .field("timeout", &self.timeout)
            .finish()
    }
}
