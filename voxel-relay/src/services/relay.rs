//! The prompt relay: template, call the backend, extract the voxel array.
//!
//! In fallback mode the configured models are tried strictly in order, one
//! outbound call at a time, and the first parseable array wins. Failures are
//! logged and only the last one is reported to the caller.

use crate::config::RelayStrategy;
use crate::services::extract::{extract_json_array, validate_voxels, ExtractError};
use crate::services::metrics;
use crate::services::prompt::voxel_prompt;
use crate::services::providers::{GenerationParams, ProviderError, TextProvider};
use serde_json::Value;
use service_core::error::AppError;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

/// Why a single model attempt was discarded.
#[derive(Debug, Error)]
pub enum AttemptError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Extract(#[from] ExtractError),
}

impl AttemptError {
    pub fn kind(&self) -> &'static str {
        match self {
            AttemptError::Provider(err) => err.kind(),
            AttemptError::Extract(_) => "parse_error",
        }
    }
}

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Server is missing API Key.")]
    MissingApiKey,

    #[error("All models failed. Last error: {last_error}")]
    AllModelsFailed { last_error: String },

    /// Single-model mode surfaces the failure unchanged.
    #[error(transparent)]
    Attempt(#[from] AttemptError),
}

impl From<RelayError> for AppError {
    fn from(err: RelayError) -> Self {
        let message = err.to_string();
        match err {
            RelayError::MissingApiKey => AppError::ConfigError(anyhow::anyhow!(message)),
            RelayError::AllModelsFailed { .. } | RelayError::Attempt(_) => {
                AppError::UpstreamError(message)
            }
        }
    }
}

/// Stateless relay shared by all requests.
#[derive(Clone)]
pub struct PromptRelay {
    provider: Arc<dyn TextProvider>,
    strategy: RelayStrategy,
    params: GenerationParams,
    validate_voxels: bool,
}

impl PromptRelay {
    pub fn new(provider: Arc<dyn TextProvider>, strategy: RelayStrategy) -> Self {
        Self {
            provider,
            strategy,
            params: GenerationParams::default(),
            validate_voxels: false,
        }
    }

    /// Require every element to be a well-formed voxel.
    pub fn with_voxel_validation(mut self, enabled: bool) -> Self {
        self.validate_voxels = enabled;
        self
    }

    pub fn strategy(&self) -> &RelayStrategy {
        &self.strategy
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_configured()
    }

    /// Fail fast when the backend credential is absent.
    pub fn ensure_configured(&self) -> Result<(), RelayError> {
        if self.provider.is_configured() {
            return Ok(());
        }

        tracing::error!("Generate call rejected: backend API key is not configured");
        metrics::record_relay_request("config_error");
        Err(RelayError::MissingApiKey)
    }

    /// Turn `prompt` into a voxel array.
    pub async fn generate(&self, prompt: &str) -> Result<Vec<Value>, RelayError> {
        self.ensure_configured()?;

        let result = self.run(prompt).await;
        metrics::record_relay_request(if result.is_ok() { "success" } else { "failed" });
        result
    }

    async fn run(&self, prompt: &str) -> Result<Vec<Value>, RelayError> {
        let templated = voxel_prompt(prompt);

        match &self.strategy {
            RelayStrategy::Single(model) => Ok(self.attempt(model, &templated).await?),
            RelayStrategy::Fallback(models) => {
                let mut last_error = String::new();
                for model in models {
                    match self.attempt(model, &templated).await {
                        Ok(voxels) => return Ok(voxels),
                        Err(e) => last_error = e.to_string(),
                    }
                }

                tracing::error!(
                    attempted = models.len(),
                    last_error = %last_error,
                    "All models failed"
                );
                Err(RelayError::AllModelsFailed { last_error })
            }
        }
    }

    async fn attempt(&self, model: &str, prompt: &str) -> Result<Vec<Value>, AttemptError> {
        tracing::info!(model = %model, "Attempting model");

        let started = Instant::now();
        let response = self.provider.generate(model, prompt, &self.params).await;
        metrics::record_provider_latency(
            self.provider.name(),
            model,
            started.elapsed().as_secs_f64(),
        );

        let result = response
            .map_err(AttemptError::from)
            .and_then(|response| {
                metrics::record_tokens(model, response.input_tokens, response.output_tokens);
                let voxels = extract_json_array(&response.text)?;
                if self.validate_voxels {
                    validate_voxels(&voxels)?;
                }
                Ok(voxels)
            });

        match &result {
            Ok(voxels) => {
                metrics::record_attempt(model, "success");
                tracing::info!(model = %model, voxel_count = voxels.len(), "Model succeeded");
            }
            Err(e) => {
                metrics::record_attempt(model, e.kind());
                tracing::warn!(model = %model, error = %e, "Model failed");
            }
        }

        result
    }
}
