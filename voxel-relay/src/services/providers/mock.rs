//! Scripted provider for tests.

use super::{GenerationParams, ProviderError, ProviderResponse, TextProvider};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// Replays a fixed outcome per model and records which models were called.
pub struct MockTextProvider {
    configured: bool,
    outcomes: HashMap<String, Result<String, ProviderError>>,
    calls: Mutex<Vec<String>>,
    prompts: Mutex<Vec<String>>,
}

impl MockTextProvider {
    pub fn new(configured: bool) -> Self {
        Self {
            configured,
            outcomes: HashMap::new(),
            calls: Mutex::new(Vec::new()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Answer `model` with `text`.
    pub fn with_text(mut self, model: &str, text: &str) -> Self {
        self.outcomes
            .insert(model.to_string(), Ok(text.to_string()));
        self
    }

    /// Fail `model` with `error`.
    pub fn with_error(mut self, model: &str, error: ProviderError) -> Self {
        self.outcomes.insert(model.to_string(), Err(error));
        self
    }

    /// Models called so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Prompts received so far, in order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn generate(
        &self,
        model: &str,
        prompt: &str,
        _params: &GenerationParams,
    ) -> Result<ProviderResponse, ProviderError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(model.to_string());
        }
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        match self.outcomes.get(model) {
            Some(Ok(text)) => Ok(ProviderResponse {
                text: text.clone(),
                input_tokens: prompt.len() as i32 / 4,
                output_tokens: text.len() as i32 / 4,
            }),
            Some(Err(err)) => Err(err.clone()),
            None => Err(ProviderError::ApiError(format!(
                "models/{} is not found",
                model
            ))),
        }
    }
}
