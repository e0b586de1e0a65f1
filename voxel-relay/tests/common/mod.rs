#![allow(dead_code)]

use serde_json::{json, Value};
use service_core::config::Config as CoreConfig;
use voxel_relay::config::{
    GoogleConfig, ObservabilityConfig, RelayConfig, RelaySettings, RelayStrategy,
};
use voxel_relay::startup::Application;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_API_KEY: &str = "test-api-key";

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn(api_key: Option<&str>, api_base: &str, strategy: RelayStrategy) -> Self {
        Self::spawn_with_timeout(api_key, api_base, strategy, 5).await
    }

    pub async fn spawn_with_timeout(
        api_key: Option<&str>,
        api_base: &str,
        strategy: RelayStrategy,
        timeout_secs: u64,
    ) -> Self {
        let config = RelayConfig {
            common: CoreConfig { port: 0 },
            google: GoogleConfig {
                api_key: api_key.map(str::to_string),
                api_base: api_base.to_string(),
                request_timeout_secs: Some(timeout_secs),
            },
            relay: RelaySettings {
                strategy,
                validate_voxels: false,
            },
            observability: ObservabilityConfig {
                log_level: "info".to_string(),
                otlp_endpoint: None,
            },
        };

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");
        let address = format!("http://127.0.0.1:{}", app.port());

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        }

        Self { address, client }
    }

    pub async fn post_prompt(&self, prompt: &str) -> reqwest::Response {
        self.client
            .post(format!("{}/api/generate", self.address))
            .json(&json!({ "prompt": prompt }))
            .send()
            .await
            .expect("Failed to send generate request")
    }
}

pub fn fallback(models: &[&str]) -> RelayStrategy {
    RelayStrategy::Fallback(models.iter().map(|m| m.to_string()).collect())
}

pub fn api_base(server: &MockServer) -> String {
    format!("{}/v1beta", server.uri())
}

pub fn model_path(model: &str) -> String {
    format!("/v1beta/models/{}:generateContent", model)
}

/// A Gemini success body whose first candidate says `text`.
pub fn gemini_text(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": { "parts": [{ "text": text }], "role": "model" },
            "finishReason": "STOP"
        }],
        "usageMetadata": {
            "promptTokenCount": 42,
            "candidatesTokenCount": 17,
            "totalTokenCount": 59
        }
    })
}

/// A Gemini error body.
pub fn gemini_error(code: u16, message: &str) -> Value {
    json!({ "error": { "code": code, "message": message, "status": "ERROR" } })
}

pub async fn mount_model(
    server: &MockServer,
    model: &str,
    response: ResponseTemplate,
    expected_calls: u64,
) {
    Mock::given(method("POST"))
        .and(path(model_path(model)))
        .and(query_param("key", TEST_API_KEY))
        .respond_with(response)
        .expect(expected_calls)
        .mount(server)
        .await;
}
