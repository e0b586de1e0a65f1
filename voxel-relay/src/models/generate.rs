use serde::Deserialize;

/// Inbound body for `POST /api/generate`.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateRequest {
    /// Free-text description of the subject to build.
    pub prompt: String,
}
