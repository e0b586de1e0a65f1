use crate::models::GenerateRequest;
use crate::startup::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::Value;
use service_core::error::AppError;

/// `POST /api/generate`: prompt in, voxel array out.
///
/// The credential check runs before the body is looked at, so a missing key
/// yields the same 500 whatever the caller sent.
pub async fn generate(
    State(state): State<AppState>,
    body: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<Vec<Value>>, AppError> {
    state.relay.ensure_configured()?;

    let Json(request) = body.map_err(|rejection| {
        tracing::warn!(error = %rejection.body_text(), "Rejected generate request body");
        AppError::BadRequest(anyhow::anyhow!(rejection.body_text()))
    })?;

    tracing::info!(prompt_len = request.prompt.len(), "Generating voxels");

    let voxels = state.relay.generate(&request.prompt).await?;
    Ok(Json(voxels))
}
