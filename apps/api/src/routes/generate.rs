use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::routes::identity::Identity;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub prompt: String,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub text: String,
}

/// POST /api/v1/generate
/// Free-form prompt in, trimmed plain text out.
pub async fn handle_generate(
    State(state): State<AppState>,
    identity: Identity,
    Json(body): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, AppError> {
    let prompt = body.prompt.trim();
    if prompt.is_empty() {
        return Err(AppError::Validation("prompt must not be empty".into()));
    }
    let text = state.generator.generate(prompt).await?;
    let text = text.trim().to_string();
    if text.is_empty() {
        return Err(AppError::Llm("empty response".into()));
    }
    info!(user = %identity.email, chars = text.len(), "Generated text");
    Ok(Json(GenerateResponse { text }))
}
