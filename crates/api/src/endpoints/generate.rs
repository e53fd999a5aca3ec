//! Raw generation endpoint: prompt passthrough to the generative model.

use axum::{Json, extract::State};
use queple_common::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::middleware::AppState;

/// Generation request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[validate(length(min = 1))]
    pub user_prompt: String,

    pub system_prompt: Option<String>,
}

/// Generation response.
#[derive(Serialize)]
pub struct GenerateResponse {
    pub text: String,
}

/// Run a raw prompt through the model and return its cleaned text.
///
/// Unlike deck assembly, upstream failures surface here: this endpoint has
/// no fallback content to degrade to.
pub async fn generate(
    State(state): State<AppState>,
    Json(req): Json<GenerateRequest>,
) -> AppResult<Json<GenerateResponse>> {
    req.validate().map_err(AppError::from)?;

    let text = state
        .generation_service
        .generate_text(&req.user_prompt, req.system_prompt.as_deref())
        .await?;

    Ok(Json(GenerateResponse { text }))
}
