//! Recommendations endpoint: the alternate deck-like mix of stored and
//! generated content.

use axum::{Json, extract::State};
use queple_common::AppResult;
use queple_core::{RecommendInput, RecommendResponse};
use queple_db::entities::Gender;
use serde::Deserialize;

use crate::middleware::AppState;

/// Requested level window.
#[derive(Debug, Deserialize)]
pub struct LevelRange {
    #[serde(default = "default_min_level")]
    pub min: i32,
    #[serde(default = "default_max_level")]
    pub max: i32,
}

impl Default for LevelRange {
    fn default() -> Self {
        Self {
            min: default_min_level(),
            max: default_max_level(),
        }
    }
}

const fn default_min_level() -> i32 {
    1
}

const fn default_max_level() -> i32 {
    3
}

/// Recommendations request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendRequest {
    #[serde(default)]
    pub level_range: LevelRange,
    #[serde(default)]
    pub exclude_ids: Vec<String>,
    #[serde(default = "default_target_gender")]
    pub target_gender: Gender,
    #[serde(default)]
    pub allow_18_plus: bool,
    #[serde(default = "default_limit")]
    pub limit: usize,
    pub category: Option<String>,
}

const fn default_target_gender() -> Gender {
    Gender::Both
}

const fn default_limit() -> usize {
    5
}

/// Produce a recommendations mix.
pub async fn recommend(
    State(state): State<AppState>,
    Json(req): Json<RecommendRequest>,
) -> AppResult<Json<RecommendResponse>> {
    let response = state
        .question_service
        .recommend(RecommendInput {
            min_level: req.level_range.min,
            max_level: req.level_range.max,
            exclude_ids: req.exclude_ids,
            target_gender: req.target_gender,
            allow_18_plus: req.allow_18_plus,
            limit: req.limit,
            category_id: req.category,
        })
        .await?;

    Ok(Json(response))
}
