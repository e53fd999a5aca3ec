//! Question endpoints: deck assembly, reactions, and the single next card.

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use queple_common::AppResult;
use queple_core::{DeckInput, DeckMode, RecordInput};
use queple_db::entities::{Reaction, question};
use serde::{Deserialize, Serialize};

use crate::{extractors::FirebaseUid, middleware::AppState};

/// Deck request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckRequest {
    pub user_id: Option<String>,
    pub firebase_uid: Option<String>,
    #[serde(default)]
    pub mode: DeckMode,
    #[serde(default = "default_min_level")]
    pub min_level: i32,
    #[serde(default = "default_max_level")]
    pub max_level: i32,
    #[serde(default)]
    pub allow_18_plus: bool,
    pub category: Option<String>,
    #[serde(default)]
    pub exclude_ids: Vec<String>,
}

const fn default_min_level() -> i32 {
    1
}

const fn default_max_level() -> i32 {
    3
}

/// Assemble a deck of up to six questions.
pub async fn deck(
    State(state): State<AppState>,
    Json(req): Json<DeckRequest>,
) -> AppResult<Json<Vec<question::Model>>> {
    let deck = state
        .deck_service
        .assemble(DeckInput {
            mode: req.mode,
            min_level: req.min_level,
            max_level: req.max_level,
            allow_18_plus: req.allow_18_plus,
            category_id: req.category,
            exclude_ids: req.exclude_ids,
            user_id: req.user_id,
            firebase_uid: req.firebase_uid,
        })
        .await?;

    Ok(Json(deck))
}

/// Reaction request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactRequest {
    pub question_id: String,
    pub reaction: Reaction,
    #[serde(default)]
    pub time_spent: f64,
    /// Explicit acting user; the identity header wins when both are present.
    pub user_id: Option<String>,
}

/// Reaction response.
#[derive(Debug, Serialize)]
pub struct ReactResponse {
    pub success: bool,
}

/// Record a swipe reaction.
///
/// Always answers `200`; a failed write is reported as `success: false` so
/// the client keeps playing.
async fn react(
    FirebaseUid(firebase_uid): FirebaseUid,
    State(state): State<AppState>,
    Json(req): Json<ReactRequest>,
) -> AppResult<Json<ReactResponse>> {
    if req.question_id.is_empty() {
        return Err(queple_common::AppError::Validation(
            "questionId must not be empty".to_string(),
        ));
    }

    let input = RecordInput {
        question_id: req.question_id,
        reaction: req.reaction,
        time_spent: req.time_spent,
        user_id: req.user_id,
        firebase_uid,
    };

    let success = match state.interaction_service.record(input).await {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to record reaction");
            false
        }
    };

    Ok(Json(ReactResponse { success }))
}

/// Return one random question the caller has never interacted with, or
/// `null` when everything has been seen.
async fn next(
    FirebaseUid(firebase_uid): FirebaseUid,
    State(state): State<AppState>,
) -> AppResult<Json<Option<question::Model>>> {
    let question = state
        .question_service
        .next_unseen(firebase_uid.as_deref())
        .await?;

    Ok(Json(question))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/react", post(react))
        .route("/next", get(next))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deck_request_defaults() {
        let req: DeckRequest = serde_json::from_str("{}").unwrap();

        assert_eq!(req.mode, DeckMode::Zigzag);
        assert_eq!(req.min_level, 1);
        assert_eq!(req.max_level, 3);
        assert!(!req.allow_18_plus);
        assert!(req.exclude_ids.is_empty());
    }

    #[test]
    fn test_deck_request_parses_modes() {
        let req: DeckRequest = serde_json::from_str(r#"{"mode": "all_both"}"#).unwrap();
        assert_eq!(req.mode, DeckMode::AllBoth);

        let req: DeckRequest = serde_json::from_str(r#"{"mode": "zigzag_both"}"#).unwrap();
        assert_eq!(req.mode, DeckMode::ZigzagBoth);
    }

    #[test]
    fn test_react_request_wire_format() {
        let req: ReactRequest = serde_json::from_str(
            r#"{"questionId": "q1", "reaction": "UPVOTE", "timeSpent": 3.5}"#,
        )
        .unwrap();

        assert_eq!(req.question_id, "q1");
        assert_eq!(req.reaction, Reaction::Upvote);
        assert_eq!(req.time_spent, 3.5);
    }

    #[test]
    fn test_react_request_missing_reaction_is_rejected() {
        let result = serde_json::from_str::<ReactRequest>(r#"{"questionId": "q1"}"#);
        assert!(result.is_err());
    }
}
