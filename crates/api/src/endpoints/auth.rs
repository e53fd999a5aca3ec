//! Auth endpoints: identity checks and profile upserts against the user
//! store. No sessions or passwords here; identity comes from the client's
//! external-auth provider.

use axum::{Json, Router, extract::State, routing::post};
use chrono::{DateTime, FixedOffset};
use queple_common::{AppError, AppResult};
use queple_core::{CreateUserInput, SyncUserInput};
use queple_db::entities::user;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use validator::Validate;

use crate::middleware::AppState;

/// Existence-check request.
#[derive(Debug, Deserialize)]
pub struct CheckRequest {
    pub uid: Option<String>,
}

/// Check whether an account exists for an external identity.
async fn check(
    State(state): State<AppState>,
    Json(req): Json<CheckRequest>,
) -> AppResult<Json<Value>> {
    let uid = req
        .uid
        .filter(|uid| !uid.is_empty())
        .ok_or_else(|| AppError::Validation("Missing UID".to_string()))?;

    match state.user_service.check(&uid).await? {
        Some(user) => Ok(Json(json!({ "exists": true, "user": user }))),
        None => Ok(Json(json!({ "exists": false }))),
    }
}

/// Registration request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequest {
    #[validate(length(min = 1))]
    pub uid: String,

    #[validate(length(min = 1))]
    pub email: String,

    pub name: Option<String>,
    pub image: Option<String>,
    pub birthday: Option<String>,
    pub ip: Option<String>,
    pub location: Option<String>,
}

/// Registration response.
#[derive(Serialize)]
pub struct CreateResponse {
    pub user: user::Model,
}

/// Register a new account.
async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateRequest>,
) -> AppResult<Json<CreateResponse>> {
    req.validate()?;

    let user = state
        .user_service
        .create(CreateUserInput {
            firebase_uid: req.uid,
            email: req.email,
            name: req.name,
            image: req.image,
            birthday: req.birthday.as_deref().and_then(parse_birthday),
            ip_address: req.ip,
            location: req.location,
        })
        .await?;

    Ok(Json(CreateResponse { user }))
}

/// Profile-sync request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SyncRequest {
    #[validate(length(min = 1))]
    pub uid: String,

    #[validate(length(min = 1))]
    pub email: String,

    pub name: Option<String>,
    pub image: Option<String>,
    pub location: Option<String>,
}

/// Upsert a profile on sign-in.
async fn sync(
    State(state): State<AppState>,
    Json(req): Json<SyncRequest>,
) -> AppResult<Json<user::Model>> {
    req.validate()?;

    let user = state
        .user_service
        .sync(SyncUserInput {
            firebase_uid: req.uid,
            email: req.email,
            name: req.name,
            image: req.image,
            location: req.location,
        })
        .await?;

    Ok(Json(user))
}

/// Parse a client-supplied birthday, accepting RFC 3339 or a bare date.
fn parse_birthday(raw: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt);
    }
    chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().into())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/check", post(check))
        .route("/create", post(create))
        .route("/sync", post(sync))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_birthday_rfc3339() {
        let parsed = parse_birthday("1990-04-12T00:00:00Z").unwrap();
        assert_eq!(parsed.timestamp(), 639_878_400);
    }

    #[test]
    fn test_parse_birthday_bare_date() {
        assert!(parse_birthday("1990-04-12").is_some());
    }

    #[test]
    fn test_parse_birthday_garbage() {
        assert!(parse_birthday("next tuesday").is_none());
    }

    #[test]
    fn test_create_request_requires_uid_and_email() {
        let req: CreateRequest =
            serde_json::from_str(r#"{"uid": "", "email": "a@b.com"}"#).unwrap();
        assert!(req.validate().is_err());

        let req: CreateRequest =
            serde_json::from_str(r#"{"uid": "fb-1", "email": "a@b.com"}"#).unwrap();
        assert!(req.validate().is_ok());
    }
}
