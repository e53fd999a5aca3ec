//! Request extractors.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};

/// Header carrying the external-auth identity of the player.
pub const FIREBASE_UID_HEADER: &str = "X-Firebase-UID";

/// Optional external-auth identity extractor.
///
/// Absent or unreadable headers yield `None`; gameplay endpoints treat that
/// as a guest rather than rejecting the request.
#[derive(Debug, Clone)]
pub struct FirebaseUid(pub Option<String>);

impl<S> FromRequestParts<S> for FirebaseUid
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(
            parts
                .headers
                .get(FIREBASE_UID_HEADER)
                .and_then(|value| value.to_str().ok())
                .map(ToString::to_string),
        ))
    }
}
