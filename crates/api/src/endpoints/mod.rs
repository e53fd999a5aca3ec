//! API endpoints.

mod auth;
mod generate;
mod questions;
mod recommendations;

use axum::{
    Router,
    routing::post,
};

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/question", post(questions::deck))
        .nest("/questions", questions::router())
        .nest("/auth", auth::router())
        .route("/recommendations", post(recommendations::recommend))
        .route("/generate", post(generate::generate))
}
