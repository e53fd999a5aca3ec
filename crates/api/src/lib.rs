//! HTTP API layer for queple-rs.
//!
//! This crate provides the JSON endpoints the card-game client talks to:
//!
//! - **Endpoints**: deck assembly, reactions, auth sync, recommendations
//! - **Extractors**: the optional external-auth identity header
//! - **State**: the service bundle handlers draw from
//!
//! Built on Axum 0.8 with Tower middleware stack.

// Allow dead_code for API compatibility fields in request structs
#![allow(dead_code)]

pub mod endpoints;
pub mod extractors;
pub mod middleware;

pub use endpoints::router;
pub use middleware::AppState;
