//! Common utilities and shared types for queple-rs.
//!
//! This crate provides foundational components used across all queple-rs
//! crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **ID Generation**: ULID-based unique identifiers via [`IdGenerator`],
//!   plus the synthetic-id scheme for non-persisted fallback questions
//!
//! # Example
//!
//! ```no_run
//! use queple_common::{AppResult, Config, IdGenerator};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id_gen = IdGenerator::new();
//!     let id = id_gen.generate();
//!     println!("Generated ID: {}", id);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod id;

pub use config::{Config, GenerationConfig};
pub use error::{AppError, AppResult};
pub use id::{
    FALLBACK_ID_PREFIX, IdGenerator, MOCK_ID_PREFIX, SYSTEM_USER_ID, is_transient_question_id,
};
