//! Business logic services.

#![allow(missing_docs)]

pub mod deck;
pub mod fallback;
pub mod generation;
pub mod interaction;
pub mod question;
pub mod user;

pub use deck::{DeckInput, DeckMode, DeckService};
pub use fallback::FallbackBank;
pub use generation::{GenerationRequest, GenerationService};
pub use interaction::{InteractionService, RecordInput, RecordOutcome};
pub use question::{QuestionService, RecommendInput, RecommendResponse, RecommendationSource};
pub use user::{CreateUserInput, SyncUserInput, UserService};
