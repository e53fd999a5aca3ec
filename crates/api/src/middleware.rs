//! API middleware and shared state.

#![allow(missing_docs)]

use queple_core::{
    DeckService, GenerationService, InteractionService, QuestionService, UserService,
};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub deck_service: DeckService,
    pub interaction_service: InteractionService,
    pub question_service: QuestionService,
    pub generation_service: GenerationService,
    pub user_service: UserService,
}
