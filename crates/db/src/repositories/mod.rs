//! Database repositories.

pub mod category;
pub mod interaction;
pub mod question;
pub mod user;

pub use category::CategoryRepository;
pub use interaction::{InteractionRepository, ReactionDelta};
pub use question::{CandidateFilter, QuestionRepository};
pub use user::UserRepository;
