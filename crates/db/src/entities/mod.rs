//! Database entities.

pub mod category;
pub mod question;
pub mod user;
pub mod user_question;

pub use category::Entity as Category;
pub use question::Entity as Question;
pub use user::Entity as User;
pub use user_question::Entity as UserQuestion;

pub use question::Gender;
pub use user_question::Reaction;
