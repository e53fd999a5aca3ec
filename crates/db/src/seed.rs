//! Idempotent seed data: the sentinel system user, the fixed category list,
//! and a starter question set.
//!
//! Runs at server startup after migrations; every write is an upsert so
//! repeated runs are harmless.

use std::sync::Arc;

use crate::entities::{Gender, question, user};
use crate::repositories::{CategoryRepository, QuestionRepository, UserRepository};
use chrono::Utc;
use queple_common::{AppResult, SYSTEM_USER_ID};
use sea_orm::{DatabaseConnection, Set};
use tracing::info;

const CATEGORIES: &[(&str, &str)] = &[
    ("c1", "Secret"),
    ("c2", "Privacy"),
    ("c3", "What If"),
    ("c4", "Future"),
    ("c5", "Family"),
    ("c6", "Case Study"),
    ("c7", "Personality"),
    ("c8", "Favorites"),
];

struct SeedQuestion {
    id: &'static str,
    content: &'static str,
    for_gender: Gender,
    level: i32,
    is_18_plus: bool,
    category_id: &'static str,
}

const STARTER_QUESTIONS: &[SeedQuestion] = &[
    SeedQuestion {
        id: "1",
        content: "What is your biggest fear that you haven't told anyone?",
        for_gender: Gender::Both,
        level: 5,
        is_18_plus: false,
        category_id: "c7",
    },
    SeedQuestion {
        id: "2",
        content: "If you could change one thing about your past, what would it be?",
        for_gender: Gender::Both,
        level: 7,
        is_18_plus: false,
        category_id: "c3",
    },
    SeedQuestion {
        id: "3",
        content: "What's the most adventurous thing you've ever done in bed?",
        for_gender: Gender::Both,
        level: 8,
        is_18_plus: true,
        category_id: "c1",
    },
    SeedQuestion {
        id: "4",
        content: "Who was your first crush and why did you like them?",
        for_gender: Gender::Both,
        level: 3,
        is_18_plus: false,
        category_id: "c8",
    },
    SeedQuestion {
        id: "5",
        content: "What is a controversial opinion you hold?",
        for_gender: Gender::Both,
        level: 4,
        is_18_plus: false,
        category_id: "c7",
    },
    SeedQuestion {
        id: "6",
        content: "Describe your ideal romantic date.",
        for_gender: Gender::Both,
        level: 2,
        is_18_plus: false,
        category_id: "c8",
    },
    SeedQuestion {
        id: "7",
        content: "What is the biggest lie you've ever told your parents?",
        for_gender: Gender::Both,
        level: 6,
        is_18_plus: false,
        category_id: "c1",
    },
    SeedQuestion {
        id: "8",
        content: "Have you ever ghosted someone? Why?",
        for_gender: Gender::Both,
        level: 4,
        is_18_plus: false,
        category_id: "c6",
    },
    SeedQuestion {
        id: "9",
        content: "What turns you on the most intellectually?",
        for_gender: Gender::Both,
        level: 5,
        is_18_plus: false,
        category_id: "c7",
    },
    SeedQuestion {
        id: "10",
        content: "If you had one week left to live, how would you spend it?",
        for_gender: Gender::Both,
        level: 9,
        is_18_plus: false,
        category_id: "c4",
    },
    SeedQuestion {
        id: "11",
        content: "What is a compliment you wish you received more often?",
        for_gender: Gender::Male,
        level: 4,
        is_18_plus: false,
        category_id: "c7",
    },
    SeedQuestion {
        id: "12",
        content: "What does 'being a man' mean to you in today's world?",
        for_gender: Gender::Male,
        level: 7,
        is_18_plus: false,
        category_id: "c7",
    },
    SeedQuestion {
        id: "13",
        content: "What's something you find confusing about women?",
        for_gender: Gender::Male,
        level: 3,
        is_18_plus: false,
        category_id: "c6",
    },
    SeedQuestion {
        id: "14",
        content: "How do you prefer to be comforted when you're stressed?",
        for_gender: Gender::Male,
        level: 5,
        is_18_plus: false,
        category_id: "c7",
    },
    SeedQuestion {
        id: "15",
        content: "What is your biggest insecurity in a relationship?",
        for_gender: Gender::Male,
        level: 8,
        is_18_plus: false,
        category_id: "c2",
    },
    SeedQuestion {
        id: "16",
        content: "What's a gesture that makes you feel most loved?",
        for_gender: Gender::Female,
        level: 3,
        is_18_plus: false,
        category_id: "c8",
    },
    SeedQuestion {
        id: "17",
        content: "What is something you wish men understood better about women?",
        for_gender: Gender::Female,
        level: 5,
        is_18_plus: false,
        category_id: "c6",
    },
    SeedQuestion {
        id: "18",
        content: "How has your relationship with your body changed over time?",
        for_gender: Gender::Female,
        level: 8,
        is_18_plus: false,
        category_id: "c5",
    },
    SeedQuestion {
        id: "19",
        content: "What's your biggest turn-off in a partner?",
        for_gender: Gender::Female,
        level: 4,
        is_18_plus: false,
        category_id: "c8",
    },
    SeedQuestion {
        id: "20",
        content: "What does 'femininity' mean to you?",
        for_gender: Gender::Female,
        level: 7,
        is_18_plus: false,
        category_id: "c7",
    },
];

/// Upsert the system user, categories, and starter questions.
pub async fn run(db: &Arc<DatabaseConnection>) -> AppResult<()> {
    let user_repo = UserRepository::new(Arc::clone(db));
    let category_repo = CategoryRepository::new(Arc::clone(db));
    let question_repo = QuestionRepository::new(Arc::clone(db));

    let system_user = user::ActiveModel {
        id: Set(SYSTEM_USER_ID.to_string()),
        firebase_uid: Set(Some("system-firebase-uid".to_string())),
        email: Set(Some("system@queple.com".to_string())),
        name: Set(Some("Queple AI".to_string())),
        image: Set(Some("https://queple.com/logo.png".to_string())),
        birthday: Set(None),
        ip_address: Set(None),
        location: Set(Some("Internet".to_string())),
        created_at: Set(Utc::now().into()),
        updated_at: Set(None),
    };
    user_repo.upsert_by_id(SYSTEM_USER_ID, system_user).await?;

    for (id, name) in CATEGORIES {
        category_repo.upsert(id, name).await?;
    }

    for q in STARTER_QUESTIONS {
        question_repo
            .upsert(question::Model {
                id: q.id.to_string(),
                content: q.content.to_string(),
                for_gender: q.for_gender,
                level: q.level,
                is_18_plus: q.is_18_plus,
                category_id: q.category_id.to_string(),
                creator_id: SYSTEM_USER_ID.to_string(),
                upvotes: 0,
                downvotes: 0,
                viewers_count: 0,
                created_at: Utc::now().into(),
                updated_at: None,
            })
            .await?;
    }

    info!(
        questions = STARTER_QUESTIONS.len(),
        categories = CATEGORIES.len(),
        "Seed data synced"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starter_set_shape() {
        assert_eq!(STARTER_QUESTIONS.len(), 20);
        assert_eq!(CATEGORIES.len(), 8);

        // Every starter question references a seeded category.
        for q in STARTER_QUESTIONS {
            assert!(CATEGORIES.iter().any(|(id, _)| *id == q.category_id));
            assert!((1..=10).contains(&q.level));
        }
    }
}
