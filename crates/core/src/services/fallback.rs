//! Static fallback question bank.
//!
//! The last resort of deck assembly: when neither the database nor the
//! generator can satisfy a bucket, cards come from this fixed, hand-authored
//! list. Sampled items are never persisted; they carry synthetic
//! `fallback-` ids that the reaction recorder recognizes and skips.

use std::collections::HashSet;

use chrono::Utc;
use queple_common::{IdGenerator, SYSTEM_USER_ID};
use queple_db::entities::{Gender, question};
use rand::seq::SliceRandom;

struct StaticQuestion {
    content: &'static str,
    for_gender: Gender,
    level: i32,
    category_id: &'static str,
    is_18_plus: bool,
}

const STATIC_QUESTIONS: &[StaticQuestion] = &[
    // --- BOTH ---
    StaticQuestion {
        content: "What is your biggest fear that you haven't told anyone?",
        for_gender: Gender::Both,
        level: 5,
        category_id: "c7",
        is_18_plus: false,
    },
    StaticQuestion {
        content: "If you could change one thing about your past, what would it be?",
        for_gender: Gender::Both,
        level: 7,
        category_id: "c3",
        is_18_plus: false,
    },
    StaticQuestion {
        content: "What's the most adventurous thing you've ever done in bed?",
        for_gender: Gender::Both,
        level: 8,
        category_id: "c1",
        is_18_plus: true,
    },
    StaticQuestion {
        content: "Who was your first crush and why did you like them?",
        for_gender: Gender::Both,
        level: 3,
        category_id: "c8",
        is_18_plus: false,
    },
    StaticQuestion {
        content: "What is a controversial opinion you hold?",
        for_gender: Gender::Both,
        level: 4,
        category_id: "c7",
        is_18_plus: false,
    },
    StaticQuestion {
        content: "Describe your ideal romantic date.",
        for_gender: Gender::Both,
        level: 2,
        category_id: "c8",
        is_18_plus: false,
    },
    StaticQuestion {
        content: "What is the biggest lie you've ever told your parents?",
        for_gender: Gender::Both,
        level: 6,
        category_id: "c1",
        is_18_plus: false,
    },
    StaticQuestion {
        content: "Have you ever ghosted someone? Why?",
        for_gender: Gender::Both,
        level: 4,
        category_id: "c6",
        is_18_plus: false,
    },
    StaticQuestion {
        content: "What turns you on the most intellectually?",
        for_gender: Gender::Both,
        level: 5,
        category_id: "c7",
        is_18_plus: false,
    },
    StaticQuestion {
        content: "If you had one week left to live, how would you spend it?",
        for_gender: Gender::Both,
        level: 9,
        category_id: "c4",
        is_18_plus: false,
    },
    StaticQuestion {
        content: "What is the most meaningful gift you have ever received?",
        for_gender: Gender::Both,
        level: 3,
        category_id: "c8",
        is_18_plus: false,
    },
    StaticQuestion {
        content: "What is a memory that always makes you smile?",
        for_gender: Gender::Both,
        level: 2,
        category_id: "c8",
        is_18_plus: false,
    },
    // --- MALE ---
    StaticQuestion {
        content: "What is a compliment you wish you received more often?",
        for_gender: Gender::Male,
        level: 4,
        category_id: "c7",
        is_18_plus: false,
    },
    StaticQuestion {
        content: "What does 'being a man' mean to you in today's world?",
        for_gender: Gender::Male,
        level: 7,
        category_id: "c7",
        is_18_plus: false,
    },
    StaticQuestion {
        content: "What's something you find confusing about women?",
        for_gender: Gender::Male,
        level: 3,
        category_id: "c6",
        is_18_plus: false,
    },
    StaticQuestion {
        content: "How do you prefer to be comforted when you're stressed?",
        for_gender: Gender::Male,
        level: 5,
        category_id: "c7",
        is_18_plus: false,
    },
    StaticQuestion {
        content: "What is your biggest insecurity in a relationship?",
        for_gender: Gender::Male,
        level: 8,
        category_id: "c2",
        is_18_plus: false,
    },
    StaticQuestion {
        content: "When was the last time you cried, and why?",
        for_gender: Gender::Male,
        level: 6,
        category_id: "c2",
        is_18_plus: false,
    },
    StaticQuestion {
        content: "What puts you in the mood instantly?",
        for_gender: Gender::Male,
        level: 7,
        category_id: "c2",
        is_18_plus: true,
    },
    StaticQuestion {
        content: "What is a hobby you would love to start if you had the time?",
        for_gender: Gender::Male,
        level: 2,
        category_id: "c8",
        is_18_plus: false,
    },
    // --- FEMALE ---
    StaticQuestion {
        content: "What's a gesture that makes you feel most loved?",
        for_gender: Gender::Female,
        level: 3,
        category_id: "c8",
        is_18_plus: false,
    },
    StaticQuestion {
        content: "What is something you wish men understood better about women?",
        for_gender: Gender::Female,
        level: 5,
        category_id: "c6",
        is_18_plus: false,
    },
    StaticQuestion {
        content: "How has your relationship with your body changed over time?",
        for_gender: Gender::Female,
        level: 8,
        category_id: "c5",
        is_18_plus: false,
    },
    StaticQuestion {
        content: "What's your biggest turn-off in a partner?",
        for_gender: Gender::Female,
        level: 4,
        category_id: "c8",
        is_18_plus: false,
    },
    StaticQuestion {
        content: "What does 'femininity' mean to you?",
        for_gender: Gender::Female,
        level: 7,
        category_id: "c7",
        is_18_plus: false,
    },
    StaticQuestion {
        content: "What is one thing you need more of in the bedroom?",
        for_gender: Gender::Female,
        level: 8,
        category_id: "c2",
        is_18_plus: true,
    },
    StaticQuestion {
        content: "Who is the strongest woman you know?",
        for_gender: Gender::Female,
        level: 3,
        category_id: "c8",
        is_18_plus: false,
    },
    StaticQuestion {
        content: "What makes you feel most empowered?",
        for_gender: Gender::Female,
        level: 5,
        category_id: "c7",
        is_18_plus: false,
    },
];

/// The static question bank.
#[derive(Clone, Default)]
pub struct FallbackBank {
    id_gen: IdGenerator,
}

impl FallbackBank {
    /// Create a new fallback bank.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            id_gen: IdGenerator::new(),
        }
    }

    /// Sample up to `count` questions for the given gender bucket.
    ///
    /// A `BOTH` bucket accepts every entry. Exclusion is keyed by content
    /// text since these items have no stable id. When `allow_18_plus` is
    /// false, adult entries never appear, whatever the bucket.
    #[must_use]
    pub fn sample(
        &self,
        gender: Gender,
        count: usize,
        exclude_contents: &HashSet<String>,
        allow_18_plus: bool,
    ) -> Vec<question::Model> {
        let mut candidates: Vec<&StaticQuestion> = STATIC_QUESTIONS
            .iter()
            .filter(|q| gender == Gender::Both || q.for_gender == gender)
            .filter(|q| allow_18_plus || !q.is_18_plus)
            .filter(|q| !exclude_contents.contains(q.content))
            .collect();

        candidates.shuffle(&mut rand::thread_rng());

        candidates
            .into_iter()
            .take(count)
            .map(|q| question::Model {
                id: self.id_gen.generate_fallback(),
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
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use queple_common::is_transient_question_id;

    #[test]
    fn test_sample_matches_gender() {
        let bank = FallbackBank::new();
        let result = bank.sample(Gender::Male, 8, &HashSet::new(), true);

        assert!(!result.is_empty());
        assert!(result.iter().all(|q| q.for_gender == Gender::Male));
    }

    #[test]
    fn test_both_bucket_accepts_all_genders() {
        let bank = FallbackBank::new();
        let result = bank.sample(Gender::Both, STATIC_QUESTIONS.len(), &HashSet::new(), true);

        assert_eq!(result.len(), STATIC_QUESTIONS.len());
    }

    #[test]
    fn test_sampled_ids_are_transient_and_unique() {
        let bank = FallbackBank::new();
        let result = bank.sample(Gender::Both, 6, &HashSet::new(), false);

        let mut seen = HashSet::new();
        for q in &result {
            assert!(is_transient_question_id(&q.id));
            assert!(seen.insert(q.id.clone()));
        }
    }

    #[test]
    fn test_exclusion_by_content() {
        let bank = FallbackBank::new();
        let excluded = "Describe your ideal romantic date.".to_string();
        let mut exclude = HashSet::new();
        exclude.insert(excluded.clone());

        let result = bank.sample(Gender::Both, STATIC_QUESTIONS.len(), &exclude, true);

        assert!(result.iter().all(|q| q.content != excluded));
        assert_eq!(result.len(), STATIC_QUESTIONS.len() - 1);
    }

    #[test]
    fn test_adult_entries_filtered_when_disallowed() {
        let bank = FallbackBank::new();
        let result = bank.sample(Gender::Both, STATIC_QUESTIONS.len(), &HashSet::new(), false);

        assert!(result.iter().all(|q| !q.is_18_plus));
    }
}
