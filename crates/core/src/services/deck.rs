//! Deck assembly service.
//!
//! Builds the batch of up to six question cards a client swipes through.
//! Cards come from the database first, then on-demand generation, then the
//! static fallback bank, and are finally ordered by the requested mode.

use std::collections::HashSet;

use queple_common::{AppResult, SYSTEM_USER_ID};
use queple_db::entities::{Gender, question};
use queple_db::repositories::{
    CandidateFilter, InteractionRepository, QuestionRepository, UserRepository,
};
use rand::seq::SliceRandom;
use serde::Deserialize;

use crate::services::fallback::FallbackBank;
use crate::services::generation::{GenerationRequest, GenerationService};

/// Cards per deck.
pub const DECK_SIZE: usize = 6;

/// Candidates fetched per bucket; sampling shuffles within this window.
const CANDIDATE_FETCH: u64 = 30;

/// Gender composition of a deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeckMode {
    /// 3 MALE + 3 FEMALE, interleaved M,F,M,F,M,F.
    #[default]
    Zigzag,
    /// 6 BOTH.
    AllBoth,
    /// 2 MALE + 2 FEMALE + 2 BOTH, shuffled.
    ZigzagBoth,
}

/// Bucket targets for a mode: (gender, how many).
const fn bucket_targets(mode: DeckMode) -> &'static [(Gender, usize)] {
    match mode {
        DeckMode::Zigzag => &[(Gender::Male, 3), (Gender::Female, 3)],
        DeckMode::AllBoth => &[(Gender::Both, 6)],
        DeckMode::ZigzagBoth => &[(Gender::Male, 2), (Gender::Female, 2), (Gender::Both, 2)],
    }
}

/// Per-bucket target size for fallback top-up.
const fn bucket_size(mode: DeckMode) -> usize {
    match mode {
        DeckMode::Zigzag => 3,
        DeckMode::AllBoth => 6,
        DeckMode::ZigzagBoth => 2,
    }
}

/// A deck request.
#[derive(Debug, Clone, Default)]
pub struct DeckInput {
    pub mode: DeckMode,
    pub min_level: i32,
    pub max_level: i32,
    pub allow_18_plus: bool,
    pub category_id: Option<String>,
    /// Ids the client has already shown this session.
    pub exclude_ids: Vec<String>,
    pub user_id: Option<String>,
    pub firebase_uid: Option<String>,
}

/// Deck assembly service.
#[derive(Clone)]
pub struct DeckService {
    question_repo: QuestionRepository,
    interaction_repo: InteractionRepository,
    user_repo: UserRepository,
    generation: GenerationService,
    fallback: FallbackBank,
}

impl DeckService {
    /// Create a new deck service.
    #[must_use]
    pub const fn new(
        question_repo: QuestionRepository,
        interaction_repo: InteractionRepository,
        user_repo: UserRepository,
        generation: GenerationService,
        fallback: FallbackBank,
    ) -> Self {
        Self {
            question_repo,
            interaction_repo,
            user_repo,
            generation,
            fallback,
        }
    }

    /// Assemble an ordered deck of up to six questions.
    pub async fn assemble(&self, input: DeckInput) -> AppResult<Vec<question::Model>> {
        let user_id = self
            .resolve_requester(input.user_id.as_deref(), input.firebase_uid.as_deref())
            .await?;

        // Seen = client-supplied ids plus the requester's voted history.
        // SKIPs are not in the history filter, so skipped cards resurface.
        let mut exclude: HashSet<String> = input.exclude_ids.iter().cloned().collect();
        if let Some(id) = &user_id {
            exclude.extend(self.interaction_repo.find_voted_question_ids(id).await?);
        }

        let targets = bucket_targets(input.mode);

        // Bucket queries are independent; run them concurrently.
        let fetches = targets.iter().map(|&(gender, want)| {
            let filter = CandidateFilter {
                gender: Some(gender),
                genders: None,
                min_level: input.min_level,
                max_level: input.max_level,
                allow_18_plus: input.allow_18_plus,
                category_id: input.category_id.clone(),
                exclude_ids: exclude.iter().cloned().collect(),
            };
            async move {
                (
                    gender,
                    want,
                    self.question_repo.find_candidates(filter, CANDIDATE_FETCH).await,
                )
            }
        });

        let mut pool: Vec<question::Model> = Vec::new();
        let mut deficits: Vec<(Gender, usize)> = Vec::new();

        for (gender, want, result) in futures::future::join_all(fetches).await {
            match result {
                Ok(mut candidates) => {
                    candidates.shuffle(&mut rand::thread_rng());
                    candidates.truncate(want);
                    if candidates.len() < want {
                        deficits.push((gender, want - candidates.len()));
                    }
                    pool.extend(candidates);
                }
                Err(e) => {
                    tracing::warn!(error = %e, gender = ?gender,
                        "Bucket query failed, degrading to generated/fallback cards");
                    deficits.push((gender, want));
                }
            }
        }

        // Top up deficits from the generator, one independent call per bucket.
        if !deficits.is_empty() {
            if self.generation.is_enabled() {
                tracing::info!(deficits = ?deficits, "Triggering generation for deck deficits");
                let creator_id = user_id.clone().unwrap_or_else(|| SYSTEM_USER_ID.to_string());
                let calls = deficits.iter().map(|&(gender, count)| {
                    let request = GenerationRequest {
                        gender,
                        count,
                        min_level: input.min_level,
                        max_level: input.max_level,
                        allow_18_plus: input.allow_18_plus,
                        category_id: input.category_id.clone(),
                        creator_id: creator_id.clone(),
                    };
                    async move { self.generation.generate_for_bucket(&request).await }
                });
                for generated in futures::future::join_all(calls).await {
                    pool.extend(generated);
                }
            } else {
                tracing::warn!("No generation API key configured, skipping generation");
            }
        }

        // Whatever is still missing comes from the static bank. Exclusion
        // here is content-keyed since bank items have no stable ids.
        let target = bucket_size(input.mode);
        for &(gender, _) in &deficits {
            let has = pool.iter().filter(|q| q.for_gender == gender).count();
            if has < target {
                let missing = target - has;
                tracing::warn!(missing, gender = ?gender, "Using static fallbacks");
                pool.extend(
                    self.fallback
                        .sample(gender, missing, &exclude, input.allow_18_plus),
                );
            }
        }

        Ok(order_deck(input.mode, &pool))
    }

    async fn resolve_requester(
        &self,
        user_id: Option<&str>,
        firebase_uid: Option<&str>,
    ) -> AppResult<Option<String>> {
        if let Some(id) = user_id {
            return Ok(Some(id.to_string()));
        }
        if let Some(uid) = firebase_uid {
            return Ok(self.user_repo.find_by_firebase_uid(uid).await?.map(|u| u.id));
        }
        Ok(None)
    }
}

/// Order the assembled pool into the final deck.
///
/// Zigzag pops alternately from the MALE and FEMALE pools in index order
/// (no re-shuffle); other modes dedup then shuffle. Leftover items pad a
/// short deck before truncating to [`DECK_SIZE`].
fn order_deck(mode: DeckMode, pool: &[question::Model]) -> Vec<question::Model> {
    let mut used: HashSet<&str> = HashSet::new();
    let mut sorted: Vec<question::Model> = Vec::with_capacity(DECK_SIZE);

    if mode == DeckMode::Zigzag {
        for _ in 0..3 {
            for gender in [Gender::Male, Gender::Female] {
                if let Some(q) = pool
                    .iter()
                    .find(|q| q.for_gender == gender && !used.contains(q.id.as_str()))
                {
                    used.insert(q.id.as_str());
                    sorted.push(q.clone());
                }
            }
        }
    } else {
        for q in pool {
            if used.insert(q.id.as_str()) {
                sorted.push(q.clone());
            }
        }
        sorted.shuffle(&mut rand::thread_rng());
    }

    // Last-ditch fill with anything unused.
    if sorted.len() < DECK_SIZE {
        for q in pool {
            if !used.contains(q.id.as_str()) {
                used.insert(q.id.as_str());
                sorted.push(q.clone());
            }
        }
    }

    sorted.truncate(DECK_SIZE);
    sorted
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use queple_common::{GenerationConfig, is_transient_question_id};
    use queple_db::repositories::CategoryRepository;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn create_test_question(id: &str, gender: Gender) -> question::Model {
        question::Model {
            id: id.to_string(),
            content: format!("Question {id}"),
            for_gender: gender,
            level: 2,
            is_18_plus: false,
            category_id: "c7".to_string(),
            creator_id: SYSTEM_USER_ID.to_string(),
            upvotes: 0,
            downvotes: 0,
            viewers_count: 0,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    /// Service over empty mocks with generation disabled: every bucket query
    /// finds nothing, so decks come entirely from the static bank.
    fn empty_store_service(bucket_queries: usize) -> DeckService {
        let mut mock = MockDatabase::new(DatabaseBackend::Postgres);
        for _ in 0..bucket_queries {
            mock = mock.append_query_results([Vec::<question::Model>::new()]);
        }
        let question_db = Arc::new(mock.into_connection());
        let interaction_db =
            Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let user_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let category_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let question_repo = QuestionRepository::new(question_db);
        let generation = GenerationService::new(
            GenerationConfig::default(),
            question_repo.clone(),
            CategoryRepository::new(category_db),
        );

        DeckService::new(
            question_repo,
            InteractionRepository::new(interaction_db),
            UserRepository::new(user_db),
            generation,
            FallbackBank::new(),
        )
    }

    #[test]
    fn test_bucket_targets_per_mode() {
        assert_eq!(
            bucket_targets(DeckMode::Zigzag),
            &[(Gender::Male, 3), (Gender::Female, 3)]
        );
        assert_eq!(bucket_targets(DeckMode::AllBoth), &[(Gender::Both, 6)]);
        assert_eq!(
            bucket_targets(DeckMode::ZigzagBoth),
            &[(Gender::Male, 2), (Gender::Female, 2), (Gender::Both, 2)]
        );
    }

    #[test]
    fn test_order_deck_zigzag_alternates() {
        let pool = vec![
            create_test_question("m1", Gender::Male),
            create_test_question("m2", Gender::Male),
            create_test_question("m3", Gender::Male),
            create_test_question("f1", Gender::Female),
            create_test_question("f2", Gender::Female),
            create_test_question("f3", Gender::Female),
        ];

        let deck = order_deck(DeckMode::Zigzag, &pool);

        assert_eq!(deck.len(), 6);
        let genders: Vec<Gender> = deck.iter().map(|q| q.for_gender).collect();
        assert_eq!(
            genders,
            vec![
                Gender::Male,
                Gender::Female,
                Gender::Male,
                Gender::Female,
                Gender::Male,
                Gender::Female
            ]
        );
        // Index order within each pool is preserved.
        assert_eq!(deck[0].id, "m1");
        assert_eq!(deck[1].id, "f1");
        assert_eq!(deck[4].id, "m3");
    }

    #[test]
    fn test_order_deck_zigzag_pads_with_leftovers() {
        // One female short: alternation ends early, leftover male pads.
        let pool = vec![
            create_test_question("m1", Gender::Male),
            create_test_question("m2", Gender::Male),
            create_test_question("m3", Gender::Male),
            create_test_question("m4", Gender::Male),
            create_test_question("f1", Gender::Female),
        ];

        let deck = order_deck(DeckMode::Zigzag, &pool);

        assert_eq!(deck.len(), 5);
        // All pool items survive, no duplicates.
        let ids: HashSet<&str> = deck.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids.len(), 5);
    }

    #[test]
    fn test_order_deck_dedups_and_truncates() {
        let mut pool: Vec<question::Model> = (0..10)
            .map(|i| create_test_question(&format!("b{i}"), Gender::Both))
            .collect();
        // Duplicate entry must not appear twice.
        pool.push(create_test_question("b0", Gender::Both));

        let deck = order_deck(DeckMode::AllBoth, &pool);

        assert_eq!(deck.len(), DECK_SIZE);
        let ids: HashSet<&str> = deck.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids.len(), DECK_SIZE);
    }

    #[tokio::test]
    async fn test_fallback_only_deck_all_both() {
        // No rows, no API key: level 1-3 all_both request is served from the
        // static bank with transient ids and no adult content.
        let service = empty_store_service(1);

        let deck = service
            .assemble(DeckInput {
                mode: DeckMode::AllBoth,
                min_level: 1,
                max_level: 3,
                allow_18_plus: false,
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(deck.len(), DECK_SIZE);
        for q in &deck {
            assert!(is_transient_question_id(&q.id));
            assert!(!q.is_18_plus);
        }
    }

    #[tokio::test]
    async fn test_fallback_only_deck_zigzag_alternates() {
        let service = empty_store_service(2);

        let deck = service
            .assemble(DeckInput {
                mode: DeckMode::Zigzag,
                min_level: 1,
                max_level: 10,
                allow_18_plus: false,
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(deck.len(), DECK_SIZE);
        let genders: Vec<Gender> = deck.iter().map(|q| q.for_gender).collect();
        assert_eq!(
            genders,
            vec![
                Gender::Male,
                Gender::Female,
                Gender::Male,
                Gender::Female,
                Gender::Male,
                Gender::Female
            ]
        );
    }

    #[tokio::test]
    async fn test_deck_never_exceeds_six() {
        let service = empty_store_service(3);

        let deck = service
            .assemble(DeckInput {
                mode: DeckMode::ZigzagBoth,
                min_level: 1,
                max_level: 10,
                allow_18_plus: true,
                ..Default::default()
            })
            .await
            .unwrap();

        assert!(deck.len() <= DECK_SIZE);
    }
}
