//! Question lookups outside deck assembly: the single next-unseen card and
//! the recommendations mix.

use queple_common::{AppResult, SYSTEM_USER_ID};
use queple_db::entities::{Gender, question};
use queple_db::repositories::{
    CandidateFilter, InteractionRepository, QuestionRepository, UserRepository,
};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;

use crate::services::generation::{GenerationRequest, GenerationService};

/// Chance of injecting freshly generated content even with a full database
/// result.
const FRESH_CONTENT_CHANCE: f64 = 0.2;

/// Recommendations request.
#[derive(Debug, Clone)]
pub struct RecommendInput {
    pub min_level: i32,
    pub max_level: i32,
    pub exclude_ids: Vec<String>,
    pub target_gender: Gender,
    pub allow_18_plus: bool,
    pub limit: usize,
    pub category_id: Option<String>,
}

impl Default for RecommendInput {
    fn default() -> Self {
        Self {
            min_level: 1,
            max_level: 3,
            exclude_ids: Vec::new(),
            target_gender: Gender::Both,
            allow_18_plus: false,
            limit: 5,
            category_id: None,
        }
    }
}

/// Where a recommendations response was sourced from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationSource {
    /// Entirely stored content.
    Database,
    /// Stored content only because generation is unavailable.
    DatabaseFallback,
    /// Stored content mixed with freshly generated questions.
    Hybrid,
}

/// Recommendations response.
#[derive(Debug, Clone, Serialize)]
pub struct RecommendResponse {
    pub source: RecommendationSource,
    pub questions: Vec<question::Model>,
}

/// Question lookup service.
#[derive(Clone)]
pub struct QuestionService {
    question_repo: QuestionRepository,
    interaction_repo: InteractionRepository,
    user_repo: UserRepository,
    generation: GenerationService,
}

impl QuestionService {
    /// Create a new question service.
    #[must_use]
    pub const fn new(
        question_repo: QuestionRepository,
        interaction_repo: InteractionRepository,
        user_repo: UserRepository,
        generation: GenerationService,
    ) -> Self {
        Self {
            question_repo,
            interaction_repo,
            user_repo,
            generation,
        }
    }

    /// One uniformly random question the identified user has never
    /// interacted with, or `None` when exhausted.
    ///
    /// Unlike deck exclusion, any reaction (including SKIP) counts as seen
    /// here.
    pub async fn next_unseen(&self, firebase_uid: Option<&str>) -> AppResult<Option<question::Model>> {
        let seen = match firebase_uid {
            Some(uid) => match self.user_repo.find_by_firebase_uid(uid).await? {
                Some(user) => self.interaction_repo.find_seen_question_ids(&user.id).await?,
                None => Vec::new(),
            },
            None => Vec::new(),
        };

        let count = self.question_repo.count_excluding(&seen).await?;
        if count == 0 {
            return Ok(None);
        }

        let offset = rand::thread_rng().gen_range(0..count);
        self.question_repo.find_at_offset_excluding(&seen, offset).await
    }

    /// The alternate deck-like mix: recent stored content, optionally topped
    /// up (or freshened, 20% of the time) with generated questions.
    pub async fn recommend(&self, input: RecommendInput) -> AppResult<RecommendResponse> {
        let fresh_trigger = rand::thread_rng().gen_bool(FRESH_CONTENT_CHANCE);
        self.recommend_inner(input, fresh_trigger).await
    }

    async fn recommend_inner(
        &self,
        input: RecommendInput,
        fresh_trigger: bool,
    ) -> AppResult<RecommendResponse> {
        let min_level = input.min_level.max(1);
        let max_level = input.max_level.min(10);

        // A gendered request widens to include BOTH cards.
        let genders = match input.target_gender {
            Gender::Both => None,
            gender => Some(vec![gender, Gender::Both]),
        };

        let filter = CandidateFilter {
            gender: None,
            genders,
            min_level,
            max_level,
            allow_18_plus: input.allow_18_plus,
            category_id: input.category_id.clone(),
            exclude_ids: input.exclude_ids.clone(),
        };

        let mut stored = self
            .question_repo
            .find_recent(filter, (input.limit * 2) as u64)
            .await?;
        stored.shuffle(&mut rand::thread_rng());
        stored.truncate(input.limit);

        let needs_more = stored.len() < input.limit;
        if !needs_more && !fresh_trigger {
            return Ok(RecommendResponse {
                source: RecommendationSource::Database,
                questions: stored,
            });
        }

        if !self.generation.is_enabled() {
            tracing::warn!("Generation unavailable, returning stored questions only");
            return Ok(RecommendResponse {
                source: RecommendationSource::DatabaseFallback,
                questions: stored,
            });
        }

        let count = if needs_more {
            input.limit - stored.len()
        } else {
            1
        };

        let generated = self
            .generation
            .generate_for_bucket(&GenerationRequest {
                gender: input.target_gender,
                count,
                min_level,
                max_level,
                allow_18_plus: input.allow_18_plus,
                category_id: input.category_id,
                creator_id: SYSTEM_USER_ID.to_string(),
            })
            .await;

        let mut questions = stored;
        questions.extend(generated);
        questions.truncate(input.limit);

        Ok(RecommendResponse {
            source: RecommendationSource::Hybrid,
            questions,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use queple_common::GenerationConfig;
    use queple_db::repositories::CategoryRepository;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn create_test_question(id: &str) -> question::Model {
        question::Model {
            id: id.to_string(),
            content: format!("Question {id}"),
            for_gender: Gender::Both,
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

    fn service_with_question_db(question_db: Arc<sea_orm::DatabaseConnection>) -> QuestionService {
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

        QuestionService::new(
            question_repo,
            InteractionRepository::new(interaction_db),
            UserRepository::new(user_db),
            generation,
        )
    }

    #[tokio::test]
    async fn test_next_unseen_empty_store() {
        // count query returns zero rows -> None without an offset query
        let question_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit_count(0)]])
                .into_connection(),
        );

        let service = service_with_question_db(question_db);
        let result = service.next_unseen(None).await.unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_recommend_full_database_result() {
        let rows: Vec<question::Model> = (0..10)
            .map(|i| create_test_question(&format!("q{i}")))
            .collect();

        let question_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([rows])
                .into_connection(),
        );

        let service = service_with_question_db(question_db);
        let response = service
            .recommend_inner(RecommendInput::default(), false)
            .await
            .unwrap();

        assert_eq!(response.source, RecommendationSource::Database);
        assert_eq!(response.questions.len(), 5);
    }

    #[tokio::test]
    async fn test_recommend_short_result_without_key_is_database_fallback() {
        let rows = vec![create_test_question("q1"), create_test_question("q2")];

        let question_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([rows])
                .into_connection(),
        );

        let service = service_with_question_db(question_db);
        let response = service
            .recommend_inner(RecommendInput::default(), false)
            .await
            .unwrap();

        assert_eq!(response.source, RecommendationSource::DatabaseFallback);
        assert_eq!(response.questions.len(), 2);
    }

    #[tokio::test]
    async fn test_recommend_fresh_trigger_without_key_is_database_fallback() {
        let rows: Vec<question::Model> = (0..10)
            .map(|i| create_test_question(&format!("q{i}")))
            .collect();

        let question_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([rows])
                .into_connection(),
        );

        let service = service_with_question_db(question_db);
        let response = service
            .recommend_inner(RecommendInput::default(), true)
            .await
            .unwrap();

        // Trigger fired but no key: degrade, keep the stored questions.
        assert_eq!(response.source, RecommendationSource::DatabaseFallback);
        assert_eq!(response.questions.len(), 5);
    }

    /// Build the row shape `count_excluding` reads.
    fn maplit_count(n: i64) -> std::collections::BTreeMap<&'static str, sea_orm::Value> {
        let mut row = std::collections::BTreeMap::new();
        row.insert("num_items", sea_orm::Value::BigInt(Some(n)));
        row
    }
}
