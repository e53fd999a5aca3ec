//! Reaction recording service.
//!
//! Takes a swipe (upvote / downvote / skip), upserts the per-user
//! interaction row, and adjusts the question's aggregate counters — all in
//! one transaction owned by the repository layer. Gameplay never blocks on
//! recording: failures are soft.

use queple_common::{AppResult, SYSTEM_USER_ID, is_transient_question_id};
use queple_db::entities::Reaction;
use queple_db::repositories::{InteractionRepository, ReactionDelta, UserRepository};

/// One reaction to record.
#[derive(Debug, Clone)]
pub struct RecordInput {
    pub question_id: String,
    pub reaction: Reaction,
    /// Seconds the card was on screen; overwrites any earlier value.
    pub time_spent: f64,
    /// Explicit acting user, if the caller knows it.
    pub user_id: Option<String>,
    /// External-auth identity, resolved to a user row when present.
    pub firebase_uid: Option<String>,
}

/// What recording actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// Interaction persisted; counters moved by the contained delta.
    Recorded(ReactionDelta),
    /// Nothing written: the question only exists in memory (fallback/mock
    /// id) or the caller is an anonymous guest.
    Skipped,
}

/// Reaction recording service.
#[derive(Clone)]
pub struct InteractionService {
    interaction_repo: InteractionRepository,
    user_repo: UserRepository,
}

impl InteractionService {
    /// Create a new interaction service.
    #[must_use]
    pub const fn new(interaction_repo: InteractionRepository, user_repo: UserRepository) -> Self {
        Self {
            interaction_repo,
            user_repo,
        }
    }

    /// Record a reaction.
    ///
    /// Transient (fallback/mock) question ids and fully anonymous callers
    /// succeed without touching the database. Unknown identities degrade to
    /// the sentinel system user rather than failing.
    pub async fn record(&self, input: RecordInput) -> AppResult<RecordOutcome> {
        if is_transient_question_id(&input.question_id) {
            tracing::debug!(question_id = %input.question_id,
                "Skipping persistence for transient question");
            return Ok(RecordOutcome::Skipped);
        }

        let Some(user_id) = self
            .resolve_user(input.user_id.as_deref(), input.firebase_uid.as_deref())
            .await?
        else {
            tracing::debug!("Guest reaction accepted without persistence");
            return Ok(RecordOutcome::Skipped);
        };

        let delta = self
            .interaction_repo
            .apply_reaction(&user_id, &input.question_id, input.reaction, input.time_spent)
            .await?;

        Ok(RecordOutcome::Recorded(delta))
    }

    /// Resolve the acting user id, or `None` for an anonymous guest.
    ///
    /// An identity that names a missing row falls back to the system user so
    /// the interaction is still counted.
    async fn resolve_user(
        &self,
        user_id: Option<&str>,
        firebase_uid: Option<&str>,
    ) -> AppResult<Option<String>> {
        if let Some(id) = user_id {
            if self.user_repo.find_by_id(id).await?.is_some() {
                return Ok(Some(id.to_string()));
            }
            tracing::warn!(user_id = %id, "User not found, attributing to system user");
            return Ok(Some(SYSTEM_USER_ID.to_string()));
        }

        if let Some(uid) = firebase_uid {
            return match self.user_repo.find_by_firebase_uid(uid).await? {
                Some(user) => Ok(Some(user.id)),
                None => {
                    tracing::warn!("Unknown external identity, attributing to system user");
                    Ok(Some(SYSTEM_USER_ID.to_string()))
                }
            };
        }

        Ok(None)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use queple_db::entities::{user, user_question};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn create_test_user(id: &str) -> user::Model {
        user::Model {
            id: id.to_string(),
            firebase_uid: Some(format!("fb-{id}")),
            email: None,
            name: None,
            image: None,
            birthday: None,
            ip_address: None,
            location: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn create_test_interaction(reaction: Reaction) -> user_question::Model {
        user_question::Model {
            id: "i1".to_string(),
            user_id: "u1".to_string(),
            question_id: "q1".to_string(),
            reaction,
            time_spent: 2.0,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_transient_id_skips_persistence() {
        // Empty mocks: any query would fail the test.
        let interaction_db =
            Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let user_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = InteractionService::new(
            InteractionRepository::new(interaction_db),
            UserRepository::new(user_db),
        );

        let outcome = service
            .record(RecordInput {
                question_id: "fallback-01hq3kq8abc".to_string(),
                reaction: Reaction::Upvote,
                time_spent: 3.0,
                user_id: Some("u1".to_string()),
                firebase_uid: None,
            })
            .await
            .unwrap();

        assert_eq!(outcome, RecordOutcome::Skipped);
    }

    #[tokio::test]
    async fn test_guest_without_identity_is_skipped() {
        let interaction_db =
            Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let user_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = InteractionService::new(
            InteractionRepository::new(interaction_db),
            UserRepository::new(user_db),
        );

        let outcome = service
            .record(RecordInput {
                question_id: "q1".to_string(),
                reaction: Reaction::Skip,
                time_spent: 0.0,
                user_id: None,
                firebase_uid: None,
            })
            .await
            .unwrap();

        assert_eq!(outcome, RecordOutcome::Skipped);
    }

    #[tokio::test]
    async fn test_record_first_reaction() {
        let inserted = create_test_interaction(Reaction::Upvote);

        let interaction_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // prior read: none
                .append_query_results([Vec::<user_question::Model>::new()])
                // insert returning
                .append_query_results([[inserted]])
                // counter update
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_user("u1")]])
                .into_connection(),
        );

        let service = InteractionService::new(
            InteractionRepository::new(interaction_db),
            UserRepository::new(user_db),
        );

        let outcome = service
            .record(RecordInput {
                question_id: "q1".to_string(),
                reaction: Reaction::Upvote,
                time_spent: 2.0,
                user_id: Some("u1".to_string()),
                firebase_uid: None,
            })
            .await
            .unwrap();

        assert_eq!(
            outcome,
            RecordOutcome::Recorded(ReactionDelta {
                upvotes: 1,
                downvotes: 0,
                viewers: 1
            })
        );
    }

    #[tokio::test]
    async fn test_unknown_user_falls_back_to_system_identity() {
        let inserted = create_test_interaction(Reaction::Skip);

        let interaction_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user_question::Model>::new()])
                .append_query_results([[inserted]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );
        // User lookup misses.
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );

        let service = InteractionService::new(
            InteractionRepository::new(interaction_db),
            UserRepository::new(user_db),
        );

        let outcome = service
            .record(RecordInput {
                question_id: "q1".to_string(),
                reaction: Reaction::Skip,
                time_spent: 1.0,
                user_id: Some("ghost".to_string()),
                firebase_uid: None,
            })
            .await
            .unwrap();

        assert!(matches!(outcome, RecordOutcome::Recorded(_)));
    }
}
