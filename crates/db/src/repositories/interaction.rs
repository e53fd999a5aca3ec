//! Interaction repository (per-user reactions and question counters).

use std::sync::Arc;

use crate::entities::{Question, Reaction, UserQuestion, question, user_question};
use chrono::Utc;
use queple_common::{AppError, AppResult, IdGenerator};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QuerySelect, Set, TransactionTrait, sea_query::Expr,
};

/// Counter adjustment derived from a reaction state transition.
///
/// Computed by [`ReactionDelta::from_transition`] and applied to the question
/// row inside the same transaction as the interaction upsert, so counters
/// always reflect the current reaction state of every (user, question) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReactionDelta {
    pub upvotes: i32,
    pub downvotes: i32,
    pub viewers: i32,
}

impl ReactionDelta {
    /// Compute the counter delta for moving a (user, question) pair from
    /// `prior` to `next`.
    ///
    /// A first-ever interaction counts one viewer. Re-sending the same
    /// reaction changes nothing. A changed reaction moves one count from the
    /// old vote bucket to the new one; SKIP owns no bucket.
    #[must_use]
    pub fn from_transition(prior: Option<Reaction>, next: Reaction) -> Self {
        match prior {
            None => Self {
                upvotes: i32::from(next == Reaction::Upvote),
                downvotes: i32::from(next == Reaction::Downvote),
                viewers: 1,
            },
            Some(prev) if prev == next => Self::default(),
            Some(prev) => Self {
                upvotes: i32::from(next == Reaction::Upvote) - i32::from(prev == Reaction::Upvote),
                downvotes: i32::from(next == Reaction::Downvote)
                    - i32::from(prev == Reaction::Downvote),
                viewers: 0,
            },
        }
    }

    /// Whether applying this delta would change nothing.
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        self.upvotes == 0 && self.downvotes == 0 && self.viewers == 0
    }
}

/// Interaction repository for database operations.
#[derive(Clone)]
pub struct InteractionRepository {
    db: Arc<DatabaseConnection>,
    id_gen: IdGenerator,
}

impl InteractionRepository {
    /// Create a new interaction repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            db,
            id_gen: IdGenerator::new(),
        }
    }

    /// Find an interaction by user and question.
    pub async fn find_by_user_and_question(
        &self,
        user_id: &str,
        question_id: &str,
    ) -> AppResult<Option<user_question::Model>> {
        UserQuestion::find()
            .filter(user_question::Column::UserId.eq(user_id))
            .filter(user_question::Column::QuestionId.eq(question_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Question ids the user has voted on (UPVOTE or DOWNVOTE).
    ///
    /// SKIPs are deliberately absent so skipped cards can resurface in later
    /// decks.
    pub async fn find_voted_question_ids(&self, user_id: &str) -> AppResult<Vec<String>> {
        let rows: Vec<(String,)> = UserQuestion::find()
            .select_only()
            .column(user_question::Column::QuestionId)
            .filter(user_question::Column::UserId.eq(user_id))
            .filter(
                user_question::Column::Reaction.is_in([Reaction::Upvote, Reaction::Downvote]),
            )
            .into_tuple()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Question ids the user has interacted with in any way (including SKIP).
    pub async fn find_seen_question_ids(&self, user_id: &str) -> AppResult<Vec<String>> {
        let rows: Vec<(String,)> = UserQuestion::find()
            .select_only()
            .column(user_question::Column::QuestionId)
            .filter(user_question::Column::UserId.eq(user_id))
            .into_tuple()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Record a reaction and adjust the question's counters, atomically.
    ///
    /// In one transaction: read the prior interaction for the pair, upsert
    /// the row (overwriting reaction and `time_spent`), and apply the
    /// resulting [`ReactionDelta`] to the question's counters. Returns the
    /// applied delta.
    pub async fn apply_reaction(
        &self,
        user_id: &str,
        question_id: &str,
        reaction: Reaction,
        time_spent: f64,
    ) -> AppResult<ReactionDelta> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let prior = UserQuestion::find()
            .filter(user_question::Column::UserId.eq(user_id))
            .filter(user_question::Column::QuestionId.eq(question_id))
            .one(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let delta = ReactionDelta::from_transition(prior.as_ref().map(|p| p.reaction), reaction);

        match prior {
            Some(row) => {
                let mut active = row.into_active_model();
                active.reaction = Set(reaction);
                active.time_spent = Set(time_spent);
                active.updated_at = Set(Some(Utc::now().into()));
                active
                    .update(&txn)
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
            }
            None => {
                let active = user_question::ActiveModel {
                    id: Set(self.id_gen.generate()),
                    user_id: Set(user_id.to_string()),
                    question_id: Set(question_id.to_string()),
                    reaction: Set(reaction),
                    time_spent: Set(time_spent),
                    created_at: Set(Utc::now().into()),
                    updated_at: Set(None),
                };
                active
                    .insert(&txn)
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
            }
        }

        if !delta.is_noop() {
            let mut update = Question::update_many().filter(question::Column::Id.eq(question_id));
            if delta.upvotes != 0 {
                update = update.col_expr(
                    question::Column::Upvotes,
                    Expr::col(question::Column::Upvotes).add(delta.upvotes),
                );
            }
            if delta.downvotes != 0 {
                update = update.col_expr(
                    question::Column::Downvotes,
                    Expr::col(question::Column::Downvotes).add(delta.downvotes),
                );
            }
            if delta.viewers != 0 {
                update = update.col_expr(
                    question::Column::ViewersCount,
                    Expr::col(question::Column::ViewersCount).add(delta.viewers),
                );
            }
            update
                .exec(&txn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(delta)
    }
}
