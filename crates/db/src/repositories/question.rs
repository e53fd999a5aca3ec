//! Question repository.

use std::sync::Arc;

use crate::entities::{Gender, Question, question};
use queple_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

/// Filter for candidate-question queries.
///
/// `gender = None` matches any target gender; `category_id = None` matches
/// any category. Excluded ids never appear in the result.
#[derive(Debug, Clone, Default)]
pub struct CandidateFilter {
    pub gender: Option<Gender>,
    /// Widened gender set (used by recommendations: target plus BOTH).
    pub genders: Option<Vec<Gender>>,
    pub min_level: i32,
    pub max_level: i32,
    pub allow_18_plus: bool,
    pub category_id: Option<String>,
    pub exclude_ids: Vec<String>,
}

impl CandidateFilter {
    fn apply(self, mut query: sea_orm::Select<Question>) -> sea_orm::Select<Question> {
        query = query
            .filter(question::Column::Level.gte(self.min_level))
            .filter(question::Column::Level.lte(self.max_level));

        if let Some(gender) = self.gender {
            query = query.filter(question::Column::ForGender.eq(gender));
        }
        if let Some(genders) = self.genders {
            query = query.filter(question::Column::ForGender.is_in(genders));
        }
        if !self.allow_18_plus {
            query = query.filter(question::Column::Is18Plus.eq(false));
        }
        if let Some(category_id) = self.category_id {
            query = query.filter(question::Column::CategoryId.eq(category_id));
        }
        if !self.exclude_ids.is_empty() {
            query = query.filter(question::Column::Id.is_not_in(self.exclude_ids));
        }

        query
    }
}

/// Question repository for database operations.
#[derive(Clone)]
pub struct QuestionRepository {
    db: Arc<DatabaseConnection>,
}

impl QuestionRepository {
    /// Create a new question repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a question by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<question::Model>> {
        Question::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a question by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<question::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::QuestionNotFound(id.to_string()))
    }

    /// Create a new question.
    pub async fn create(&self, model: question::ActiveModel) -> AppResult<question::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Upsert a question by id (seed path).
    pub async fn upsert(&self, model: question::Model) -> AppResult<question::Model> {
        match self.find_by_id(&model.id).await? {
            Some(existing) => {
                let mut active = existing.into_active_model();
                active.content = Set(model.content);
                active.for_gender = Set(model.for_gender);
                active.level = Set(model.level);
                active.is_18_plus = Set(model.is_18_plus);
                active.category_id = Set(model.category_id);
                active.creator_id = Set(model.creator_id);
                active
                    .update(self.db.as_ref())
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))
            }
            None => self.create(model.into_active_model()).await,
        }
    }

    /// Fetch up to `limit` candidate questions matching the filter.
    ///
    /// The caller samples from the result; fetching more than it needs is
    /// what makes the shuffle meaningful.
    pub async fn find_candidates(
        &self,
        filter: CandidateFilter,
        limit: u64,
    ) -> AppResult<Vec<question::Model>> {
        filter
            .apply(Question::find())
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Fetch up to `limit` matching questions, newest first (recommendations).
    pub async fn find_recent(
        &self,
        filter: CandidateFilter,
        limit: u64,
    ) -> AppResult<Vec<question::Model>> {
        filter
            .apply(Question::find())
            .order_by_desc(question::Column::CreatedAt)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count questions not in the given id set.
    pub async fn count_excluding(&self, exclude_ids: &[String]) -> AppResult<u64> {
        let mut query = Question::find();
        if !exclude_ids.is_empty() {
            query = query.filter(question::Column::Id.is_not_in(exclude_ids.to_vec()));
        }
        query
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Fetch the question at `offset` among those not in the given id set.
    pub async fn find_at_offset_excluding(
        &self,
        exclude_ids: &[String],
        offset: u64,
    ) -> AppResult<Option<question::Model>> {
        let mut query = Question::find();
        if !exclude_ids.is_empty() {
            query = query.filter(question::Column::Id.is_not_in(exclude_ids.to_vec()));
        }
        query
            .order_by_asc(question::Column::Id)
            .offset(offset)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
