//! Category repository.

use std::sync::Arc;

use crate::entities::{Category, category};
use queple_common::{AppError, AppResult};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};

/// Category repository for database operations.
#[derive(Clone)]
pub struct CategoryRepository {
    db: Arc<DatabaseConnection>,
}

impl CategoryRepository {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a category by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<category::Model>> {
        Category::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find any category (used to attribute generated questions when the
    /// request names none).
    pub async fn find_first(&self) -> AppResult<Option<category::Model>> {
        Category::find()
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new category.
    pub async fn create(&self, model: category::ActiveModel) -> AppResult<category::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Upsert a category by id (seed path).
    pub async fn upsert(&self, id: &str, name: &str) -> AppResult<category::Model> {
        match self.find_by_id(id).await? {
            Some(existing) if existing.name == name => Ok(existing),
            Some(_) => {
                let active = category::ActiveModel {
                    id: Set(id.to_string()),
                    name: Set(name.to_string()),
                };
                active
                    .update(self.db.as_ref())
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))
            }
            None => {
                self.create(category::ActiveModel {
                    id: Set(id.to_string()),
                    name: Set(name.to_string()),
                })
                .await
            }
        }
    }
}
