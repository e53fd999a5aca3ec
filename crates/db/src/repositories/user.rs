//! User repository.

use std::sync::Arc;

use crate::entities::{User, user};
use chrono::Utc;
use queple_common::{AppError, AppResult};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

/// User repository for database operations.
#[derive(Clone)]
pub struct UserRepository {
    db: Arc<DatabaseConnection>,
}

impl UserRepository {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<user::Model>> {
        User::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a user by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<user::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::UserNotFound(id.to_string()))
    }

    /// Find a user by external-auth identifier.
    pub async fn find_by_firebase_uid(&self, uid: &str) -> AppResult<Option<user::Model>> {
        User::find()
            .filter(user::Column::FirebaseUid.eq(uid))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new user.
    pub async fn create(&self, model: user::ActiveModel) -> AppResult<user::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Upsert a user keyed by external-auth identifier.
    ///
    /// Profile fields from `model` overwrite the stored row; fields left
    /// `NotSet` keep their current value.
    pub async fn upsert_by_firebase_uid(
        &self,
        uid: &str,
        model: user::ActiveModel,
    ) -> AppResult<user::Model> {
        match self.find_by_firebase_uid(uid).await? {
            Some(existing) => {
                let id = existing.id.clone();
                let mut active = model;
                active.id = Set(id);
                active.firebase_uid = Set(Some(uid.to_string()));
                active.updated_at = Set(Some(Utc::now().into()));
                active
                    .update(self.db.as_ref())
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))
            }
            None => {
                let mut active = model;
                active.firebase_uid = Set(Some(uid.to_string()));
                self.create(active).await
            }
        }
    }

    /// Upsert a user keyed by primary id (used for the sentinel system user).
    pub async fn upsert_by_id(&self, id: &str, model: user::ActiveModel) -> AppResult<user::Model> {
        match self.find_by_id(id).await? {
            Some(existing) => {
                // Nothing to refresh for an existing row; keep it as-is.
                let _ = model;
                Ok(existing)
            }
            None => {
                let mut active = model;
                active.id = Set(id.to_string());
                self.create(active).await
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_user(id: &str, uid: Option<&str>) -> user::Model {
        user::Model {
            id: id.to_string(),
            firebase_uid: uid.map(ToString::to_string),
            email: Some("a@example.com".to_string()),
            name: Some("A".to_string()),
            image: None,
            birthday: None,
            ip_address: None,
            location: Some("Unknown".to_string()),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_by_firebase_uid_found() {
        let user = create_test_user("u1", Some("fb-1"));

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user.clone()]])
                .into_connection(),
        );

        let repo = UserRepository::new(db);
        let result = repo.find_by_firebase_uid("fb-1").await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().id, "u1");
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );

        let repo = UserRepository::new(db);
        let result = repo.get_by_id("missing").await;

        match result {
            Err(AppError::UserNotFound(id)) => assert_eq!(id, "missing"),
            _ => panic!("Expected UserNotFound error"),
        }
    }
}
