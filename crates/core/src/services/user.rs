//! User service: existence checks and profile upserts keyed by the
//! external-auth identifier.

use chrono::Utc;
use queple_common::{AppResult, IdGenerator};
use queple_db::entities::user;
use queple_db::repositories::UserRepository;
use sea_orm::{Set, prelude::DateTimeWithTimeZone};

/// Explicit registration input.
#[derive(Debug, Clone)]
pub struct CreateUserInput {
    pub firebase_uid: String,
    pub email: String,
    pub name: Option<String>,
    pub image: Option<String>,
    pub birthday: Option<DateTimeWithTimeZone>,
    pub ip_address: Option<String>,
    pub location: Option<String>,
}

/// Profile-refresh input (sign-in sync).
#[derive(Debug, Clone)]
pub struct SyncUserInput {
    pub firebase_uid: String,
    pub email: String,
    pub name: Option<String>,
    pub image: Option<String>,
    pub location: Option<String>,
}

/// User service.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub const fn new(user_repo: UserRepository) -> Self {
        Self {
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Look up a user by external-auth identifier.
    pub async fn check(&self, firebase_uid: &str) -> AppResult<Option<user::Model>> {
        self.user_repo.find_by_firebase_uid(firebase_uid).await
    }

    /// Register a new user.
    pub async fn create(&self, input: CreateUserInput) -> AppResult<user::Model> {
        let model = user::ActiveModel {
            id: Set(self.id_gen.generate()),
            firebase_uid: Set(Some(input.firebase_uid)),
            email: Set(Some(input.email)),
            name: Set(input.name),
            image: Set(input.image),
            birthday: Set(input.birthday),
            ip_address: Set(input.ip_address),
            location: Set(Some(
                input.location.unwrap_or_else(|| "Unknown".to_string()),
            )),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };
        self.user_repo.create(model).await
    }

    /// Upsert a user profile on sign-in.
    pub async fn sync(&self, input: SyncUserInput) -> AppResult<user::Model> {
        let uid = input.firebase_uid.clone();
        let model = user::ActiveModel {
            id: Set(self.id_gen.generate()),
            firebase_uid: Set(Some(input.firebase_uid)),
            email: Set(Some(input.email)),
            name: Set(input.name),
            image: Set(input.image),
            birthday: sea_orm::ActiveValue::NotSet,
            ip_address: sea_orm::ActiveValue::NotSet,
            location: match input.location {
                Some(location) => Set(Some(location)),
                None => sea_orm::ActiveValue::NotSet,
            },
            // Left unset so the column default applies on insert and the
            // original signup time survives updates.
            created_at: sea_orm::ActiveValue::NotSet,
            updated_at: sea_orm::ActiveValue::NotSet,
        };
        self.user_repo.upsert_by_firebase_uid(&uid, model).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn create_test_user(id: &str, uid: &str) -> user::Model {
        user::Model {
            id: id.to_string(),
            firebase_uid: Some(uid.to_string()),
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
    async fn test_check_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_user("u1", "fb-1")]])
                .into_connection(),
        );

        let service = UserService::new(UserRepository::new(db));
        let result = service.check("fb-1").await.unwrap();

        assert!(result.is_some());
    }

    #[tokio::test]
    async fn test_check_missing() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );

        let service = UserService::new(UserRepository::new(db));
        let result = service.check("nobody").await.unwrap();

        assert!(result.is_none());
    }
}
