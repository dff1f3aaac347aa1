//! In-memory user repository implementation.
//!
//! Mirrors the Postgres adapter's constraint behavior: a duplicate
//! username (case-insensitive) on create or save is a `Conflict`, the
//! same signal the unique index produces.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use notewell_application::{NewUser, UserRecord, UserRepository};
use notewell_core::{AppError, AppResult};
use notewell_domain::UserId;

/// In-memory user repository backed by a `HashMap`.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<UserId, UserRecord>>,
}

impl InMemoryUserRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_all(&self) -> AppResult<Vec<UserRecord>> {
        let users = self.users.read().await;

        let mut records: Vec<UserRecord> = users.values().cloned().collect();
        records.sort_by(|left, right| {
            left.created_at
                .cmp(&right.created_at)
                .then_with(|| left.username.cmp(&right.username))
        });

        Ok(records)
    }

    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>> {
        Ok(self.users.read().await.get(&user_id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<UserRecord>> {
        let users = self.users.read().await;
        let needle = username.to_lowercase();

        Ok(users
            .values()
            .find(|record| record.username.to_lowercase() == needle)
            .cloned())
    }

    async fn create(&self, new_user: NewUser) -> AppResult<UserId> {
        let mut users = self.users.write().await;

        let needle = new_user.username.to_lowercase();
        if users
            .values()
            .any(|record| record.username.to_lowercase() == needle)
        {
            return Err(AppError::Conflict("duplicate username".to_owned()));
        }

        let now = chrono::Utc::now();
        let record = UserRecord {
            id: UserId::new(),
            username: new_user.username,
            password_hash: new_user.password_hash,
            roles: new_user.roles,
            active: true,
            created_at: now,
            updated_at: now,
        };
        let user_id = record.id;
        users.insert(user_id, record);

        Ok(user_id)
    }

    async fn save(&self, record: &UserRecord) -> AppResult<()> {
        let mut users = self.users.write().await;

        let needle = record.username.to_lowercase();
        if users
            .values()
            .any(|stored| stored.id != record.id && stored.username.to_lowercase() == needle)
        {
            return Err(AppError::Conflict("duplicate username".to_owned()));
        }

        let mut updated = record.clone();
        updated.updated_at = chrono::Utc::now();
        users.insert(updated.id, updated);

        Ok(())
    }

    async fn delete(&self, user_id: UserId) -> AppResult<()> {
        self.users.write().await.remove(&user_id);
        Ok(())
    }
}
