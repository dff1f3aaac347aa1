//! User management ports and application service.
//!
//! Owns the user CRUD lifecycle: listing, creation with password hashing,
//! full-record updates, and deletion guarded by note back-references.

use std::sync::Arc;

use async_trait::async_trait;

use notewell_core::{AppError, AppResult, NonEmptyString};
use notewell_domain::{UserId, Username, validate_roles};

use crate::note_service::NoteRepository;

// ---------------------------------------------------------------------------
// Ports
// ---------------------------------------------------------------------------

/// User record returned by repository queries.
#[derive(Debug, Clone)]
pub struct UserRecord {
    /// Unique user identifier, assigned by the store.
    pub id: UserId,
    /// Username as entered at creation or last update.
    pub username: String,
    /// Argon2id password hash. Never leaves the service layer.
    pub password_hash: String,
    /// Role tags; always at least one.
    pub roles: Vec<String>,
    /// Whether the account is active.
    pub active: bool,
    /// Creation time, assigned by the store.
    pub created_at: chrono::DateTime<chrono::Utc>,
    /// Last modification time, maintained by the store.
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Fields for a new user record. The store assigns id, timestamps, and the
/// `active` default.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Username, already validated.
    pub username: String,
    /// Argon2id hash of the supplied password.
    pub password_hash: String,
    /// Validated non-empty role tag list.
    pub roles: Vec<String>,
}

/// Repository port for user persistence.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Returns every user record.
    async fn find_all(&self) -> AppResult<Vec<UserRecord>>;

    /// Finds a user by their unique identifier.
    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>>;

    /// Finds a user by username (case-insensitive).
    async fn find_by_username(&self, username: &str) -> AppResult<Option<UserRecord>>;

    /// Creates a new user record. Returns the assigned user ID.
    async fn create(&self, new_user: NewUser) -> AppResult<UserId>;

    /// Persists the mutable fields of an existing record.
    async fn save(&self, record: &UserRecord) -> AppResult<()>;

    /// Deletes a user record.
    async fn delete(&self, user_id: UserId) -> AppResult<()>;
}

/// Port for password hashing. Keeps the application layer free of direct
/// cryptographic library coupling. No verify operation: authentication is
/// out of scope for this service.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password with a one-way salted algorithm.
    fn hash_password(&self, password: &str) -> AppResult<String>;
}

// ---------------------------------------------------------------------------
// Request and response types
// ---------------------------------------------------------------------------

/// Parameters for user creation.
#[derive(Debug, Clone)]
pub struct CreateUserParams {
    /// Requested username; must be unique.
    pub username: String,
    /// Plaintext password, hashed before persistence.
    pub password: String,
    /// Role tags; at least one required.
    pub roles: Vec<String>,
}

/// Parameters for a full-record user update.
#[derive(Debug, Clone)]
pub struct UpdateUserParams {
    /// Identifier of the user to update.
    pub id: UserId,
    /// Replacement username; must not collide with a different user.
    pub username: String,
    /// Replacement role tags; at least one required.
    pub roles: Vec<String>,
    /// Replacement active flag.
    pub active: bool,
    /// New plaintext password; the stored hash is kept when absent.
    pub password: Option<String>,
}

/// User as exposed to callers: the password hash is excluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserView {
    /// Unique user identifier.
    pub id: UserId,
    /// Username.
    pub username: String,
    /// Role tags.
    pub roles: Vec<String>,
    /// Whether the account is active.
    pub active: bool,
    /// Creation time.
    pub created_at: chrono::DateTime<chrono::Utc>,
    /// Last modification time.
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<UserRecord> for UserView {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            username: record.username,
            roles: record.roles,
            active: record.active,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Identifying acknowledgment for a created user. Carries the canonical
/// (trimmed) username rather than the raw request value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedUser {
    /// Identifier assigned by the store.
    pub id: UserId,
    /// Username as persisted.
    pub username: String,
}

/// Identifying confirmation for a deleted user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletedUser {
    /// Identifier the deleted record held.
    pub id: UserId,
    /// Username the deleted record held.
    pub username: String,
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Application service for user CRUD operations.
#[derive(Clone)]
pub struct UserService {
    user_repository: Arc<dyn UserRepository>,
    note_repository: Arc<dyn NoteRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
}

impl UserService {
    /// Creates a new user service.
    #[must_use]
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        note_repository: Arc<dyn NoteRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
    ) -> Self {
        Self {
            user_repository,
            note_repository,
            password_hasher,
        }
    }

    /// Lists all users without their password hashes.
    ///
    /// An empty collection is reported as `NotFound` rather than an empty
    /// list, matching the API's established behavior.
    pub async fn list(&self) -> AppResult<Vec<UserView>> {
        let users = self.user_repository.find_all().await?;

        if users.is_empty() {
            return Err(AppError::NotFound("no users found".to_owned()));
        }

        Ok(users.into_iter().map(UserView::from).collect())
    }

    /// Creates a new user with a hashed password.
    ///
    /// Returns the assigned id and the canonical username for the
    /// acknowledgment message.
    pub async fn create(&self, params: CreateUserParams) -> AppResult<CreatedUser> {
        let username = Username::new(params.username)?;
        validate_password_present(&params.password)?;
        validate_roles(&params.roles)?;

        let duplicate = self
            .user_repository
            .find_by_username(&username.normalized())
            .await?;
        if duplicate.is_some() {
            return Err(AppError::Conflict("duplicate username".to_owned()));
        }

        let password_hash = self.password_hasher.hash_password(&params.password)?;

        let username: String = username.into();
        let id = self
            .user_repository
            .create(NewUser {
                username: username.clone(),
                password_hash,
                roles: params.roles,
            })
            .await?;

        Ok(CreatedUser { id, username })
    }

    /// Applies a full-record update to an existing user.
    ///
    /// Username, roles, and the active flag are replaced unconditionally;
    /// the password hash is replaced only when a new password is supplied.
    /// Returns the updated username.
    pub async fn update(&self, params: UpdateUserParams) -> AppResult<String> {
        let username = Username::new(params.username)?;
        validate_roles(&params.roles)?;

        let Some(mut user) = self.user_repository.find_by_id(params.id).await? else {
            return Err(AppError::NotFound("user not found".to_owned()));
        };

        // Renaming a user to their own current username is allowed.
        let duplicate = self
            .user_repository
            .find_by_username(&username.normalized())
            .await?;
        if let Some(duplicate) = duplicate
            && duplicate.id != params.id
        {
            return Err(AppError::Conflict("duplicate username".to_owned()));
        }

        user.username = username.into();
        user.roles = params.roles;
        user.active = params.active;

        if let Some(ref password) = params.password {
            validate_password_present(password)?;
            user.password_hash = self.password_hasher.hash_password(password)?;
        }

        self.user_repository.save(&user).await?;

        Ok(user.username)
    }

    /// Deletes a user, unless any note still references them.
    ///
    /// Returns the deleted user's username and id for the confirmation
    /// message.
    pub async fn delete(&self, user_id: UserId) -> AppResult<DeletedUser> {
        if self.note_repository.exists_for_user(user_id).await? {
            return Err(AppError::Conflict("user has assigned notes".to_owned()));
        }

        let Some(user) = self.user_repository.find_by_id(user_id).await? else {
            return Err(AppError::NotFound("user not found".to_owned()));
        };

        self.user_repository.delete(user_id).await?;

        Ok(DeletedUser {
            id: user.id,
            username: user.username,
        })
    }
}

fn validate_password_present(password: &str) -> AppResult<()> {
    NonEmptyString::new(password)
        .map(|_| ())
        .map_err(|_| AppError::Validation("password must not be empty".to_owned()))
}
