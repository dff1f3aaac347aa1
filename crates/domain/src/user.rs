//! User domain types and validation rules.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use notewell_core::{AppError, AppResult};

/// Unique identifier for a user record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(Uuid);

impl UserId {
    /// Creates a new random user identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a user identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Maximum username length in characters.
pub const USERNAME_MAX_LENGTH: usize = 64;

/// Validated username.
///
/// Usernames are unique across all users; uniqueness comparison is
/// case-insensitive, so `normalized()` is the comparison key while the
/// original casing is preserved for display.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Username(String);

impl Username {
    /// Creates a validated username.
    ///
    /// Leading and trailing whitespace is stripped; the result must be
    /// non-empty and at most [`USERNAME_MAX_LENGTH`] characters.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim();

        if trimmed.is_empty() {
            return Err(AppError::Validation(
                "username must not be empty".to_owned(),
            ));
        }

        if trimmed.chars().count() > USERNAME_MAX_LENGTH {
            return Err(AppError::Validation(format!(
                "username must not exceed {USERNAME_MAX_LENGTH} characters"
            )));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the username as entered (minus surrounding whitespace).
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the lowercase form used for uniqueness comparison.
    #[must_use]
    pub fn normalized(&self) -> String {
        self.0.to_lowercase()
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl std::fmt::Display for Username {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

/// Validates a role tag list: at least one tag, no empty tags.
pub fn validate_roles(roles: &[String]) -> AppResult<()> {
    if roles.is_empty() {
        return Err(AppError::Validation(
            "at least one role is required".to_owned(),
        ));
    }

    if roles.iter().any(|role| role.trim().is_empty()) {
        return Err(AppError::Validation(
            "role tags must not be empty".to_owned(),
        ));
    }

    Ok(())
}
