//! Request and response payloads for the HTTP API.

use notewell_application::{NoteView, UserView};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payload for creating a user.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    pub roles: Vec<String>,
}

/// Payload for a full-record user update. The record id travels in the
/// body, matching the collection-root routing of the API.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub id: Uuid,
    pub username: String,
    pub roles: Vec<String>,
    pub active: bool,
    #[serde(default)]
    pub password: Option<String>,
}

/// Payload for deleting a user.
#[derive(Debug, Deserialize)]
pub struct DeleteUserRequest {
    pub id: Uuid,
}

/// Payload for creating a note.
#[derive(Debug, Deserialize)]
pub struct CreateNoteRequest {
    pub user_id: Uuid,
    pub title: String,
    pub text: String,
}

/// Payload for a full-record note update.
#[derive(Debug, Deserialize)]
pub struct UpdateNoteRequest {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub text: String,
    pub completed: bool,
}

/// Payload for deleting a note.
#[derive(Debug, Deserialize)]
pub struct DeleteNoteRequest {
    pub id: Uuid,
}

/// User as returned by the API. Never carries the password hash.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub roles: Vec<String>,
    pub active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<UserView> for UserResponse {
    fn from(view: UserView) -> Self {
        Self {
            id: view.id.as_uuid(),
            username: view.username,
            roles: view.roles,
            active: view.active,
            created_at: view.created_at,
            updated_at: view.updated_at,
        }
    }
}

/// Note as returned by the API, enriched with the author's username.
/// The username field is omitted when the back-reference no longer
/// resolves.
#[derive(Debug, Serialize)]
pub struct NoteResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub text: String,
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<NoteView> for NoteResponse {
    fn from(view: NoteView) -> Self {
        Self {
            id: view.id.as_uuid(),
            user_id: view.user_id.as_uuid(),
            title: view.title,
            text: view.text,
            completed: view.completed,
            username: view.username,
            created_at: view.created_at,
            updated_at: view.updated_at,
        }
    }
}

/// Generic acknowledgment response.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Health response payload.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub ready: bool,
    pub postgres: HealthDependencyStatus,
}

/// One runtime dependency health status.
#[derive(Debug, Serialize)]
pub struct HealthDependencyStatus {
    pub status: &'static str,
    pub detail: Option<String>,
}
