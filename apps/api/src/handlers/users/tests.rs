use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use notewell_application::{NoteService, UserService};
use notewell_infrastructure::{
    Argon2PasswordHasher, InMemoryNoteRepository, InMemoryUserRepository,
};

use crate::dto::{CreateNoteRequest, CreateUserRequest, DeleteNoteRequest, DeleteUserRequest, UpdateUserRequest};
use crate::handlers::notes::{create_note_handler, delete_note_handler, list_notes_handler};
use crate::state::AppState;

use super::{create_user_handler, delete_user_handler, list_users_handler, update_user_handler};

fn test_state() -> AppState {
    let user_repository = Arc::new(InMemoryUserRepository::new());
    let note_repository = Arc::new(InMemoryNoteRepository::new());

    let user_service = UserService::new(
        user_repository.clone(),
        note_repository.clone(),
        Arc::new(Argon2PasswordHasher::new()),
    );
    let note_service = NoteService::new(note_repository, user_repository);

    // The user and note handlers never touch the pool; a lazy pool does
    // no network IO until first use.
    let postgres_pool = PgPoolOptions::new()
        .connect_lazy("postgres://localhost/notewell_unused")
        .unwrap_or_else(|error| panic!("failed to build lazy pool: {error}"));

    AppState {
        user_service,
        note_service,
        postgres_pool,
    }
}

async fn response_json(response: Response) -> Value {
    let bytes = match axum::body::to_bytes(response.into_body(), usize::MAX).await {
        Ok(bytes) => bytes,
        Err(error) => panic!("failed to read response body: {error}"),
    };

    match serde_json::from_slice(&bytes) {
        Ok(value) => value,
        Err(error) => panic!("response body is not JSON: {error}"),
    }
}

async fn message_of(response: Response) -> String {
    let body = response_json(response).await;
    body["message"].as_str().unwrap_or_default().to_owned()
}

async fn create_user(state: &AppState, username: &str) -> Response {
    create_user_handler(
        State(state.clone()),
        Json(CreateUserRequest {
            username: username.to_owned(),
            password: "pw123".to_owned(),
            roles: vec!["editor".to_owned()],
        }),
    )
    .await
    .into_response()
}

async fn first_user_id(state: &AppState) -> Uuid {
    let response = list_users_handler(State(state.clone()))
        .await
        .into_response();
    let body = response_json(response).await;
    let id = body[0]["id"].as_str().unwrap_or_default();

    Uuid::parse_str(id).unwrap_or_else(|error| panic!("user id is not a uuid: {error}"))
}

#[tokio::test]
async fn create_user_returns_created_acknowledgment() {
    let state = test_state();

    let response = create_user(&state, "alice").await;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(message_of(response).await, "New user alice created");
}

#[tokio::test]
async fn create_user_acknowledges_trimmed_username() {
    let state = test_state();

    let response = create_user(&state, "  alice  ").await;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(message_of(response).await, "New user alice created");
}

#[tokio::test]
async fn create_user_with_taken_username_is_conflict() {
    let state = test_state();
    create_user(&state, "alice").await;

    let response = create_user(&state, "Alice").await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(message_of(response).await, "conflict: duplicate username");
}

#[tokio::test]
async fn create_user_without_roles_is_bad_request() {
    let state = test_state();

    let response = create_user_handler(
        State(state),
        Json(CreateUserRequest {
            username: "alice".to_owned(),
            password: "pw123".to_owned(),
            roles: Vec::new(),
        }),
    )
    .await
    .into_response();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(message_of(response).await.starts_with("validation error: "));
}

#[tokio::test]
async fn list_users_when_empty_is_not_found() {
    let state = test_state();

    let response = list_users_handler(State(state)).await.into_response();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(message_of(response).await, "not found: no users found");
}

#[tokio::test]
async fn list_users_excludes_password_hash() {
    let state = test_state();
    create_user(&state, "alice").await;

    let response = list_users_handler(State(state)).await.into_response();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body[0]["username"], "alice");
    assert_eq!(body[0]["active"], true);
    assert!(body[0].get("password_hash").is_none());
    assert!(body[0].get("password").is_none());
}

#[tokio::test]
async fn update_of_unknown_user_is_not_found() {
    let state = test_state();

    let response = update_user_handler(
        State(state),
        Json(UpdateUserRequest {
            id: Uuid::new_v4(),
            username: "alice".to_owned(),
            roles: vec!["editor".to_owned()],
            active: true,
            password: None,
        }),
    )
    .await
    .into_response();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(message_of(response).await, "not found: user not found");
}

#[tokio::test]
async fn update_user_acknowledges_new_username() {
    let state = test_state();
    create_user(&state, "alice").await;
    let user_id = first_user_id(&state).await;

    let response = update_user_handler(
        State(state),
        Json(UpdateUserRequest {
            id: user_id,
            username: "alice2".to_owned(),
            roles: vec!["manager".to_owned()],
            active: false,
            password: None,
        }),
    )
    .await
    .into_response();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(message_of(response).await, "alice2 updated");
}

#[tokio::test]
async fn delete_user_is_blocked_until_notes_are_removed() {
    let state = test_state();
    create_user(&state, "alice").await;
    let user_id = first_user_id(&state).await;

    let note_created = create_note_handler(
        State(state.clone()),
        Json(CreateNoteRequest {
            user_id,
            title: "Fix the printer".to_owned(),
            text: "Third floor".to_owned(),
        }),
    )
    .await
    .into_response();
    assert_eq!(note_created.status(), StatusCode::CREATED);

    let blocked = delete_user_handler(
        State(state.clone()),
        Json(DeleteUserRequest { id: user_id }),
    )
    .await
    .into_response();
    assert_eq!(blocked.status(), StatusCode::CONFLICT);
    assert_eq!(
        message_of(blocked).await,
        "conflict: user has assigned notes"
    );

    let notes = list_notes_handler(State(state.clone())).await.into_response();
    let notes = response_json(notes).await;
    let note_id = notes[0]["id"].as_str().unwrap_or_default();
    let note_id =
        Uuid::parse_str(note_id).unwrap_or_else(|error| panic!("note id is not a uuid: {error}"));

    let note_deleted = delete_note_handler(
        State(state.clone()),
        Json(DeleteNoteRequest { id: note_id }),
    )
    .await
    .into_response();
    assert_eq!(note_deleted.status(), StatusCode::OK);

    let response = delete_user_handler(State(state), Json(DeleteUserRequest { id: user_id }))
        .await
        .into_response();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        message_of(response).await,
        format!("Username alice with ID {user_id} has been deleted")
    );
}
