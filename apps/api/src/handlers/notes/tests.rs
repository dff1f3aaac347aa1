use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use notewell_application::{NewUser, NoteService, UserRepository, UserService};
use notewell_domain::UserId;
use notewell_infrastructure::{
    Argon2PasswordHasher, InMemoryNoteRepository, InMemoryUserRepository,
};

use crate::dto::{CreateNoteRequest, DeleteNoteRequest, UpdateNoteRequest};
use crate::state::AppState;

use super::{create_note_handler, delete_note_handler, list_notes_handler, update_note_handler};

fn test_state() -> (AppState, Arc<InMemoryUserRepository>) {
    let user_repository = Arc::new(InMemoryUserRepository::new());
    let note_repository = Arc::new(InMemoryNoteRepository::new());

    let user_service = UserService::new(
        user_repository.clone(),
        note_repository.clone(),
        Arc::new(Argon2PasswordHasher::new()),
    );
    let note_service = NoteService::new(note_repository, user_repository.clone());

    // The user and note handlers never touch the pool; a lazy pool does
    // no network IO until first use.
    let postgres_pool = PgPoolOptions::new()
        .connect_lazy("postgres://localhost/notewell_unused")
        .unwrap_or_else(|error| panic!("failed to build lazy pool: {error}"));

    let state = AppState {
        user_service,
        note_service,
        postgres_pool,
    };

    (state, user_repository)
}

async fn seed_user(users: &InMemoryUserRepository, username: &str) -> UserId {
    let created = users
        .create(NewUser {
            username: username.to_owned(),
            password_hash: "hash".to_owned(),
            roles: vec!["editor".to_owned()],
        })
        .await;

    match created {
        Ok(user_id) => user_id,
        Err(error) => panic!("failed to seed user: {error}"),
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

async fn create_note(state: &AppState, user_id: Uuid, title: &str) -> Response {
    create_note_handler(
        State(state.clone()),
        Json(CreateNoteRequest {
            user_id,
            title: title.to_owned(),
            text: "ticket body".to_owned(),
        }),
    )
    .await
    .into_response()
}

async fn first_note_id(state: &AppState) -> Uuid {
    let response = list_notes_handler(State(state.clone()))
        .await
        .into_response();
    let body = response_json(response).await;
    let id = body[0]["id"].as_str().unwrap_or_default();

    Uuid::parse_str(id).unwrap_or_else(|error| panic!("note id is not a uuid: {error}"))
}

#[tokio::test]
async fn create_note_returns_created_acknowledgment() {
    let (state, users) = test_state();
    let author = seed_user(&users, "alice").await;

    let response = create_note(&state, author.as_uuid(), "Fix the printer").await;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(message_of(response).await, "New note created");
}

#[tokio::test]
async fn create_note_for_unknown_user_is_not_found() {
    let (state, _) = test_state();

    let response = create_note(&state, Uuid::new_v4(), "Fix the printer").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(message_of(response).await, "not found: note author not found");
}

#[tokio::test]
async fn create_note_with_taken_title_is_conflict() {
    let (state, users) = test_state();
    let author = seed_user(&users, "alice").await;
    create_note(&state, author.as_uuid(), "Fix the printer").await;

    let response = create_note(&state, author.as_uuid(), "Fix the printer").await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(message_of(response).await, "conflict: duplicate note title");
}

#[tokio::test]
async fn create_note_with_blank_title_is_bad_request() {
    let (state, users) = test_state();
    let author = seed_user(&users, "alice").await;

    let response = create_note(&state, author.as_uuid(), "   ").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(message_of(response).await.starts_with("validation error: "));
}

#[tokio::test]
async fn list_notes_when_empty_is_not_found() {
    let (state, _) = test_state();

    let response = list_notes_handler(State(state)).await.into_response();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        message_of(response).await,
        "not found: there are no notes at this time"
    );
}

#[tokio::test]
async fn list_notes_includes_author_username() {
    let (state, users) = test_state();
    let author = seed_user(&users, "alice").await;
    create_note(&state, author.as_uuid(), "Fix the printer").await;

    let response = list_notes_handler(State(state)).await.into_response();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body[0]["title"], "Fix the printer");
    assert_eq!(body[0]["username"], "alice");
    assert_eq!(body[0]["completed"], false);
}

#[tokio::test]
async fn list_notes_omits_username_when_author_is_gone() {
    let (state, users) = test_state();
    let author = seed_user(&users, "alice").await;
    create_note(&state, author.as_uuid(), "Fix the printer").await;

    // Repository-level delete leaves the note's back-reference dangling.
    users
        .delete(author)
        .await
        .unwrap_or_else(|_| unreachable!());

    let response = list_notes_handler(State(state)).await.into_response();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body[0]["title"], "Fix the printer");
    assert!(body[0].get("username").is_none());
}

#[tokio::test]
async fn update_note_acknowledges_new_title() {
    let (state, users) = test_state();
    let author = seed_user(&users, "alice").await;
    create_note(&state, author.as_uuid(), "Fix the printer").await;
    let note_id = first_note_id(&state).await;

    let response = update_note_handler(
        State(state),
        Json(UpdateNoteRequest {
            id: note_id,
            user_id: author.as_uuid(),
            title: "Replace the printer".to_owned(),
            text: "It is beyond repair".to_owned(),
            completed: true,
        }),
    )
    .await
    .into_response();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        message_of(response).await,
        "'Replace the printer' has been updated"
    );
}

#[tokio::test]
async fn delete_note_returns_confirmation() {
    let (state, users) = test_state();
    let author = seed_user(&users, "alice").await;
    create_note(&state, author.as_uuid(), "Fix the printer").await;
    let note_id = first_note_id(&state).await;

    let response = delete_note_handler(State(state), Json(DeleteNoteRequest { id: note_id }))
        .await
        .into_response();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        message_of(response).await,
        format!("Note 'Fix the printer' with ID {note_id} has been deleted")
    );
}

#[tokio::test]
async fn delete_of_unknown_note_is_not_found() {
    let (state, _) = test_state();

    let response = delete_note_handler(
        State(state),
        Json(DeleteNoteRequest { id: Uuid::new_v4() }),
    )
    .await
    .into_response();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(message_of(response).await, "not found: note not found");
}
