use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use notewell_application::{CreateNoteParams, UpdateNoteParams};
use notewell_domain::{NoteId, UserId};

use crate::dto::{
    CreateNoteRequest, DeleteNoteRequest, MessageResponse, NoteResponse, UpdateNoteRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

/// GET /api/notes - List all notes, enriched with author usernames.
pub async fn list_notes_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<NoteResponse>>> {
    let notes = state.note_service.list().await?;

    Ok(Json(notes.into_iter().map(NoteResponse::from).collect()))
}

/// POST /api/notes - Create a new note for an existing user.
pub async fn create_note_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateNoteRequest>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    state
        .note_service
        .create(CreateNoteParams {
            user_id: UserId::from_uuid(payload.user_id),
            title: payload.title,
            text: payload.text,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "New note created".to_owned(),
        }),
    ))
}

/// PATCH /api/notes - Apply a full-record update to a note.
pub async fn update_note_handler(
    State(state): State<AppState>,
    Json(payload): Json<UpdateNoteRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let title = state
        .note_service
        .update(UpdateNoteParams {
            id: NoteId::from_uuid(payload.id),
            user_id: UserId::from_uuid(payload.user_id),
            title: payload.title,
            text: payload.text,
            completed: payload.completed,
        })
        .await?;

    Ok(Json(MessageResponse {
        message: format!("'{title}' has been updated"),
    }))
}

/// DELETE /api/notes - Delete a note.
pub async fn delete_note_handler(
    State(state): State<AppState>,
    Json(payload): Json<DeleteNoteRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let deleted = state
        .note_service
        .delete(NoteId::from_uuid(payload.id))
        .await?;

    Ok(Json(MessageResponse {
        message: format!(
            "Note '{}' with ID {} has been deleted",
            deleted.title, deleted.id
        ),
    }))
}

#[cfg(test)]
mod tests;
