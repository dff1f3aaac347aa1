use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use notewell_application::{CreateUserParams, UpdateUserParams};
use notewell_domain::UserId;

use crate::dto::{
    CreateUserRequest, DeleteUserRequest, MessageResponse, UpdateUserRequest, UserResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

/// GET /api/users - List all users, password hashes excluded.
pub async fn list_users_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<UserResponse>>> {
    let users = state.user_service.list().await?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// POST /api/users - Create a new user.
pub async fn create_user_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    let created = state
        .user_service
        .create(CreateUserParams {
            username: payload.username,
            password: payload.password,
            roles: payload.roles,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: format!("New user {} created", created.username),
        }),
    ))
}

/// PATCH /api/users - Apply a full-record update to a user.
pub async fn update_user_handler(
    State(state): State<AppState>,
    Json(payload): Json<UpdateUserRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let username = state
        .user_service
        .update(UpdateUserParams {
            id: UserId::from_uuid(payload.id),
            username: payload.username,
            roles: payload.roles,
            active: payload.active,
            password: payload.password,
        })
        .await?;

    Ok(Json(MessageResponse {
        message: format!("{username} updated"),
    }))
}

/// DELETE /api/users - Delete a user with no remaining notes.
pub async fn delete_user_handler(
    State(state): State<AppState>,
    Json(payload): Json<DeleteUserRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let deleted = state
        .user_service
        .delete(UserId::from_uuid(payload.id))
        .await?;

    Ok(Json(MessageResponse {
        message: format!(
            "Username {} with ID {} has been deleted",
            deleted.username, deleted.id
        ),
    }))
}

#[cfg(test)]
mod tests;
