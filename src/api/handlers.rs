use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use tracing::{instrument, warn};

use crate::{
    api::models::{ApiError, ErrorResponse, IdQuery, MessageResponse, UserResponse, UsersQuery, UsersResponse},
    constants::{DEFAULT_LIST_LIMIT, USER_DELETED_MESSAGE},
    core::{
        errors::LinkorError,
        models::{NewUser, UserSortField, UserUpdate},
        repository::UserRepository,
    },
};

/// Empty query values behave as if the parameter was not sent.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn require_id(id: Option<String>) -> Result<String, LinkorError> {
    present(id).ok_or_else(|| LinkorError::invalid_input("id", "Missing id", "User ID is required"))
}

/// Bodies are parsed as JSON whatever `Content-Type` says.
fn json_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, LinkorError> {
    serde_json::from_slice(body).map_err(|e| {
        warn!(error = %e, "rejected request body");
        LinkorError::invalid_input("body", "Invalid body", format!("Invalid JSON body: {}", e))
    })
}

fn parse_limit(limit: Option<String>) -> Result<usize, LinkorError> {
    match present(limit) {
        Some(raw) => raw.trim().parse::<usize>().map_err(|_| {
            LinkorError::invalid_input("limit", "Invalid limit", "limit must be a positive integer")
        }),
        None => Ok(DEFAULT_LIST_LIMIT),
    }
}

fn parse_order_by(order_by: Option<String>) -> Result<UserSortField, LinkorError> {
    match present(order_by) {
        Some(raw) => raw
            .parse::<UserSortField>()
            .map_err(|msg| LinkorError::invalid_input("orderBy", "Invalid orderBy", msg)),
        None => Ok(UserSortField::default()),
    }
}

#[utoipa::path(
    get,
    path = "/api/users",
    params(UsersQuery),
    responses(
        (status = 200, description = "`{user}` for an id or email lookup, `{users}` for search and listing", body = UsersResponse),
        (status = 400, description = "Invalid limit or orderBy", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(repo))]
pub async fn get_users(
    State(repo): State<Arc<UserRepository>>,
    Query(params): Query<UsersQuery>,
) -> Result<Response, ApiError> {
    if let Some(id) = present(params.id) {
        let user = repo.get_user_by_id(&id).await?;
        let user = user.ok_or(LinkorError::UserNotFound(id))?;
        return Ok(Json(UserResponse { user }).into_response());
    }

    if let Some(email) = present(params.email) {
        let user = repo.get_user_by_email(&email).await?;
        let user = user.ok_or(LinkorError::UserNotFound(email))?;
        return Ok(Json(UserResponse { user }).into_response());
    }

    if let Some(prefix) = present(params.search) {
        let users = repo.search_users_by_display_name(&prefix).await?;
        return Ok(Json(UsersResponse { users }).into_response());
    }

    let limit = parse_limit(params.limit)?;
    let order_by = parse_order_by(params.order_by)?;
    let users = repo.list_users(limit, order_by).await?;
    Ok(Json(UsersResponse { users }).into_response())
}

#[utoipa::path(
    post,
    path = "/api/users",
    request_body = NewUser,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Missing or invalid fields", body = ErrorResponse),
        (status = 409, description = "User already exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(repo, body))]
pub async fn create_user(
    State(repo): State<Arc<UserRepository>>,
    body: Bytes,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let data: NewUser = json_body(&body)?;
    let user = repo.register_user(data).await?;
    Ok((StatusCode::CREATED, Json(UserResponse { user })))
}

#[utoipa::path(
    put,
    path = "/api/users",
    params(IdQuery),
    request_body = UserUpdate,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Missing id or invalid fields", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(repo, body))]
pub async fn update_user(
    State(repo): State<Arc<UserRepository>>,
    Query(params): Query<IdQuery>,
    body: Bytes,
) -> Result<Json<UserResponse>, ApiError> {
    let id = require_id(params.id)?;
    let update: UserUpdate = json_body(&body)?;
    let user = repo.update_user(&id, update).await?;
    Ok(Json(UserResponse { user }))
}

#[utoipa::path(
    delete,
    path = "/api/users",
    params(IdQuery),
    responses(
        (status = 200, description = "User deleted (also when it did not exist)", body = MessageResponse),
        (status = 400, description = "Missing id", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(repo))]
pub async fn delete_user(
    State(repo): State<Arc<UserRepository>>,
    Query(params): Query<IdQuery>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = require_id(params.id)?;
    repo.delete_user(&id).await?;
    Ok(Json(MessageResponse {
        message: USER_DELETED_MESSAGE.to_string(),
    }))
}
