use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::{IntoParams, ToSchema};

use crate::constants::{INTERNAL_SERVER_ERROR_MESSAGE, USER_EXISTS_MESSAGE};
use crate::core::errors::{ErrorKind, LinkorError};
use crate::core::models::User;

/// Selector for `GET /api/users`. The first non-empty of `id`, `email` and
/// `search` decides the lookup; with none of them the users are listed.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct UsersQuery {
    /// Fetch one user by id
    pub id: Option<String>,
    /// Fetch one user by exact email
    pub email: Option<String>,
    /// Display name prefix (case-sensitive)
    pub search: Option<String>,
    /// Page size for listing, 1-100, defaults to 10
    pub limit: Option<String>,
    /// createdAt (default), updatedAt, email or displayName; always descending
    pub order_by: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct IdQuery {
    /// Id of the user to act on
    pub id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub user: User,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UsersResponse {
    pub users: Vec<User>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

pub struct ApiError(pub LinkorError);

impl From<LinkorError> for ApiError {
    fn from(err: LinkorError) -> Self {
        ApiError(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0.kind() {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Storage => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let error_message = match self.0 {
            LinkorError::MissingEmail => "Email is required".to_string(),
            LinkorError::InvalidEmail(email) => format!("Invalid email: {}", email),
            LinkorError::InvalidInput(_, field_error) => field_error.description,
            LinkorError::EmailAlreadyRegistered(_) => USER_EXISTS_MESSAGE.to_string(),
            LinkorError::UserNotFound(_) => "User not found".to_string(),
            LinkorError::StorageError(msg) => {
                // details stay in the log
                error!(error = %msg, "request failed on storage");
                INTERNAL_SERVER_ERROR_MESSAGE.to_string()
            }
        };
        (status, Json(ErrorResponse { error: error_message })).into_response()
    }
}
