use serde::Serialize;
use thiserror::Error;

use crate::infrastructure::store::StoreError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub title: String,
    pub description: String,
}

impl FieldError {
    pub fn new(field: &str, title: impl Into<String>, description: impl Into<String>) -> Self {
        FieldError {
            field: field.to_string(),
            title: title.into(),
            description: description.into(),
        }
    }
}

/// The four kinds of failure callers have to tell apart. The HTTP layer
/// picks its status code from this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Conflict,
    NotFound,
    Storage,
}

#[derive(Error, Debug, Clone, PartialEq, Serialize)]
pub enum LinkorError {
    /// Email field is missing or blank
    #[error("Email is required")]
    MissingEmail,

    /// Email format is invalid
    #[error("Invalid email format: {0}")]
    InvalidEmail(String),

    /// Generic input validation error with detailed field information
    #[error("Invalid input for field `{0}`: {desc}", desc = .1.description)]
    InvalidInput(String, FieldError),

    /// Email is already registered
    #[error("Email {0} already registered")]
    EmailAlreadyRegistered(String),

    /// User with given ID or email not found
    #[error("User {0} not found")]
    UserNotFound(String),

    /// The document store is unavailable or rejected the operation
    #[error("Storage error: {0}")]
    StorageError(String),
}

impl LinkorError {
    pub fn invalid_input(field: &str, title: impl Into<String>, description: impl Into<String>) -> Self {
        LinkorError::InvalidInput(field.to_string(), FieldError::new(field, title, description))
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            LinkorError::MissingEmail | LinkorError::InvalidEmail(_) | LinkorError::InvalidInput(..) => {
                ErrorKind::Validation
            }
            LinkorError::EmailAlreadyRegistered(_) => ErrorKind::Conflict,
            LinkorError::UserNotFound(_) => ErrorKind::NotFound,
            LinkorError::StorageError(_) => ErrorKind::Storage,
        }
    }
}

impl From<StoreError> for LinkorError {
    fn from(err: StoreError) -> Self {
        LinkorError::StorageError(err.to_string())
    }
}
