//! Conversion between [`User`] and its stored document.
//!
//! The stored form is sparse: optional members are left out instead of being
//! written as `null`, at every nesting level. Timestamps are integer
//! microseconds since the epoch so they sort numerically. The id is never
//! part of the document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::USERS_COLLECTION;
use crate::core::models::{NewUser, User, UserProfile, UserUpdate};
use crate::infrastructure::store::{Document, StoreError};

pub const UPDATED_AT: &str = "updatedAt";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserDocument {
    email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    display_name: Option<String>,
    #[serde(rename = "photoURL", default, skip_serializing_if = "Option::is_none")]
    photo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    phone_number: Option<String>,
    #[serde(default)]
    email_verified: bool,
    #[serde(with = "chrono::serde::ts_microseconds")]
    created_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_microseconds")]
    updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    profile: Option<UserProfile>,
}

fn into_document(value: Result<Value, serde_json::Error>) -> Result<Document, StoreError> {
    match value {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(StoreError::Rejected(format!("expected an object, got {}", other))),
        Err(e) => Err(StoreError::Rejected(format!("cannot encode user: {}", e))),
    }
}

pub fn to_document(user: &User) -> Result<Document, StoreError> {
    let doc = UserDocument {
        email: user.email.clone(),
        display_name: user.display_name.clone(),
        photo_url: user.photo_url.clone(),
        phone_number: user.phone_number.clone(),
        email_verified: user.email_verified,
        created_at: user.created_at,
        updated_at: user.updated_at,
        profile: user.profile.clone(),
    };
    into_document(serde_json::to_value(doc))
}

pub fn from_document(id: &str, document: Document) -> Result<User, StoreError> {
    let doc: UserDocument =
        serde_json::from_value(Value::Object(document)).map_err(|e| StoreError::Malformed {
            collection: USERS_COLLECTION.to_string(),
            id: id.to_string(),
            reason: e.to_string(),
        })?;
    Ok(User {
        id: id.to_string(),
        email: doc.email,
        display_name: doc.display_name,
        photo_url: doc.photo_url,
        phone_number: doc.phone_number,
        email_verified: doc.email_verified,
        created_at: doc.created_at,
        updated_at: doc.updated_at,
        profile: doc.profile,
    })
}

/// A user that has not been stored yet: the id is empty until the store
/// assigns one, and both timestamps are `now`.
pub fn unsaved_user(data: NewUser, now: DateTime<Utc>) -> User {
    User {
        id: String::new(),
        email: data.email,
        display_name: data.display_name,
        photo_url: data.photo_url,
        phone_number: data.phone_number,
        email_verified: data.email_verified,
        created_at: now,
        updated_at: now,
        profile: data.profile,
    }
}

/// The members to merge for a partial update, always including `updatedAt`.
pub fn update_fields(update: &UserUpdate, now: DateTime<Utc>) -> Result<Document, StoreError> {
    let mut fields = into_document(serde_json::to_value(update))?;
    fields.insert(UPDATED_AT.to_string(), Value::from(now.timestamp_micros()));
    Ok(fields)
}
