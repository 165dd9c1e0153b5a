use std::sync::Arc;

use chrono::{DateTime, SubsecRound, Utc};
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};

use crate::constants::{PREFIX_RANGE_END, SEARCH_RESULT_LIMIT, USERS_COLLECTION};
use crate::core::errors::LinkorError;
use crate::core::models::{NewUser, User, UserSortField, UserUpdate};
use crate::core::validation::{validate_list_limit, validate_new_user, validate_update};
use crate::infrastructure::storage::user_document::{from_document, to_document, unsaved_user, update_fields};
use crate::infrastructure::store::{Direction, Document, DocumentStore, FilterOp, Query, StoreError};

/// Stored timestamps keep microseconds; stamping with anything finer would
/// make the returned entity differ from what a later read sees.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

fn storage_failure(operation: &str, err: StoreError) -> LinkorError {
    error!(operation, error = %err, "document store failure");
    LinkorError::from(err)
}

/// The only authority over persisted user records. Holds nothing but the
/// store handle.
#[derive(Clone)]
pub struct UserRepository {
    store: Arc<dyn DocumentStore>,
}

impl UserRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        UserRepository { store }
    }

    fn decode_all(hits: Vec<(String, Document)>) -> Result<Vec<User>, LinkorError> {
        hits.into_iter()
            .map(|(id, doc)| from_document(&id, doc).map_err(|e| storage_failure("decode", e)))
            .collect()
    }

    #[instrument(skip(self, data), fields(email = %data.email))]
    pub async fn create_user(&self, data: NewUser) -> Result<User, LinkorError> {
        validate_new_user(&data)?;

        let mut user = unsaved_user(data, now());
        let document = to_document(&user).map_err(|e| storage_failure("create_user", e))?;
        user.id = self
            .store
            .add(USERS_COLLECTION, document)
            .await
            .map_err(|e| storage_failure("create_user", e))?;

        info!(user_id = %user.id, "user created");
        Ok(user)
    }

    /// Create flow behind `POST /api/users`: validate, refuse a known email,
    /// then create. The existence check and the write are separate calls.
    #[instrument(skip(self, data), fields(email = %data.email))]
    pub async fn register_user(&self, data: NewUser) -> Result<User, LinkorError> {
        validate_new_user(&data)?;
        if self.user_exists_by_email(&data.email).await? {
            warn!("email already registered");
            return Err(LinkorError::EmailAlreadyRegistered(data.email));
        }
        self.create_user(data).await
    }

    #[instrument(skip(self))]
    pub async fn get_user_by_id(&self, id: &str) -> Result<Option<User>, LinkorError> {
        let document = self
            .store
            .get(USERS_COLLECTION, id)
            .await
            .map_err(|e| storage_failure("get_user_by_id", e))?;
        match document {
            Some(doc) => Ok(Some(from_document(id, doc).map_err(|e| storage_failure("get_user_by_id", e))?)),
            None => {
                debug!("user not found");
                Ok(None)
            }
        }
    }

    /// First match wins; this layer does not prevent duplicate emails.
    #[instrument(skip(self))]
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, LinkorError> {
        let query = Query::new(USERS_COLLECTION)
            .filter("email", FilterOp::Equal, email)
            .limit(1);
        let hits = self
            .store
            .query(&query)
            .await
            .map_err(|e| storage_failure("get_user_by_email", e))?;
        Ok(Self::decode_all(hits)?.into_iter().next())
    }

    pub async fn user_exists_by_email(&self, email: &str) -> Result<bool, LinkorError> {
        Ok(self.get_user_by_email(email).await?.is_some())
    }

    /// Merges the supplied fields over the stored record and re-stamps
    /// `updatedAt`. Fields left `None` keep their stored value; a supplied
    /// `profile` replaces the stored one as a whole.
    #[instrument(skip(self, update))]
    pub async fn update_user(&self, id: &str, update: UserUpdate) -> Result<User, LinkorError> {
        validate_update(&update)?;

        let fields = update_fields(&update, now()).map_err(|e| storage_failure("update_user", e))?;
        match self.store.update(USERS_COLLECTION, id, fields).await {
            Ok(()) => {}
            Err(StoreError::NotFound { .. }) => {
                warn!("update of unknown user");
                return Err(LinkorError::UserNotFound(id.to_string()));
            }
            Err(e) => return Err(storage_failure("update_user", e)),
        }

        let user = self
            .get_user_by_id(id)
            .await?
            .ok_or_else(|| LinkorError::UserNotFound(id.to_string()))?;
        info!(user_id = %user.id, "user updated");
        Ok(user)
    }

    /// Hard delete. Deleting an id that does not exist succeeds.
    #[instrument(skip(self))]
    pub async fn delete_user(&self, id: &str) -> Result<(), LinkorError> {
        self.store
            .delete(USERS_COLLECTION, id)
            .await
            .map_err(|e| storage_failure("delete_user", e))?;
        info!("user deleted");
        Ok(())
    }

    /// Newest first by default. Records lacking the sort field are skipped.
    #[instrument(skip(self))]
    pub async fn list_users(&self, limit: usize, order_by: UserSortField) -> Result<Vec<User>, LinkorError> {
        validate_list_limit(limit)?;
        let query = Query::new(USERS_COLLECTION)
            .order_by(order_by.as_field(), Direction::Descending)
            .limit(limit);
        let hits = self
            .store
            .query(&query)
            .await
            .map_err(|e| storage_failure("list_users", e))?;
        Self::decode_all(hits)
    }

    /// Case-sensitive "starts with" over `displayName`, expressed as the range
    /// `[prefix, prefix + U+F8FF)` so an ordered index can answer it.
    #[instrument(skip(self))]
    pub async fn search_users_by_display_name(&self, prefix: &str) -> Result<Vec<User>, LinkorError> {
        let upper = format!("{}{}", prefix, PREFIX_RANGE_END);
        let query = Query::new(USERS_COLLECTION)
            .filter("displayName", FilterOp::GreaterThanOrEqual, Value::from(prefix))
            .filter("displayName", FilterOp::LessThan, Value::from(upper))
            .order_by("displayName", Direction::Ascending)
            .limit(SEARCH_RESULT_LIMIT);
        let hits = self
            .store
            .query(&query)
            .await
            .map_err(|e| storage_failure("search_users_by_display_name", e))?;
        Self::decode_all(hits)
    }
}
