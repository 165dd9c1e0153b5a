pub mod in_memory;
pub mod query;

use async_trait::async_trait;
use thiserror::Error;

pub use query::{Direction, Filter, FilterOp, OrderBy, Query, compare_values};

/// A stored document: a JSON object without its id. The id is the key the
/// document is filed under.
pub type Document = serde_json::Map<String, serde_json::Value>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("document store is unavailable")]
    Unavailable,

    #[error("document {collection}/{id} not found")]
    NotFound { collection: String, id: String },

    #[error("document store rejected the operation: {0}")]
    Rejected(String),

    #[error("malformed document {collection}/{id}: {reason}")]
    Malformed {
        collection: String,
        id: String,
        reason: String,
    },
}

/// Client handle for a document database.
///
/// Constructed explicitly at startup, shared as `Arc<dyn DocumentStore>` and
/// closed at shutdown. Every call is independent; the store provides no
/// transactions.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Files `document` under a freshly generated id and returns that id.
    async fn add(&self, collection: &str, document: Document) -> Result<String, StoreError>;

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    /// Shallow merge of `fields` over the stored document's top-level members.
    /// Fails with [`StoreError::NotFound`] when there is nothing to merge into.
    async fn update(&self, collection: &str, id: &str, fields: Document) -> Result<(), StoreError>;

    /// Removing a document that does not exist is not an error.
    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;

    async fn query(&self, query: &Query) -> Result<Vec<(String, Document)>, StoreError>;

    /// After `close` every other call fails with [`StoreError::Unavailable`].
    async fn close(&self) -> Result<(), StoreError>;
}
