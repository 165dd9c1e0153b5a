mod user_tests;

use std::sync::Arc;

use crate::core::repository::UserRepository;
use crate::infrastructure::store::in_memory::InMemoryDocumentStore;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("linkor=debug")
        .with_test_writer()
        .try_init();
}

/// A repository over a fresh store, plus a handle to that store for
/// inspecting raw documents or closing it.
pub fn create_test_repository() -> (UserRepository, InMemoryDocumentStore) {
    init_tracing();
    let store = InMemoryDocumentStore::open("test");
    let repo = UserRepository::new(Arc::new(store.clone()));
    (repo, store)
}
