pub mod api;
pub mod config;
pub mod constants;
pub mod core;
pub mod infrastructure;

pub use crate::core::errors::{ErrorKind, LinkorError};
pub use crate::core::repository::UserRepository;
pub use crate::infrastructure::store::{DocumentStore, in_memory::InMemoryDocumentStore};

#[cfg(test)]
mod tests;
