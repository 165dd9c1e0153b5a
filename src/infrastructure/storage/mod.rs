pub mod user_document;
