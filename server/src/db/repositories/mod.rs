pub mod account_repository;
pub mod document_repository;

pub use account_repository::{AccountCredentials, AccountRepository};
pub use document_repository::DocumentRepository;
