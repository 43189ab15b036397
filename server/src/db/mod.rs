pub mod connection;
pub mod document_store;
pub mod pg_document_store;
pub mod repositories;

// Re-export the connection module's functions for ease of use
pub use connection::{create_pool, verify_connection};
pub use document_store::{DocumentStore, MemoryDocumentStore, StoredDocument};
pub use pg_document_store::PgDocumentStore;
pub use repositories::*;
