//! Gym Studio Server Library
//!
//! This library exports the core modules used by the server binary and by
//! the route-level tests.

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types for convenience
pub use config::AppSettings;
pub use error::AppError;
pub use models::app_state::AppState;
