//! Gym Studio client library
//!
//! A reducer-backed snapshot of the gym data ([`state::Store`]) kept in sync
//! with the API by the async actions on [`context::AppContext`].

pub mod api_clients;
pub mod config;
pub mod context;
pub mod error;
pub mod models;
pub mod state;

pub use config::ClientConfig;
pub use context::AppContext;
pub use error::{ClientError, ClientResult};
pub use state::{Action, AlertType, AppState, Store};
