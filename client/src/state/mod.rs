pub mod actions;
pub mod reducer;
pub mod store;

pub use actions::{Action, AlertType};
pub use reducer::{reduce, AppState};
pub use store::{Store, ALERT_DURATION};
