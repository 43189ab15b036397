pub mod account;
pub mod app_state;
pub mod auth_jwt_claims;
pub mod authenticated_user;
pub mod class_group;
pub mod document;
pub mod membership;
pub mod modality;
pub mod plan;

pub use account::{Admin, Customer, Manager};
pub use app_state::AppState;
pub use auth_jwt_claims::Claims;
pub use authenticated_user::{AuthenticatedUser, Role, SessionResponse};
pub use class_group::ClassGroup;
pub use document::{Document, Record};
pub use membership::Membership;
pub use modality::Modality;
pub use plan::Plan;
