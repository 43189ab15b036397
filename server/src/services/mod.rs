pub mod auth;
pub mod bootstrap;
pub mod policy;
pub mod resource_service;

pub use policy::{Access, AuthorizationPolicy, Operation, Resource, RolePolicy};
pub use resource_service::ResourceService;
