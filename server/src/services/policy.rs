//! Route-group authorization.
//!
//! Every controller asks the policy before touching the store. The decision
//! is a function of the caller identity, the resource kind and the
//! operation only; there are no per-record ownership checks.

use log::debug;

use crate::error::AppError;
use crate::models::authenticated_user::{AuthenticatedUser, Role};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Admin,
    Manager,
    Customer,
    Modality,
    Plan,
    Membership,
    ClassGroup,
    Session,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
}

/// Who may perform an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Authenticated,
    AdminOnly,
    /// The operation is not exposed for this resource.
    Denied,
}

pub trait AuthorizationPolicy: Send + Sync {
    fn access(&self, resource: Resource, operation: Operation) -> Access;

    fn authorize(
        &self,
        identity: Option<&AuthenticatedUser>,
        resource: Resource,
        operation: Operation,
    ) -> Result<(), AppError> {
        let access = self.access(resource, operation);
        debug!(
            "Authorizing {:?} on {:?} for {:?}: {:?}",
            operation,
            resource,
            identity.map(|user| user.role),
            access
        );

        match (access, identity) {
            (Access::Public, _) => Ok(()),
            (Access::Denied, _) => Err(AppError::Forbidden("Operation not allowed".to_string())),
            (_, None) => Err(AppError::Auth("Login is required".to_string())),
            (Access::Authenticated, Some(_)) => Ok(()),
            (Access::AdminOnly, Some(user)) if user.role == Role::Admin => Ok(()),
            (Access::AdminOnly, Some(_)) => Err(AppError::Forbidden(
                "Administrator role is required".to_string(),
            )),
        }
    }
}

/// Role-based policy: the verified role is the single authorization signal.
#[derive(Debug, Default, Clone, Copy)]
pub struct RolePolicy;

impl AuthorizationPolicy for RolePolicy {
    fn access(&self, resource: Resource, operation: Operation) -> Access {
        match (resource, operation) {
            (Resource::Admin | Resource::Manager, _) => Access::AdminOnly,

            (Resource::Customer, Operation::Create) => Access::Public,
            (Resource::Customer, _) => Access::AdminOnly,

            (Resource::Modality | Resource::Plan | Resource::ClassGroup, Operation::Read) => Access::Authenticated,
            (Resource::Modality | Resource::Plan | Resource::ClassGroup, _) => Access::AdminOnly,

            (Resource::Membership, Operation::Create | Operation::Read) => Access::Authenticated,
            (Resource::Membership, Operation::Update | Operation::Delete) => Access::Denied,

            (Resource::Session, Operation::Read) => Access::Authenticated,
            (Resource::Session, _) => Access::Denied,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn user(role: Role) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: Uuid::new_v4(),
            role,
        }
    }

    #[test]
    fn test_anonymous_is_unauthenticated_on_protected_operations() {
        let policy = RolePolicy;
        let result = policy.authorize(None, Resource::Modality, Operation::Read);
        assert!(matches!(result, Err(AppError::Auth(_))));

        let result = policy.authorize(None, Resource::Admin, Operation::Create);
        assert!(matches!(result, Err(AppError::Auth(_))));
    }

    #[test]
    fn test_customer_registration_is_public() {
        assert!(RolePolicy.authorize(None, Resource::Customer, Operation::Create).is_ok());
    }

    #[test]
    fn test_admin_only_rejects_other_roles_with_forbidden() {
        let policy = RolePolicy;
        for role in [Role::Manager, Role::Customer] {
            let result = policy.authorize(Some(&user(role)), Resource::Modality, Operation::Delete);
            assert!(matches!(result, Err(AppError::Forbidden(_))));
        }
        assert!(policy
            .authorize(Some(&user(Role::Admin)), Resource::Modality, Operation::Delete)
            .is_ok());
    }

    #[test]
    fn test_any_role_reads_catalog_resources() {
        let policy = RolePolicy;
        for role in [Role::Admin, Role::Manager, Role::Customer] {
            for resource in [Resource::Modality, Resource::Plan, Resource::ClassGroup] {
                assert!(policy.authorize(Some(&user(role)), resource, Operation::Read).is_ok());
            }
        }
    }

    #[test]
    fn test_memberships_cannot_be_updated_or_deleted() {
        let admin = user(Role::Admin);
        for operation in [Operation::Update, Operation::Delete] {
            let result = RolePolicy.authorize(Some(&admin), Resource::Membership, operation);
            assert!(matches!(result, Err(AppError::Forbidden(_))));
        }
    }

    #[test]
    fn test_membership_access_has_no_ownership_check() {
        // Any customer may read memberships, including other customers' ones.
        let customer = user(Role::Customer);
        assert!(RolePolicy
            .authorize(Some(&customer), Resource::Membership, Operation::Read)
            .is_ok());
    }
}
