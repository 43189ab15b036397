use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{ClassGroup, Customer, Membership, Modality, Plan, UserRole};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertType {
    #[default]
    Success,
    Error,
}

/// Every transition the store accepts.
///
/// Serialized as `{"type": "GET_PLANS_SUCCESS", "payload": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    content = "payload",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum Action {
    OperationBegin,
    ShowAlert { alert_text: String, alert_type: AlertType },
    ClearAlert,
    /// Clears the alert only if it is still the one with this id.
    ExpireAlert { alert_id: u64 },
    /// Forced logout after the server rejected the session.
    SessionExpired,

    GetCustomersSuccess { customers: Vec<Customer> },
    GetCustomersError { alert_text: String },
    RegisterCustomerSuccess { customer: Customer, alert_text: String },
    RegisterCustomerError { alert_text: String },

    LoginUserSuccess { user_id: Uuid, user_role: UserRole, alert_text: String },
    LoginUserError { alert_text: String },
    VerifyAuthSuccess { user_id: Uuid, user_role: UserRole },
    VerifyAuthError,
    LogoutUserSuccess { alert_text: String },
    LogoutUserError { alert_text: String },

    AddNewModalitySuccess { modality: Modality },
    AddNewModalityError { alert_text: String },
    GetModalitiesSuccess { modalities: Vec<Modality> },
    GetModalitiesError { alert_text: String },
    UpdateModalitySuccess { modality: Modality },
    UpdateModalityError { alert_text: String },
    DeleteModalitySuccess { id: Uuid },
    DeleteModalityError { alert_text: String },

    AddNewPlanSuccess { plan: Plan },
    AddNewPlanError { alert_text: String },
    GetPlansSuccess { plans: Vec<Plan> },
    GetPlansError { alert_text: String },
    UpdatePlanSuccess { plan: Plan },
    UpdatePlanError { alert_text: String },
    DeletePlanSuccess { id: Uuid },
    DeletePlanError { alert_text: String },

    AddNewClassGroupSuccess { class_group: ClassGroup },
    AddNewClassGroupError { alert_text: String },
    GetClassGroupsSuccess { class_groups: Vec<ClassGroup> },
    GetClassGroupsError { alert_text: String },
    UpdateClassGroupSuccess { class_group: ClassGroup },
    UpdateClassGroupError { alert_text: String },
    DeleteClassGroupSuccess { id: Uuid },
    DeleteClassGroupError { alert_text: String },

    GetCustomerMembershipsSuccess { memberships: Vec<Membership> },
    GetCustomerMembershipsError { alert_text: String },
    AddCustomerMembershipSuccess { membership: Membership },
    AddCustomerMembershipError { alert_text: String },
}
