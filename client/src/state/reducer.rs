use serde::Serialize;

use crate::models::{ClassGroup, Customer, Identified, Membership, Modality, Plan, SessionUser};
use crate::state::actions::{Action, AlertType};

/// The client snapshot. Replaced wholesale on every transition.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub user: Option<SessionUser>,
    pub is_loading: bool,
    pub show_alert: bool,
    pub alert_text: String,
    pub alert_type: AlertType,
    /// Bumped every time an alert is shown.
    pub alert_id: u64,
    pub customers: Vec<Customer>,
    pub modalities: Vec<Modality>,
    pub plans: Vec<Plan>,
    pub class_groups: Vec<ClassGroup>,
    pub customer_memberships: Vec<Membership>,
}

impl AppState {
    fn alert(mut self, alert_type: AlertType, alert_text: &str) -> Self {
        self.show_alert = true;
        self.alert_type = alert_type;
        self.alert_text = alert_text.to_string();
        self.alert_id += 1;
        self
    }

    fn done(mut self) -> Self {
        self.is_loading = false;
        self
    }

    fn cleared(mut self) -> Self {
        self.show_alert = false;
        self.alert_text.clear();
        self
    }

    /// Drops the session and every loaded slice, keeping the alert counter.
    fn signed_out(self) -> Self {
        Self {
            alert_id: self.alert_id,
            show_alert: self.show_alert,
            alert_text: self.alert_text,
            alert_type: self.alert_type,
            ..Self::default()
        }
    }
}

fn replace_by_id<T: Identified + Clone>(items: &mut [T], updated: &T) {
    if let Some(slot) = items.iter_mut().find(|item| item.id() == updated.id()) {
        *slot = updated.clone();
    }
}

fn remove_by_id<T: Identified>(items: &mut Vec<T>, id: uuid::Uuid) {
    items.retain(|item| item.id() != id);
}

/// Pure transition function: the next snapshot for `action`.
pub fn reduce(state: &AppState, action: &Action) -> AppState {
    let mut next = state.clone();

    match action {
        Action::OperationBegin => {
            next.is_loading = true;
            next
        }
        Action::ShowAlert { alert_text, alert_type } => next.alert(*alert_type, alert_text),
        Action::ClearAlert => next.cleared(),
        Action::ExpireAlert { alert_id } => {
            if *alert_id == next.alert_id {
                next.cleared()
            } else {
                next
            }
        }
        // Only a client that held a session is told it expired
        Action::SessionExpired => {
            let had_session = next.user.is_some();
            let next = next.signed_out();
            if had_session {
                next.alert(AlertType::Error, "Your session has expired, please log in again")
            } else {
                next
            }
        }

        Action::GetCustomersSuccess { customers } => {
            next.customers = customers.clone();
            next.done()
        }
        Action::RegisterCustomerSuccess { customer, alert_text } => {
            next.customers.push(customer.clone());
            next.done().alert(AlertType::Success, alert_text)
        }

        Action::LoginUserSuccess {
            user_id,
            user_role,
            alert_text,
        } => {
            next.user = Some(SessionUser {
                user_id: *user_id,
                user_role: *user_role,
            });
            next.done().alert(AlertType::Success, alert_text)
        }
        Action::VerifyAuthSuccess { user_id, user_role } => {
            next.user = Some(SessionUser {
                user_id: *user_id,
                user_role: *user_role,
            });
            next.done()
        }
        // Silent: an absent session on startup is not an error worth alerting
        Action::VerifyAuthError => {
            next.user = None;
            next.done()
        }
        Action::LogoutUserSuccess { alert_text } => next.signed_out().alert(AlertType::Success, alert_text),

        Action::AddNewModalitySuccess { modality } => {
            next.modalities.push(modality.clone());
            next.done().alert(AlertType::Success, "Modality created")
        }
        Action::GetModalitiesSuccess { modalities } => {
            next.modalities = modalities.clone();
            next.done()
        }
        Action::UpdateModalitySuccess { modality } => {
            replace_by_id(&mut next.modalities, modality);
            next.done().alert(AlertType::Success, "Modality updated")
        }
        Action::DeleteModalitySuccess { id } => {
            remove_by_id(&mut next.modalities, *id);
            next.done().alert(AlertType::Success, "Modality deleted")
        }

        Action::AddNewPlanSuccess { plan } => {
            next.plans.push(plan.clone());
            next.done().alert(AlertType::Success, "Plan created")
        }
        Action::GetPlansSuccess { plans } => {
            next.plans = plans.clone();
            next.done()
        }
        Action::UpdatePlanSuccess { plan } => {
            replace_by_id(&mut next.plans, plan);
            next.done().alert(AlertType::Success, "Plan updated")
        }
        Action::DeletePlanSuccess { id } => {
            remove_by_id(&mut next.plans, *id);
            next.done().alert(AlertType::Success, "Plan deleted")
        }

        Action::AddNewClassGroupSuccess { class_group } => {
            next.class_groups.push(class_group.clone());
            next.done().alert(AlertType::Success, "Class group created")
        }
        Action::GetClassGroupsSuccess { class_groups } => {
            next.class_groups = class_groups.clone();
            next.done()
        }
        Action::UpdateClassGroupSuccess { class_group } => {
            replace_by_id(&mut next.class_groups, class_group);
            next.done().alert(AlertType::Success, "Class group updated")
        }
        Action::DeleteClassGroupSuccess { id } => {
            remove_by_id(&mut next.class_groups, *id);
            next.done().alert(AlertType::Success, "Class group deleted")
        }

        Action::GetCustomerMembershipsSuccess { memberships } => {
            next.customer_memberships = memberships.clone();
            next.done()
        }
        Action::AddCustomerMembershipSuccess { membership } => {
            next.customer_memberships.push(membership.clone());
            next.done().alert(AlertType::Success, "Membership created")
        }

        Action::GetCustomersError { alert_text }
        | Action::RegisterCustomerError { alert_text }
        | Action::LoginUserError { alert_text }
        | Action::LogoutUserError { alert_text }
        | Action::AddNewModalityError { alert_text }
        | Action::GetModalitiesError { alert_text }
        | Action::UpdateModalityError { alert_text }
        | Action::DeleteModalityError { alert_text }
        | Action::AddNewPlanError { alert_text }
        | Action::GetPlansError { alert_text }
        | Action::UpdatePlanError { alert_text }
        | Action::DeletePlanError { alert_text }
        | Action::AddNewClassGroupError { alert_text }
        | Action::GetClassGroupsError { alert_text }
        | Action::UpdateClassGroupError { alert_text }
        | Action::DeleteClassGroupError { alert_text }
        | Action::GetCustomerMembershipsError { alert_text }
        | Action::AddCustomerMembershipError { alert_text } => next.done().alert(AlertType::Error, alert_text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserRole;
    use pretty_assertions::assert_eq;
    use uuid::Uuid;

    fn modality(name: &str) -> Modality {
        Modality {
            id: Uuid::new_v4(),
            name: name.to_string(),
            active: true,
        }
    }

    fn run(state: AppState, actions: &[Action]) -> AppState {
        actions.iter().fold(state, |state, action| reduce(&state, action))
    }

    #[test]
    fn test_begin_then_success_updates_slice() {
        let yoga = modality("Yoga");
        let state = run(
            AppState::default(),
            &[
                Action::OperationBegin,
                Action::GetModalitiesSuccess {
                    modalities: vec![yoga.clone()],
                },
            ],
        );

        assert!(!state.is_loading);
        assert_eq!(state.modalities, vec![yoga]);
        assert!(!state.show_alert);
    }

    #[test]
    fn test_begin_then_error_keeps_slice_and_alerts() {
        let initial = AppState {
            plans: vec![],
            modalities: vec![modality("Boxing")],
            ..AppState::default()
        };
        let state = run(
            initial.clone(),
            &[
                Action::OperationBegin,
                Action::AddNewModalityError {
                    alert_text: "Could not create modality".to_string(),
                },
            ],
        );

        assert!(!state.is_loading);
        assert_eq!(state.modalities, initial.modalities);
        assert!(state.show_alert);
        assert_eq!(state.alert_type, AlertType::Error);
        assert_eq!(state.alert_text, "Could not create modality");
    }

    #[test]
    fn test_update_and_delete_by_id() {
        let yoga = modality("Yoga");
        let judo = modality("Judo");
        let state = AppState {
            modalities: vec![yoga.clone(), judo.clone()],
            ..AppState::default()
        };

        let renamed = Modality {
            name: "Hatha Yoga".to_string(),
            ..yoga.clone()
        };
        let state = reduce(&state, &Action::UpdateModalitySuccess { modality: renamed.clone() });
        assert_eq!(state.modalities, vec![renamed, judo.clone()]);

        let state = reduce(&state, &Action::DeleteModalitySuccess { id: yoga.id });
        assert_eq!(state.modalities, vec![judo]);
    }

    #[test]
    fn test_session_expired_resets_everything_but_alerts() {
        let logged_in = AppState {
            user: Some(SessionUser {
                user_id: Uuid::new_v4(),
                user_role: UserRole::Admin,
            }),
            is_loading: true,
            modalities: vec![modality("Swim")],
            alert_id: 7,
            ..AppState::default()
        };

        let state = reduce(&logged_in, &Action::SessionExpired);
        assert_eq!(state.user, None);
        assert!(!state.is_loading);
        assert!(state.modalities.is_empty());
        assert!(state.show_alert);
        assert_eq!(state.alert_type, AlertType::Error);
        assert_eq!(state.alert_id, 8);
    }

    #[test]
    fn test_session_expired_without_session_stays_quiet() {
        let anonymous = AppState {
            is_loading: true,
            plans: vec![],
            modalities: vec![modality("Swim")],
            ..AppState::default()
        };

        let state = reduce(&anonymous, &Action::SessionExpired);
        assert_eq!(state.user, None);
        assert!(!state.is_loading);
        assert!(state.modalities.is_empty());
        assert!(!state.show_alert);
        assert_eq!(state.alert_id, 0);
    }

    #[test]
    fn test_expire_alert_only_clears_matching_id() {
        let state = reduce(
            &AppState::default(),
            &Action::ShowAlert {
                alert_text: "First".to_string(),
                alert_type: AlertType::Success,
            },
        );
        let state = reduce(
            &state,
            &Action::ShowAlert {
                alert_text: "Second".to_string(),
                alert_type: AlertType::Error,
            },
        );
        assert_eq!(state.alert_id, 2);

        let stale = reduce(&state, &Action::ExpireAlert { alert_id: 1 });
        assert!(stale.show_alert);
        assert_eq!(stale.alert_text, "Second");

        let expired = reduce(&state, &Action::ExpireAlert { alert_id: 2 });
        assert!(!expired.show_alert);
    }

    #[test]
    fn test_login_populates_user() {
        let user_id = Uuid::new_v4();
        let state = reduce(
            &AppState::default(),
            &Action::LoginUserSuccess {
                user_id,
                user_role: UserRole::Customer,
                alert_text: "Logged in".to_string(),
            },
        );
        assert_eq!(
            state.user,
            Some(SessionUser {
                user_id,
                user_role: UserRole::Customer
            })
        );
        assert_eq!(state.alert_type, AlertType::Success);
    }
}
