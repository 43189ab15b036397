//! Sync actions: each one calls the API and reports the outcome to the store.
//!
//! Every action dispatches `OPERATION_BEGIN`, performs its call and then
//! exactly one terminal transition. A 401 from any call first forces a
//! logout (`SESSION_EXPIRED`). Errors are returned to the caller after the
//! terminal transition has been dispatched.

use log::{error, info, warn};
use std::sync::Arc;
use uuid::Uuid;

use crate::api_clients::GymApiClient;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::models::{ClassGroupInput, Credentials, MembershipInput, ModalityInput, NewCustomer, Plan, PlanInput};
use crate::state::{Action, AlertType, AppState, Store};

const SERVER_TROUBLE: &str = "Please try again later, the server is having problems";

pub struct AppContext {
    api: GymApiClient,
    store: Store,
}

impl AppContext {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        Ok(Self::with_parts(GymApiClient::new(config)?, Store::new()))
    }

    pub fn with_parts(api: GymApiClient, store: Store) -> Self {
        Self { api, store }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn snapshot(&self) -> Arc<AppState> {
        self.store.snapshot()
    }

    /// Shared response interceptor: any 401 deauthenticates the whole client.
    fn intercept<T>(&self, result: ClientResult<T>) -> ClientResult<T> {
        if let Err(ClientError::Unauthenticated(message)) = &result {
            warn!("Session rejected by the server, forcing logout: {}", message);
            self.store.dispatch(Action::SessionExpired);
        }
        result
    }

    /// Dispatches the error transition built from the alert text, then hands the error back.
    fn fail(&self, err: ClientError, fallback: &str, to_action: impl FnOnce(String) -> Action) -> ClientResult<()> {
        error!("{}: {}", fallback, err);
        self.store.dispatch(to_action(err.alert_text(fallback)));
        Err(err)
    }

    pub fn display_alert(&self, alert_text: &str, alert_type: AlertType) {
        self.store.dispatch(Action::ShowAlert {
            alert_text: alert_text.to_string(),
            alert_type,
        });
    }

    pub fn clear_alert_no_delay(&self) {
        self.store.dispatch(Action::ClearAlert);
    }

    // Customers

    pub async fn get_customers(&self) -> ClientResult<()> {
        self.store.dispatch(Action::OperationBegin);

        match self.intercept(self.api.list_customers().await) {
            Ok(customers) => {
                self.store.dispatch(Action::GetCustomersSuccess { customers });
                Ok(())
            }
            Err(err) => self.fail(err, "Failed to load customers", |alert_text| Action::GetCustomersError {
                alert_text,
            }),
        }
    }

    /// Registers a customer account and logs it in.
    pub async fn register_user(&self, customer: NewCustomer) -> ClientResult<()> {
        self.store.dispatch(Action::OperationBegin);

        match self.intercept(self.api.register_customer(&customer).await) {
            Ok(created) => {
                info!("Registered customer {}", created.id);
                self.store.dispatch(Action::RegisterCustomerSuccess {
                    customer: created,
                    alert_text: "Account created".to_string(),
                });
            }
            Err(err) => {
                return self.fail(err, "Failed to create account", |alert_text| Action::RegisterCustomerError {
                    alert_text,
                });
            }
        }

        self.login_user(Credentials {
            email: customer.email,
            password: customer.password,
        })
        .await
    }

    // Auth

    pub async fn login_user(&self, credentials: Credentials) -> ClientResult<()> {
        self.store.dispatch(Action::OperationBegin);

        match self.intercept(self.api.login(&credentials).await) {
            Ok(session) => {
                info!("Logged in as {} ({:?})", session.user_id, session.user_role);
                self.store.dispatch(Action::LoginUserSuccess {
                    user_id: session.user_id,
                    user_role: session.user_role,
                    alert_text: "Logged in successfully".to_string(),
                });
                Ok(())
            }
            Err(err) => self.fail(err, SERVER_TROUBLE, |alert_text| Action::LoginUserError { alert_text }),
        }
    }

    /// Restores the session from the cookie, if the server still accepts it.
    pub async fn verify_auth(&self) -> ClientResult<()> {
        self.store.dispatch(Action::OperationBegin);

        match self.intercept(self.api.verify_session().await) {
            Ok(session) => {
                self.store.dispatch(Action::VerifyAuthSuccess {
                    user_id: session.user_id,
                    user_role: session.user_role,
                });
                Ok(())
            }
            Err(err) => {
                info!("No active session: {}", err);
                self.store.dispatch(Action::VerifyAuthError);
                Err(err)
            }
        }
    }

    pub async fn logout_user(&self) -> ClientResult<()> {
        self.store.dispatch(Action::OperationBegin);

        match self.intercept(self.api.logout().await) {
            Ok(()) => {
                self.store.dispatch(Action::LogoutUserSuccess {
                    alert_text: "Logged out".to_string(),
                });
                Ok(())
            }
            Err(err) => self.fail(err, SERVER_TROUBLE, |alert_text| Action::LogoutUserError { alert_text }),
        }
    }

    // Modalities

    pub async fn add_modality(&self, modality: ModalityInput) -> ClientResult<()> {
        self.store.dispatch(Action::OperationBegin);

        match self.intercept(self.api.create_modality(&modality).await) {
            Ok(modality) => {
                self.store.dispatch(Action::AddNewModalitySuccess { modality });
                Ok(())
            }
            Err(err) => self.fail(err, "Could not create modality", |alert_text| Action::AddNewModalityError {
                alert_text,
            }),
        }
    }

    pub async fn get_modalities(&self) -> ClientResult<()> {
        self.store.dispatch(Action::OperationBegin);

        match self.intercept(self.api.list_modalities().await) {
            Ok(modalities) => {
                self.store.dispatch(Action::GetModalitiesSuccess { modalities });
                Ok(())
            }
            Err(err) => self.fail(err, "Could not load modalities", |alert_text| Action::GetModalitiesError {
                alert_text,
            }),
        }
    }

    pub async fn update_modality(&self, modality: ModalityInput, id: Uuid) -> ClientResult<()> {
        self.store.dispatch(Action::OperationBegin);

        match self.intercept(self.api.update_modality(id, &modality).await) {
            Ok(modality) => {
                self.store.dispatch(Action::UpdateModalitySuccess { modality });
                Ok(())
            }
            Err(err) => self.fail(err, "Could not update modality", |alert_text| Action::UpdateModalityError {
                alert_text,
            }),
        }
    }

    pub async fn delete_modality(&self, id: Uuid) -> ClientResult<()> {
        self.store.dispatch(Action::OperationBegin);

        match self.intercept(self.api.delete_modality(id).await) {
            Ok(()) => {
                self.store.dispatch(Action::DeleteModalitySuccess { id });
                Ok(())
            }
            Err(err) => self.fail(err, "Could not delete modality", |alert_text| Action::DeleteModalityError {
                alert_text,
            }),
        }
    }

    // Plans

    pub async fn add_plan(&self, plan: PlanInput) -> ClientResult<()> {
        self.store.dispatch(Action::OperationBegin);

        match self.intercept(self.api.create_plan(&plan).await) {
            Ok(plan) => {
                self.store.dispatch(Action::AddNewPlanSuccess { plan });
                Ok(())
            }
            Err(err) => self.fail(err, "Could not create plan", |alert_text| Action::AddNewPlanError { alert_text }),
        }
    }

    pub async fn get_plans(&self) -> ClientResult<()> {
        self.store.dispatch(Action::OperationBegin);

        match self.intercept(self.api.list_plans().await) {
            Ok(plans) => {
                self.store.dispatch(Action::GetPlansSuccess { plans });
                Ok(())
            }
            Err(err) => self.fail(err, "Could not load plans", |alert_text| Action::GetPlansError { alert_text }),
        }
    }

    pub async fn update_plan(&self, plan: Plan) -> ClientResult<()> {
        self.store.dispatch(Action::OperationBegin);

        match self.intercept(self.api.update_plan(&plan).await) {
            Ok(plan) => {
                self.store.dispatch(Action::UpdatePlanSuccess { plan });
                Ok(())
            }
            Err(err) => self.fail(err, "Could not update plan", |alert_text| Action::UpdatePlanError { alert_text }),
        }
    }

    pub async fn delete_plan(&self, id: Uuid) -> ClientResult<()> {
        self.store.dispatch(Action::OperationBegin);

        match self.intercept(self.api.delete_plan(id).await) {
            Ok(()) => {
                self.store.dispatch(Action::DeletePlanSuccess { id });
                Ok(())
            }
            Err(err) => self.fail(err, "Could not delete plan", |alert_text| Action::DeletePlanError { alert_text }),
        }
    }

    // Class groups

    pub async fn add_class_group(&self, class_group: ClassGroupInput) -> ClientResult<()> {
        self.store.dispatch(Action::OperationBegin);

        match self.intercept(self.api.create_class_group(&class_group).await) {
            Ok(class_group) => {
                self.store.dispatch(Action::AddNewClassGroupSuccess { class_group });
                Ok(())
            }
            Err(err) => self.fail(err, "Could not create class group", |alert_text| {
                Action::AddNewClassGroupError { alert_text }
            }),
        }
    }

    pub async fn get_class_groups(&self) -> ClientResult<()> {
        self.store.dispatch(Action::OperationBegin);

        match self.intercept(self.api.list_class_groups().await) {
            Ok(class_groups) => {
                self.store.dispatch(Action::GetClassGroupsSuccess { class_groups });
                Ok(())
            }
            Err(err) => self.fail(err, "Could not load class groups", |alert_text| {
                Action::GetClassGroupsError { alert_text }
            }),
        }
    }

    pub async fn update_class_group(&self, class_group: ClassGroupInput, id: Uuid) -> ClientResult<()> {
        self.store.dispatch(Action::OperationBegin);

        match self.intercept(self.api.update_class_group(id, &class_group).await) {
            Ok(class_group) => {
                self.store.dispatch(Action::UpdateClassGroupSuccess { class_group });
                Ok(())
            }
            Err(err) => self.fail(err, "Could not update class group", |alert_text| {
                Action::UpdateClassGroupError { alert_text }
            }),
        }
    }

    pub async fn delete_class_group(&self, id: Uuid) -> ClientResult<()> {
        self.store.dispatch(Action::OperationBegin);

        match self.intercept(self.api.delete_class_group(id).await) {
            Ok(()) => {
                self.store.dispatch(Action::DeleteClassGroupSuccess { id });
                Ok(())
            }
            Err(err) => self.fail(err, "Could not delete class group", |alert_text| {
                Action::DeleteClassGroupError { alert_text }
            }),
        }
    }

    // Memberships

    pub async fn get_customer_memberships(&self, customer_id: Uuid) -> ClientResult<()> {
        self.store.dispatch(Action::OperationBegin);

        match self.intercept(self.api.list_customer_memberships(customer_id).await) {
            Ok(memberships) => {
                self.store.dispatch(Action::GetCustomerMembershipsSuccess { memberships });
                Ok(())
            }
            Err(err) => self.fail(err, "Could not load memberships", |alert_text| {
                Action::GetCustomerMembershipsError { alert_text }
            }),
        }
    }

    pub async fn add_customer_membership(&self, customer_id: Uuid, membership: MembershipInput) -> ClientResult<()> {
        self.store.dispatch(Action::OperationBegin);

        match self.intercept(self.api.create_customer_membership(customer_id, &membership).await) {
            Ok(membership) => {
                self.store.dispatch(Action::AddCustomerMembershipSuccess { membership });
                Ok(())
            }
            Err(err) => self.fail(err, "Could not create membership", |alert_text| {
                Action::AddCustomerMembershipError { alert_text }
            }),
        }
    }
}
