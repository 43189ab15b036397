use log::{debug, error, info};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::api_clients::error_handling::map_server_error;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::models::{
    ClassGroup, ClassGroupInput, Credentials, Customer, Membership, MembershipInput, Modality, ModalityInput,
    NewCustomer, Plan, PlanInput, SessionUser,
};

/// HTTP client for the gym API.
///
/// The session lives in the `access_token` cookie, so the underlying reqwest
/// client keeps a cookie store and every request is sent with credentials.
#[derive(Clone)]
pub struct GymApiClient {
    http: Client,
    base_url: String,
}

impl GymApiClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let http = Client::builder()
            .cookie_store(true)
            .build()
            .map_err(|e| ClientError::Network(format!("Failed to build HTTP client: {}", e)))?;

        info!("Gym API client targeting {}", config.api_url);
        Ok(Self {
            http,
            base_url: config.api_url.clone(),
        })
    }

    /// Sends a request and returns the decoded JSON body of a success response.
    async fn send<B: Serialize + ?Sized>(&self, method: Method, endpoint: &str, body: Option<&B>) -> ClientResult<Value> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("{} {}", method, url);

        let mut request_builder = self.http.request(method.clone(), &url);
        if let Some(body) = body {
            request_builder = request_builder.json(body);
        }

        let response = request_builder.send().await.map_err(|e| {
            error!("Request {} {} failed: {}", method, url, e);
            ClientError::Network(format!("Request failed: {}", e))
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ClientError::Network(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(map_server_error(status.as_u16(), &text));
        }

        serde_json::from_str(&text)
            .map_err(|e| ClientError::InvalidResponse(format!("Failed to parse response: {}", e)))
    }

    async fn get(&self, endpoint: &str) -> ClientResult<Value> {
        self.send::<Value>(Method::GET, endpoint, None).await
    }

    /// Takes the value under `key` out of a response envelope.
    fn unwrap_envelope<T: DeserializeOwned>(mut body: Value, key: &str) -> ClientResult<T> {
        let value = body
            .get_mut(key)
            .map(Value::take)
            .ok_or_else(|| ClientError::InvalidResponse(format!("Response is missing '{}'", key)))?;
        serde_json::from_value(value)
            .map_err(|e| ClientError::InvalidResponse(format!("Unexpected '{}' in response: {}", key, e)))
    }

    // Auth

    pub async fn login(&self, credentials: &Credentials) -> ClientResult<SessionUser> {
        let body = self.send(Method::POST, "/auth/login", Some(credentials)).await?;
        serde_json::from_value(body).map_err(|e| ClientError::InvalidResponse(format!("Invalid session: {}", e)))
    }

    pub async fn verify_session(&self) -> ClientResult<SessionUser> {
        let body = self.get("/auth").await?;
        serde_json::from_value(body).map_err(|e| ClientError::InvalidResponse(format!("Invalid session: {}", e)))
    }

    pub async fn logout(&self) -> ClientResult<()> {
        self.send::<Value>(Method::DELETE, "/auth/logout", None).await?;
        Ok(())
    }

    // Customers

    pub async fn list_customers(&self) -> ClientResult<Vec<Customer>> {
        Self::unwrap_envelope(self.get("/customers").await?, "customers")
    }

    pub async fn register_customer(&self, customer: &NewCustomer) -> ClientResult<Customer> {
        let body = self.send(Method::POST, "/customers", Some(customer)).await?;
        Self::unwrap_envelope(body, "customer")
    }

    pub async fn list_customer_memberships(&self, customer_id: Uuid) -> ClientResult<Vec<Membership>> {
        let body = self.get(&format!("/customers/{}/memberships", customer_id)).await?;
        Self::unwrap_envelope(body, "memberships")
    }

    pub async fn create_customer_membership(
        &self,
        customer_id: Uuid,
        membership: &MembershipInput,
    ) -> ClientResult<Membership> {
        let endpoint = format!("/customers/{}/memberships", customer_id);
        let body = self.send(Method::POST, &endpoint, Some(membership)).await?;
        Self::unwrap_envelope(body, "membership")
    }

    // Modalities

    pub async fn create_modality(&self, modality: &ModalityInput) -> ClientResult<Modality> {
        let body = self.send(Method::POST, "/modalities", Some(modality)).await?;
        Self::unwrap_envelope(body, "modality")
    }

    pub async fn list_modalities(&self) -> ClientResult<Vec<Modality>> {
        Self::unwrap_envelope(self.get("/modalities").await?, "modalities")
    }

    pub async fn update_modality(&self, id: Uuid, modality: &ModalityInput) -> ClientResult<Modality> {
        let body = self
            .send(Method::PATCH, &format!("/modalities/{}", id), Some(modality))
            .await?;
        Self::unwrap_envelope(body, "modality")
    }

    pub async fn delete_modality(&self, id: Uuid) -> ClientResult<()> {
        self.send::<Value>(Method::DELETE, &format!("/modalities/{}", id), None).await?;
        Ok(())
    }

    // Plans

    pub async fn create_plan(&self, plan: &PlanInput) -> ClientResult<Plan> {
        let body = self.send(Method::POST, "/plans", Some(plan)).await?;
        Self::unwrap_envelope(body, "plan")
    }

    pub async fn list_plans(&self) -> ClientResult<Vec<Plan>> {
        Self::unwrap_envelope(self.get("/plans").await?, "plans")
    }

    pub async fn update_plan(&self, plan: &Plan) -> ClientResult<Plan> {
        let body = self.send(Method::PATCH, &format!("/plans/{}", plan.id), Some(plan)).await?;
        Self::unwrap_envelope(body, "plan")
    }

    pub async fn delete_plan(&self, id: Uuid) -> ClientResult<()> {
        self.send::<Value>(Method::DELETE, &format!("/plans/{}", id), None).await?;
        Ok(())
    }

    // Class groups

    pub async fn create_class_group(&self, class_group: &ClassGroupInput) -> ClientResult<ClassGroup> {
        let body = self.send(Method::POST, "/classGroups", Some(class_group)).await?;
        Self::unwrap_envelope(body, "classGroup")
    }

    pub async fn list_class_groups(&self) -> ClientResult<Vec<ClassGroup>> {
        Self::unwrap_envelope(self.get("/classGroups").await?, "classGroups")
    }

    pub async fn update_class_group(&self, id: Uuid, class_group: &ClassGroupInput) -> ClientResult<ClassGroup> {
        let body = self
            .send(Method::PATCH, &format!("/classGroups/{}", id), Some(class_group))
            .await?;
        Self::unwrap_envelope(body, "classGroup")
    }

    pub async fn delete_class_group(&self, id: Uuid) -> ClientResult<()> {
        self.send::<Value>(Method::DELETE, &format!("/classGroups/{}", id), None).await?;
        Ok(())
    }
}
