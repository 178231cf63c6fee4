use serde_json::{json, Value};
use std::sync::Arc;

use super::credentials::CredentialStore;
use super::session::SessionTerminator;
use crate::api::ApiClient;
use crate::error::Result;
use crate::models::{
    LoginRequest, LoginResponse, RegisterEmployerRequest, RegisterJobSeekerRequest, User,
};

/// Session flows on top of the API client: login, registration, logout and
/// the locally cached user snapshot
pub struct AuthManager {
    /// Client routed through the interceptor chain
    api: ApiClient,

    /// Persisted tokens and user snapshot
    store: Arc<dyn CredentialStore>,

    /// Clears the local session
    terminator: Arc<dyn SessionTerminator>,
}

impl AuthManager {
    pub fn new(
        api: ApiClient,
        store: Arc<dyn CredentialStore>,
        terminator: Arc<dyn SessionTerminator>,
    ) -> Self {
        Self {
            api,
            store,
            terminator,
        }
    }

    /// Log in and persist whatever the backend handed out
    pub async fn login(&self, payload: &LoginRequest) -> Result<LoginResponse> {
        tracing::debug!("Logging in as {}", payload.email);
        let response: LoginResponse = self.api.post("/auth/login", payload).await?;

        if let Some(token) = response.access_token.as_deref().filter(|t| !t.is_empty()) {
            self.store.set_access_token(token)?;
        }
        if let Some(token) = response.refresh_token.as_deref().filter(|t| !t.is_empty()) {
            self.store.set_refresh_token(token)?;
        }
        if let Some(user) = &response.user {
            self.store.set_current_user(Some(user))?;
            tracing::info!("Logged in as {} (id {})", user.email, user.id);
        }

        Ok(response)
    }

    pub async fn register_job_seeker(
        &self,
        payload: &RegisterJobSeekerRequest,
    ) -> Result<LoginResponse> {
        self.api.post("/auth/register/job-seeker", payload).await
    }

    pub async fn register_employer(
        &self,
        payload: &RegisterEmployerRequest,
    ) -> Result<LoginResponse> {
        self.api.post("/auth/register/employer", payload).await
    }

    /// Clear the local session, then tell the backend. Backend failures are ignored.
    pub async fn logout(&self) {
        self.terminator.force_logout();

        if let Err(e) = self.api.post::<Value, _>("/auth/logout", &json!({})).await {
            tracing::debug!("Backend logout failed (ignored): {}", e);
        }
    }

    /// Clear the local session without contacting the backend
    pub fn force_logout(&self) {
        self.terminator.force_logout();
    }

    pub fn access_token(&self) -> Option<String> {
        self.store.access_token()
    }

    pub fn current_user(&self) -> Option<User> {
        self.store.current_user()
    }

    pub fn is_logged_in(&self) -> bool {
        self.current_user().is_some()
    }

    /// Update a user profile; refreshes the cached snapshot when it is the current user
    pub async fn update_profile(&self, user_id: i64, payload: &Value) -> Result<User> {
        let user: User = self
            .api
            .put(&format!("/users/{}", user_id), payload)
            .await?;

        if self.current_user().is_some_and(|current| current.id == user.id) {
            self.store.set_current_user(Some(&user))?;
        }

        Ok(user)
    }

    pub fn save_access_token(&self, token: &str) -> Result<()> {
        Ok(self.store.set_access_token(token)?)
    }

    pub fn save_refresh_token(&self, token: &str) -> Result<()> {
        Ok(self.store.set_refresh_token(token)?)
    }

    pub fn remove_tokens(&self) -> Result<()> {
        Ok(self.store.remove_tokens()?)
    }
}
