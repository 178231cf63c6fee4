// Client assembly
// Wires transport, refresh endpoint, session handling and interceptors into one client

use anyhow::Result;
use std::sync::Arc;

use crate::api::ApiClient;
use crate::auth::{
    AuthManager, CredentialStore, HttpTokenRefresher, LocalSessionTerminator, Navigator,
    SessionTerminator,
};
use crate::config::Config;
use crate::http_client::HttpTransport;
use crate::middleware::{AuthInterceptor, Chain, ErrorInterceptor};

/// Fully wired portal client.
///
/// Requests flow through `ErrorInterceptor` -> `AuthInterceptor` -> `HttpTransport`.
pub struct PortalClient {
    api: ApiClient,
    auth: AuthManager,
    interceptor: AuthInterceptor,
}

impl PortalClient {
    pub fn new(
        config: &Config,
        store: Arc<dyn CredentialStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        let transport = HttpTransport::new(config.http_connect_timeout, config.http_request_timeout)?;

        // The refresh call bypasses the chain so it never triggers 401 recovery itself
        let refresher = Arc::new(HttpTokenRefresher::with_client(
            transport.client().clone(),
            &config.api_url,
        ));
        let terminator: Arc<dyn SessionTerminator> =
            Arc::new(LocalSessionTerminator::new(store.clone()));

        let interceptor = AuthInterceptor::new(
            store.clone(),
            refresher,
            terminator.clone(),
            navigator.clone(),
            config.public_endpoints.clone(),
            config.login_route.clone(),
        );

        let chain = Chain::new(Arc::new(transport))
            .with(Arc::new(ErrorInterceptor::new(navigator)))
            .with(Arc::new(interceptor.clone()));

        let api = ApiClient::new(&config.api_url, Arc::new(chain));
        let auth = AuthManager::new(api.clone(), store, terminator);

        tracing::debug!(
            api_url = %config.api_url,
            public = ?config.public_endpoints.patterns(),
            "Portal client initialized"
        );

        Ok(Self {
            api,
            auth,
            interceptor,
        })
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn auth(&self) -> &AuthManager {
        &self.auth
    }

    /// Whether a token refresh is currently in flight
    pub fn is_refreshing(&self) -> bool {
        self.interceptor.is_refreshing()
    }
}
