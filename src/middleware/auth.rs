// Authenticated request pipeline
// Attaches bearer tokens and recovers from 401s with a single shared token refresh

use async_trait::async_trait;
use std::sync::Arc;

use super::public::PublicEndpoints;
use super::refresh_state::{RefreshOutcome, RefreshState};
use super::{Handler, Interceptor};
use crate::auth::types::redact;
use crate::auth::{CredentialStore, Navigator, SessionTerminator, TokenRefresher};
use crate::error::{ClientError, RefreshFailure, Result};
use crate::http_client::{ApiRequest, ApiResponse};

/// Interceptor that authenticates outgoing requests.
///
/// - Public endpoints are forwarded untouched.
/// - Other requests get `Authorization: Bearer <access token>` when one is stored.
/// - A 401 triggers recovery: at most one refresh runs at a time, every request
///   that hit 401 meanwhile waits for that refresh, then each is retried once
///   with the new token. If the refresh fails, the session is terminated once
///   and every waiting request fails with the same error.
#[derive(Clone)]
pub struct AuthInterceptor {
    inner: Arc<Inner>,
}

struct Inner {
    store: Arc<dyn CredentialStore>,
    refresher: Arc<dyn TokenRefresher>,
    terminator: Arc<dyn SessionTerminator>,
    navigator: Arc<dyn Navigator>,
    public: PublicEndpoints,
    login_route: String,
    refresh: RefreshState,
}

impl AuthInterceptor {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        refresher: Arc<dyn TokenRefresher>,
        terminator: Arc<dyn SessionTerminator>,
        navigator: Arc<dyn Navigator>,
        public: PublicEndpoints,
        login_route: impl Into<String>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                store,
                refresher,
                terminator,
                navigator,
                public,
                login_route: login_route.into(),
                refresh: RefreshState::new(),
            }),
        }
    }

    /// Whether a token refresh is currently in flight
    pub fn is_refreshing(&self) -> bool {
        self.inner.refresh.is_refreshing()
    }

    /// 401 recovery for one request. `request` is the descriptor that was rejected.
    async fn recover(&self, request: ApiRequest, next: &dyn Handler) -> Result<ApiResponse> {
        if self.inner.store.access_token().is_none() {
            tracing::warn!(url = %request.url, "401 without a stored access token");
            return Err(ClientError::Unauthenticated);
        }

        let (waiter, cycle) = self.inner.refresh.join_or_begin();

        match cycle {
            Some(cycle) => {
                // Detached so that dropping the originating request does not abort the refresh
                let inner = Arc::clone(&self.inner);
                tokio::spawn(async move {
                    let outcome = inner.run_refresh().await;
                    inner.refresh.settle(cycle, outcome);
                });
            }
            None => tracing::debug!(url = %request.url, "Refresh already in flight, waiting"),
        }

        let token = waiter.outcome().await?;

        tracing::debug!(
            method = %request.method,
            url = %request.url,
            "Retrying request with refreshed token"
        );
        next.handle(request.with_bearer(&token)?).await
    }
}

impl Inner {
    async fn run_refresh(&self) -> RefreshOutcome {
        tracing::info!("Refreshing access token...");

        let Some(refresh_token) = self.store.refresh_token() else {
            tracing::warn!("No refresh token stored, terminating session");
            self.terminate_session();
            return Err(RefreshFailure::NoRefreshToken);
        };

        match self.refresher.refresh(&refresh_token).await {
            Ok(response) => match response.usable_token() {
                Some(token) => {
                    if let Err(e) = self.store.set_access_token(&token) {
                        tracing::error!("Failed to persist refreshed access token: {:#}", e);
                    }
                    tracing::info!("Access token refreshed ({})", redact(&token));
                    Ok(token)
                }
                None => {
                    tracing::error!("Refresh response did not contain an access token");
                    self.terminate_session();
                    Err(RefreshFailure::EmptyAccessToken)
                }
            },
            Err(e) => {
                tracing::error!("Token refresh failed: {:#}", e);
                self.terminate_session();
                Err(RefreshFailure::Endpoint(format!("{:#}", e)))
            }
        }
    }

    fn terminate_session(&self) {
        self.terminator.force_logout();
        self.navigator.navigate(&self.login_route);
    }
}

#[async_trait]
impl Interceptor for AuthInterceptor {
    async fn intercept(&self, request: ApiRequest, next: &dyn Handler) -> Result<ApiResponse> {
        if self.inner.public.matches(&request.url) {
            return next.handle(request).await;
        }

        let authed = match self.inner.store.access_token() {
            Some(token) => request.with_bearer(&token)?,
            None => request,
        };

        match next.handle(authed.clone()).await {
            Err(e) if e.is_unauthorized() => {
                tracing::warn!(
                    method = %authed.method,
                    url = %authed.url,
                    "Received 401, attempting token refresh"
                );
                self.recover(authed, next).await
            }
            result => result,
        }
    }
}
