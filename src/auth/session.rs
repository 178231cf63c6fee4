// Session termination and post-logout navigation

use std::sync::Arc;

use super::credentials::CredentialStore;

/// Default route shown after the session is terminated
pub const DEFAULT_LOGIN_ROUTE: &str = "/auth/login";

/// Ends the local session.
///
/// `force_logout` must be idempotent and must not fail; implementations log
/// and swallow storage errors.
pub trait SessionTerminator: Send + Sync {
    fn force_logout(&self);
}

/// Moves the user to another view
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: &str);
}

/// Clears every stored credential
pub struct LocalSessionTerminator {
    store: Arc<dyn CredentialStore>,
}

impl LocalSessionTerminator {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }
}

impl SessionTerminator for LocalSessionTerminator {
    fn force_logout(&self) {
        match self.store.clear() {
            Ok(()) => tracing::info!("Local session cleared"),
            Err(e) => tracing::error!("Failed to clear local session: {:#}", e),
        }
    }
}

/// Navigator for headless use: records the route in the log
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNavigator;

impl Navigator for TracingNavigator {
    fn navigate(&self, route: &str) {
        tracing::info!(route = route, "Navigation requested");
    }
}
