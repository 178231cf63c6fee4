// Authentication module
// Credential storage, token refresh, session termination and session flows

pub mod credentials;
mod manager;
pub mod refresh;
pub mod session;
pub mod types;

pub use credentials::{CredentialStore, MemoryCredentialStore, SqliteCredentialStore};
pub use manager::AuthManager;
pub use refresh::{HttpTokenRefresher, TokenRefresher};
pub use session::{
    LocalSessionTerminator, Navigator, SessionTerminator, TracingNavigator, DEFAULT_LOGIN_ROUTE,
};
