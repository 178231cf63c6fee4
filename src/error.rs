// Error handling module
// Defines the client error taxonomy and the refresh failures fanned out to waiters

use thiserror::Error;

/// Terminal outcome of a failed token refresh cycle.
///
/// Cloneable so a single failure can be delivered to every request waiting
/// on the same cycle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RefreshFailure {
    /// No refresh token was stored when the cycle started
    #[error("No refresh token available")]
    NoRefreshToken,

    /// The refresh endpoint answered but did not hand out an access token
    #[error("Refresh failed")]
    EmptyAccessToken,

    /// The refresh endpoint call itself failed
    #[error("Session expired: {0}")]
    Endpoint(String),
}

/// Errors surfaced to callers of the API client
#[derive(Error, Debug)]
pub enum ClientError {
    /// A 401 arrived while no access token was stored
    #[error("Unauthenticated")]
    Unauthenticated,

    /// Token refresh failed; the session has been terminated
    #[error(transparent)]
    Refresh(#[from] RefreshFailure),

    /// Non-2xx response from the backend
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Network-level failure before a response was received
    #[error("Transport error ({kind}): {message}")]
    Transport { kind: &'static str, message: String },

    /// Request could not be built
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Response body did not match the expected shape
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ClientError {
    /// HTTP status carried by this error, if it came from a response
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the backend rejected the request credentials
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Whether this error ended the session (credentials were cleared)
    pub fn is_session_terminated(&self) -> bool {
        matches!(self, ClientError::Refresh(_))
    }
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;
