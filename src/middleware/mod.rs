// Request interceptors
// Handler/Interceptor seams, the chain that composes them, and the concrete interceptors

pub mod auth;
pub mod error;
pub mod public;
mod refresh_state;

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::Result;
use crate::http_client::{ApiRequest, ApiResponse};

pub use auth::AuthInterceptor;
pub use error::ErrorInterceptor;
pub use public::PublicEndpoints;

/// Anything that can turn a request into a response: the network transport,
/// or the remainder of an interceptor chain.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, request: ApiRequest) -> Result<ApiResponse>;
}

/// A layer that sees every request on its way out and every result on its way back
#[async_trait]
pub trait Interceptor: Send + Sync {
    async fn intercept(&self, request: ApiRequest, next: &dyn Handler) -> Result<ApiResponse>;
}

/// Ordered interceptors wrapped around a terminal handler.
///
/// The first interceptor added is the outermost one.
#[derive(Clone)]
pub struct Chain {
    interceptors: Vec<Arc<dyn Interceptor>>,
    terminal: Arc<dyn Handler>,
}

impl Chain {
    pub fn new(terminal: Arc<dyn Handler>) -> Self {
        Self {
            interceptors: Vec::new(),
            terminal,
        }
    }

    /// Append an interceptor inside the ones already added
    pub fn with(mut self, interceptor: Arc<dyn Interceptor>) -> Self {
        self.interceptors.push(interceptor);
        self
    }
}

#[async_trait]
impl Handler for Chain {
    async fn handle(&self, request: ApiRequest) -> Result<ApiResponse> {
        Next {
            interceptors: &self.interceptors,
            terminal: self.terminal.as_ref(),
        }
        .handle(request)
        .await
    }
}

/// Continuation handed to each interceptor
struct Next<'a> {
    interceptors: &'a [Arc<dyn Interceptor>],
    terminal: &'a dyn Handler,
}

#[async_trait]
impl Handler for Next<'_> {
    async fn handle(&self, request: ApiRequest) -> Result<ApiResponse> {
        match self.interceptors.split_first() {
            Some((first, rest)) => {
                let next = Next {
                    interceptors: rest,
                    terminal: self.terminal,
                };
                first.intercept(request, &next).await
            }
            None => self.terminal.handle(request).await,
        }
    }
}
