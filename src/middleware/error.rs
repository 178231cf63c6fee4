// Error routing
// Sends the user to the matching error view for 403/404 and logs server errors

use async_trait::async_trait;
use std::sync::Arc;

use super::{Handler, Interceptor};
use crate::auth::Navigator;
use crate::error::{ClientError, Result};
use crate::http_client::{ApiRequest, ApiResponse};

pub const NOT_FOUND_ROUTE: &str = "/404";
pub const FORBIDDEN_ROUTE: &str = "/403";

/// Outermost interceptor. Never swallows an error: the caller always sees it.
pub struct ErrorInterceptor {
    navigator: Arc<dyn Navigator>,
}

impl ErrorInterceptor {
    pub fn new(navigator: Arc<dyn Navigator>) -> Self {
        Self { navigator }
    }
}

#[async_trait]
impl Interceptor for ErrorInterceptor {
    async fn intercept(&self, request: ApiRequest, next: &dyn Handler) -> Result<ApiResponse> {
        let url = request.url.clone();
        let result = next.handle(request).await;

        if let Err(ClientError::Http { status, message }) = &result {
            match *status {
                404 => self.navigator.navigate(NOT_FOUND_ROUTE),
                403 => self.navigator.navigate(FORBIDDEN_ROUTE),
                500 => tracing::error!(url = %url, "Server Error: {}", message),
                _ => {}
            }
        }

        result
    }
}
