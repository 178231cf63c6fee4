use anyhow::Context;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::error::{ClientError, Result};
use crate::middleware::Handler;

/// Outgoing request descriptor.
///
/// Interceptors never edit a request they were handed; they derive new
/// descriptors from it (see [`ApiRequest::with_bearer`]).
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HeaderMap::new(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: impl Into<String>, body: serde_json::Value) -> Self {
        Self::new(Method::POST, url).with_body(body)
    }

    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    /// Copy of this request carrying exactly one `Authorization: Bearer <token>` header
    pub fn with_bearer(&self, token: &str) -> Result<ApiRequest> {
        let value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| {
            ClientError::InvalidRequest("access token contains invalid header characters".into())
        })?;

        let mut request = self.clone();
        request.headers.insert(AUTHORIZATION, value);
        Ok(request)
    }

    /// Token carried in the Authorization header, if any
    pub fn bearer_token(&self) -> Option<&str> {
        self.headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
    }
}

/// Successful (2xx) response
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl ApiResponse {
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Decode the body as JSON. An empty body decodes as `null`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        if self.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(serde_json::from_slice(b"null")?);
        }
        Ok(serde_json::from_slice(&self.body)?)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Terminal handler that sends requests over the network
pub struct HttpTransport {
    /// Shared HTTP client with connection pooling
    client: Client,
}

impl HttpTransport {
    /// Create a new transport
    pub fn new(connect_timeout: u64, request_timeout: u64) -> anyhow::Result<Self> {
        let client = Client::builder()
            .pool_max_idle_per_host(20)
            .connect_timeout(Duration::from_secs(connect_timeout))
            .timeout(Duration::from_secs(request_timeout))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    /// Get the underlying HTTP client
    pub fn client(&self) -> &Client {
        &self.client
    }

    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        let method = request.method.clone();
        let url = request.url.clone();

        let mut builder = self
            .client
            .request(request.method, &request.url)
            .headers(request.headers);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = request.body {
            builder = builder.json(&body);
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                let kind = error_kind(&e);
                tracing::warn!(
                    error_kind = kind,
                    error = %e,
                    method = %method,
                    url = %url,
                    "HTTP request error"
                );
                return Err(ClientError::Transport {
                    kind,
                    message: e.to_string(),
                });
            }
        };

        let status = response.status();
        let headers = response.headers().clone();

        if status.is_success() {
            let body = response.bytes().await.map_err(|e| ClientError::Transport {
                kind: error_kind(&e),
                message: e.to_string(),
            })?;
            tracing::debug!(status = %status, method = %method, url = %url, "Request successful");
            return Ok(ApiResponse {
                status,
                headers,
                body,
            });
        }

        let error_text = response.text().await.unwrap_or_default();
        tracing::debug!(
            status = status.as_u16(),
            method = %method,
            url = %url,
            response_body = %error_text,
            "Received error response"
        );

        Err(ClientError::Http {
            status: status.as_u16(),
            message: error_text,
        })
    }
}

#[async_trait]
impl Handler for HttpTransport {
    async fn handle(&self, request: ApiRequest) -> Result<ApiResponse> {
        self.execute(request).await
    }
}

/// Categorize a reqwest error for logging
fn error_kind(e: &reqwest::Error) -> &'static str {
    if e.is_timeout() {
        "timeout"
    } else if e.is_connect() {
        "connection_failed"
    } else if e.is_request() {
        "request_error"
    } else if e.is_body() {
        "body_error"
    } else if e.is_decode() {
        "decode_error"
    } else {
        "unknown"
    }
}
