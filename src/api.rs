// JSON API client
// Prefixes paths with the base URL and sends every request through the interceptor chain

use bytes::Bytes;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use crate::error::{ClientError, Result};
use crate::http_client::{ApiRequest, ApiResponse};
use crate::middleware::Handler;

/// Client for the job portal REST API
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    handler: Arc<dyn Handler>,
}

impl ApiClient {
    pub fn new(base_url: &str, handler: Arc<dyn Handler>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            handler,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an API path
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Send a raw request
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        query: Vec<(String, String)>,
    ) -> Result<ApiResponse> {
        let mut request = ApiRequest::new(method, self.url(path)).with_query(query);
        request.body = body;

        let request_id = uuid::Uuid::new_v4().to_string()[..8].to_string();
        tracing::debug!(
            request_id = %request_id,
            method = %request.method,
            url = %request.url,
            "Sending API request"
        );

        let result = self.handler.handle(request).await;
        if let Err(ref e) = result {
            tracing::debug!(request_id = %request_id, error = %e, "API request failed");
        }
        result
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: Vec<(String, String)>,
    ) -> Result<T> {
        self.request(Method::GET, path, None, params).await?.json()
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let body = serde_json::to_value(body)?;
        self.request(Method::POST, path, Some(body), Vec::new())
            .await?
            .json()
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let body = serde_json::to_value(body)?;
        self.request(Method::PUT, path, Some(body), Vec::new())
            .await?
            .json()
    }

    pub async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let body = serde_json::to_value(body)?;
        self.request(Method::PATCH, path, Some(body), Vec::new())
            .await?
            .json()
    }

    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        params: Vec<(String, String)>,
    ) -> Result<T> {
        self.request(Method::DELETE, path, None, params).await?.json()
    }

    /// Download a binary resource (resumes, attachments)
    pub async fn get_bytes(&self, path: &str) -> Result<Bytes> {
        Ok(self
            .request(Method::GET, path, None, Vec::new())
            .await?
            .body)
    }
}

/// Flatten a filter object into query parameters.
///
/// Null and empty-string values are skipped, arrays become repeated keys,
/// nested objects are sent as JSON strings. Timestamps arrive here already
/// serialized as RFC 3339 strings.
pub fn build_params<P: Serialize + ?Sized>(params: &P) -> Result<Vec<(String, String)>> {
    let value = serde_json::to_value(params)?;
    let map = match value {
        Value::Null => return Ok(Vec::new()),
        Value::Object(map) => map,
        other => {
            return Err(ClientError::InvalidRequest(format!(
                "query parameters must be an object, got {}",
                other
            )))
        }
    };

    let mut out = Vec::new();
    for (key, value) in map {
        match value {
            Value::Array(items) => {
                for item in items {
                    if let Some(s) = scalar(&item) {
                        out.push((key.clone(), s));
                    }
                }
            }
            Value::Object(_) => out.push((key, value.to_string())),
            other => {
                if let Some(s) = scalar(&other) {
                    out.push((key, s));
                }
            }
        }
    }
    Ok(out)
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Object(_) | Value::Array(_) => Some(value.to_string()),
        other => Some(other.to_string()),
    }
}
