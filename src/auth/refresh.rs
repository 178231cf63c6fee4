// Token refresh endpoint

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use super::types::{RefreshTokenRequest, RefreshTokenResponse};

/// Mints a new access token from a refresh token
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    async fn refresh(&self, refresh_token: &str) -> Result<RefreshTokenResponse>;
}

/// Calls `POST {api_url}/auth/refresh-token` directly, outside the interceptor chain
pub struct HttpTokenRefresher {
    client: Client,
    url: String,
}

impl HttpTokenRefresher {
    pub fn new(api_url: &str, request_timeout: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(request_timeout))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self::with_client(client, api_url))
    }

    pub fn with_client(client: Client, api_url: &str) -> Self {
        Self {
            client,
            url: format!("{}/auth/refresh-token", api_url.trim_end_matches('/')),
        }
    }
}

#[async_trait]
impl TokenRefresher for HttpTokenRefresher {
    async fn refresh(&self, refresh_token: &str) -> Result<RefreshTokenResponse> {
        tracing::debug!("Requesting new access token from {}", self.url);

        let request = RefreshTokenRequest {
            refresh_token: refresh_token.to_string(),
        };

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .context("Failed to send refresh request")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(
                "Token refresh rejected: status={}, body={}",
                status,
                error_text
            );
            anyhow::bail!("Token refresh failed: {} - {}", status, error_text);
        }

        let body = response
            .bytes()
            .await
            .context("Failed to read refresh response")?;

        // A 2xx with an empty body is treated as "no token", not as a transport error
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(RefreshTokenResponse::default());
        }

        serde_json::from_slice(&body).context("Failed to parse refresh response")
    }
}
