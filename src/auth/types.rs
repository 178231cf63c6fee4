// Authentication types

use serde::{Deserialize, Serialize};

/// Body of `POST /auth/refresh-token`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Refresh endpoint response. The token may be missing even on a 2xx answer.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
}

impl RefreshTokenResponse {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            access_token: Some(token.into()),
        }
    }

    /// The new access token, if the response carried a usable one
    pub fn usable_token(self) -> Option<String> {
        self.access_token.filter(|t| !t.is_empty())
    }
}

/// Shorten a token for log output
pub fn redact(token: &str) -> String {
    let prefix: String = token.chars().take(8).collect();
    format!("{}...", prefix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_serializes_camel_case() {
        let body = serde_json::to_value(RefreshTokenRequest {
            refresh_token: "r".to_string(),
        })
        .unwrap();
        assert_eq!(body, json!({ "refreshToken": "r" }));
    }

    #[test]
    fn test_usable_token() {
        let res: RefreshTokenResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(res.usable_token(), None);

        let res: RefreshTokenResponse =
            serde_json::from_value(json!({ "accessToken": "" })).unwrap();
        assert_eq!(res.usable_token(), None);

        let res: RefreshTokenResponse =
            serde_json::from_value(json!({ "accessToken": null })).unwrap();
        assert_eq!(res.usable_token(), None);

        assert_eq!(
            RefreshTokenResponse::with_token("new").usable_token().as_deref(),
            Some("new")
        );
    }

    #[test]
    fn test_redact() {
        assert_eq!(redact("abcdefghijklmnop"), "abcdefgh...");
        assert_eq!(redact("abc"), "abc...");
    }
}
