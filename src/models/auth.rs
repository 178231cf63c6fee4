use serde::{Deserialize, Serialize};

use super::user::User;

// ==================================================================================================
// Request Models
// ==================================================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterJobSeekerRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterEmployerRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub company_name: String,
}

impl RegisterJobSeekerRequest {
    /// Build a registration payload with the email normalised the way the backend stores it
    pub fn new(full_name: &str, email: &str, password: &str) -> Self {
        Self {
            full_name: full_name.trim().to_string(),
            email: email.trim().to_lowercase(),
            password: password.to_string(),
        }
    }
}

impl RegisterEmployerRequest {
    pub fn new(full_name: &str, email: &str, password: &str, company_name: &str) -> Self {
        Self {
            full_name: full_name.trim().to_string(),
            email: email.trim().to_lowercase(),
            password: password.to_string(),
            company_name: company_name.trim().to_string(),
        }
    }
}

// ==================================================================================================
// Response Models
// ==================================================================================================

/// Login/registration response. Every field is optional on the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}
