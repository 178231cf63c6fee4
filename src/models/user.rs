use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role assigned to a portal account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Admin,
    Employer,
    JobSeeker,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            UserRole::Admin => "ADMIN",
            UserRole::Employer => "EMPLOYER",
            UserRole::JobSeeker => "JOB_SEEKER",
        };
        f.write_str(s)
    }
}

/// Portal account as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_deserializes_camel_case() {
        let user: User = serde_json::from_value(json!({
            "id": 7,
            "fullName": "Ada Lovelace",
            "email": "ada@example.com",
            "role": "JOB_SEEKER",
            "profilePictureUrl": "https://cdn.example.com/ada.png",
            "createdAt": "2025-01-12T10:30:00Z"
        }))
        .unwrap();

        assert_eq!(user.id, 7);
        assert_eq!(user.full_name, "Ada Lovelace");
        assert_eq!(user.role, Some(UserRole::JobSeeker));
        assert!(user.created_at.is_some());
        assert_eq!(user.phone, None);
    }

    #[test]
    fn test_user_omits_missing_optionals() {
        let user = User {
            id: 1,
            full_name: "Admin".to_string(),
            email: "admin@example.com".to_string(),
            phone: None,
            role: Some(UserRole::Admin),
            profile_picture_url: None,
            created_at: None,
            enabled: None,
        };

        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["role"], "ADMIN");
        assert!(value.get("phone").is_none());
        assert!(value.get("createdAt").is_none());
    }

    #[test]
    fn test_role_display_matches_wire_format() {
        for role in [UserRole::Admin, UserRole::Employer, UserRole::JobSeeker] {
            let wire = serde_json::to_value(role).unwrap();
            assert_eq!(wire, role.to_string());
        }
    }
}
