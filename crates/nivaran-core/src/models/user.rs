use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Account role, used for route gating.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Citizen filing reports from the mobile app
    User,
    /// Head administrator with full triage access
    Head,
    /// Department official scoped to one department
    Department,
}

impl Display for UserRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            UserRole::User => write!(f, "user"),
            UserRole::Head => write!(f, "head"),
            UserRole::Department => write!(f, "department"),
        }
    }
}

impl TryFrom<String> for UserRole {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "user" => Ok(UserRole::User),
            "head" => Ok(UserRole::Head),
            "department" => Ok(UserRole::Department),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

/// Account record as stored in the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: String,
    #[cfg_attr(feature = "sqlx", sqlx(try_from = "String"))]
    pub role: UserRole,
    pub department: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Account fields safe to return to clients (no password hash).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: UserRole,
    pub department: Option<String>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        UserResponse {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            role: user.role,
            department: user.department.clone(),
        }
    }
}

/// Signup / account-provisioning request. Also used by the head
/// administrator to create official accounts.
#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 1, max = 120, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[validate(length(min = 1, max = 32, message = "Phone is required"))]
    pub phone: String,
    #[serde(default)]
    pub role: Option<UserRole>,
    #[serde(default)]
    pub department: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Response for signup and login: a bearer token plus the account.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub message: String,
    pub token: String,
    pub user: UserResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [UserRole::User, UserRole::Head, UserRole::Department] {
            let parsed = UserRole::try_from(role.to_string()).unwrap();
            assert_eq!(parsed, role);
        }
        assert!(UserRole::try_from("admin".to_string()).is_err());
    }

    #[test]
    fn test_role_serde_is_lowercase() {
        assert_eq!(
            serde_json::to_string(&UserRole::Department).unwrap(),
            "\"department\""
        );
        let role: UserRole = serde_json::from_str("\"head\"").unwrap();
        assert_eq!(role, UserRole::Head);
    }

    #[test]
    fn test_signup_request_validation() {
        let request = SignupRequest {
            name: "Asha Kumari".to_string(),
            email: "asha@example.com".to_string(),
            password: "secret1".to_string(),
            phone: "9876543210".to_string(),
            role: None,
            department: None,
        };
        assert!(request.validate().is_ok());

        let bad = SignupRequest {
            password: "short".to_string(),
            ..request
        };
        assert!(bad.validate().is_err());
    }
}
