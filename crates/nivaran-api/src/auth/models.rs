use crate::error::ErrorResponse;
use axum::extract::FromRequestParts;
use axum::http::{request::Parts, StatusCode};
use axum::Json;
use nivaran_core::models::UserRole;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid, // user_id
    pub role: UserRole,
    /// Department scope for officials; absent for citizens and heads.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    pub iat: i64, // issued at timestamp
    pub exp: i64, // expiration timestamp
}

/// Caller identity extracted from a verified bearer token and stored in
/// request extensions. Carries role and department so handlers never need a
/// per-request user lookup.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub role: UserRole,
    pub department: Option<String>,
}

impl From<Claims> for AuthContext {
    fn from(claims: Claims) -> Self {
        AuthContext {
            user_id: claims.sub,
            role: claims.role,
            department: claims.department,
        }
    }
}

impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(ErrorResponse::new(
                        "Missing authentication context",
                        "UNAUTHORIZED",
                    )),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_context_from_claims() {
        let claims = Claims {
            sub: Uuid::new_v4(),
            role: UserRole::Department,
            department: Some("sanitation".to_string()),
            iat: 0,
            exp: i64::MAX,
        };
        let ctx = AuthContext::from(claims.clone());
        assert_eq!(ctx.user_id, claims.sub);
        assert_eq!(ctx.role, UserRole::Department);
        assert_eq!(ctx.department.as_deref(), Some("sanitation"));
    }
}
