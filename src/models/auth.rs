//! Authentication models

use std::fmt;

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{not_blank, UserId};

/// User roles. Accounts without a role are plain shoppers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Seller,
    #[default]
    #[serde(alias = "client", alias = "customer", alias = "user")]
    Shopper,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Seller => "seller",
            UserRole::Shopper => "shopper",
        }
    }

    /// Parse a role typed by a user
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Some(UserRole::Admin),
            "seller" => Some(UserRole::Seller),
            "shopper" | "client" | "customer" | "user" => Some(UserRole::Shopper),
            _ => None,
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User profile
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: UserRole,
}

// ============================================================================
// Request/Response DTOs
// ============================================================================

/// Body for `POST /login`
#[derive(Debug, Serialize, Validate)]
pub struct LoginRequest {
    #[validate(custom = "not_blank")]
    pub email: String,
    #[validate(custom = "not_blank")]
    pub password: String,
}

/// Body for `POST /register`
#[derive(Debug, Serialize, Validate)]
pub struct RegisterRequest {
    #[validate(custom = "not_blank")]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    pub role: UserRole,
}

/// Response of `POST /login` and `POST /register`
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

/// Response of `GET /me`
#[derive(Debug, Clone, Deserialize)]
pub struct MeResponse {
    pub user: User,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_auth_response_requires_token() {
        let missing = serde_json::from_value::<AuthResponse>(json!({
            "user": { "id": 1, "name": "Ana", "email": "ana@example.com", "role": "seller" },
            "access_token": "abc"
        }));
        assert!(missing.is_err());

        let ok: AuthResponse = serde_json::from_value(json!({
            "user": { "id": 1, "name": "Ana", "email": "ana@example.com", "role": "seller" },
            "token": "abc"
        }))
        .unwrap();
        assert_eq!(ok.token, "abc");
        assert_eq!(ok.user.role, UserRole::Seller);
    }

    #[test]
    fn test_missing_role_is_shopper() {
        let user: User = serde_json::from_value(json!({
            "id": 2, "name": "Bo", "email": "bo@example.com"
        }))
        .unwrap();
        assert_eq!(user.role, UserRole::Shopper);

        let user: User = serde_json::from_value(json!({
            "id": 3, "name": "Cy", "email": "cy@example.com", "role": "client"
        }))
        .unwrap();
        assert_eq!(user.role, UserRole::Shopper);
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let result = serde_json::from_value::<User>(json!({
            "id": 2, "name": "Bo", "email": "bo@example.com", "role": "superuser"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_role_parse() {
        assert_eq!(UserRole::parse(" Admin "), Some(UserRole::Admin));
        assert_eq!(UserRole::parse("seller"), Some(UserRole::Seller));
        assert_eq!(UserRole::parse("root"), None);
    }

    #[test]
    fn test_register_request_validation() {
        let req = RegisterRequest {
            name: "Ana".to_string(),
            email: "not-an-email".to_string(),
            password: String::new(),
            role: UserRole::Seller,
        };
        let err = req.validate().unwrap_err();
        assert!(err.field_errors().contains_key("email"));
        assert!(err.field_errors().contains_key("password"));
    }
}
