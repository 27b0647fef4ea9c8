//! Centralized client error handling
//!
//! Every failure a screen can hit (transport, HTTP status, schema mismatch,
//! local validation, session guards) is one `ClientError`. Screens never
//! propagate these further than an [`Alert`].

use reqwest::StatusCode;
use thiserror::Error;

use crate::config::ConfigError;
use crate::models::UserRole;

/// Client error type
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Transport(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Unexpected response shape: {0}")]
    Decode(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not signed in")]
    NotAuthenticated,

    #[error("Requires the {required} role")]
    Forbidden { required: UserRole },

    #[error("Local storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// A blocking alert shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

impl Alert {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new("Error", message)
    }
}

impl ClientError {
    /// Get the error code string
    pub fn error_code(&self) -> &'static str {
        match self {
            ClientError::Transport(_) => "TRANSPORT",
            ClientError::Unauthorized(_) => "UNAUTHORIZED",
            ClientError::Status { .. } => "HTTP_STATUS",
            ClientError::Decode(_) => "DECODE",
            ClientError::Validation(_) => "VALIDATION",
            ClientError::NotAuthenticated => "NOT_AUTHENTICATED",
            ClientError::Forbidden { .. } => "FORBIDDEN",
            ClientError::Storage(_) => "STORAGE",
            ClientError::Config(_) => "CONFIG",
        }
    }

    /// HTTP status carried by the error, if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Unauthorized(_) => Some(StatusCode::UNAUTHORIZED.as_u16()),
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Build the error for a non-2xx response from its status and raw body
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let message = server_message(body).unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
        if status == StatusCode::UNAUTHORIZED {
            ClientError::Unauthorized(message)
        } else {
            ClientError::Status {
                status: status.as_u16(),
                message,
            }
        }
    }

    /// Text for the blocking alert: the server or validation message when
    /// there is one, `fallback` otherwise
    pub fn alert(&self, fallback: &str) -> Alert {
        let message = match self {
            ClientError::Unauthorized(m)
            | ClientError::Status { message: m, .. }
            | ClientError::Validation(m) => {
                if m.trim().is_empty() {
                    fallback.to_string()
                } else {
                    m.clone()
                }
            }
            ClientError::NotAuthenticated => "Please sign in first".to_string(),
            ClientError::Forbidden { required } => {
                format!("This screen is only available to {} accounts", required)
            }
            _ => fallback.to_string(),
        };
        let title = match self {
            ClientError::Validation(_) => "Validation",
            _ => "Error",
        };
        Alert::new(title, message)
    }
}

/// Pull a human message out of an error body: `{"message": ...}` JSON first,
/// then the raw text
fn server_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(value) => value
            .get("message")
            .and_then(|m| m.as_str())
            .filter(|m| !m.trim().is_empty())
            .map(str::to_string),
        Err(_) => Some(trimmed.chars().take(200).collect()),
    }
}

// Convenience conversions from common error types

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

impl From<validator::ValidationErrors> for ClientError {
    fn from(err: validator::ValidationErrors) -> Self {
        ClientError::Validation(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::Storage(err.to_string())
    }
}

/// Result type alias using ClientError
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_response_prefers_json_message() {
        let err = ClientError::from_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"message":"The email has already been taken."}"#,
        );
        assert_eq!(err.status(), Some(422));
        assert_eq!(
            err.alert("Unable to save").message,
            "The email has already been taken."
        );
    }

    #[test]
    fn test_from_response_falls_back_to_text_then_status() {
        let err = ClientError::from_response(StatusCode::BAD_GATEWAY, "upstream down");
        assert_eq!(err.alert("x").message, "upstream down");

        let err = ClientError::from_response(StatusCode::NOT_FOUND, "");
        assert_eq!(err.alert("x").message, "HTTP 404");

        let err = ClientError::from_response(StatusCode::NOT_FOUND, r#"{"error":"nope"}"#);
        assert_eq!(err.alert("x").message, "HTTP 404");
    }

    #[test]
    fn test_unauthorized_is_special_cased() {
        let err = ClientError::from_response(StatusCode::UNAUTHORIZED, "");
        assert!(matches!(err, ClientError::Unauthorized(_)));
        assert_eq!(err.error_code(), "UNAUTHORIZED");
        assert_eq!(err.status(), Some(401));
    }

    #[test]
    fn test_alert_uses_fallback_for_transport() {
        let err = ClientError::Transport("connection refused".to_string());
        let alert = err.alert("Failed to load costumes");
        assert_eq!(alert.title, "Error");
        assert_eq!(alert.message, "Failed to load costumes");
    }

    #[test]
    fn test_validation_alert_title() {
        let alert = ClientError::Validation("Name is required".to_string()).alert("x");
        assert_eq!(alert, Alert::new("Validation", "Name is required"));
    }
}
