//! # Client Error Types
//!
//! Error types for every backend call.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Client Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Transport     │  │     HTTP Status         │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Network        │  │  BadRequest (400)       │ │
//! │  │  InvalidUrl     │  │  Timeout        │  │  Unauthorized (401)     │ │
//! │  │  ConfigLoad     │  │                 │  │  Forbidden (403)        │ │
//! │  │  ConfigSave     │  │                 │  │  NotFound (404) ...     │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐                              │
//! │  │    Payload      │  │    Session      │                              │
//! │  │                 │  │                 │                              │
//! │  │  Decode         │  │  NotLoggedIn    │                              │
//! │  │  Serialization  │  │  InvalidToken   │                              │
//! │  └─────────────────┘  └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Shown when the request never got a response.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please check your internet connection.";

/// Shown when nothing more specific is known.
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred. Please try again.";

// =============================================================================
// Error Body
// =============================================================================

/// JSON body the backend sends with every error status.
///
/// Every field is optional; proxies and the servlet container answer with
/// other shapes, or no body at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    #[serde(default)]
    pub timestamp: Option<String>,

    #[serde(default)]
    pub status: Option<u16>,

    /// Reason phrase, e.g. "Bad Request".
    #[serde(default)]
    pub error: Option<String>,

    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub details: Option<String>,

    #[serde(default)]
    pub path: Option<String>,

    /// Field name to message, for Bean Validation failures.
    #[serde(default)]
    pub validation_errors: BTreeMap<String, String>,

    #[serde(default)]
    pub errors: Vec<String>,
}

impl ErrorBody {
    /// Parses a response body, keeping a non-JSON body as the message.
    pub fn parse(text: &str) -> Self {
        if text.trim().is_empty() {
            return ErrorBody::default();
        }
        serde_json::from_str(text).unwrap_or_else(|_| ErrorBody {
            message: Some(text.trim().to_string()),
            ..Default::default()
        })
    }

    /// The backend's own message: `message` first, then `error`.
    pub fn extract_message(&self) -> Option<&str> {
        self.message
            .as_deref()
            .filter(|m| !m.is_empty())
            .or_else(|| self.error.as_deref().filter(|e| !e.is_empty()))
    }
}

impl std::fmt::Display for ErrorBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extract_message().unwrap_or("no details"))
    }
}

// =============================================================================
// Client Error
// =============================================================================

/// Every failure of a backend call.
///
/// Variants keep only owned strings so the error can be cloned into every
/// subscriber of a shared query.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClientError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Invalid console configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// No response: connection refused, DNS, TLS, reset.
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    // =========================================================================
    // HTTP Status Errors
    // =========================================================================
    #[error("Bad request: {0}")]
    BadRequest(ErrorBody),

    #[error("Unauthorized: {0}")]
    Unauthorized(ErrorBody),

    #[error("Forbidden: {0}")]
    Forbidden(ErrorBody),

    #[error("Not found: {0}")]
    NotFound(ErrorBody),

    #[error("Conflict: {0}")]
    Conflict(ErrorBody),

    #[error("Unprocessable entity: {0}")]
    Unprocessable(ErrorBody),

    #[error("Too many requests: {0}")]
    TooManyRequests(ErrorBody),

    /// Any 5xx.
    #[error("Server error {status}: {body}")]
    Server { status: u16, body: ErrorBody },

    /// Any other non-success status.
    #[error("Unexpected status {status}: {body}")]
    UnexpectedStatus { status: u16, body: ErrorBody },

    // =========================================================================
    // Payload Errors
    // =========================================================================
    /// The success body did not match the expected shape.
    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Serialization failed: {0}")]
    Serialization(String),

    // =========================================================================
    // Session Errors
    // =========================================================================
    /// A call that needs a session ran without one.
    #[error("Not logged in")]
    NotLoggedIn,

    #[error("Invalid session token: {0}")]
    InvalidToken(String),
}

impl ClientError {
    /// Maps a non-success status and its raw body to a variant.
    pub fn from_status(status: u16, text: &str) -> Self {
        let body = ErrorBody::parse(text);
        match status {
            400 => ClientError::BadRequest(body),
            401 => ClientError::Unauthorized(body),
            403 => ClientError::Forbidden(body),
            404 => ClientError::NotFound(body),
            409 => ClientError::Conflict(body),
            422 => ClientError::Unprocessable(body),
            429 => ClientError::TooManyRequests(body),
            500..=599 => ClientError::Server { status, body },
            _ => ClientError::UnexpectedStatus { status, body },
        }
    }

    /// HTTP status, when the backend answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::BadRequest(_) => Some(400),
            ClientError::Unauthorized(_) => Some(401),
            ClientError::Forbidden(_) => Some(403),
            ClientError::NotFound(_) => Some(404),
            ClientError::Conflict(_) => Some(409),
            ClientError::Unprocessable(_) => Some(422),
            ClientError::TooManyRequests(_) => Some(429),
            ClientError::Server { status, .. } | ClientError::UnexpectedStatus { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    /// The error body, when the backend answered.
    pub fn body(&self) -> Option<&ErrorBody> {
        match self {
            ClientError::BadRequest(b)
            | ClientError::Unauthorized(b)
            | ClientError::Forbidden(b)
            | ClientError::NotFound(b)
            | ClientError::Conflict(b)
            | ClientError::Unprocessable(b)
            | ClientError::TooManyRequests(b) => Some(b),
            ClientError::Server { body, .. } | ClientError::UnexpectedStatus { body, .. } => {
                Some(body)
            }
            _ => None,
        }
    }

    /// Field errors reported by the backend for a 400/422.
    pub fn field_errors(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            ClientError::BadRequest(b) | ClientError::Unprocessable(b)
                if !b.validation_errors.is_empty() =>
            {
                Some(&b.validation_errors)
            }
            _ => None,
        }
    }

    /// Message for a notification.
    ///
    /// ## Rules
    /// - The backend's `message`, then its `error`
    /// - Otherwise the fixed text for the status
    /// - No response at all: the network error text
    pub fn user_message(&self) -> String {
        if let Some(message) = self.body().and_then(ErrorBody::extract_message) {
            return message.to_string();
        }
        match self.status() {
            Some(status) => friendly_message(status).to_string(),
            None if self.is_network_error() => NETWORK_ERROR_MESSAGE.to_string(),
            None => self.to_string(),
        }
    }

    // =========================================================================
    // Error Categorization
    // =========================================================================

    /// Returns true if the request can be repeated as-is.
    ///
    /// ## Retryable Errors
    /// - Network failures and timeouts
    /// - 429 and 5xx responses
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ClientError::Network(_)
                | ClientError::Timeout(_)
                | ClientError::TooManyRequests(_)
                | ClientError::Server { .. }
        )
    }

    /// The session is gone or insufficient: 401 and 403.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, ClientError::Unauthorized(_) | ClientError::Forbidden(_))
    }

    /// The input was rejected: 400 and 422.
    pub fn is_validation(&self) -> bool {
        matches!(self, ClientError::BadRequest(_) | ClientError::Unprocessable(_))
    }

    pub fn is_network_error(&self) -> bool {
        matches!(self, ClientError::Network(_) | ClientError::Timeout(_))
    }

    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ClientError::InvalidConfig(_)
                | ClientError::InvalidUrl(_)
                | ClientError::ConfigLoadFailed(_)
                | ClientError::ConfigSaveFailed(_)
        )
    }
}

/// Fixed notification text per status.
pub fn friendly_message(status: u16) -> &'static str {
    match status {
        400 => "Invalid request. Please check your input.",
        401 => "Your session has expired. Please log in again.",
        403 => "You do not have permission to perform this action.",
        404 => "The requested resource was not found.",
        409 => "This operation conflicts with existing data.",
        422 => "Validation failed. Please check your input.",
        429 => "Too many requests. Please try again later.",
        500 => "Server error. Please try again later.",
        502 => "Bad gateway. The server is temporarily unavailable.",
        503 => "Service unavailable. Please try again later.",
        504 => "Gateway timeout. The request took too long.",
        _ => GENERIC_ERROR_MESSAGE,
    }
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout(0)
        } else if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            ClientError::from_status(status.as_u16(), "")
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::InvalidUrl(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ClientError {
    fn from(err: toml::ser::Error) -> Self {
        ClientError::ConfigSaveFailed(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for ClientError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        ClientError::InvalidToken(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            ClientError::from_status(401, ""),
            ClientError::Unauthorized(_)
        ));
        assert!(matches!(
            ClientError::from_status(503, ""),
            ClientError::Server { status: 503, .. }
        ));
        assert!(matches!(
            ClientError::from_status(418, ""),
            ClientError::UnexpectedStatus { status: 418, .. }
        ));
        assert_eq!(ClientError::from_status(422, "").status(), Some(422));
    }

    #[test]
    fn test_message_prefers_body_message_then_error() {
        let err = ClientError::from_status(
            409,
            r#"{"status":409,"error":"Conflict","message":"Email already registered"}"#,
        );
        assert_eq!(err.user_message(), "Email already registered");

        let err = ClientError::from_status(409, r#"{"status":409,"error":"Conflict"}"#);
        assert_eq!(err.user_message(), "Conflict");

        let err = ClientError::from_status(404, "");
        assert_eq!(err.user_message(), "The requested resource was not found.");

        let err = ClientError::Network("connection refused".into());
        assert_eq!(err.user_message(), NETWORK_ERROR_MESSAGE);
    }

    #[test]
    fn test_validation_errors_are_exposed() {
        let err = ClientError::from_status(
            400,
            r#"{"status":400,"message":"Validation failed","validationErrors":{"email":"must be a well-formed email address"}}"#,
        );
        assert!(err.is_validation());
        let fields = err.field_errors().unwrap();
        assert_eq!(
            fields.get("email").map(String::as_str),
            Some("must be a well-formed email address")
        );
    }

    #[test]
    fn test_plain_text_body_becomes_message() {
        let err = ClientError::from_status(502, "upstream unavailable\n");
        assert_eq!(err.user_message(), "upstream unavailable");
    }

    #[test]
    fn test_categories() {
        assert!(ClientError::Network("reset".into()).is_retryable());
        assert!(ClientError::from_status(500, "").is_retryable());
        assert!(ClientError::from_status(429, "").is_retryable());
        assert!(!ClientError::from_status(400, "").is_retryable());
        assert!(!ClientError::from_status(401, "").is_retryable());

        assert!(ClientError::from_status(401, "").is_auth_failure());
        assert!(ClientError::from_status(403, "").is_auth_failure());
        assert!(!ClientError::from_status(404, "").is_auth_failure());

        assert!(ClientError::InvalidUrl("x".into()).is_config_error());
    }

    #[test]
    fn test_friendly_message_fallback() {
        assert_eq!(friendly_message(418), GENERIC_ERROR_MESSAGE);
        assert_eq!(
            friendly_message(504),
            "Gateway timeout. The request took too long."
        );
    }
}
