//! # App Error Type
//!
//! Unified error type for pages, dialogs and stores.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Console                            │
//! │                                                                         │
//! │  Page action (submit, delete, approve, checkout)                        │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Form invalid? ──── CoreError::InvalidForm ───────┐                    │
//! │         │                                         │                    │
//! │         ▼                                         ▼                    │
//! │  Backend rejected? ── ClientError::BadRequest ── AppError ──► toast    │
//! │         │                                    { code, message,          │
//! │         ▼                                      field_errors }          │
//! │  Session gone? ───── ClientError::Unauthorized ──► forced logout       │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Success ─────────────────────────────────────────────────────────►    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;

use appliance_client::ClientError;
use appliance_core::{CoreError, ValidationError};
use serde::Serialize;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

/// Error surfaced to the presenter.
///
/// ## Serialization
/// ```json
/// {
///   "code": "VALIDATION_ERROR",
///   "message": "Validation failed",
///   "fieldErrors": { "name": "must not be blank" }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[serde(rename_all = "camelCase")]
#[error("[{code:?}] {message}")]
pub struct AppError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,

    /// Inline form errors keyed by field wire name
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub field_errors: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Form or backend validation failed (400/422)
    ValidationError,

    /// Session missing or expired (401)
    Unauthorized,

    /// Role may not perform the action (403)
    Forbidden,

    /// Resource not found (404)
    NotFound,

    /// Conflicting data (409)
    Conflict,

    /// No response from the backend
    NetworkError,

    /// Backend failed (5xx, 429, unexpected status)
    ServerError,

    /// Domain rule broken (cart limits, approved orders)
    BusinessLogic,

    /// Local storage could not be read or written
    StorageError,

    /// Configuration is invalid
    ConfigError,

    /// Anything else
    Internal,
}

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        AppError {
            code,
            message: message.into(),
            field_errors: BTreeMap::new(),
        }
    }

    /// A validation error carrying inline field messages.
    pub fn validation(message: impl Into<String>, field_errors: BTreeMap<String, String>) -> Self {
        AppError {
            code: ErrorCode::ValidationError,
            message: message.into(),
            field_errors,
        }
    }

    pub fn not_authenticated() -> Self {
        AppError::new(ErrorCode::Unauthorized, CoreError::NotAuthenticated.to_string())
    }

    pub fn storage(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::StorageError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::Internal, message)
    }

    pub fn is_auth_failure(&self) -> bool {
        matches!(self.code, ErrorCode::Unauthorized | ErrorCode::Forbidden)
    }

    pub fn is_validation(&self) -> bool {
        self.code == ErrorCode::ValidationError
    }

    /// Inline message for one field.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.field_errors.get(name).map(String::as_str)
    }
}

/// Converts client errors, keeping the backend's field map and message.
impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        let message = err.user_message();
        let code = match err.status() {
            Some(400) | Some(422) => ErrorCode::ValidationError,
            Some(401) => ErrorCode::Unauthorized,
            Some(403) => ErrorCode::Forbidden,
            Some(404) => ErrorCode::NotFound,
            Some(409) => ErrorCode::Conflict,
            Some(_) => ErrorCode::ServerError,
            None if err.is_network_error() => ErrorCode::NetworkError,
            None if err.is_config_error() => ErrorCode::ConfigError,
            None => match err {
                ClientError::NotLoggedIn | ClientError::InvalidToken(_) => ErrorCode::Unauthorized,
                _ => ErrorCode::Internal,
            },
        };

        AppError {
            code,
            message,
            field_errors: err.field_errors().cloned().unwrap_or_default(),
        }
    }
}

/// Converts domain errors.
impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidForm(fields) => AppError::validation(
                "Validation error. Please check your input.",
                fields
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            ),
            CoreError::Validation(e) => e.into(),
            CoreError::NotAuthenticated => AppError::not_authenticated(),
            CoreError::NotPermitted(_) => AppError::new(ErrorCode::Forbidden, err.to_string()),
            other => AppError::new(ErrorCode::BusinessLogic, other.to_string()),
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(err.field().to_string(), err.to_string());
        AppError::validation(err.to_string(), fields)
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        tracing::error!(error = %err, "Storage I/O failed");
        AppError::storage(format!("Storage I/O failed: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::storage(format!("Storage document is invalid: {}", err))
    }
}
