//! # Session Seams
//!
//! The HTTP layer never owns the session. It asks a [`TokenSource`] for
//! the bearer token before every call and tells [`AuthEvents`] when the
//! backend rejects it, so the console's auth store can log out.
//!
//! ```text
//! ┌──────────────┐  token()   ┌──────────────┐   401/403   ┌──────────────┐
//! │  AuthState   │◄───────────│  HttpClient  │────────────►│  AuthEvents  │
//! │  (console)   │            │              │             │  (console)   │
//! └──────────────┘            └──────────────┘             └──────────────┘
//! ```

use std::sync::RwLock;

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use tracing::debug;

use crate::error::ClientResult;

// =============================================================================
// Traits
// =============================================================================

/// Supplies the current bearer token, if any.
pub trait TokenSource: Send + Sync {
    fn token(&self) -> Option<String>;
}

/// Receives authentication failures reported by the backend.
pub trait AuthEvents: Send + Sync {
    /// Called with 401 or 403 before the error is returned to the caller.
    fn on_auth_failure(&self, status: u16);
}

/// Token source for anonymous use (login, registration).
pub struct NoToken;

impl TokenSource for NoToken {
    fn token(&self) -> Option<String> {
        None
    }
}

/// No-op event sink for testing.
pub struct NoOpEvents;

impl AuthEvents for NoOpEvents {
    fn on_auth_failure(&self, _status: u16) {}
}

/// In-memory token holder.
#[derive(Default)]
pub struct MemoryToken {
    token: RwLock<Option<String>>,
}

impl MemoryToken {
    pub fn new(token: Option<String>) -> Self {
        MemoryToken {
            token: RwLock::new(token),
        }
    }

    pub fn set(&self, token: Option<String>) {
        if let Ok(mut guard) = self.token.write() {
            *guard = token;
        }
    }
}

impl TokenSource for MemoryToken {
    fn token(&self) -> Option<String> {
        self.token.read().ok().and_then(|t| t.clone())
    }
}

// =============================================================================
// Token Expiry
// =============================================================================

#[derive(Debug, Deserialize)]
struct Claims {
    #[serde(default)]
    exp: Option<i64>,
}

/// Reads the `exp` claim of a JWT without verifying its signature.
pub fn token_expiry(token: &str) -> ClientResult<Option<DateTime<Utc>>> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let data = decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)?;
    Ok(data
        .claims
        .exp
        .and_then(|exp| Utc.timestamp_opt(exp, 0).single()))
}

/// True when the token is unreadable or past its `exp`.
///
/// A token without `exp` never expires client-side.
pub fn is_expired(token: &str, now: DateTime<Utc>) -> bool {
    match token_expiry(token) {
        Ok(Some(exp)) => exp <= now,
        Ok(None) => false,
        Err(e) => {
            debug!(error = %e, "Unreadable session token");
            true
        }
    }
}
