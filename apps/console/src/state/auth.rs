//! # Auth State
//!
//! The signed-in user and their bearer token.
//!
//! ## Session Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Session Lifecycle                                    │
//! │                                                                         │
//! │  bootstrap ──► restore() ──► token expired? ──yes──► logged out        │
//! │                                   │                                     │
//! │                                   no                                    │
//! │                                   ▼                                     │
//! │  login ──────► set_credentials() ──► Session (persisted)                │
//! │                                   │                                     │
//! │                                   ▼                                     │
//! │  401 / 403 anywhere ─► logout() ──► auth keys removed                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{PoisonError, RwLock};

use appliance_client::{is_expired, TokenSource};
use appliance_core::{JwtResponse, UserRole};
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::{AppError, AppResult, ErrorCode};
use crate::storage::{
    LocalStorage, AUTH_KEYS, KEY_EMAIL, KEY_FIRST_NAME, KEY_LAST_NAME, KEY_ROLE, KEY_TOKEN,
    KEY_USER_ID,
};

/// Identity of the signed-in user.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(skip)]
    pub token: String,
    pub email: String,
    pub role: UserRole,
    pub user_id: i64,
    pub first_name: String,
    pub last_name: String,
}

impl Session {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Session store backed by local storage.
#[derive(Debug)]
pub struct AuthState {
    storage: LocalStorage,
    session: RwLock<Option<Session>>,
}

impl AuthState {
    /// Restores the persisted session, dropping it when incomplete or
    /// expired.
    pub fn restore(storage: LocalStorage) -> Self {
        let session = Self::read_session(&storage);
        if session.is_none() && storage.contains(KEY_TOKEN) {
            warn!("Discarding stored session");
            if let Err(e) = storage.remove_all(&AUTH_KEYS) {
                warn!(error = %e, "Failed to clear stored session");
            }
        }

        AuthState {
            storage,
            session: RwLock::new(session),
        }
    }

    fn read_session(storage: &LocalStorage) -> Option<Session> {
        let token: String = storage.get(KEY_TOKEN)?;
        if is_expired(&token, Utc::now()) {
            return None;
        }
        let role: String = storage.get(KEY_ROLE)?;
        Some(Session {
            token,
            email: storage.get(KEY_EMAIL).unwrap_or_default(),
            role: role.parse().ok()?,
            user_id: storage.get(KEY_USER_ID)?,
            first_name: storage.get(KEY_FIRST_NAME).unwrap_or_default(),
            last_name: storage.get(KEY_LAST_NAME).unwrap_or_default(),
        })
    }

    /// Stores a successful login.
    ///
    /// ## Errors
    /// - `Unauthorized` when the token is already expired or unreadable
    /// - `ValidationError` when the role is unknown
    pub fn set_credentials(&self, response: &JwtResponse) -> AppResult<Session> {
        if is_expired(&response.token, Utc::now()) {
            return Err(AppError::new(
                ErrorCode::Unauthorized,
                "Your session has expired. Please log in again.",
            ));
        }
        let role: UserRole = response.role.parse()?;

        let session = Session {
            token: response.token.clone(),
            email: response.email.clone(),
            role,
            user_id: response.user_id,
            first_name: response.first_name.clone(),
            last_name: response.last_name.clone(),
        };

        self.storage.set(KEY_TOKEN, &session.token)?;
        self.storage.set(KEY_EMAIL, &session.email)?;
        self.storage.set(KEY_ROLE, role.as_str())?;
        self.storage.set(KEY_USER_ID, &session.user_id)?;
        self.storage.set(KEY_FIRST_NAME, &session.first_name)?;
        self.storage.set(KEY_LAST_NAME, &session.last_name)?;

        *self.session.write().unwrap_or_else(PoisonError::into_inner) = Some(session.clone());
        info!(email = %session.email, role = %role, "Session started");
        Ok(session)
    }

    /// Ends the session. Returns false when nobody was logged in.
    pub fn logout(&self) -> bool {
        let previous = self
            .session
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Err(e) = self.storage.remove_all(&AUTH_KEYS) {
            warn!(error = %e, "Failed to remove session from storage");
        }
        if let Some(session) = &previous {
            info!(email = %session.email, "Session ended");
        }
        previous.is_some()
    }

    pub fn session(&self) -> Option<Session> {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The session, or `Unauthorized` when logged out.
    pub fn require(&self) -> AppResult<Session> {
        self.session().ok_or_else(AppError::not_authenticated)
    }

    pub fn is_authenticated(&self) -> bool {
        self.session().is_some()
    }

    pub fn role(&self) -> Option<UserRole> {
        self.session().map(|s| s.role)
    }

    pub fn user_id(&self) -> Option<i64> {
        self.session().map(|s| s.user_id)
    }

    pub fn is_employee(&self) -> bool {
        self.role() == Some(UserRole::Employee)
    }

    pub fn is_client(&self) -> bool {
        self.role() == Some(UserRole::Client)
    }
}

impl TokenSource for AuthState {
    fn token(&self) -> Option<String> {
        self.session().map(|s| s.token)
    }
}
