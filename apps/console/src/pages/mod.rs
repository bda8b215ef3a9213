//! # Pages
//!
//! Route-level controllers. A page loads its queries through the shared
//! [`Context`], exposes loading/error/data states, and dispatches
//! mutations whose cache invalidations make mounted pages refetch.
//!
//! ## Page Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  mount ──► load() ──► QueryState::Ready(view)                           │
//! │               │                                                         │
//! │               └──► Mounted::replace(keys) for the queries rendered      │
//! │                                                                         │
//! │  action (create / update / delete / approve)                            │
//! │               │                                                         │
//! │               ├── Ok ──► success toast ──► cache tags invalidated       │
//! │               │                              │                          │
//! │               │                              ▼                          │
//! │               │                Mounted::needs_refresh() ──► load()      │
//! │               │                                                         │
//! │               └── Err ─► Context::report ──► error toast                │
//! │                                                                         │
//! │  unmount ──► Mounted dropped (in-flight fetches still fill the cache)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use appliance_client::{ApiClient, QueryKey, Subscription};
use appliance_core::CoreResult;
use tracing::warn;

use crate::error::{AppError, AppResult, ErrorCode};
use crate::notify::Notifier;
use crate::router::Navigator;
use crate::state::{AuthState, CartState, Session, UiState};

pub mod appliances;
pub mod dashboard;
pub mod directory;
pub mod login;
pub mod orders;
pub mod profile;
pub mod register;

/// Everything a page may touch. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Context {
    pub api: ApiClient,
    pub auth: Arc<AuthState>,
    pub cart: CartState,
    pub ui: Arc<UiState>,
    pub notify: Arc<Notifier>,
    pub navigator: Arc<Navigator>,
}

impl Context {
    /// The signed-in user, or `Unauthorized`.
    pub fn session(&self) -> AppResult<Session> {
        self.auth.require()
    }

    /// Logs a failed action and shows it as a toast.
    ///
    /// Session failures were already handled by the forced logout, so only
    /// their toast is raised here.
    pub fn report(&self, err: impl Into<AppError>) -> AppError {
        let err = err.into();
        warn!(code = ?err.code, message = %err.message, "Action failed");
        self.notify.api_error(&err);
        err
    }

    /// Fails with `Forbidden` unless `allowed`.
    pub fn ensure(&self, allowed: bool, action: &str) -> AppResult<()> {
        if allowed {
            Ok(())
        } else {
            Err(self.report(AppError::new(
                ErrorCode::Forbidden,
                format!("You do not have permission to {}.", action),
            )))
        }
    }
}

/// Inline form errors keyed by field wire name.
pub type FieldMap = BTreeMap<String, String>;

/// Applies a schema check to a form: fills `errors` and fails on invalid
/// input without raising a toast.
pub fn check_form(result: CoreResult<()>, errors: &mut FieldMap) -> AppResult<()> {
    errors.clear();
    result.map_err(|e| {
        let err = AppError::from(e);
        errors.clone_from(&err.field_errors);
        err
    })
}

// =============================================================================
// Query State
// =============================================================================

/// What a page renders for one query.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum QueryState<T> {
    #[default]
    Idle,
    Loading,
    Ready(T),
    Failed(AppError),
}

impl<T> QueryState<T> {
    pub fn from_result(result: AppResult<T>) -> Self {
        match result {
            Ok(value) => QueryState::Ready(value),
            Err(e) => QueryState::Failed(e),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, QueryState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            QueryState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&AppError> {
        match self {
            QueryState::Failed(e) => Some(e),
            _ => None,
        }
    }
}

// =============================================================================
// Mounted Queries
// =============================================================================

/// The queries a page currently renders.
#[derive(Default)]
pub struct Mounted {
    subscriptions: Vec<Subscription>,
}

impl std::fmt::Debug for Mounted {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.subscriptions.iter().map(|s| s.key().to_string()))
            .finish()
    }
}

impl Mounted {
    /// Replaces the watched keys after a load.
    pub fn replace(&mut self, api: &ApiClient, keys: Vec<QueryKey>) {
        self.subscriptions = keys.into_iter().map(|key| api.subscribe(key)).collect();
    }

    pub fn keys(&self) -> Vec<&QueryKey> {
        self.subscriptions.iter().map(Subscription::key).collect()
    }

    /// Some rendered query was invalidated since the last load.
    pub fn needs_refresh(&self) -> bool {
        self.subscriptions.iter().any(Subscription::is_stale)
    }

    /// Waits until some rendered query is invalidated. Returns false when
    /// nothing is mounted or the cache is gone.
    pub async fn wait_for_refresh(&mut self) -> bool {
        loop {
            if self.needs_refresh() {
                return true;
            }
            let Some(first) = self.subscriptions.first_mut() else {
                return false;
            };
            if !first.changed().await {
                return false;
            }
        }
    }
}
