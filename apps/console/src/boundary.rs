//! # Error Boundary
//!
//! Catches page failures nobody handled (errors and panics) so one broken
//! page never takes the whole console down.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  boundary.run(page_task)                                                │
//! │         │                                                               │
//! │         ├── Ok(value) ───────────────────────────► Some(value)          │
//! │         │                                                               │
//! │         └── Err / panic ──► failure recorded ──► None                   │
//! │                                    │                                    │
//! │                      ┌─────────────┴─────────────┐                      │
//! │                      ▼                           ▼                      │
//! │               Recovery::TryAgain          Recovery::Reload              │
//! │               (reset page state)          (rebuild the App)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info};

use crate::error::AppResult;

/// What the user chose on the fallback screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Recovery {
    TryAgain,
    Reload,
}

/// A failure caught by the boundary.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Failure {
    pub message: String,
    pub panicked: bool,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct ErrorBoundary {
    failure: Mutex<Option<Failure>>,
}

impl ErrorBoundary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs a page task on its own task so a panic is caught too.
    pub async fn run<T, Fut>(&self, task: Fut) -> Option<T>
    where
        T: Send + 'static,
        Fut: Future<Output = AppResult<T>> + Send + 'static,
    {
        match tokio::spawn(task).await {
            Ok(Ok(value)) => Some(value),
            Ok(Err(e)) => {
                self.record(e.message, false);
                None
            }
            Err(join) => {
                let message = if join.is_panic() {
                    "Something went wrong. Please try again.".to_string()
                } else {
                    join.to_string()
                };
                self.record(message, join.is_panic());
                None
            }
        }
    }

    fn record(&self, message: String, panicked: bool) {
        error!(%message, panicked, "Page failed");
        *self.lock() = Some(Failure {
            message,
            panicked,
            at: Utc::now(),
        });
    }

    pub fn failure(&self) -> Option<Failure> {
        self.lock().clone()
    }

    pub fn has_failed(&self) -> bool {
        self.lock().is_some()
    }

    /// Clears the fallback and hands the choice back to the caller, which
    /// resets the page or rebuilds the app.
    pub fn recover(&self, choice: Recovery) -> Recovery {
        if self.lock().take().is_some() {
            info!(?choice, "Recovering from page failure");
        }
        choice
    }

    fn lock(&self) -> MutexGuard<'_, Option<Failure>> {
        self.failure.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AppError, ErrorCode};

    #[tokio::test]
    async fn test_success_passes_through() {
        let boundary = ErrorBoundary::new();
        let value = boundary.run(async { Ok::<_, AppError>(5) }).await;
        assert_eq!(value, Some(5));
        assert!(!boundary.has_failed());
    }

    #[tokio::test]
    async fn test_error_is_recorded() {
        let boundary = ErrorBoundary::new();
        let value: Option<()> = boundary
            .run(async { Err(AppError::new(ErrorCode::ServerError, "boom")) })
            .await;

        assert!(value.is_none());
        let failure = boundary.failure().unwrap();
        assert_eq!(failure.message, "boom");
        assert!(!failure.panicked);
    }

    #[tokio::test]
    async fn test_panic_is_caught_and_recovered() {
        let boundary = ErrorBoundary::new();
        let value: Option<()> = boundary
            .run(async {
                let items: Vec<i32> = Vec::new();
                if items.is_empty() {
                    panic!("page exploded");
                }
                Ok(())
            })
            .await;

        assert!(value.is_none());
        assert!(boundary.failure().unwrap().panicked);
        assert_eq!(boundary.recover(Recovery::TryAgain), Recovery::TryAgain);
        assert!(!boundary.has_failed());
    }
}
