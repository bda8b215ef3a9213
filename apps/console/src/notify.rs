//! # Notifications
//!
//! Toast queue fed by page actions and drained by the presenter.
//!
//! ## Rules
//! - At most [`MAX_VISIBLE`] toasts are shown; the rest wait in order
//! - A message already queued with the same severity is not queued twice
//! - Each severity has its own auto-hide duration

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::error::AppError;

pub const MAX_VISIBLE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn auto_hide(&self) -> Duration {
        match self {
            Severity::Success | Severity::Info => Duration::from_millis(3000),
            Severity::Warning => Duration::from_millis(4000),
            Severity::Error => Duration::from_millis(5000),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub severity: Severity,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn expires_at(&self) -> DateTime<Utc> {
        let hide = chrono::Duration::from_std(self.severity.auto_hide())
            .unwrap_or_else(|_| chrono::Duration::zero());
        self.created_at + hide
    }
}

#[derive(Debug, Default)]
pub struct Notifier {
    queue: Mutex<VecDeque<Notification>>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a message. Returns None when the same message is already
    /// waiting.
    pub fn push(&self, severity: Severity, message: impl Into<String>) -> Option<Uuid> {
        let message = message.into();
        let mut queue = self.lock();
        if queue
            .iter()
            .any(|n| n.severity == severity && n.message == message)
        {
            return None;
        }

        let notification = Notification {
            id: Uuid::new_v4(),
            severity,
            message,
            created_at: Utc::now(),
        };
        debug!(?severity, message = %notification.message, "Notification queued");
        let id = notification.id;
        queue.push_back(notification);
        Some(id)
    }

    pub fn success(&self, message: impl Into<String>) -> Option<Uuid> {
        self.push(Severity::Success, message)
    }

    pub fn info(&self, message: impl Into<String>) -> Option<Uuid> {
        self.push(Severity::Info, message)
    }

    pub fn warning(&self, message: impl Into<String>) -> Option<Uuid> {
        self.push(Severity::Warning, message)
    }

    pub fn error(&self, message: impl Into<String>) -> Option<Uuid> {
        self.push(Severity::Error, message)
    }

    /// Error toast for a failed action.
    pub fn api_error(&self, err: &AppError) -> Option<Uuid> {
        self.error(err.message.clone())
    }

    /// Toasts currently on screen.
    pub fn visible(&self) -> Vec<Notification> {
        self.lock().iter().take(MAX_VISIBLE).cloned().collect()
    }

    pub fn dismiss(&self, id: Uuid) -> bool {
        let mut queue = self.lock();
        let before = queue.len();
        queue.retain(|n| n.id != id);
        queue.len() != before
    }

    /// Drops visible toasts whose auto-hide time has passed.
    pub fn expire(&self, now: DateTime<Utc>) -> usize {
        let mut queue = self.lock();
        let mut removed = 0;
        while queue
            .front()
            .map_or(false, |n| n.expires_at() <= now)
        {
            queue.pop_front();
            removed += 1;
        }
        removed
    }

    /// Hands every queued toast to the presenter.
    pub fn drain(&self) -> Vec<Notification> {
        self.lock().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Messages in queue order.
    pub fn messages(&self) -> Vec<String> {
        self.lock().iter().map(|n| n.message.clone()).collect()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<Notification>> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
