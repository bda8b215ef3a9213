//! # Local Storage
//!
//! A small key/value document persisted as one JSON file.
//!
//! ## Persisted Keys
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  storage.json                                                           │
//! │                                                                         │
//! │  token, email, role, userId, firstName, lastName   ◄── AuthState       │
//! │  theme, locale                                     ◄── UiState         │
//! │  cart                                              ◄── CartState       │
//! │                                                                         │
//! │  Every write rewrites the whole file before returning.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::AppResult;

pub const KEY_TOKEN: &str = "token";
pub const KEY_EMAIL: &str = "email";
pub const KEY_ROLE: &str = "role";
pub const KEY_USER_ID: &str = "userId";
pub const KEY_FIRST_NAME: &str = "firstName";
pub const KEY_LAST_NAME: &str = "lastName";
pub const KEY_THEME: &str = "theme";
pub const KEY_LOCALE: &str = "locale";
pub const KEY_CART: &str = "cart";

/// Keys owned by the session; removed together on logout.
pub const AUTH_KEYS: [&str; 6] = [
    KEY_TOKEN,
    KEY_EMAIL,
    KEY_ROLE,
    KEY_USER_ID,
    KEY_FIRST_NAME,
    KEY_LAST_NAME,
];

/// Shared handle to the storage document. Clones see the same data.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    path: Option<PathBuf>,
    values: Mutex<BTreeMap<String, Value>>,
}

impl LocalStorage {
    /// Opens the document at `path`. A missing file is an empty document;
    /// an unreadable one is logged and replaced on the next write.
    pub fn open(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref().to_path_buf();
        let values = if path.exists() {
            let text = std::fs::read_to_string(&path)?;
            match serde_json::from_str(&text) {
                Ok(values) => values,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Discarding unreadable storage");
                    BTreeMap::new()
                }
            }
        } else {
            BTreeMap::new()
        };

        debug!(path = %path.display(), keys = values.len(), "Storage opened");
        Ok(LocalStorage {
            inner: Arc::new(Inner {
                path: Some(path),
                values: Mutex::new(values),
            }),
        })
    }

    /// Storage that lives only as long as the process.
    pub fn in_memory() -> Self {
        LocalStorage {
            inner: Arc::new(Inner {
                path: None,
                values: Mutex::new(BTreeMap::new()),
            }),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.inner.path.as_deref()
    }

    /// Typed value of `key`. A value of the wrong shape reads as absent.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.values().get(key).cloned()?;
        serde_json::from_value(value).ok()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values().contains_key(key)
    }

    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> AppResult<()> {
        let value = serde_json::to_value(value)?;
        let mut values = self.values();
        values.insert(key.to_string(), value);
        self.flush(&values)
    }

    pub fn remove(&self, key: &str) -> AppResult<()> {
        self.remove_all(&[key])
    }

    /// Removes several keys with a single write.
    pub fn remove_all(&self, keys: &[&str]) -> AppResult<()> {
        let mut values = self.values();
        let before = values.len();
        for key in keys {
            values.remove(*key);
        }
        if values.len() == before {
            return Ok(());
        }
        self.flush(&values)
    }

    /// Empties the whole document.
    pub fn clear(&self) -> AppResult<()> {
        let mut values = self.values();
        values.clear();
        self.flush(&values)
    }

    pub fn keys(&self) -> Vec<String> {
        self.values().keys().cloned().collect()
    }

    fn values(&self) -> MutexGuard<'_, BTreeMap<String, Value>> {
        self.inner
            .values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn flush(&self, values: &BTreeMap<String, Value>) -> AppResult<()> {
        let Some(path) = &self.inner.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_vec_pretty(values)?)?;
        Ok(())
    }
}
