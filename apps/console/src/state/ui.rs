//! # UI State
//!
//! Presentation preferences: theme, locale, sidebar and the global
//! loading flag.
//!
//! Theme and locale are persisted; sidebar and loading live only as long
//! as the process.

use std::str::FromStr;
use std::sync::{Mutex, MutexGuard, PoisonError};

use appliance_client::config::UiSettings;
use appliance_core::{Language, ValidationError};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::AppResult;
use crate::storage::{LocalStorage, KEY_LOCALE, KEY_THEME};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl FromStr for Theme {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(ValidationError::InvalidFormat {
                field: "theme".to_string(),
                reason: format!("unknown theme '{}'", other),
            }),
        }
    }
}

/// Point-in-time copy of the UI preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UiSnapshot {
    pub theme: Theme,
    pub locale: Language,
    pub sidebar_open: bool,
    pub loading: bool,
}

#[derive(Debug)]
pub struct UiState {
    storage: LocalStorage,
    inner: Mutex<UiSnapshot>,
}

impl UiState {
    /// Restores persisted preferences, falling back to the configured
    /// defaults.
    pub fn restore(storage: LocalStorage, defaults: &UiSettings) -> Self {
        let theme = storage
            .get::<Theme>(KEY_THEME)
            .or_else(|| parse_or_warn(&defaults.theme))
            .unwrap_or_default();
        let locale = storage
            .get::<Language>(KEY_LOCALE)
            .or_else(|| parse_or_warn(&defaults.locale))
            .unwrap_or_default();

        debug!(theme = theme.as_str(), locale = locale.code(), "UI state restored");
        UiState {
            storage,
            inner: Mutex::new(UiSnapshot {
                theme,
                locale,
                sidebar_open: true,
                loading: false,
            }),
        }
    }

    pub fn snapshot(&self) -> UiSnapshot {
        *self.lock()
    }

    pub fn theme(&self) -> Theme {
        self.lock().theme
    }

    pub fn locale(&self) -> Language {
        self.lock().locale
    }

    pub fn set_theme(&self, theme: Theme) -> AppResult<()> {
        let mut ui = self.lock();
        self.storage.set(KEY_THEME, &theme)?;
        ui.theme = theme;
        Ok(())
    }

    pub fn toggle_theme(&self) -> AppResult<Theme> {
        let next = self.theme().toggled();
        self.set_theme(next)?;
        Ok(next)
    }

    pub fn set_locale(&self, locale: Language) -> AppResult<()> {
        let mut ui = self.lock();
        self.storage.set(KEY_LOCALE, &locale)?;
        ui.locale = locale;
        Ok(())
    }

    pub fn toggle_sidebar(&self) -> bool {
        let mut ui = self.lock();
        ui.sidebar_open = !ui.sidebar_open;
        ui.sidebar_open
    }

    pub fn set_sidebar_open(&self, open: bool) {
        self.lock().sidebar_open = open;
    }

    pub fn set_loading(&self, loading: bool) {
        self.lock().loading = loading;
    }

    pub fn is_loading(&self) -> bool {
        self.lock().loading
    }

    fn lock(&self) -> MutexGuard<'_, UiSnapshot> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn parse_or_warn<T: FromStr>(value: &str) -> Option<T> {
    let parsed = value.parse().ok();
    if parsed.is_none() {
        warn!(value, "Ignoring invalid UI default");
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_come_from_settings() {
        let settings = UiSettings {
            theme: "dark".into(),
            locale: "uk".into(),
        };
        let ui = UiState::restore(LocalStorage::in_memory(), &settings);
        let snapshot = ui.snapshot();

        assert_eq!(snapshot.theme, Theme::Dark);
        assert_eq!(snapshot.locale, Language::Uk);
        assert!(snapshot.sidebar_open);
        assert!(!snapshot.loading);
    }

    #[test]
    fn test_persisted_values_win() {
        let storage = LocalStorage::in_memory();
        let ui = UiState::restore(storage.clone(), &UiSettings::default());
        ui.toggle_theme().unwrap();
        ui.set_locale(Language::Uk).unwrap();

        let restored = UiState::restore(storage.clone(), &UiSettings::default());
        assert_eq!(restored.theme(), Theme::Dark);
        assert_eq!(restored.locale(), Language::Uk);
        assert_eq!(storage.get::<String>(KEY_THEME).as_deref(), Some("dark"));
    }

    #[test]
    fn test_sidebar_is_not_persisted() {
        let storage = LocalStorage::in_memory();
        let ui = UiState::restore(storage.clone(), &UiSettings::default());
        assert!(!ui.toggle_sidebar());
        ui.set_loading(true);
        assert!(ui.is_loading());

        let restored = UiState::restore(storage, &UiSettings::default());
        assert!(restored.snapshot().sidebar_open);
    }

    #[test]
    fn test_bad_default_falls_back() {
        let settings = UiSettings {
            theme: "neon".into(),
            locale: "xx".into(),
        };
        let ui = UiState::restore(LocalStorage::in_memory(), &settings);
        assert_eq!(ui.theme(), Theme::Light);
        assert_eq!(ui.locale(), Language::En);
    }
}
