//! # Console Configuration
//!
//! Configuration for the backend connection, the query cache, retries,
//! local storage and UI defaults.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     APPLIANCE_API_URL=https://shop.example.com/api                     │
//! │     APPLIANCE_TIMEOUT_SECS=10                                          │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/console/console.toml (Linux)                             │
//! │     ~/Library/Application Support/com.appliance.console/console.toml   │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     http://localhost:8080/api, no retries                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # console.toml
//! [api]
//! base_url = "http://localhost:8080/api"
//! timeout_secs = 30
//!
//! [cache]
//! keep_unused_secs = 60
//!
//! [retry]
//! max_retries = 0  # 0 disables retries
//! initial_backoff_ms = 1000
//! max_backoff_secs = 30
//!
//! [storage]
//! path = "/var/lib/console/storage.json"
//! clear_on_start = true
//!
//! [ui]
//! theme = "light"
//! locale = "en"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{ClientError, ClientResult};

// =============================================================================
// Api Settings
// =============================================================================

/// Backend connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Base URL every endpoint path is appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout (seconds).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8080/api".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

// =============================================================================
// Cache Settings
// =============================================================================

/// Query cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSettings {
    /// How long an entry with no subscriber survives before pruning.
    #[serde(default = "default_keep_unused")]
    pub keep_unused_secs: u64,
}

fn default_keep_unused() -> u64 {
    60
}

impl Default for CacheSettings {
    fn default() -> Self {
        CacheSettings {
            keep_unused_secs: default_keep_unused(),
        }
    }
}

// =============================================================================
// Retry Settings
// =============================================================================

/// Retry behavior for read queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrySettings {
    /// Maximum retries per read. 0 disables retrying.
    #[serde(default)]
    pub max_retries: u32,

    /// First delay (milliseconds); each retry doubles it.
    #[serde(default = "default_initial_backoff")]
    pub initial_backoff_ms: u64,

    /// Upper bound of a single delay (seconds).
    #[serde(default = "default_max_backoff")]
    pub max_backoff_secs: u64,
}

fn default_initial_backoff() -> u64 {
    1000
}

fn default_max_backoff() -> u64 {
    30
}

impl Default for RetrySettings {
    fn default() -> Self {
        RetrySettings {
            max_retries: 0,
            initial_backoff_ms: default_initial_backoff(),
            max_backoff_secs: default_max_backoff(),
        }
    }
}

impl RetrySettings {
    pub fn is_enabled(&self) -> bool {
        self.max_retries > 0
    }
}

// =============================================================================
// Storage & UI Settings
// =============================================================================

/// Where the local storage document lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Storage file. Defaults to `storage.json` in the data directory.
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Wipe the whole document when the app boots.
    #[serde(default = "default_clear_on_start")]
    pub clear_on_start: bool,
}

fn default_clear_on_start() -> bool {
    true
}

impl Default for StorageSettings {
    fn default() -> Self {
        StorageSettings {
            path: None,
            clear_on_start: default_clear_on_start(),
        }
    }
}

/// UI defaults applied when nothing is persisted yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiSettings {
    #[serde(default = "default_theme")]
    pub theme: String,

    #[serde(default = "default_locale")]
    pub locale: String,
}

fn default_theme() -> String {
    "light".to_string()
}

fn default_locale() -> String {
    "en".to_string()
}

impl Default for UiSettings {
    fn default() -> Self {
        UiSettings {
            theme: default_theme(),
            locale: default_locale(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete console configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConsoleConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub cache: CacheSettings,

    #[serde(default)]
    pub retry: RetrySettings,

    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub ui: UiSettings,
}

impl ConsoleConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Config pointing at a specific backend, everything else default.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let mut config = Self::default();
        config.api.base_url = base_url.into();
        config
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (console.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ClientResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading console config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load console config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ClientResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ClientError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Console config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ClientResult<()> {
        let url = Url::parse(&self.api.base_url)?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ClientError::InvalidUrl(format!(
                "Base URL must start with http:// or https://, got: {}",
                self.api.base_url
            )));
        }

        if self.api.timeout_secs == 0 {
            return Err(ClientError::InvalidConfig(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        if self.retry.is_enabled() && self.retry.initial_backoff_ms == 0 {
            return Err(ClientError::InvalidConfig(
                "initial_backoff_ms must be greater than 0 when retries are enabled".into(),
            ));
        }

        if !matches!(self.ui.theme.as_str(), "light" | "dark") {
            return Err(ClientError::InvalidConfig(format!(
                "Unknown theme: '{}'. Valid options: light, dark",
                self.ui.theme
            )));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("APPLIANCE_API_URL") {
            debug!(url = %url, "Overriding API URL from environment");
            self.api.base_url = url;
        }

        if let Ok(timeout) = std::env::var("APPLIANCE_TIMEOUT_SECS") {
            if let Ok(t) = timeout.parse::<u64>() {
                self.api.timeout_secs = t;
            }
        }

        if let Ok(path) = std::env::var("APPLIANCE_STORAGE_PATH") {
            self.storage.path = Some(PathBuf::from(path));
        }

        if let Ok(locale) = std::env::var("APPLIANCE_LOCALE") {
            self.ui.locale = locale;
        }

        if let Ok(theme) = std::env::var("APPLIANCE_THEME") {
            match theme.to_lowercase().as_str() {
                "light" | "dark" => self.ui.theme = theme.to_lowercase(),
                _ => warn!(theme = %theme, "Unknown theme in environment"),
            }
        }

        if let Ok(retries) = std::env::var("APPLIANCE_RETRY_MAX") {
            if let Ok(r) = retries.parse::<u32>() {
                debug!(max_retries = r, "Overriding retry count from environment");
                self.retry.max_retries = r;
            }
        }
    }

    fn project_dirs() -> Option<directories::ProjectDirs> {
        directories::ProjectDirs::from("com", "appliance", "console")
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("console.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub fn base_url(&self) -> &str {
        &self.api.base_url
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    pub fn keep_unused(&self) -> Duration {
        Duration::from_secs(self.cache.keep_unused_secs)
    }

    /// The storage file, falling back to the platform data directory.
    pub fn storage_path(&self) -> Option<PathBuf> {
        self.storage.path.clone().or_else(|| {
            Self::project_dirs().map(|dirs| dirs.data_dir().join("storage.json"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ConsoleConfig::default();
        assert_eq!(config.base_url(), "http://localhost:8080/api");
        assert_eq!(config.cache.keep_unused_secs, 60);
        assert!(!config.retry.is_enabled());
        assert_eq!(config.ui.theme, "light");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = ConsoleConfig::default();

        config.api.base_url = "ftp://example.com".into();
        assert!(config.validate().is_err());

        config.api.base_url = "not a url".into();
        assert!(config.validate().unwrap_err().is_config_error());

        config.api.base_url = "https://shop.example.com/api".into();
        config.api.timeout_secs = 0;
        assert!(config.validate().is_err());

        config.api.timeout_secs = 5;
        config.ui.theme = "neon".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: ConsoleConfig = toml::from_str(
            r#"
            [api]
            base_url = "https://shop.example.com/api"

            [retry]
            max_retries = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.retry.max_retries, 3);
        assert_eq!(config.retry.initial_backoff_ms, 1000);
        assert_eq!(config.ui.locale, "en");
        assert!(config.storage.clear_on_start);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("console.toml");

        let mut config = ConsoleConfig::with_base_url("https://shop.example.com/api");
        config.cache.keep_unused_secs = 5;
        config.save(Some(path.clone())).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("[api]"));
        assert!(contents.contains("[cache]"));

        let loaded: ConsoleConfig = toml::from_str(&contents).unwrap();
        assert_eq!(loaded.api.base_url, "https://shop.example.com/api");
        assert_eq!(loaded.cache.keep_unused_secs, 5);
    }

    #[test]
    fn test_load_or_default_on_bad_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("console.toml");
        std::fs::write(&path, "[api\nbroken").unwrap();

        let config = ConsoleConfig::load_or_default(Some(path));
        assert_eq!(config.cache.keep_unused_secs, 60);
    }
}
