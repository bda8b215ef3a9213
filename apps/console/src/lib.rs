//! # Appliance Console Library
//!
//! Application shell of the appliance console: local state, navigation,
//! notifications and the pages that drive `appliance-client`.
//!
//! ## Module Organization
//! ```text
//! appliance_console/
//! ├── lib.rs          ◄─── You are here (bootstrap & session wiring)
//! ├── storage.rs      ◄─── File-backed key/value document
//! ├── state/
//! │   ├── auth.rs     ◄─── Session store (token, role, identity)
//! │   ├── cart.rs     ◄─── Cart store persisted on every change
//! │   └── ui.rs       ◄─── Theme, locale, sidebar, loading
//! ├── router.rs       ◄─── Route guards and post-login redirect
//! ├── notify.rs       ◄─── Toast queue
//! ├── boundary.rs     ◄─── Catches failed page tasks
//! ├── pages/          ◄─── Route controllers
//! ├── dialogs/        ◄─── Order wizard, order edit, checkout
//! └── error.rs        ◄─── AppError for the presenter
//! ```
//!
//! ## Session Wiring
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ApiClient ──token()──► AuthState                                       │
//! │      │                                                                  │
//! │      └── 401/403 ──► SessionEvents ──┬──► AuthState::logout             │
//! │                                      ├──► QueryCache::clear             │
//! │                                      └──► Navigator::force_login        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod boundary;
pub mod dialogs;
pub mod error;
pub mod notify;
pub mod pages;
pub mod router;
pub mod state;
pub mod storage;

use std::sync::Arc;

use appliance_client::{ApiClient, AuthEvents, ConsoleConfig, QueryCache};
use appliance_core::access::{menu_items, MenuItem};
use appliance_core::{Language, LanguageList, TranslationCategory, Translations};
use chrono::{DateTime, Utc};
use tracing::{info, trace, warn, Level};
use tracing_subscriber::EnvFilter;

use boundary::ErrorBoundary;
use error::AppResult;
use notify::Notifier;
use pages::Context;
use router::{Navigation, Navigator};
use state::{AuthState, CartState, UiState};
use storage::LocalStorage;

/// Reacts to the backend rejecting the session.
struct SessionEvents {
    auth: Arc<AuthState>,
    cache: QueryCache,
    navigator: Arc<Navigator>,
}

impl AuthEvents for SessionEvents {
    fn on_auth_failure(&self, status: u16) {
        warn!(status, "Backend rejected the session");
        self.auth.logout();
        self.cache.clear();
        self.navigator.force_login();
    }
}

/// A running console.
#[derive(Debug)]
pub struct App {
    config: ConsoleConfig,
    storage: LocalStorage,
    context: Context,
    boundary: ErrorBoundary,
}

impl App {
    /// Builds the console from configuration.
    ///
    /// ## Startup Sequence
    /// ```text
    /// ┌─────────────────────────────────────────────────────────────────────────┐
    /// │  1. Open storage ─── file from config, or in-memory when none           │
    /// │  2. Clear storage ── when storage.clear_on_start is set                 │
    /// │  3. Restore stores ─ auth (expiry checked), cart, ui                    │
    /// │  4. Build client ─── shared cache + session hooks                       │
    /// │  5. Land ─────────── dashboard when a session survived, else login      │
    /// └─────────────────────────────────────────────────────────────────────────┘
    /// ```
    pub fn bootstrap(config: ConsoleConfig) -> AppResult<App> {
        let storage = match config.storage_path() {
            Some(path) => LocalStorage::open(path)?,
            None => {
                warn!("No storage location; state will not survive a restart");
                LocalStorage::in_memory()
            }
        };
        if config.storage.clear_on_start {
            storage.clear()?;
        }

        let auth = Arc::new(AuthState::restore(storage.clone()));
        let cart = CartState::restore(storage.clone());
        let ui = Arc::new(UiState::restore(storage.clone(), &config.ui));
        let navigator = Arc::new(Navigator::new());

        let cache = QueryCache::new(config.keep_unused());
        let events = Arc::new(SessionEvents {
            auth: auth.clone(),
            cache: cache.clone(),
            navigator: navigator.clone(),
        });
        let api = ApiClient::with_cache(&config, cache, auth.clone(), events)?;

        let context = Context {
            api,
            auth,
            cart,
            ui,
            notify: Arc::new(Notifier::new()),
            navigator,
        };

        if let Some(session) = context.auth.session() {
            context
                .navigator
                .navigate(appliance_core::access::DEFAULT_LANDING, Some(session.role));
        }

        info!(
            base_url = %config.base_url(),
            authenticated = context.auth.is_authenticated(),
            cart_lines = context.cart.totals().line_count,
            "Console ready"
        );

        Ok(App {
            config,
            storage,
            context,
            boundary: ErrorBoundary::new(),
        })
    }

    /// Rebuilds the console from the same configuration, as a reload would.
    pub fn reload(&self) -> AppResult<App> {
        info!("Reloading console");
        App::bootstrap(self.config.clone())
    }

    pub fn context(&self) -> Context {
        self.context.clone()
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    pub fn storage(&self) -> &LocalStorage {
        &self.storage
    }

    pub fn boundary(&self) -> &ErrorBoundary {
        &self.boundary
    }

    /// Opens `location` as the current user.
    pub fn navigate(&self, location: &str) -> Navigation {
        self.context
            .navigator
            .navigate(location, self.context.auth.role())
    }

    /// Navigation entries for the current user.
    pub fn menu(&self) -> Vec<MenuItem> {
        self.context
            .auth
            .role()
            .map(menu_items)
            .unwrap_or_default()
    }

    /// Ends the session: auth keys removed, cache emptied, back to login.
    pub fn logout(&self) {
        if self.context.auth.logout() {
            self.context.api.cache().clear();
            self.context.notify.info("You have been logged out");
        }
        self.context.navigator.force_login();
    }

    /// Switches the UI language on the backend, then persists it locally.
    pub async fn change_locale(&self, language: Language) -> AppResult<()> {
        let ctx = &self.context;
        let change = ctx
            .api
            .change_locale(language)
            .await
            .map_err(|e| ctx.report(e))?;
        ctx.ui.set_locale(language)?;
        info!(locale = %change.locale, "Locale changed");
        Ok(())
    }

    pub async fn languages(&self) -> AppResult<LanguageList> {
        Ok(self.context.api.languages().await?)
    }

    pub async fn translations(&self, category: TranslationCategory) -> AppResult<Translations> {
        Ok(self.context.api.translations(category).await?)
    }

    /// Housekeeping run by the presenter's timer: drops unused cache
    /// entries and hides expired toasts.
    pub fn tick(&self, now: DateTime<Utc>) {
        let pruned = self.context.api.cache().prune(now);
        let expired = self.context.notify.expire(now);
        if pruned + expired > 0 {
            trace!(pruned, expired, "Housekeeping");
        }
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=appliance=trace` - Show trace for appliance crates only
/// - Default: INFO, DEBUG for appliance crates
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,appliance=debug,reqwest=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::TRACE)
        .init();
}
