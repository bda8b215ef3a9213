//! # Router
//!
//! Tracks the current location and applies route guards on every
//! navigation.
//!
//! ## Navigation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    navigate("/orders", role)                            │
//! │                                                                         │
//! │  Route::parse ──► guard(route, role)                                    │
//! │                        │                                                │
//! │        ┌───────────────┼─────────────────────┐                         │
//! │        ▼               ▼                     ▼                          │
//! │     Allow        RedirectToLogin{from}     Denied                       │
//! │        │               │                     │                          │
//! │        ▼               ▼                     ▼                          │
//! │   open route     open /login,          open /unauthorized               │
//! │                  remember `from`                                        │
//! │                                                                         │
//! │  login succeeds ──► take_login_target() ──► `from` or /dashboard        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use appliance_core::access::{guard, post_login_target, Access, Route};
use appliance_core::UserRole;
use serde::Serialize;
use tracing::{debug, info};

/// Result of a navigation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum Navigation {
    Opened { route: Route },
    RedirectedToLogin { from: String },
    Denied { route: Route },
}

impl Navigation {
    /// The route that ended up on screen.
    pub fn landed_on(&self) -> Route {
        match self {
            Navigation::Opened { route } => *route,
            Navigation::RedirectedToLogin { .. } => Route::Login,
            Navigation::Denied { .. } => Route::Unauthorized,
        }
    }
}

#[derive(Debug)]
struct RouterState {
    location: String,
    route: Route,
    pending_from: Option<String>,
    history: VecDeque<String>,
}

/// Oldest locations fall off past this depth.
pub const HISTORY_LIMIT: usize = 50;

impl RouterState {
    fn remember(&mut self, location: String) {
        if self.history.len() == HISTORY_LIMIT {
            self.history.pop_front();
        }
        self.history.push_back(location);
    }
}

/// Current location plus the path preserved for post-login redirect.
#[derive(Debug)]
pub struct Navigator {
    state: Mutex<RouterState>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    /// Starts on `/login`.
    pub fn new() -> Self {
        Navigator {
            state: Mutex::new(RouterState {
                location: Route::Login.path(),
                route: Route::Login,
                pending_from: None,
                history: VecDeque::new(),
            }),
        }
    }

    /// Opens `location` for `role` (None when logged out).
    pub fn navigate(&self, location: &str, role: Option<UserRole>) -> Navigation {
        let route = Route::parse(location);
        let navigation = match guard(route, role) {
            Access::Allow => Navigation::Opened { route },
            Access::RedirectToLogin { from } => Navigation::RedirectedToLogin { from },
            Access::Denied => Navigation::Denied { route },
        };

        let mut state = self.lock();
        let landed = navigation.landed_on();
        if let Navigation::RedirectedToLogin { from } = &navigation {
            state.pending_from = Some(from.clone());
        }

        let previous = std::mem::replace(&mut state.location, landed.path());
        state.remember(previous);
        state.route = landed;
        debug!(location = %state.location, ?navigation, "Navigated");
        navigation
    }

    /// Consumes the preserved path; `/dashboard` when none.
    pub fn take_login_target(&self) -> String {
        let from = self.lock().pending_from.take();
        post_login_target(from.as_deref())
    }

    pub fn pending_from(&self) -> Option<String> {
        self.lock().pending_from.clone()
    }

    /// Sends the user to `/login` after the session was revoked. History is
    /// dropped so `back` cannot reopen the ended session's pages.
    pub fn force_login(&self) {
        let mut state = self.lock();
        if state.route == Route::Login {
            return;
        }
        state.location = Route::Login.path();
        state.history.clear();
        state.route = Route::Login;
        state.pending_from = None;
        info!("Redirected to login");
    }

    /// Steps back to the previous location without re-running guards.
    pub fn back(&self) -> Option<String> {
        let mut state = self.lock();
        let previous = state.history.pop_back()?;
        state.route = Route::parse(&previous);
        state.location = previous.clone();
        Some(previous)
    }

    pub fn current(&self) -> Route {
        self.lock().route
    }

    pub fn location(&self) -> String {
        self.lock().location.clone()
    }

    fn lock(&self) -> MutexGuard<'_, RouterState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use appliance_core::Category;

    #[test]
    fn test_logged_out_visit_preserves_from() {
        let nav = Navigator::new();
        let result = nav.navigate("/dashboard", None);

        assert_eq!(
            result,
            Navigation::RedirectedToLogin {
                from: "/dashboard".into()
            }
        );
        assert_eq!(nav.current(), Route::Login);
        assert_eq!(nav.take_login_target(), "/dashboard");
        assert_eq!(nav.take_login_target(), "/dashboard");
        assert_eq!(nav.pending_from(), None);
    }

    #[test]
    fn test_preserved_query_survives_login() {
        let nav = Navigator::new();
        nav.navigate("/appliances?category=SMALL", None);
        assert_eq!(nav.take_login_target(), "/appliances?category=SMALL");
    }

    #[test]
    fn test_client_is_denied_management_routes() {
        let nav = Navigator::new();
        for path in ["/clients", "/employees", "/manufacturers"] {
            let result = nav.navigate(path, Some(UserRole::Client));
            assert!(matches!(result, Navigation::Denied { .. }), "{}", path);
            assert_eq!(nav.current(), Route::Unauthorized);
        }
        let result = nav.navigate("/clients", Some(UserRole::Employee));
        assert_eq!(result, Navigation::Opened { route: Route::Clients });
    }

    #[test]
    fn test_category_param_is_kept() {
        let nav = Navigator::new();
        nav.navigate("/appliances?category=BIG", Some(UserRole::Client));
        assert_eq!(
            nav.current(),
            Route::Appliances {
                category: Some(Category::Big)
            }
        );
        assert_eq!(nav.location(), "/appliances?category=BIG");
    }

    #[test]
    fn test_unknown_path_lands_on_login() {
        let nav = Navigator::new();
        nav.navigate("/nowhere", Some(UserRole::Employee));
        assert_eq!(nav.current(), Route::Login);
        assert_eq!(nav.location(), "/login");
    }

    #[test]
    fn test_back_returns_to_previous_location() {
        let nav = Navigator::new();
        nav.navigate("/orders", Some(UserRole::Client));
        nav.navigate("/profile", Some(UserRole::Client));
        assert_eq!(nav.back().as_deref(), Some("/orders"));
        assert_eq!(nav.current(), Route::Orders);
    }

    #[test]
    fn test_force_login_drops_history() {
        let nav = Navigator::new();
        nav.navigate("/orders", Some(UserRole::Client));
        nav.navigate("/profile", Some(UserRole::Client));
        nav.force_login();
        assert_eq!(nav.current(), Route::Login);
        assert_eq!(nav.back(), None);
        assert_eq!(nav.current(), Route::Login);
    }

    #[test]
    fn test_history_is_capped() {
        let nav = Navigator::new();
        for _ in 0..HISTORY_LIMIT {
            nav.navigate("/orders", Some(UserRole::Employee));
            nav.navigate("/profile", Some(UserRole::Employee));
        }
        assert_eq!(nav.lock().history.len(), HISTORY_LIMIT);

        let mut steps = 0;
        while nav.back().is_some() {
            steps += 1;
        }
        assert_eq!(steps, HISTORY_LIMIT);
    }
}
