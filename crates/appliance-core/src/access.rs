//! # Access Rules
//!
//! Which role reaches which route, what the navigation menu shows, and
//! which actions an order row exposes.
//!
//! ## Route Guard
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Route Guard                                      │
//! │                                                                         │
//! │  path ──► Route::parse ──► guard(route, role)                           │
//! │                                 │                                       │
//! │              ┌──────────────────┼──────────────────────┐                │
//! │              ▼                  ▼                      ▼                │
//! │         public route      no session on a        role not allowed      │
//! │         or role allowed   private route                                 │
//! │              │                  │                      │                │
//! │           Allow        RedirectToLogin{from}        Denied             │
//! │                                                  (/unauthorized)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::types::{Category, Order, UserRole};

/// Landing page after login when no `from` path was preserved.
pub const DEFAULT_LANDING: &str = "/dashboard";

// =============================================================================
// Routes
// =============================================================================

/// Every page of the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Route {
    Login,
    RegisterClient,
    RegisterEmployee,
    Dashboard,
    /// Appliance catalog, optionally seeded with a category filter.
    Appliances { category: Option<Category> },
    Orders,
    Profile,
    Manufacturers,
    Employees,
    Clients,
    Unauthorized,
}

impl Route {
    /// Resolves a location such as `/appliances?category=BIG`.
    ///
    /// `/` and unknown paths resolve to [`Route::Login`].
    pub fn parse(location: &str) -> Route {
        let (path, query) = match location.split_once('?') {
            Some((p, q)) => (p, Some(q)),
            None => (location, None),
        };
        let path = match path.trim_end_matches('/') {
            "" => "/",
            p => p,
        };

        match path {
            "/login" => Route::Login,
            "/register/client" => Route::RegisterClient,
            "/register/employee" => Route::RegisterEmployee,
            "/dashboard" => Route::Dashboard,
            "/appliances" => Route::Appliances {
                category: query
                    .and_then(|q| query_param(q, "category"))
                    .and_then(|c| c.parse().ok()),
            },
            "/orders" => Route::Orders,
            "/profile" => Route::Profile,
            "/manufacturers" => Route::Manufacturers,
            "/employees" => Route::Employees,
            "/clients" => Route::Clients,
            "/unauthorized" => Route::Unauthorized,
            _ => Route::Login,
        }
    }

    /// Canonical location of the route, including its query string.
    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".into(),
            Route::RegisterClient => "/register/client".into(),
            Route::RegisterEmployee => "/register/employee".into(),
            Route::Dashboard => "/dashboard".into(),
            Route::Appliances { category: None } => "/appliances".into(),
            Route::Appliances {
                category: Some(category),
            } => format!("/appliances?category={}", category),
            Route::Orders => "/orders".into(),
            Route::Profile => "/profile".into(),
            Route::Manufacturers => "/manufacturers".into(),
            Route::Employees => "/employees".into(),
            Route::Clients => "/clients".into(),
            Route::Unauthorized => "/unauthorized".into(),
        }
    }

    /// Reachable without a session.
    pub fn is_public(&self) -> bool {
        matches!(
            self,
            Route::Login | Route::RegisterClient | Route::RegisterEmployee | Route::Unauthorized
        )
    }

    /// Roles allowed on a private route.
    pub fn allowed_roles(&self) -> &'static [UserRole] {
        match self {
            Route::Manufacturers | Route::Employees | Route::Clients => &[UserRole::Employee],
            _ => &UserRole::ALL,
        }
    }
}

fn query_param<'a>(query: &'a str, name: &str) -> Option<&'a str> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v)
}

// =============================================================================
// Guard
// =============================================================================

/// Outcome of guarding a navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Allow,
    /// No session; go to `/login` and come back to `from` afterwards.
    RedirectToLogin { from: String },
    /// Session present but the role may not see this route.
    Denied,
}

/// Decides whether `role` (None when logged out) may open `route`.
///
/// ## Example
/// ```rust
/// use appliance_core::access::{guard, Access, Route};
/// use appliance_core::UserRole;
///
/// assert_eq!(
///     guard(Route::Dashboard, None),
///     Access::RedirectToLogin { from: "/dashboard".into() }
/// );
/// assert_eq!(guard(Route::Clients, Some(UserRole::Client)), Access::Denied);
/// assert_eq!(guard(Route::Clients, Some(UserRole::Employee)), Access::Allow);
/// ```
pub fn guard(route: Route, role: Option<UserRole>) -> Access {
    if route.is_public() {
        return Access::Allow;
    }
    match role {
        None => Access::RedirectToLogin { from: route.path() },
        Some(role) if route.allowed_roles().contains(&role) => Access::Allow,
        Some(_) => Access::Denied,
    }
}

/// Where to go after a successful login.
pub fn post_login_target(from: Option<&str>) -> String {
    match from {
        Some(path) if !path.is_empty() && !Route::parse(path).is_public() => path.to_string(),
        _ => DEFAULT_LANDING.to_string(),
    }
}

// =============================================================================
// Menu
// =============================================================================

/// A navigation entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    /// Translation key under the `menu` category.
    pub key: &'static str,
    pub route: Route,
}

const MENU: [MenuItem; 7] = [
    MenuItem { key: "dashboard", route: Route::Dashboard },
    MenuItem { key: "appliances", route: Route::Appliances { category: None } },
    MenuItem { key: "orders", route: Route::Orders },
    MenuItem { key: "manufacturers", route: Route::Manufacturers },
    MenuItem { key: "clients", route: Route::Clients },
    MenuItem { key: "employees", route: Route::Employees },
    MenuItem { key: "profile", route: Route::Profile },
];

/// Menu entries visible to a role.
pub fn menu_items(role: UserRole) -> Vec<MenuItem> {
    MENU.iter()
        .filter(|item| item.route.allowed_roles().contains(&role))
        .cloned()
        .collect()
}

// =============================================================================
// Order Permissions
// =============================================================================

/// Row actions of an order for the current user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPermissions {
    pub can_view: bool,
    pub can_edit: bool,
    pub can_delete: bool,
    pub can_approve: bool,
}

impl OrderPermissions {
    /// ## Rules
    /// - Approved orders are read-only for everyone
    /// - Employees edit, delete and approve any pending order
    /// - Clients edit and delete their own pending orders and never approve
    pub fn for_order(order: &Order, role: UserRole, user_id: i64) -> Self {
        let own = order.client_id() == Some(user_id);
        let mutable = order.is_mutable();
        match role {
            UserRole::Employee => OrderPermissions {
                can_view: true,
                can_edit: mutable,
                can_delete: mutable,
                can_approve: mutable,
            },
            UserRole::Client => OrderPermissions {
                can_view: own,
                can_edit: own && mutable,
                can_delete: own && mutable,
                can_approve: false,
            },
        }
    }
}

/// Catalog actions for a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogPermissions {
    pub can_manage: bool,
    pub can_add_to_cart: bool,
}

impl CatalogPermissions {
    pub fn for_role(role: UserRole) -> Self {
        CatalogPermissions {
            can_manage: role.is_employee(),
            can_add_to_cart: !role.is_employee(),
        }
    }
}
