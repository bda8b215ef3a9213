//! # Dashboard
//!
//! Landing page after login. Employees see shop-wide totals; clients see a
//! slice of the catalog and their own recent orders.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  EMPLOYEE                               CLIENT                          │
//! │  ─────────                              ──────                          │
//! │  appliances (0,10)   ┐                  appliances (0,20) ─► first 8    │
//! │  orders     (0,100)  │ loaded           or search matches               │
//! │  clients    (0,1000) │ together                                         │
//! │  employees  (0,1000) ┘                  own orders (0,100) ─► recent 5  │
//! │                                                                         │
//! │  totals, pending/approved, recent 5                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use appliance_client::{list_key, paged_key};
use appliance_core::{Appliance, Order, PageRequest, UserRole, LOOKUP_PAGE_SIZE};
use serde::Serialize;
use tracing::debug;

use super::{Context, Mounted, QueryState};
use crate::error::{AppError, AppResult};

const RECENT_ORDERS: usize = 5;
const CLIENT_CATALOG_SIZE: u32 = 20;
const CLIENT_FEATURED: usize = 8;
const ORDER_SAMPLE: u32 = 100;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeStats {
    pub total_appliances: u64,
    pub total_orders: u64,
    pub total_clients: u64,
    pub total_employees: u64,
    /// Counted over the sampled first page of orders.
    pub pending_orders: usize,
    pub approved_orders: usize,
    pub recent_orders: Vec<Order>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientOverview {
    pub featured: Vec<Appliance>,
    pub recent_orders: Vec<Order>,
    pub total_orders: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "camelCase")]
pub enum DashboardView {
    Employee(EmployeeStats),
    Client(ClientOverview),
}

#[derive(Debug)]
pub struct DashboardPage {
    ctx: Context,
    pub state: QueryState<DashboardView>,
    /// Client-side filter over the loaded catalog slice.
    pub search: String,
    catalog: Vec<Appliance>,
    mounted: Mounted,
}

impl DashboardPage {
    pub fn new(ctx: Context) -> Self {
        DashboardPage {
            ctx,
            state: QueryState::Idle,
            search: String::new(),
            catalog: Vec::new(),
            mounted: Mounted::default(),
        }
    }

    pub async fn load(&mut self) -> &QueryState<DashboardView> {
        self.state = QueryState::Loading;
        let result = match self.ctx.session() {
            Ok(session) => match session.role {
                UserRole::Employee => self.load_employee().await,
                UserRole::Client => self.load_client(session.user_id).await,
            },
            Err(e) => Err(e),
        };
        self.state = QueryState::from_result(result);
        &self.state
    }

    async fn load_employee(&mut self) -> AppResult<DashboardView> {
        let api = &self.ctx.api;
        let appliances_page = PageRequest::new(0, 10);
        let orders_page = PageRequest::new(0, ORDER_SAMPLE);
        let people_page = PageRequest::new(0, LOOKUP_PAGE_SIZE);

        let (appliances, orders, clients, employees) = tokio::try_join!(
            api.list_appliances(&appliances_page),
            api.list_orders(&orders_page),
            api.list_clients(&people_page),
            api.list_employees(&people_page),
        )
        .map_err(AppError::from)?;

        self.mounted.replace(
            api,
            vec![
                list_key("/appliances", &appliances_page),
                list_key("/orders", &orders_page),
                list_key("/clients", &people_page),
                list_key("/employees", &people_page),
            ],
        );

        let pending_orders = orders.content.iter().filter(|o| !o.approved).count();
        debug!(orders = orders.total_elements, pending_orders, "Employee dashboard loaded");
        Ok(DashboardView::Employee(EmployeeStats {
            total_appliances: appliances.total_elements,
            total_orders: orders.total_elements,
            total_clients: clients.total_elements,
            total_employees: employees.total_elements,
            pending_orders,
            approved_orders: orders.content.len() - pending_orders,
            recent_orders: orders.content.into_iter().take(RECENT_ORDERS).collect(),
        }))
    }

    async fn load_client(&mut self, client_id: i64) -> AppResult<DashboardView> {
        let api = &self.ctx.api;
        let catalog_page = PageRequest::new(0, CLIENT_CATALOG_SIZE);

        let (appliances, orders) = tokio::try_join!(
            api.list_appliances(&catalog_page),
            api.orders_by_client(client_id, 0, ORDER_SAMPLE),
        )
        .map_err(AppError::from)?;

        self.mounted.replace(
            api,
            vec![
                list_key("/appliances", &catalog_page),
                paged_key(format!("/orders/client/{}", client_id), 0, ORDER_SAMPLE),
            ],
        );

        self.catalog = appliances.content;
        Ok(DashboardView::Client(ClientOverview {
            featured: self.featured(),
            recent_orders: orders.content.into_iter().take(RECENT_ORDERS).collect(),
            total_orders: orders.total_elements,
        }))
    }

    /// First 8 appliances, or every name match while searching.
    fn featured(&self) -> Vec<Appliance> {
        let query = self.search.trim().to_lowercase();
        if query.is_empty() {
            return self.catalog.iter().take(CLIENT_FEATURED).cloned().collect();
        }
        self.catalog
            .iter()
            .filter(|a| a.name.to_lowercase().contains(&query))
            .cloned()
            .collect()
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
        let featured = self.featured();
        if let QueryState::Ready(DashboardView::Client(overview)) = &mut self.state {
            overview.featured = featured;
        }
    }

    /// Adds a featured appliance to the cart.
    pub fn add_to_cart(&self, appliance: &Appliance) -> AppResult<()> {
        self.ctx
            .cart
            .add(appliance.clone())
            .map_err(|e| self.ctx.report(e))?;
        self.ctx.notify.success("Item added to cart");
        Ok(())
    }

    /// Reloads when a mutation elsewhere invalidated what is shown.
    pub async fn refresh_if_stale(&mut self) -> bool {
        if !self.mounted.needs_refresh() {
            return false;
        }
        self.load().await;
        true
    }

    pub fn mounted(&self) -> &Mounted {
        &self.mounted
    }
}
