//! # Orders Page
//!
//! Server-paged order table with client-side filters over the fetched page.
//!
//! ## Sources by Role
//! ```text
//! ┌──────────┬──────────────────────────────┬──────────────────────────────┐
//! │ Role     │ Query                        │ Filters                      │
//! ├──────────┼──────────────────────────────┼──────────────────────────────┤
//! │ EMPLOYEE │ GET /orders?page&size        │ status, client id, employee  │
//! │ CLIENT   │ GET /orders/client/{userId}  │ status                       │
//! └──────────┴──────────────────────────────┴──────────────────────────────┘
//! ```
//!
//! ## Row Actions
//! Approved orders are read-only. Edit and delete apply to pending orders
//! (a client's own only); approve is employee-only.

use appliance_client::{list_key, paged_key};
use appliance_core::access::OrderPermissions;
use appliance_core::listing::{OrderFilter, Pagination, StatusFilter};
use appliance_core::{Order, PageRequest, PageResponse, UserRole};
use tracing::info;

use super::{Context, Mounted, QueryState};
use crate::error::{AppError, AppResult};

#[derive(Debug)]
pub struct OrdersPage {
    ctx: Context,
    pub pagination: Pagination,
    filter: OrderFilter,
    pub orders: QueryState<PageResponse<Order>>,
    mounted: Mounted,
}

impl OrdersPage {
    pub fn new(ctx: Context) -> Self {
        OrdersPage {
            ctx,
            pagination: Pagination::default(),
            filter: OrderFilter::default(),
            orders: QueryState::Idle,
            mounted: Mounted::default(),
        }
    }

    pub async fn load(&mut self) -> &QueryState<PageResponse<Order>> {
        self.orders = QueryState::Loading;
        let result = match self.ctx.session() {
            Ok(session) => self.fetch(session.role, session.user_id).await,
            Err(e) => Err(e),
        };
        self.orders = QueryState::from_result(result);
        &self.orders
    }

    async fn fetch(&mut self, role: UserRole, user_id: i64) -> AppResult<PageResponse<Order>> {
        let Pagination {
            page,
            rows_per_page,
        } = self.pagination;
        let api = &self.ctx.api;

        let (result, key) = match role {
            UserRole::Employee => {
                let request = PageRequest::new(page, rows_per_page);
                let key = list_key("/orders", &request);
                (api.list_orders(&request).await, key)
            }
            UserRole::Client => (
                api.orders_by_client(user_id, page, rows_per_page).await,
                paged_key(format!("/orders/client/{}", user_id), page, rows_per_page),
            ),
        };
        let orders = result.map_err(AppError::from)?;
        self.mounted.replace(api, vec![key]);
        Ok(orders)
    }

    /// Rows of the fetched page that pass the filters.
    pub fn visible(&self) -> Vec<&Order> {
        self.orders
            .data()
            .map(|page| self.filter.apply(&page.content))
            .unwrap_or_default()
    }

    pub fn filter(&self) -> &OrderFilter {
        &self.filter
    }

    pub fn set_status(&mut self, status: StatusFilter) {
        self.filter.status = status;
    }

    /// Client and employee filters are employee-only; ignored for clients.
    pub fn set_client_filter(&mut self, client_id: Option<i64>) {
        if self.is_employee() {
            self.filter.client_id = client_id;
        }
    }

    pub fn set_employee_filter(&mut self, employee_id: Option<i64>) {
        if self.is_employee() {
            self.filter.employee_id = employee_id;
        }
    }

    pub fn clear_filters(&mut self) {
        self.filter.clear();
    }

    fn is_employee(&self) -> bool {
        self.ctx.auth.is_employee()
    }

    pub async fn set_page(&mut self, page: u32) {
        self.pagination.set_page(page);
        self.load().await;
    }

    pub async fn set_rows_per_page(&mut self, rows: u32) {
        self.pagination.set_rows_per_page(rows);
        self.load().await;
    }

    pub fn permissions(&self, order: &Order) -> OrderPermissions {
        match self.ctx.session() {
            Ok(session) => OrderPermissions::for_order(order, session.role, session.user_id),
            Err(_) => OrderPermissions::default(),
        }
    }

    pub async fn approve(&mut self, order: &Order) -> AppResult<Order> {
        self.ctx
            .ensure(self.permissions(order).can_approve, "approve this order")?;
        let approved = self
            .ctx
            .api
            .approve_order(order.id)
            .await
            .map_err(|e| self.ctx.report(e))?;
        info!(order_id = order.id, "Order approved");
        self.ctx.notify.success("Order approved successfully");
        Ok(approved)
    }

    pub async fn delete(&mut self, order: &Order) -> AppResult<()> {
        self.ctx
            .ensure(self.permissions(order).can_delete, "delete this order")?;
        self.ctx
            .api
            .delete_order(order.id)
            .await
            .map_err(|e| self.ctx.report(e))?;
        info!(order_id = order.id, "Order deleted");
        self.ctx.notify.success("Order deleted successfully");
        Ok(())
    }

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
