//! Order endpoints.
//!
//! ## Tags
//! ```text
//! list ─────────► Order:LIST          + Order:{id} per row
//! by client ────► Order:CLIENT_LIST   + Order:{id} per row
//! by employee ──► Order:EMPLOYEE_LIST + Order:{id} per row
//! by status ────► Order:STATUS_LIST   + Order:{id} per row
//!
//! create ──────────► LIST, CLIENT_LIST, STATUS_LIST
//! update / delete ─► {id}, LIST, CLIENT_LIST, STATUS_LIST
//! approve ─────────► {id}, LIST, CLIENT_LIST, EMPLOYEE_LIST, STATUS_LIST
//! ```

use appliance_core::{Order, OrderRequest, PageRequest, PageResponse};

use super::{list_key, paged_key, ApiClient};
use crate::cache::{QueryKey, Resource, Tag, TagId};
use crate::error::ClientResult;

const R: Resource = Resource::Order;

fn list_tags() -> Vec<Tag> {
    vec![
        Tag::new(R, TagId::List),
        Tag::new(R, TagId::ClientList),
        Tag::new(R, TagId::StatusList),
    ]
}

fn record_tags(id: i64) -> Vec<Tag> {
    let mut tags = vec![Tag::id(R, id)];
    tags.extend(list_tags());
    tags
}

impl ApiClient {
    /// `GET /orders` (employees only).
    pub async fn list_orders(&self, page: &PageRequest) -> ClientResult<PageResponse<Order>> {
        let key = list_key("/orders", page);
        self.read(key, |v| Tag::for_page(R, TagId::List, v)).await
    }

    /// `GET /orders/client/{clientId}`
    pub async fn orders_by_client(
        &self,
        client_id: i64,
        page: u32,
        size: u32,
    ) -> ClientResult<PageResponse<Order>> {
        let key = paged_key(format!("/orders/client/{}", client_id), page, size);
        self.read(key, |v| Tag::for_page(R, TagId::ClientList, v))
            .await
    }

    /// `GET /orders/employee/{employeeId}`
    pub async fn orders_by_employee(
        &self,
        employee_id: i64,
        page: u32,
        size: u32,
    ) -> ClientResult<PageResponse<Order>> {
        let key = paged_key(format!("/orders/employee/{}", employee_id), page, size);
        self.read(key, |v| Tag::for_page(R, TagId::EmployeeList, v))
            .await
    }

    /// `GET /orders/status/{approved}`
    pub async fn orders_by_status(
        &self,
        approved: bool,
        page: u32,
        size: u32,
    ) -> ClientResult<PageResponse<Order>> {
        let key = paged_key(format!("/orders/status/{}", approved), page, size);
        self.read(key, |v| Tag::for_page(R, TagId::StatusList, v))
            .await
    }

    /// `GET /orders/{id}`
    pub async fn get_order(&self, id: i64) -> ClientResult<Order> {
        let key = QueryKey::new(format!("/orders/{}", id));
        self.read(key, |_| vec![Tag::id(R, id)]).await
    }

    /// `POST /orders`
    pub async fn create_order(&self, request: &OrderRequest) -> ClientResult<Order> {
        let call = self.http().post("/orders", &[], Some(request));
        self.mutate("create order", call, list_tags()).await
    }

    /// `PUT /orders/{id}`
    pub async fn update_order(&self, id: i64, request: &OrderRequest) -> ClientResult<Order> {
        let path = format!("/orders/{}", id);
        let call = self.http().put(&path, request);
        self.mutate("update order", call, record_tags(id)).await
    }

    /// `DELETE /orders/{id}`
    pub async fn delete_order(&self, id: i64) -> ClientResult<()> {
        let path = format!("/orders/{}", id);
        let call = self.http().delete(&path);
        self.mutate("delete order", call, record_tags(id)).await
    }

    /// `POST /orders/{id}/approve` (employees only).
    pub async fn approve_order(&self, id: i64) -> ClientResult<Order> {
        let path = format!("/orders/{}/approve", id);
        let call = self.http().post(&path, &[], None::<&()>);
        let mut tags = record_tags(id);
        tags.push(Tag::new(R, TagId::EmployeeList));
        self.mutate("approve order", call, tags).await
    }
}
