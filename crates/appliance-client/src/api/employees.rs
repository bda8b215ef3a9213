//! Employee directory endpoints.

use appliance_core::{Employee, EmployeeRequest, PageRequest, PageResponse};

use super::{list_key, search_key, ApiClient};
use crate::cache::{QueryKey, Resource, Tag, TagId};
use crate::error::ClientResult;

const R: Resource = Resource::Employee;

impl ApiClient {
    /// `GET /employees`
    pub async fn list_employees(&self, page: &PageRequest) -> ClientResult<PageResponse<Employee>> {
        let key = list_key("/employees", page);
        self.read(key, |v| Tag::for_page(R, TagId::List, v)).await
    }

    /// `GET /employees/search`
    pub async fn search_employees(&self, query: &str, page: u32, size: u32) -> ClientResult<PageResponse<Employee>> {
        let key = search_key("/employees", query, page, size);
        self.read(key, |v| Tag::for_page(R, TagId::Search, v)).await
    }

    /// `GET /employees/{id}`
    pub async fn get_employee(&self, id: i64) -> ClientResult<Employee> {
        let key = QueryKey::new(format!("/employees/{}", id));
        self.read(key, |_| vec![Tag::id(R, id)]).await
    }

    /// `POST /employees`
    pub async fn create_employee(&self, request: &EmployeeRequest) -> ClientResult<Employee> {
        let call = self.http().post("/employees", &[], Some(request));
        self.mutate("create employee", call, vec![Tag::new(R, TagId::List)]).await
    }

    /// `PUT /employees/{id}`
    pub async fn update_employee(&self, id: i64, request: &EmployeeRequest) -> ClientResult<Employee> {
        let path = format!("/employees/{}", id);
        let call = self.http().put(&path, request);
        self.mutate("update employee", call, vec![Tag::id(R, id), Tag::new(R, TagId::List)])
            .await
    }

    /// `DELETE /employees/{id}`
    pub async fn delete_employee(&self, id: i64) -> ClientResult<()> {
        let path = format!("/employees/{}", id);
        let call = self.http().delete(&path);
        self.mutate("delete employee", call, vec![Tag::id(R, id), Tag::new(R, TagId::List)])
            .await
    }
}
