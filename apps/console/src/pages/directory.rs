//! # Directory Pages
//!
//! Clients, employees and manufacturers share one server-paged,
//! server-searched table. Each resource plugs in through [`Directory`].
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  query empty?                                                           │
//! │     yes ──► GET /{resource}?page&size                                   │
//! │     no  ──► GET /{resource}/search?query&page&size                      │
//! │                                                                         │
//! │  new search text ──► page 0                                             │
//! │  rows-per-page change ──► page 0                                        │
//! │                                                                         │
//! │  add / edit / delete (EMPLOYEE) ──► validate ──► mutate ──► toast       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt::Debug;
use std::marker::PhantomData;

use appliance_client::{list_key, search_key, ApiClient, ClientResult};
use appliance_core::listing::Pagination;
use appliance_core::validation::{
    validate_client_request, validate_employee_request, validate_manufacturer,
};
use appliance_core::{
    Client, ClientRequest, CoreResult, Employee, EmployeeRequest, Manufacturer,
    ManufacturerRequest, PageRequest, PageResponse,
};
use tracing::info;

use super::{check_form, Context, FieldMap, Mounted, QueryState};
use crate::error::{AppError, AppResult};

// =============================================================================
// Resources
// =============================================================================

/// One directory resource: its endpoint, form schema and REST calls.
#[allow(async_fn_in_trait)]
pub trait Directory {
    type Entity: Clone + Debug;
    type Form: Debug;

    /// Collection endpoint, e.g. `/clients`.
    const ENDPOINT: &'static str;
    /// Singular noun used in toasts.
    const NOUN: &'static str;

    fn id(entity: &Self::Entity) -> i64;

    /// Employees need a password when created; the others never do.
    fn validate(form: &Self::Form, creating: bool) -> CoreResult<()>;

    async fn list(api: &ApiClient, page: &PageRequest) -> ClientResult<PageResponse<Self::Entity>>;

    async fn search(
        api: &ApiClient,
        query: &str,
        page: u32,
        size: u32,
    ) -> ClientResult<PageResponse<Self::Entity>>;

    async fn create(api: &ApiClient, form: &Self::Form) -> ClientResult<Self::Entity>;

    async fn update(api: &ApiClient, id: i64, form: &Self::Form) -> ClientResult<Self::Entity>;

    async fn delete(api: &ApiClient, id: i64) -> ClientResult<()>;
}

#[derive(Debug)]
pub struct Clients;

impl Directory for Clients {
    type Entity = Client;
    type Form = ClientRequest;
    const ENDPOINT: &'static str = "/clients";
    const NOUN: &'static str = "Client";

    fn id(entity: &Client) -> i64 {
        entity.id
    }

    fn validate(form: &ClientRequest, _creating: bool) -> CoreResult<()> {
        validate_client_request(form)
    }

    async fn list(api: &ApiClient, page: &PageRequest) -> ClientResult<PageResponse<Client>> {
        api.list_clients(page).await
    }

    async fn search(
        api: &ApiClient,
        query: &str,
        page: u32,
        size: u32,
    ) -> ClientResult<PageResponse<Client>> {
        api.search_clients(query, page, size).await
    }

    async fn create(api: &ApiClient, form: &ClientRequest) -> ClientResult<Client> {
        api.create_client(form).await
    }

    async fn update(api: &ApiClient, id: i64, form: &ClientRequest) -> ClientResult<Client> {
        api.update_client(id, form).await
    }

    async fn delete(api: &ApiClient, id: i64) -> ClientResult<()> {
        api.delete_client(id).await
    }
}

#[derive(Debug)]
pub struct Employees;

impl Directory for Employees {
    type Entity = Employee;
    type Form = EmployeeRequest;
    const ENDPOINT: &'static str = "/employees";
    const NOUN: &'static str = "Employee";

    fn id(entity: &Employee) -> i64 {
        entity.id
    }

    fn validate(form: &EmployeeRequest, creating: bool) -> CoreResult<()> {
        validate_employee_request(form, creating)
    }

    async fn list(api: &ApiClient, page: &PageRequest) -> ClientResult<PageResponse<Employee>> {
        api.list_employees(page).await
    }

    async fn search(
        api: &ApiClient,
        query: &str,
        page: u32,
        size: u32,
    ) -> ClientResult<PageResponse<Employee>> {
        api.search_employees(query, page, size).await
    }

    async fn create(api: &ApiClient, form: &EmployeeRequest) -> ClientResult<Employee> {
        api.create_employee(form).await
    }

    async fn update(api: &ApiClient, id: i64, form: &EmployeeRequest) -> ClientResult<Employee> {
        api.update_employee(id, form).await
    }

    async fn delete(api: &ApiClient, id: i64) -> ClientResult<()> {
        api.delete_employee(id).await
    }
}

#[derive(Debug)]
pub struct Manufacturers;

impl Directory for Manufacturers {
    type Entity = Manufacturer;
    type Form = ManufacturerRequest;
    const ENDPOINT: &'static str = "/manufacturers";
    const NOUN: &'static str = "Manufacturer";

    fn id(entity: &Manufacturer) -> i64 {
        entity.id
    }

    fn validate(form: &ManufacturerRequest, _creating: bool) -> CoreResult<()> {
        validate_manufacturer(form)
    }

    async fn list(
        api: &ApiClient,
        page: &PageRequest,
    ) -> ClientResult<PageResponse<Manufacturer>> {
        api.list_manufacturers(page).await
    }

    async fn search(
        api: &ApiClient,
        query: &str,
        page: u32,
        size: u32,
    ) -> ClientResult<PageResponse<Manufacturer>> {
        api.search_manufacturers(query, page, size).await
    }

    async fn create(api: &ApiClient, form: &ManufacturerRequest) -> ClientResult<Manufacturer> {
        api.create_manufacturer(form).await
    }

    async fn update(
        api: &ApiClient,
        id: i64,
        form: &ManufacturerRequest,
    ) -> ClientResult<Manufacturer> {
        api.update_manufacturer(id, form).await
    }

    async fn delete(api: &ApiClient, id: i64) -> ClientResult<()> {
        api.delete_manufacturer(id).await
    }
}

// =============================================================================
// Page
// =============================================================================

pub type ClientsPage = DirectoryPage<Clients>;
pub type EmployeesPage = DirectoryPage<Employees>;
pub type ManufacturersPage = DirectoryPage<Manufacturers>;

#[derive(Debug)]
pub struct DirectoryPage<R: Directory> {
    ctx: Context,
    query: String,
    pub pagination: Pagination,
    pub rows: QueryState<PageResponse<R::Entity>>,
    pub form_errors: FieldMap,
    mounted: Mounted,
    resource: PhantomData<R>,
}

impl<R: Directory> DirectoryPage<R> {
    pub fn new(ctx: Context) -> Self {
        DirectoryPage {
            ctx,
            query: String::new(),
            pagination: Pagination::default(),
            rows: QueryState::Idle,
            form_errors: FieldMap::new(),
            mounted: Mounted::default(),
            resource: PhantomData,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub async fn load(&mut self) -> &QueryState<PageResponse<R::Entity>> {
        self.rows = QueryState::Loading;
        let Pagination {
            page,
            rows_per_page,
        } = self.pagination;
        let query = self.query.trim().to_string();
        let api = &self.ctx.api;

        let (result, key) = if query.is_empty() {
            let request = PageRequest::new(page, rows_per_page);
            (R::list(api, &request).await, list_key(R::ENDPOINT, &request))
        } else {
            (
                R::search(api, &query, page, rows_per_page).await,
                search_key(R::ENDPOINT, &query, page, rows_per_page),
            )
        };

        match result {
            Ok(rows) => {
                self.mounted.replace(api, vec![key]);
                self.rows = QueryState::Ready(rows);
            }
            Err(e) => self.rows = QueryState::Failed(AppError::from(e)),
        }
        &self.rows
    }

    /// New search text always starts from the first page.
    pub async fn set_search(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.pagination.reset();
        self.load().await;
    }

    pub async fn set_page(&mut self, page: u32) {
        self.pagination.set_page(page);
        self.load().await;
    }

    pub async fn set_rows_per_page(&mut self, rows: u32) {
        self.pagination.set_rows_per_page(rows);
        self.load().await;
    }

    pub fn entries(&self) -> &[R::Entity] {
        self.rows.data().map(|p| p.content.as_slice()).unwrap_or(&[])
    }

    /// The directory is staff-only; mutations re-check it.
    fn ensure_staff(&self, action: &str) -> AppResult<()> {
        self.ctx.ensure(self.ctx.auth.is_employee(), action)
    }

    pub async fn create(&mut self, form: &R::Form) -> AppResult<R::Entity> {
        self.ensure_staff("add records")?;
        check_form(R::validate(form, true), &mut self.form_errors)?;
        let result = R::create(&self.ctx.api, form).await;
        let created = self.submit(result)?;
        info!(resource = R::ENDPOINT, id = R::id(&created), "Record created");
        self.ctx
            .notify
            .success(format!("{} created successfully", R::NOUN));
        Ok(created)
    }

    pub async fn update(&mut self, id: i64, form: &R::Form) -> AppResult<R::Entity> {
        self.ensure_staff("edit records")?;
        check_form(R::validate(form, false), &mut self.form_errors)?;
        let result = R::update(&self.ctx.api, id, form).await;
        let updated = self.submit(result)?;
        self.ctx
            .notify
            .success(format!("{} updated successfully", R::NOUN));
        Ok(updated)
    }

    pub async fn delete(&mut self, id: i64) -> AppResult<()> {
        self.ensure_staff("delete records")?;
        R::delete(&self.ctx.api, id)
            .await
            .map_err(|e| self.ctx.report(e))?;
        info!(resource = R::ENDPOINT, id, "Record deleted");
        self.ctx
            .notify
            .success(format!("{} deleted successfully", R::NOUN));
        Ok(())
    }

    fn submit<T>(&mut self, result: ClientResult<T>) -> AppResult<T> {
        result.map_err(|e| {
            let err = AppError::from(e);
            self.form_errors.clone_from(&err.field_errors);
            self.ctx.report(err)
        })
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::pages::testing::context;
    use crate::state::{login_response, token_expiring_in};

    fn signed_in(role: &str) -> Context {
        let ctx = context("http://127.0.0.1:9/api");
        ctx.auth
            .set_credentials(&login_response(token_expiring_in(3600), role))
            .unwrap();
        ctx
    }

    #[tokio::test]
    async fn test_new_employee_needs_password() {
        let mut page = EmployeesPage::new(signed_in("EMPLOYEE"));
        let form = EmployeeRequest {
            email: "bob@shop.com".into(),
            password: None,
            first_name: "Bob".into(),
            last_name: "Stone".into(),
            position: "Manager".into(),
        };

        let err = page.create(&form).await.unwrap_err();
        assert!(err.is_validation());
        assert!(page.form_errors.contains_key("password"));
    }

    #[tokio::test]
    async fn test_client_cannot_add_manufacturers() {
        let mut page = ManufacturersPage::new(signed_in("CLIENT"));
        let form = ManufacturerRequest {
            name: "Acme".into(),
            address: "1 Main Street".into(),
            country: "Ukraine".into(),
        };
        let err = page.create(&form).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn test_search_resets_page() {
        let mut page = ClientsPage::new(signed_in("EMPLOYEE"));
        page.pagination.set_page(3);

        page.set_search("  ann ").await;
        assert_eq!(page.pagination.page, 0);
        assert_eq!(page.query(), "  ann ");
        // nothing listens on port 9
        assert!(page.rows.error().is_some());
    }
}
