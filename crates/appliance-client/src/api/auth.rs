//! Authentication endpoints. None of them touch the cache.

use appliance_core::{Client, ClientRegistration, Employee, EmployeeRegistration, JwtResponse, LoginRequest};
use tracing::info;

use super::ApiClient;
use crate::error::ClientResult;

impl ApiClient {
    /// `POST /auth/login`
    pub async fn login(&self, credentials: &LoginRequest) -> ClientResult<JwtResponse> {
        let response: JwtResponse = self
            .http()
            .post("/auth/login", &[], Some(credentials))
            .await?;
        info!(email = %response.email, role = %response.role, "Logged in");
        Ok(response)
    }

    /// `POST /auth/register/client`
    pub async fn register_client(&self, form: &ClientRegistration) -> ClientResult<Client> {
        self.http()
            .post("/auth/register/client", &[], Some(form))
            .await
    }

    /// `POST /auth/register/employee`
    pub async fn register_employee(&self, form: &EmployeeRegistration) -> ClientResult<Employee> {
        self.http()
            .post("/auth/register/employee", &[], Some(form))
            .await
    }
}
