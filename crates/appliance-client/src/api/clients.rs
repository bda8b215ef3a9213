//! Client directory endpoints.

use appliance_core::{Client, ClientRequest, PageRequest, PageResponse};

use super::{list_key, search_key, ApiClient};
use crate::cache::{QueryKey, Resource, Tag, TagId};
use crate::error::ClientResult;

const R: Resource = Resource::Client;

impl ApiClient {
    /// `GET /clients`
    pub async fn list_clients(&self, page: &PageRequest) -> ClientResult<PageResponse<Client>> {
        let key = list_key("/clients", page);
        self.read(key, |v| Tag::for_page(R, TagId::List, v)).await
    }

    /// `GET /clients/search`
    pub async fn search_clients(&self, query: &str, page: u32, size: u32) -> ClientResult<PageResponse<Client>> {
        let key = search_key("/clients", query, page, size);
        self.read(key, |v| Tag::for_page(R, TagId::Search, v)).await
    }

    /// `GET /clients/{id}`
    pub async fn get_client(&self, id: i64) -> ClientResult<Client> {
        let key = QueryKey::new(format!("/clients/{}", id));
        self.read(key, |_| vec![Tag::id(R, id)]).await
    }

    /// `POST /clients`
    pub async fn create_client(&self, request: &ClientRequest) -> ClientResult<Client> {
        let call = self.http().post("/clients", &[], Some(request));
        self.mutate("create client", call, vec![Tag::new(R, TagId::List)]).await
    }

    /// `PUT /clients/{id}`
    pub async fn update_client(&self, id: i64, request: &ClientRequest) -> ClientResult<Client> {
        let path = format!("/clients/{}", id);
        let call = self.http().put(&path, request);
        self.mutate("update client", call, vec![Tag::id(R, id), Tag::new(R, TagId::List)])
            .await
    }

    /// `DELETE /clients/{id}`
    pub async fn delete_client(&self, id: i64) -> ClientResult<()> {
        let path = format!("/clients/{}", id);
        let call = self.http().delete(&path);
        self.mutate("delete client", call, vec![Tag::id(R, id), Tag::new(R, TagId::List)])
            .await
    }
}
