//! Manufacturer directory endpoints.

use appliance_core::{Manufacturer, ManufacturerRequest, PageRequest, PageResponse};

use super::{list_key, search_key, ApiClient};
use crate::cache::{QueryKey, Resource, Tag, TagId};
use crate::error::ClientResult;

const R: Resource = Resource::Manufacturer;

impl ApiClient {
    /// `GET /manufacturers`
    pub async fn list_manufacturers(&self, page: &PageRequest) -> ClientResult<PageResponse<Manufacturer>> {
        let key = list_key("/manufacturers", page);
        self.read(key, |v| Tag::for_page(R, TagId::List, v)).await
    }

    /// `GET /manufacturers/search`
    pub async fn search_manufacturers(&self, query: &str, page: u32, size: u32) -> ClientResult<PageResponse<Manufacturer>> {
        let key = search_key("/manufacturers", query, page, size);
        self.read(key, |v| Tag::for_page(R, TagId::Search, v)).await
    }

    /// `GET /manufacturers/{id}`
    pub async fn get_manufacturer(&self, id: i64) -> ClientResult<Manufacturer> {
        let key = QueryKey::new(format!("/manufacturers/{}", id));
        self.read(key, |_| vec![Tag::id(R, id)]).await
    }

    /// `POST /manufacturers`
    pub async fn create_manufacturer(&self, request: &ManufacturerRequest) -> ClientResult<Manufacturer> {
        let call = self.http().post("/manufacturers", &[], Some(request));
        self.mutate("create manufacturer", call, vec![Tag::new(R, TagId::List)]).await
    }

    /// `PUT /manufacturers/{id}`
    pub async fn update_manufacturer(&self, id: i64, request: &ManufacturerRequest) -> ClientResult<Manufacturer> {
        let path = format!("/manufacturers/{}", id);
        let call = self.http().put(&path, request);
        self.mutate("update manufacturer", call, vec![Tag::id(R, id), Tag::new(R, TagId::List)])
            .await
    }

    /// `DELETE /manufacturers/{id}`
    pub async fn delete_manufacturer(&self, id: i64) -> ClientResult<()> {
        let path = format!("/manufacturers/{}", id);
        let call = self.http().delete(&path);
        self.mutate("delete manufacturer", call, vec![Tag::id(R, id), Tag::new(R, TagId::List)])
            .await
    }
}
