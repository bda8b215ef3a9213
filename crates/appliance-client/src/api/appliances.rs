//! Appliance catalog endpoints.

use appliance_core::{Appliance, ApplianceRequest, Category, PageRequest, PageResponse, PowerType};

use super::{list_key, paged_key, search_key, ApiClient};
use crate::cache::{QueryKey, Resource, Tag, TagId};
use crate::error::ClientResult;

const R: Resource = Resource::Appliance;

impl ApiClient {
    /// `GET /appliances`
    pub async fn list_appliances(&self, page: &PageRequest) -> ClientResult<PageResponse<Appliance>> {
        let key = list_key("/appliances", page);
        self.read(key, |v| Tag::for_page(R, TagId::List, v)).await
    }

    /// `GET /appliances/search`
    pub async fn search_appliances(
        &self,
        query: &str,
        page: u32,
        size: u32,
    ) -> ClientResult<PageResponse<Appliance>> {
        let key = search_key("/appliances", query, page, size);
        self.read(key, |v| Tag::for_page(R, TagId::Search, v)).await
    }

    /// `GET /appliances/category/{category}`
    pub async fn appliances_by_category(
        &self,
        category: Category,
        page: u32,
        size: u32,
    ) -> ClientResult<PageResponse<Appliance>> {
        let key = paged_key(format!("/appliances/category/{}", category), page, size);
        self.read(key, |v| Tag::for_page(R, TagId::Category, v)).await
    }

    /// `GET /appliances/power-type/{powerType}`
    pub async fn appliances_by_power_type(
        &self,
        power_type: PowerType,
        page: u32,
        size: u32,
    ) -> ClientResult<PageResponse<Appliance>> {
        let key = paged_key(format!("/appliances/power-type/{}", power_type), page, size);
        self.read(key, |v| Tag::for_page(R, TagId::PowerType, v)).await
    }

    /// `GET /appliances/{id}`
    pub async fn get_appliance(&self, id: i64) -> ClientResult<Appliance> {
        let key = QueryKey::new(format!("/appliances/{}", id));
        self.read(key, |_| vec![Tag::id(R, id)]).await
    }

    /// `POST /appliances`
    pub async fn create_appliance(&self, request: &ApplianceRequest) -> ClientResult<Appliance> {
        let call = self.http().post("/appliances", &[], Some(request));
        self.mutate("create appliance", call, vec![Tag::new(R, TagId::List)])
            .await
    }

    /// `PUT /appliances/{id}`
    pub async fn update_appliance(&self, id: i64, request: &ApplianceRequest) -> ClientResult<Appliance> {
        let path = format!("/appliances/{}", id);
        let call = self.http().put(&path, request);
        self.mutate(
            "update appliance",
            call,
            vec![Tag::id(R, id), Tag::new(R, TagId::List)],
        )
        .await
    }

    /// `DELETE /appliances/{id}`
    pub async fn delete_appliance(&self, id: i64) -> ClientResult<()> {
        let path = format!("/appliances/{}", id);
        let call = self.http().delete(&path);
        self.mutate(
            "delete appliance",
            call,
            vec![Tag::id(R, id), Tag::new(R, TagId::List)],
        )
        .await
    }
}
