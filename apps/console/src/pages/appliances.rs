//! # Appliances Page
//!
//! The catalog is fetched once in full and then searched, filtered, sorted
//! and paged locally.
//!
//! ## Actions by Role
//! ```text
//! ┌────────────────────┬──────────┬──────────┐
//! │ Action             │ EMPLOYEE │ CLIENT   │
//! ├────────────────────┼──────────┼──────────┤
//! │ view               │   yes    │   yes    │
//! │ add / edit / delete│   yes    │   no     │
//! │ add to cart        │   no     │   yes    │
//! └────────────────────┴──────────┴──────────┘
//! ```

use appliance_client::list_key;
use appliance_core::access::CatalogPermissions;
use appliance_core::listing::{ApplianceListing, ListView};
use appliance_core::validation::validate_appliance;
use appliance_core::{
    Appliance, ApplianceRequest, Category, Manufacturer, PageRequest, LOOKUP_PAGE_SIZE,
};
use tracing::info;

use super::{check_form, Context, FieldMap, Mounted, QueryState};
use crate::error::{AppError, AppResult};

#[derive(Debug)]
pub struct AppliancesPage {
    ctx: Context,
    pub listing: ApplianceListing,
    pub catalog: QueryState<Vec<Appliance>>,
    /// Choices for the manufacturer filter and the appliance form.
    pub manufacturers: Vec<Manufacturer>,
    pub form_errors: FieldMap,
    mounted: Mounted,
}

impl AppliancesPage {
    /// Opens the page, seeding the category filter from the route.
    pub fn new(ctx: Context, category: Option<Category>) -> Self {
        let mut listing = ApplianceListing::new();
        if category.is_some() {
            listing.set_category(category);
        }
        AppliancesPage {
            ctx,
            listing,
            catalog: QueryState::Idle,
            manufacturers: Vec::new(),
            form_errors: FieldMap::new(),
            mounted: Mounted::default(),
        }
    }

    pub fn permissions(&self) -> AppResult<CatalogPermissions> {
        Ok(CatalogPermissions::for_role(self.ctx.session()?.role))
    }

    pub async fn load(&mut self) -> &QueryState<Vec<Appliance>> {
        self.catalog = QueryState::Loading;
        let lookup = PageRequest::new(0, LOOKUP_PAGE_SIZE);
        let api = &self.ctx.api;

        let result = tokio::try_join!(api.list_appliances(&lookup), api.list_manufacturers(&lookup))
            .map_err(AppError::from);
        match result {
            Ok((appliances, manufacturers)) => {
                self.mounted.replace(
                    api,
                    vec![
                        list_key("/appliances", &lookup),
                        list_key("/manufacturers", &lookup),
                    ],
                );
                self.manufacturers = manufacturers.content;
                self.catalog = QueryState::Ready(appliances.content);
            }
            Err(e) => self.catalog = QueryState::Failed(e),
        }
        &self.catalog
    }

    /// The rows on screen after filters, sort and paging.
    pub fn view(&self) -> ListView<&Appliance> {
        let all = self.catalog.data().map(Vec::as_slice).unwrap_or(&[]);
        self.listing.apply(all)
    }

    pub async fn create(&mut self, form: &ApplianceRequest) -> AppResult<Appliance> {
        self.ctx
            .ensure(self.permissions()?.can_manage, "add appliances")?;
        check_form(validate_appliance(form), &mut self.form_errors)?;

        let result = self.ctx.api.create_appliance(form).await;
        let created = self.submit(result)?;
        info!(id = created.id, name = %created.name, "Appliance created");
        self.ctx.notify.success("Appliance created successfully");
        Ok(created)
    }

    pub async fn update(&mut self, id: i64, form: &ApplianceRequest) -> AppResult<Appliance> {
        self.ctx
            .ensure(self.permissions()?.can_manage, "edit appliances")?;
        check_form(validate_appliance(form), &mut self.form_errors)?;

        let result = self.ctx.api.update_appliance(id, form).await;
        let updated = self.submit(result)?;
        self.ctx.notify.success("Appliance updated successfully");
        Ok(updated)
    }

    pub async fn delete(&mut self, id: i64) -> AppResult<()> {
        self.ctx
            .ensure(self.permissions()?.can_manage, "delete appliances")?;
        self.ctx
            .api
            .delete_appliance(id)
            .await
            .map_err(|e| self.ctx.report(e))?;
        self.ctx.notify.success("Appliance deleted successfully");
        Ok(())
    }

    fn submit<T>(&mut self, result: appliance_client::ClientResult<T>) -> AppResult<T> {
        result.map_err(|e| {
            let err = AppError::from(e);
            self.form_errors.clone_from(&err.field_errors);
            self.ctx.report(err)
        })
    }

    pub fn add_to_cart(&self, appliance: &Appliance) -> AppResult<()> {
        self.ctx
            .ensure(self.permissions()?.can_add_to_cart, "order appliances")?;
        self.ctx
            .cart
            .add(appliance.clone())
            .map_err(|e| self.ctx.report(e))?;
        self.ctx.notify.success("Item added to cart");
        Ok(())
    }

    pub async fn refresh_if_stale(&mut self) -> bool {
        if !self.mounted.needs_refresh() {
            return false;
        }
        self.load().await;
        true
    }
}
