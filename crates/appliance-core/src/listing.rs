//! # Listing
//!
//! Client-side list shaping: filtering, sorting and paging of records that
//! are already in memory.
//!
//! ## Appliance Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  Appliance List Pipeline                                │
//! │                                                                         │
//! │  all appliances (size 1000 fetch)                                       │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  search ──► category ──► power type ──► manufacturer     (filter)      │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  sort by name | category | powerType | price | manufacturer, asc/desc  │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  slice [page × rows, page × rows + rows)                   (paginate)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! None of this state is persisted: it lives as long as the page does.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::types::{Appliance, Category, Order, PowerType};
use crate::DEFAULT_PAGE_SIZE;

// =============================================================================
// Pagination
// =============================================================================

/// Page index and rows-per-page of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub rows_per_page: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Pagination {
            page: 0,
            rows_per_page: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    pub fn set_page(&mut self, page: u32) {
        self.page = page;
    }

    /// Changing the page size always goes back to the first page.
    pub fn set_rows_per_page(&mut self, rows: u32) {
        self.rows_per_page = rows.max(1);
        self.page = 0;
    }

    pub fn reset(&mut self) {
        self.page = 0;
    }

    /// Slice of `items` shown on the current page.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = (self.page as usize).saturating_mul(self.rows_per_page as usize);
        if start >= items.len() {
            return &[];
        }
        let end = (start + self.rows_per_page as usize).min(items.len());
        &items[start..end]
    }

    /// Number of pages needed for `total` rows.
    pub fn page_count(&self, total: usize) -> u32 {
        let rows = self.rows_per_page.max(1) as usize;
        total.div_ceil(rows) as u32
    }
}

/// One rendered page of a client-side list.
#[derive(Debug, Clone, PartialEq)]
pub struct ListView<T> {
    pub rows: Vec<T>,
    /// Rows matching the filters across all pages.
    pub total: usize,
    pub page: u32,
    pub page_count: u32,
}

// =============================================================================
// Sorting
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    #[default]
    Name,
    Category,
    PowerType,
    Price,
    Manufacturer,
}

/// Active sort column and direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub field: SortField,
    pub order: SortOrder,
}

impl Sort {
    /// Header click: the same column ascending flips to descending, any
    /// other click sorts the new column ascending.
    pub fn toggle(&mut self, field: SortField) {
        self.order = if self.field == field && self.order == SortOrder::Asc {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        };
        self.field = field;
    }

    fn compare(&self, a: &Appliance, b: &Appliance) -> Ordering {
        let ord = match self.field {
            SortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortField::Category => a.category.as_str().cmp(b.category.as_str()),
            SortField::PowerType => a.power_type.as_str().cmp(b.power_type.as_str()),
            SortField::Price => a.price.cmp(&b.price),
            SortField::Manufacturer => a
                .manufacturer_name()
                .to_lowercase()
                .cmp(&b.manufacturer_name().to_lowercase()),
        };
        match self.order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    }
}

// =============================================================================
// Appliance Filter
// =============================================================================

/// Filters of the appliance list. `None` means "ALL".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplianceFilter {
    pub search: String,
    pub category: Option<Category>,
    pub power_type: Option<PowerType>,
    pub manufacturer_id: Option<i64>,
}

impl ApplianceFilter {
    pub fn matches(&self, appliance: &Appliance) -> bool {
        let needle = self.search.trim().to_lowercase();
        if !needle.is_empty() && !appliance.name.to_lowercase().contains(&needle) {
            return false;
        }
        if self.category.is_some_and(|c| c != appliance.category) {
            return false;
        }
        if self.power_type.is_some_and(|p| p != appliance.power_type) {
            return false;
        }
        if self
            .manufacturer_id
            .is_some_and(|m| Some(m) != appliance.manufacturer_id())
        {
            return false;
        }
        true
    }

    pub fn is_active(&self) -> bool {
        !self.search.trim().is_empty()
            || self.category.is_some()
            || self.power_type.is_some()
            || self.manufacturer_id.is_some()
    }
}

// =============================================================================
// View Mode
// =============================================================================

/// Table or card grid. Each mode has its own natural page size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Table,
    Grid,
}

impl ViewMode {
    pub fn rows_per_page(&self) -> u32 {
        match self {
            ViewMode::Table => DEFAULT_PAGE_SIZE,
            ViewMode::Grid => 12,
        }
    }
}

// =============================================================================
// Appliance Listing
// =============================================================================

/// Complete local state of the appliance list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplianceListing {
    filter: ApplianceFilter,
    sort: Sort,
    pagination: Pagination,
    view_mode: ViewMode,
}

impl ApplianceListing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the category filter from a `?category=` query parameter.
    /// Values other than `BIG`/`SMALL` are ignored.
    pub fn with_category_param(mut self, param: Option<&str>) -> Self {
        if let Some(category) = param.and_then(|p| match p {
            "BIG" => Some(Category::Big),
            "SMALL" => Some(Category::Small),
            _ => None,
        }) {
            self.filter.category = Some(category);
        }
        self
    }

    pub fn filter(&self) -> &ApplianceFilter {
        &self.filter
    }

    pub fn sort(&self) -> Sort {
        self.sort
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.filter.search = search.into();
        self.pagination.reset();
    }

    pub fn set_category(&mut self, category: Option<Category>) {
        self.filter.category = category;
        self.pagination.reset();
    }

    pub fn set_power_type(&mut self, power_type: Option<PowerType>) {
        self.filter.power_type = power_type;
        self.pagination.reset();
    }

    pub fn set_manufacturer(&mut self, manufacturer_id: Option<i64>) {
        self.filter.manufacturer_id = manufacturer_id;
        self.pagination.reset();
    }

    pub fn clear_filters(&mut self) {
        self.filter = ApplianceFilter::default();
        self.pagination.reset();
    }

    pub fn toggle_sort(&mut self, field: SortField) {
        self.sort.toggle(field);
    }

    pub fn set_page(&mut self, page: u32) {
        self.pagination.set_page(page);
    }

    pub fn set_rows_per_page(&mut self, rows: u32) {
        self.pagination.set_rows_per_page(rows);
    }

    /// Switching view mode resets paging to that mode's page size.
    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
        self.pagination.set_rows_per_page(mode.rows_per_page());
    }

    /// Runs the filter → sort → paginate pipeline.
    pub fn apply<'a>(&self, appliances: &'a [Appliance]) -> ListView<&'a Appliance> {
        let mut matched: Vec<&Appliance> =
            appliances.iter().filter(|a| self.filter.matches(a)).collect();
        matched.sort_by(|a, b| self.sort.compare(a, b));

        let total = matched.len();
        ListView {
            rows: self.pagination.slice(&matched).to_vec(),
            total,
            page: self.pagination.page,
            page_count: self.pagination.page_count(total),
        }
    }
}

// =============================================================================
// Order Filter
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Approved,
    Pending,
}

/// Client-side filters applied to the current page of orders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderFilter {
    pub status: StatusFilter,
    pub client_id: Option<i64>,
    pub employee_id: Option<i64>,
}

impl OrderFilter {
    pub fn matches(&self, order: &Order) -> bool {
        let status_ok = match self.status {
            StatusFilter::All => true,
            StatusFilter::Approved => order.approved,
            StatusFilter::Pending => !order.approved,
        };
        status_ok
            && self.client_id.map_or(true, |id| order.client_id() == Some(id))
            && self.employee_id.map_or(true, |id| order.employee_id() == Some(id))
    }

    pub fn apply<'a>(&self, orders: &'a [Order]) -> Vec<&'a Order> {
        orders.iter().filter(|o| self.matches(o)).collect()
    }

    pub fn is_active(&self) -> bool {
        self.status != StatusFilter::All || self.client_id.is_some() || self.employee_id.is_some()
    }

    pub fn clear(&mut self) {
        *self = OrderFilter::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::tests::appliance;
    use crate::money::Money;
    use crate::types::Manufacturer;

    fn catalog() -> Vec<Appliance> {
        let mut a = appliance(1, 30_000);
        a.name = "Washer".into();
        a.category = Category::Big;
        let mut b = appliance(2, 5_000);
        b.name = "kettle".into();
        b.power_type = PowerType::Accumulator;
        let mut c = appliance(3, 12_000);
        c.name = "Dishwasher".into();
        c.category = Category::Big;
        c.manufacturer = Some(Manufacturer {
            id: 2,
            name: "Bosch".into(),
            address: "Street 5".into(),
            country: "DE".into(),
        });
        vec![a, b, c]
    }

    #[test]
    fn test_search_is_case_insensitive_on_name() {
        let items = catalog();
        let mut listing = ApplianceListing::new();
        listing.set_search("WASH");
        let view = listing.apply(&items);
        assert_eq!(view.total, 2);
    }

    #[test]
    fn test_filters_combine() {
        let items = catalog();
        let mut listing = ApplianceListing::new();
        listing.set_category(Some(Category::Big));
        listing.set_manufacturer(Some(2));
        let view = listing.apply(&items);
        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.rows[0].id, 3);

        listing.clear_filters();
        listing.set_power_type(Some(PowerType::Accumulator));
        assert_eq!(listing.apply(&items).rows[0].id, 2);
    }

    #[test]
    fn test_sort_toggle_and_price_desc() {
        let items = catalog();
        let mut listing = ApplianceListing::new();

        let names: Vec<_> = listing.apply(&items).rows.iter().map(|a| a.id).collect();
        assert_eq!(names, vec![3, 2, 1]); // dishwasher, kettle, washer

        listing.toggle_sort(SortField::Price);
        listing.toggle_sort(SortField::Price);
        assert_eq!(listing.sort().order, SortOrder::Desc);
        let prices: Vec<Money> = listing.apply(&items).rows.iter().map(|a| a.price).collect();
        assert_eq!(prices[0].cents(), 30_000);
    }

    #[test]
    fn test_pagination_slices_and_resets() {
        let items: Vec<Appliance> = (1..=25).map(|i| appliance(i, 100)).collect();
        let mut listing = ApplianceListing::new();
        listing.set_page(2);
        let view = listing.apply(&items);
        assert_eq!(view.rows.len(), 5);
        assert_eq!(view.page_count, 3);

        listing.set_search("appliance");
        assert_eq!(listing.pagination().page, 0);

        listing.set_view_mode(ViewMode::Grid);
        assert_eq!(listing.pagination().rows_per_page, 12);

        listing.set_page(9);
        assert!(listing.apply(&items).rows.is_empty());
    }

    #[test]
    fn test_category_param() {
        let listing = ApplianceListing::new().with_category_param(Some("SMALL"));
        assert_eq!(listing.filter().category, Some(Category::Small));
        let listing = ApplianceListing::new().with_category_param(Some("HUGE"));
        assert_eq!(listing.filter().category, None);
    }

    #[test]
    fn test_order_filter() {
        let json = r#"[
            {"id":1,"clientId":1,"employeeId":7,"approved":true},
            {"id":2,"clientId":1,"approved":false},
            {"id":3,"clientId":2,"approved":false}
        ]"#;
        let orders: Vec<Order> = serde_json::from_str(json).unwrap();

        let mut filter = OrderFilter {
            status: StatusFilter::Pending,
            ..Default::default()
        };
        assert_eq!(filter.apply(&orders).len(), 2);

        filter.client_id = Some(1);
        assert_eq!(filter.apply(&orders)[0].id, 2);
        assert!(filter.is_active());

        filter.clear();
        filter.employee_id = Some(7);
        assert_eq!(filter.apply(&orders)[0].id, 1);
    }
}
