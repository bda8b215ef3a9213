//! # Domain Types
//!
//! Entities and DTOs mirrored from the appliance backend.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  Manufacturer   │◄──│    Appliance    │◄──│    OrderRow     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  name           │   │  category       │   │  quantity ≥ 1   │       │
//! │  │  address        │   │  powerType      │   │  amount (2 dp)  │       │
//! │  │  country        │   │  price          │   └────────┬────────┘       │
//! │  └─────────────────┘   └─────────────────┘            │                │
//! │                                                       ▼                │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Employee     │◄──│      Order      │──►│     Client      │       │
//! │  │  position       │   │  approved       │   │  phone, address │       │
//! │  └─────────────────┘   │  totalAmount    │   │  card?          │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Conventions
//! - Field names are camelCase
//! - Enum values are SCREAMING_SNAKE_CASE (`BIG`, `AC220`, `EMPLOYEE`)
//! - Money is a decimal number with two fractional digits
//! - Ids are backend-assigned `i64`s

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::money::Money;

fn not_allowed(field: &str, allowed: &[&str]) -> ValidationError {
    ValidationError::NotAllowed {
        field: field.to_string(),
        allowed: allowed.iter().map(|s| s.to_string()).collect(),
    }
}

// =============================================================================
// Enums
// =============================================================================

/// Appliance size class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Big,
    Small,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Big, Category::Small];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Big => "BIG",
            Category::Small => "SMALL",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "BIG" => Ok(Category::Big),
            "SMALL" => Ok(Category::Small),
            _ => Err(not_allowed("category", &["BIG", "SMALL"])),
        }
    }
}

/// How an appliance is powered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PowerType {
    #[serde(rename = "AC220")]
    Ac220,
    #[serde(rename = "AC110")]
    Ac110,
    #[serde(rename = "ACCUMULATOR")]
    Accumulator,
}

impl PowerType {
    pub const ALL: [PowerType; 3] = [PowerType::Ac220, PowerType::Ac110, PowerType::Accumulator];

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerType::Ac220 => "AC220",
            PowerType::Ac110 => "AC110",
            PowerType::Accumulator => "ACCUMULATOR",
        }
    }
}

impl fmt::Display for PowerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PowerType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "AC220" => Ok(PowerType::Ac220),
            "AC110" => Ok(PowerType::Ac110),
            "ACCUMULATOR" => Ok(PowerType::Accumulator),
            _ => Err(not_allowed("powerType", &["AC220", "AC110", "ACCUMULATOR"])),
        }
    }
}

/// Role carried by the session token.
///
/// ## Capabilities
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  CLIENT                           │  EMPLOYEE                           │
/// │  ───────                          │  ─────────                          │
/// │  • Browse appliances              │  • Everything a client can view     │
/// │  • Cart + checkout                │  • Manage appliances/manufacturers  │
/// │  • Own orders (edit until         │  • Manage clients/employees         │
/// │    approved)                      │  • Create orders for any client     │
/// │                                   │  • Approve orders                   │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Employee,
    Client,
}

impl UserRole {
    pub const ALL: [UserRole; 2] = [UserRole::Employee, UserRole::Client];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Employee => "EMPLOYEE",
            UserRole::Client => "CLIENT",
        }
    }

    pub fn is_employee(&self) -> bool {
        matches!(self, UserRole::Employee)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = ValidationError;

    /// Accepts both `EMPLOYEE` and the Spring-style `ROLE_EMPLOYEE`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_uppercase();
        match upper.strip_prefix("ROLE_").unwrap_or(&upper) {
            "EMPLOYEE" => Ok(UserRole::Employee),
            "CLIENT" => Ok(UserRole::Client),
            _ => Err(not_allowed("role", &["EMPLOYEE", "CLIENT"])),
        }
    }
}

// =============================================================================
// Entities
// =============================================================================

/// A company producing appliances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manufacturer {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub country: String,
}

/// A sellable appliance.
///
/// The backend nests the full manufacturer; older payloads only carry
/// `manufacturerId`. Both are accepted and [`Appliance::manufacturer_id`]
/// hides the difference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appliance {
    pub id: i64,
    pub name: String,
    pub category: Category,
    #[serde(default)]
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<Manufacturer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer_id: Option<i64>,
    pub power_type: PowerType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub characteristic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power: Option<i32>,
    pub price: Money,
}

impl Appliance {
    /// Manufacturer id from the nested record or the flat reference.
    pub fn manufacturer_id(&self) -> Option<i64> {
        self.manufacturer
            .as_ref()
            .map(|m| m.id)
            .or(self.manufacturer_id)
    }

    /// Manufacturer display name, empty when unknown.
    pub fn manufacturer_name(&self) -> &str {
        self.manufacturer
            .as_ref()
            .map(|m| m.name.as_str())
            .unwrap_or("")
    }
}

/// A customer account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card: Option<String>,
}

impl Client {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A staff account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub position: String,
}

impl Employee {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// One line of an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRow {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appliance: Option<Appliance>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appliance_id: Option<i64>,
    pub quantity: i64,
    pub amount: Money,
}

impl OrderRow {
    pub fn appliance_id(&self) -> Option<i64> {
        self.appliance.as_ref().map(|a| a.id).or(self.appliance_id)
    }
}

/// A client's purchase request.
///
/// ## Lifecycle
/// ```text
/// created (approved=false) ──► edited/deleted freely ──► approved=true
///                                                           │
///                                                           ▼
///                                                  read-only in the UI
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<Client>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee: Option<Employee>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<i64>,
    #[serde(default)]
    pub approved: bool,
    #[serde(default)]
    pub order_rows: Vec<OrderRow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<Money>,
}

impl Order {
    pub fn client_id(&self) -> Option<i64> {
        self.client.as_ref().map(|c| c.id).or(self.client_id)
    }

    pub fn employee_id(&self) -> Option<i64> {
        self.employee.as_ref().map(|e| e.id).or(self.employee_id)
    }

    /// Backend total when present, otherwise the sum of row amounts.
    pub fn total(&self) -> Money {
        self.total_amount
            .unwrap_or_else(|| self.order_rows.iter().map(|r| r.amount).sum())
    }

    /// Unapproved orders can still be edited or deleted.
    pub fn is_mutable(&self) -> bool {
        !self.approved
    }
}

// =============================================================================
// Paging
// =============================================================================

/// Spring-style page envelope.
///
/// The backend has shipped both `size`/`number` and `pageSize`/`pageNumber`;
/// both spellings are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    pub content: Vec<T>,
    #[serde(default)]
    pub total_elements: u64,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default, alias = "pageSize")]
    pub size: u32,
    #[serde(default, alias = "pageNumber")]
    pub number: u32,
    #[serde(default)]
    pub first: bool,
    #[serde(default)]
    pub last: bool,
}

impl<T> PageResponse<T> {
    /// An empty first page.
    pub fn empty(size: u32) -> Self {
        PageResponse {
            content: Vec::new(),
            total_elements: 0,
            total_pages: 0,
            size,
            number: 0,
            first: true,
            last: true,
        }
    }
}

/// Paging parameters sent as query string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
    pub sort: Option<String>,
}

impl PageRequest {
    pub fn new(page: u32, size: u32) -> Self {
        PageRequest {
            page,
            size,
            sort: Some(DEFAULT_SORT.to_string()),
        }
    }

    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    /// Query pairs in the order the backend documents them.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("page".to_string(), self.page.to_string()),
            ("size".to_string(), self.size.to_string()),
        ];
        if let Some(sort) = &self.sort {
            pairs.push(("sort".to_string(), sort.clone()));
        }
        pairs
    }
}

/// Default sort of every list endpoint.
pub const DEFAULT_SORT: &str = "id,asc";

impl Default for PageRequest {
    fn default() -> Self {
        PageRequest::new(0, crate::DEFAULT_PAGE_SIZE)
    }
}

// =============================================================================
// Auth DTOs
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful login payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JwtResponse {
    pub token: String,
    #[serde(rename = "type", default = "default_token_type")]
    pub token_type: String,
    pub email: String,
    pub role: String,
    pub user_id: i64,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientRegistration {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRegistration {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub position: String,
}

// =============================================================================
// Resource Request DTOs
// =============================================================================

/// Create/update payload for a client. Password is optional on update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientRequest {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card: Option<String>,
}

impl From<&Client> for ClientRequest {
    fn from(client: &Client) -> Self {
        ClientRequest {
            email: client.email.clone(),
            password: None,
            first_name: client.first_name.clone(),
            last_name: client.last_name.clone(),
            phone: client.phone.clone(),
            address: client.address.clone(),
            card: client.card.clone(),
        }
    }
}

/// Create/update payload for an employee. Password is optional on update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRequest {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub position: String,
}

impl From<&Employee> for EmployeeRequest {
    fn from(employee: &Employee) -> Self {
        EmployeeRequest {
            email: employee.email.clone(),
            password: None,
            first_name: employee.first_name.clone(),
            last_name: employee.last_name.clone(),
            position: employee.position.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManufacturerRequest {
    pub name: String,
    pub address: String,
    pub country: String,
}

impl From<&Manufacturer> for ManufacturerRequest {
    fn from(m: &Manufacturer) -> Self {
        ManufacturerRequest {
            name: m.name.clone(),
            address: m.address.clone(),
            country: m.country.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplianceRequest {
    pub name: String,
    pub category: Category,
    pub model: String,
    pub manufacturer_id: i64,
    pub power_type: PowerType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub characteristic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power: Option<i32>,
    pub price: Money,
}

/// One line of an order-creation or order-update request.
///
/// `amount` is omitted by cart checkout (the backend derives it) and sent
/// by the order dialogs, which compute it client-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRowRequest {
    pub appliance_id: i64,
    pub quantity: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Money>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub client_id: i64,
    pub order_rows: Vec<OrderRowRequest>,
}

// =============================================================================
// Profile
// =============================================================================

/// The logged-in user's own record.
///
/// `/profile` returns a client or an employee shape depending on the role;
/// the role-specific fields are optional here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
}

impl Profile {
    /// Infers the role from which shape the backend returned.
    pub fn role(&self) -> UserRole {
        if self.position.is_some() {
            UserRole::Employee
        } else {
            UserRole::Client
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
}

impl From<&Profile> for ProfileUpdate {
    fn from(p: &Profile) -> Self {
        ProfileUpdate {
            first_name: p.first_name.clone(),
            last_name: p.last_name.clone(),
            email: p.email.clone(),
            password: None,
            phone: p.phone.clone(),
            address: p.address.clone(),
            card: p.card.clone(),
            position: p.position.clone(),
        }
    }
}

// =============================================================================
// Locale
// =============================================================================

/// UI languages supported by the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Uk,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Uk => "uk",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "en" => Ok(Language::En),
            "uk" | "ua" => Ok(Language::Uk),
            _ => Err(not_allowed("lang", &["en", "uk"])),
        }
    }
}

/// `GET /locale/current`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocaleInfo {
    pub locale: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub display_name: String,
}

/// `GET /locale/languages`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageList {
    pub languages: BTreeMap<String, String>,
    pub current: String,
}

/// Translation bundle groups served by `/locale/translations/{category}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslationCategory {
    Menu,
    Button,
    Appliance,
    Order,
    Client,
    Employee,
    Manufacturer,
}

impl TranslationCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TranslationCategory::Menu => "menu",
            TranslationCategory::Button => "button",
            TranslationCategory::Appliance => "appliance",
            TranslationCategory::Order => "order",
            TranslationCategory::Client => "client",
            TranslationCategory::Employee => "employee",
            TranslationCategory::Manufacturer => "manufacturer",
        }
    }
}

/// Key → translated text.
pub type Translations = BTreeMap<String, String>;

// =============================================================================
// Unit Tests
// =============================================================================
