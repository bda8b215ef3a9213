//! # appliance-client: Backend Access for the Appliance Console
//!
//! REST client, query cache and session seams.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Client Architecture                               │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                    ApiClient (api/*)                             │  │
//! │  │                                                                  │  │
//! │  │  auth • appliances • manufacturers • clients • employees        │  │
//! │  │  orders • profile • locale                                       │  │
//! │  └────────────────────────────┬─────────────────────────────────────┘  │
//! │                               │                                         │
//! │         ┌─────────────────────┼─────────────────────┐                  │
//! │         ▼                     ▼                     ▼                   │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────┐    │
//! │  │  QueryCache    │  │  HttpClient    │  │  RetryPolicy           │    │
//! │  │                │  │                │  │                        │    │
//! │  │ Keyed entries  │  │ reqwest, JSON  │  │ Exponential backoff    │    │
//! │  │ Tags, prune    │  │ Bearer token   │  │ for reads when enabled │    │
//! │  │ Subscriptions  │  │ 401/403 hook   │  │                        │    │
//! │  └────────────────┘  └────────────────┘  └────────────────────────┘    │
//! │                                                                         │
//! │  SEAMS (implemented by the console):                                   │
//! │  • TokenSource - current bearer token                                  │
//! │  • AuthEvents  - session rejected by the backend                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`api`] - Endpoint methods on [`ApiClient`]
//! - [`cache`] - Query cache with tag invalidation
//! - [`config`] - Console configuration (TOML + env)
//! - [`error`] - Client error taxonomy
//! - [`http`] - reqwest transport
//! - [`retry`] - Backoff helper
//! - [`session`] - Token source, auth events, JWT expiry

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod http;
pub mod retry;
pub mod session;

pub use api::locale::LocaleChange;
pub use api::{list_key, paged_key, search_key, ApiClient};
pub use cache::{QueryCache, QueryKey, Resource, Subscription, Tag, TagId};
pub use config::ConsoleConfig;
pub use error::{friendly_message, ClientError, ClientResult, ErrorBody};
pub use http::HttpClient;
pub use retry::{retry_with_backoff, RetryPolicy};
pub use session::{is_expired, token_expiry, AuthEvents, MemoryToken, NoOpEvents, NoToken, TokenSource};
