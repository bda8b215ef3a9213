//! # Backend API
//!
//! One method per REST endpoint, grouped by resource. Reads go through the
//! [`QueryCache`]; mutations call the backend directly and then invalidate
//! the tags they touch.
//!
//! ## Read / Mutate Split
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  read(key, provides)                 mutate(call, invalidates)          │
//! │       │                                   │                             │
//! │       ▼                                   ▼                             │
//! │  QueryCache::query ──► retry? ──► GET     POST/PUT/DELETE               │
//! │       │                                   │                             │
//! │       ▼                                   ▼ (only on success)           │
//! │  typed value                         QueryCache::invalidate(tags)       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use appliance_core::PageRequest;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};

use crate::cache::{QueryCache, QueryKey, Subscription, Tag};
use crate::config::ConsoleConfig;
use crate::error::ClientResult;
use crate::http::HttpClient;
use crate::retry::{maybe_retry, RetryPolicy};
use crate::session::{AuthEvents, TokenSource};

pub mod appliances;
pub mod auth;
pub mod clients;
pub mod employees;
pub mod locale;
pub mod manufacturers;
pub mod orders;
pub mod profile;

/// Handle to the backend: transport, cache and retry policy.
///
/// Cheap to clone; clones share the cache.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: HttpClient,
    cache: QueryCache,
    retry: RetryPolicy,
}

impl ApiClient {
    pub fn new(
        config: &ConsoleConfig,
        tokens: Arc<dyn TokenSource>,
        events: Arc<dyn AuthEvents>,
    ) -> ClientResult<Self> {
        Self::with_cache(config, QueryCache::new(config.keep_unused()), tokens, events)
    }

    /// Builds a client on an existing cache, so the caller can reach the
    /// same cache from its session hooks.
    pub fn with_cache(
        config: &ConsoleConfig,
        cache: QueryCache,
        tokens: Arc<dyn TokenSource>,
        events: Arc<dyn AuthEvents>,
    ) -> ClientResult<Self> {
        Ok(ApiClient {
            http: HttpClient::new(config, tokens, events)?,
            cache,
            retry: RetryPolicy::from(&config.retry),
        })
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// Watches a query a page renders; see [`QueryCache::subscribe`].
    pub fn subscribe(&self, key: QueryKey) -> Subscription {
        self.cache.subscribe(key)
    }

    /// Cached GET of `key`.
    pub(crate) async fn read<T, P>(&self, key: QueryKey, provides: P) -> ClientResult<T>
    where
        T: DeserializeOwned,
        P: FnOnce(&Value) -> Vec<Tag>,
    {
        let http = &self.http;
        let policy = self.retry;
        let endpoint = key.endpoint.clone();
        let params = key.params.clone();

        self.cache
            .query(
                key,
                move || async move {
                    maybe_retry(policy, || http.get_value(&endpoint, &params)).await
                },
                provides,
            )
            .await
    }

    /// Runs a mutation and invalidates `tags` when it succeeds.
    pub(crate) async fn mutate<T, Fut>(&self, what: &str, call: Fut, tags: Vec<Tag>) -> ClientResult<T>
    where
        Fut: std::future::Future<Output = ClientResult<T>>,
    {
        match call.await {
            Ok(value) => {
                debug!(what, "Mutation succeeded");
                self.cache.invalidate(&tags);
                Ok(value)
            }
            Err(e) => {
                error!(what, error = %e, "Mutation failed");
                Err(e)
            }
        }
    }
}

// =============================================================================
// Query Keys
// =============================================================================
//
// Pages build the same keys to subscribe to what they render.

/// `GET {endpoint}?page&size&sort`
pub fn list_key(endpoint: &str, page: &PageRequest) -> QueryKey {
    QueryKey::with_params(endpoint, page.query_pairs())
}

/// `GET {endpoint}/search?query&page&size`
pub fn search_key(endpoint: &str, query: &str, page: u32, size: u32) -> QueryKey {
    QueryKey::with_params(
        format!("{}/search", endpoint),
        vec![
            ("query".to_string(), query.to_string()),
            ("page".to_string(), page.to_string()),
            ("size".to_string(), size.to_string()),
        ],
    )
}

/// `GET {endpoint}?page&size` for the filtered list endpoints.
pub fn paged_key(endpoint: impl Into<String>, page: u32, size: u32) -> QueryKey {
    QueryKey::with_params(
        endpoint,
        vec![
            ("page".to_string(), page.to_string()),
            ("size".to_string(), size.to_string()),
        ],
    )
}
