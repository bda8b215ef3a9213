//! # HTTP Transport
//!
//! JSON over HTTP to the appliance backend.
//!
//! ## Request Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Request Pipeline                                 │
//! │                                                                         │
//! │  path + query ──► Url (base_url joined) ──► Authorization: Bearer ...  │
//! │                                                  │                      │
//! │                                                  ▼                      │
//! │                                            reqwest send                 │
//! │                                                  │                      │
//! │                 ┌────────────────────────────────┼──────────────┐       │
//! │                 ▼                                ▼              ▼       │
//! │            2xx: JSON or empty            401 / 403         other error  │
//! │                 │                                │              │       │
//! │                 ▼                                ▼              ▼       │
//! │            decode T                 AuthEvents hook ──► ClientError     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::config::ConsoleConfig;
use crate::error::{ClientError, ClientResult};
use crate::session::{AuthEvents, NoOpEvents, NoToken, TokenSource};

/// Thin JSON client bound to one backend.
#[derive(Clone)]
pub struct HttpClient {
    http: Client,
    base_url: String,
    timeout_secs: u64,
    tokens: Arc<dyn TokenSource>,
    events: Arc<dyn AuthEvents>,
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl HttpClient {
    /// Creates a client reading the session from `tokens` and reporting
    /// rejected sessions to `events`.
    pub fn new(
        config: &ConsoleConfig,
        tokens: Arc<dyn TokenSource>,
        events: Arc<dyn AuthEvents>,
    ) -> ClientResult<Self> {
        config.validate()?;
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ClientError::InvalidConfig(e.to_string()))?;

        Ok(HttpClient {
            http,
            base_url: config.base_url().trim_end_matches('/').to_string(),
            timeout_secs: config.api.timeout_secs,
            tokens,
            events,
        })
    }

    /// Client without a session.
    pub fn anonymous(config: &ConsoleConfig) -> ClientResult<Self> {
        Self::new(config, Arc::new(NoToken), Arc::new(NoOpEvents))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL of an endpoint path with its query string.
    pub fn url(&self, path: &str, query: &[(String, String)]) -> ClientResult<Url> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, path))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.iter());
        }
        Ok(url)
    }

    // =========================================================================
    // Verbs
    // =========================================================================

    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(String, String)]) -> ClientResult<T> {
        let value = self.get_value(path, query).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// GET returning the raw JSON document, as stored by the query cache.
    pub async fn get_value(&self, path: &str, query: &[(String, String)]) -> ClientResult<Value> {
        self.send(Method::GET, path, query, None::<&()>).await
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
        body: Option<&B>,
    ) -> ClientResult<T> {
        let value = self.send(Method::POST, path, query, body).await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> ClientResult<T> {
        let value = self.send(Method::PUT, path, &[], Some(body)).await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn delete(&self, path: &str) -> ClientResult<()> {
        self.send(Method::DELETE, path, &[], None::<&()>).await?;
        Ok(())
    }

    // =========================================================================
    // Pipeline
    // =========================================================================

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<&B>,
    ) -> ClientResult<Value> {
        let url = self.url(path, query)?;
        debug!(%method, %url, "Sending request");

        let mut request = self.http.request(method.clone(), url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let request = self.authorize(request);

        let response = request.send().await.map_err(|e| self.transport_error(e))?;
        let status = response.status().as_u16();
        let text = response.text().await.map_err(|e| self.transport_error(e))?;

        if !(200..300).contains(&status) {
            let err = ClientError::from_status(status, &text);
            if err.is_auth_failure() {
                warn!(status, %method, path, "Session rejected by backend");
                self.events.on_auth_failure(status);
            } else {
                debug!(status, %method, path, error = %err, "Request failed");
            }
            return Err(err);
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.tokens.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn transport_error(&self, err: reqwest::Error) -> ClientError {
        if err.is_timeout() {
            ClientError::Timeout(self.timeout_secs)
        } else {
            ClientError::from(err)
        }
    }
}
