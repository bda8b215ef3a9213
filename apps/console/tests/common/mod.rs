//! In-process mock of the appliance backend for console flows.
//!
//! Issues real HS256 tokens so the console's expiry checks pass, and keeps
//! every order body it receives.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use appliance_client::ConsoleConfig;
use appliance_console::App;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use tempfile::TempDir;

pub const PASSWORD: &str = "Secret1!";
pub const CLIENT_EMAIL: &str = "ann@shop.com";
pub const STAFF_EMAIL: &str = "bob@shop.com";

#[derive(Default)]
pub struct Backend {
    order_bodies: Mutex<Vec<Value>>,
    revoked: AtomicBool,
}

impl Backend {
    pub fn order_bodies(&self) -> Vec<Value> {
        self.order_bodies.lock().unwrap().clone()
    }

    /// Every authenticated call answers 401 from now on.
    pub fn revoke_sessions(&self) {
        self.revoked.store(true, Ordering::SeqCst);
    }

    fn check(&self, headers: &HeaderMap) -> Result<(), Response> {
        let bearer = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("Bearer "));
        if bearer && !self.revoked.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err((
                StatusCode::UNAUTHORIZED,
                Json(json!({ "status": 401, "message": "Full authentication is required" })),
            )
                .into_response())
        }
    }
}

/// Starts the mock and returns its `/api` base URL.
pub async fn spawn_backend() -> (String, Arc<Backend>) {
    let backend = Arc::new(Backend::default());

    let api = Router::new()
        .route("/auth/login", post(login))
        .route("/appliances", get(list_appliances))
        .route("/manufacturers", get(list_manufacturers))
        .route("/orders", get(list_orders).post(create_order))
        .route("/orders/client/{id}", get(client_orders))
        .route("/profile", get(profile))
        .with_state(backend.clone());
    let app = Router::new().nest("/api", api);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/api", addr), backend)
}

/// Boots an app against `base_url` with its storage in a temp dir.
pub fn boot(base_url: &str) -> (App, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let mut config = ConsoleConfig::with_base_url(base_url);
    config.storage.path = Some(dir.path().join("storage.json"));
    let app = App::bootstrap(config).unwrap();
    (app, dir)
}

fn token(email: &str) -> String {
    #[derive(serde::Serialize)]
    struct Claims<'a> {
        sub: &'a str,
        exp: i64,
    }
    encode(
        &Header::default(),
        &Claims {
            sub: email,
            exp: Utc::now().timestamp() + 3600,
        },
        &EncodingKey::from_secret(b"mock-secret"),
    )
    .unwrap()
}

fn page(content: Vec<Value>) -> Value {
    let total = content.len();
    json!({
        "content": content,
        "totalElements": total,
        "totalPages": 1,
        "size": 10,
        "number": 0,
        "first": true,
        "last": true
    })
}

fn manufacturer() -> Value {
    json!({ "id": 1, "name": "Bosch", "address": "1 Main Street", "country": "DE" })
}

fn appliance(id: i64, name: &str, price: f64) -> Value {
    json!({
        "id": id,
        "name": name,
        "category": "BIG",
        "model": format!("M-{}", id),
        "manufacturer": manufacturer(),
        "powerType": "AC220",
        "power": 1200,
        "price": price
    })
}

async fn login(Json(body): Json<Value>) -> Response {
    let email = body["email"].as_str().unwrap_or_default().to_string();
    let (role, user_id) = match email.as_str() {
        CLIENT_EMAIL => ("CLIENT", 7),
        STAFF_EMAIL => ("EMPLOYEE", 3),
        _ => ("", 0),
    };
    if role.is_empty() || body["password"] != PASSWORD {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "status": 401, "message": "Bad credentials" })),
        )
            .into_response();
    }
    Json(json!({
        "token": token(&email),
        "type": "Bearer",
        "email": email,
        "role": role,
        "userId": user_id,
        "firstName": "Ann",
        "lastName": "Lee"
    }))
    .into_response()
}

async fn list_appliances(State(backend): State<Arc<Backend>>, headers: HeaderMap) -> Response {
    if let Err(denied) = backend.check(&headers) {
        return denied;
    }
    Json(page(vec![
        appliance(1, "Fridge", 100.0),
        appliance(2, "Oven", 250.0),
    ]))
    .into_response()
}

async fn list_manufacturers(State(backend): State<Arc<Backend>>, headers: HeaderMap) -> Response {
    if let Err(denied) = backend.check(&headers) {
        return denied;
    }
    Json(page(vec![manufacturer()])).into_response()
}

async fn list_orders(State(backend): State<Arc<Backend>>, headers: HeaderMap) -> Response {
    if let Err(denied) = backend.check(&headers) {
        return denied;
    }
    Json(page(Vec::new())).into_response()
}

async fn client_orders(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    if let Err(denied) = backend.check(&headers) {
        return denied;
    }
    let orders: Vec<Value> = backend
        .order_bodies()
        .iter()
        .enumerate()
        .filter(|(_, body)| body["clientId"] == id)
        .map(|(i, body)| json!({ "id": i + 1, "clientId": body["clientId"], "approved": false }))
        .collect();
    Json(page(orders)).into_response()
}

async fn create_order(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(denied) = backend.check(&headers) {
        return denied;
    }
    let mut bodies = backend.order_bodies.lock().unwrap();
    bodies.push(body.clone());
    Json(json!({
        "id": bodies.len(),
        "clientId": body["clientId"],
        "approved": false,
        "orderRows": [],
        "totalAmount": 300.0
    }))
    .into_response()
}

async fn profile(State(backend): State<Arc<Backend>>, headers: HeaderMap) -> Response {
    if let Err(denied) = backend.check(&headers) {
        return denied;
    }
    Json(json!({
        "id": 7,
        "email": CLIENT_EMAIL,
        "firstName": "Ann",
        "lastName": "Lee",
        "phone": "+380501234567",
        "address": "12 Green Street"
    }))
    .into_response()
}
