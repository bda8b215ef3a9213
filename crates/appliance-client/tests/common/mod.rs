//! In-process mock of the appliance backend.
//!
//! Serves a handful of endpoints under `/api` on an ephemeral port and counts
//! every hit so tests can tell cache hits from network fetches.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

pub const VALID_TOKEN: &str = "valid-token";
pub const REVOKED_TOKEN: &str = "revoked-token";

#[derive(Default)]
pub struct Backend {
    hits: Mutex<HashMap<String, usize>>,
    authorization: Mutex<Vec<Option<String>>>,
    orders: Mutex<Vec<Value>>,
    manufacturer_failures: AtomicUsize,
}

impl Backend {
    pub fn hits(&self, route: &str) -> usize {
        self.hits
            .lock()
            .unwrap()
            .get(route)
            .copied()
            .unwrap_or(0)
    }

    pub fn last_authorization(&self) -> Option<String> {
        self.authorization.lock().unwrap().last().cloned().flatten()
    }

    /// The next `count` manufacturer list calls answer 503.
    pub fn fail_manufacturers(&self, count: usize) {
        self.manufacturer_failures.store(count, Ordering::SeqCst);
    }

    fn record(&self, route: &str, headers: &HeaderMap) {
        *self.hits.lock().unwrap().entry(route.to_string()).or_insert(0) += 1;
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.authorization.lock().unwrap().push(auth);
    }
}

/// Starts the mock and returns its `/api` base URL.
pub async fn spawn_backend() -> (String, Arc<Backend>) {
    let backend = Arc::new(Backend::default());

    let api = Router::new()
        .route("/auth/login", post(login))
        .route("/appliances", get(list_appliances))
        .route("/manufacturers", get(list_manufacturers).post(create_manufacturer))
        .route("/orders", get(list_orders).post(create_order))
        .route("/orders/{id}/approve", post(approve_order))
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

pub fn appliance(id: i64, name: &str, price: f64) -> Value {
    json!({
        "id": id,
        "name": name,
        "category": "BIG",
        "model": "M-1",
        "manufacturer": { "id": 1, "name": "Bosch", "address": "Main St", "country": "DE" },
        "powerType": "AC220",
        "power": 1200,
        "price": price
    })
}

async fn login(State(backend): State<Arc<Backend>>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    backend.record("POST /auth/login", &headers);
    if body["password"] == "Secret1!" {
        Json(json!({
            "token": VALID_TOKEN,
            "type": "Bearer",
            "email": body["email"],
            "role": "EMPLOYEE",
            "userId": 7,
            "firstName": "Ann",
            "lastName": "Lee"
        }))
        .into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "status": 401, "message": "Bad credentials" })),
        )
            .into_response()
    }
}

async fn list_appliances(State(backend): State<Arc<Backend>>, headers: HeaderMap) -> Json<Value> {
    backend.record("GET /appliances", &headers);
    // Long enough for concurrent callers to overlap.
    tokio::time::sleep(Duration::from_millis(50)).await;
    Json(page(vec![
        appliance(1, "Fridge", 499.99),
        appliance(2, "Oven", 350.0),
    ]))
}

async fn list_manufacturers(State(backend): State<Arc<Backend>>, headers: HeaderMap) -> Response {
    backend.record("GET /manufacturers", &headers);
    let remaining = backend.manufacturer_failures.load(Ordering::SeqCst);
    if remaining > 0 {
        backend
            .manufacturer_failures
            .store(remaining - 1, Ordering::SeqCst);
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }
    Json(page(vec![json!({ "id": 1, "name": "Bosch", "address": "Main St", "country": "DE" })]))
        .into_response()
}

async fn create_manufacturer(State(backend): State<Arc<Backend>>, headers: HeaderMap) -> Response {
    backend.record("POST /manufacturers", &headers);
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "status": 400,
            "error": "Bad Request",
            "message": "Validation failed",
            "validationErrors": { "name": "must not be blank" }
        })),
    )
        .into_response()
}

async fn list_orders(State(backend): State<Arc<Backend>>, headers: HeaderMap) -> Json<Value> {
    backend.record("GET /orders", &headers);
    let orders = backend.orders.lock().unwrap().clone();
    Json(page(orders))
}

async fn create_order(State(backend): State<Arc<Backend>>, headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
    backend.record("POST /orders", &headers);
    let mut orders = backend.orders.lock().unwrap();
    let order = json!({
        "id": orders.len() as i64 + 1,
        "clientId": body["clientId"],
        "approved": false,
        "orderRows": [],
        "totalAmount": 0
    });
    orders.push(order.clone());
    Json(order)
}

async fn approve_order(State(backend): State<Arc<Backend>>, headers: HeaderMap, Path(id): Path<i64>) -> Json<Value> {
    backend.record("POST /orders/{id}/approve", &headers);
    let mut orders = backend.orders.lock().unwrap();
    for order in orders.iter_mut() {
        if order["id"] == id {
            order["approved"] = json!(true);
            order["employeeId"] = json!(7);
        }
    }
    Json(json!({ "id": id, "approved": true, "employeeId": 7, "orderRows": [] }))
}

async fn profile(State(backend): State<Arc<Backend>>, headers: HeaderMap) -> Response {
    backend.record("GET /profile", &headers);
    let expected = format!("Bearer {}", VALID_TOKEN);
    match headers.get("authorization").and_then(|v| v.to_str().ok()) {
        Some(value) if value == expected => Json(json!({
            "id": 7,
            "email": "ann@shop.com",
            "firstName": "Ann",
            "lastName": "Lee",
            "position": "Manager"
        }))
        .into_response(),
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "status": 401, "message": "Token expired" })),
        )
            .into_response(),
    }
}
