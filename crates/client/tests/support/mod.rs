//! In-process fake backend and image host for black-box tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Multipart, Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{Value, json};

use catalogdesk_client::{AdminApp, ClientConfig, RecordingNotifier};

pub const TOKEN: &str = "test-token";
pub const CLOUD: &str = "demo";
pub const PRESET: &str = "unsigned";

#[derive(Debug, Default)]
pub struct FakeState {
    pub products: Vec<Value>,
    pub orders: Vec<Value>,
    pub next_id: u64,
    /// Answer writes with `success: false`.
    pub reject_writes: bool,
    pub searches: Vec<String>,
    pub uploads: usize,
    pub created: Vec<Value>,
    pub updates: Vec<(String, Value)>,
}

pub type Shared = Arc<Mutex<FakeState>>;

pub struct FakeBackend {
    pub base_url: String,
    pub state: Shared,
    handle: tokio::task::JoinHandle<()>,
}

impl FakeBackend {
    pub async fn spawn() -> Self {
        let state: Shared = Arc::new(Mutex::new(FakeState::default()));
        let app = Router::new()
            .route("/api/products", get(list_products).post(create_product))
            .route(
                "/api/products/:id",
                put(update_product).delete(delete_product),
            )
            .route("/api/orders", get(list_orders))
            .route("/api/orders/:id/status", put(update_order_status))
            .route("/image-host/:cloud/image/upload", post(upload_image))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            state,
            handle,
        }
    }

    /// Authenticated config pointing at this server, with a short debounce.
    pub fn config(&self) -> ClientConfig {
        ClientConfig::new(self.base_url.clone())
            .with_token(TOKEN)
            .with_image_host(format!("{}/image-host", self.base_url), CLOUD, PRESET)
            .with_search_debounce(Duration::from_millis(30))
            .with_request_timeout(Duration::from_secs(5))
    }

    pub fn app(&self) -> (AdminApp, Arc<RecordingNotifier>) {
        self.app_with(self.config())
    }

    pub fn app_with(&self, config: ClientConfig) -> (AdminApp, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::new());
        let app = AdminApp::new(config, notifier.clone()).expect("app");
        (app, notifier)
    }

    pub fn with_state<R>(&self, f: impl FnOnce(&mut FakeState) -> R) -> R {
        f(&mut self.state.lock().unwrap())
    }

    pub fn seed_product(&self, name: &str, pricing: f64) -> String {
        self.with_state(|s| {
            s.next_id += 1;
            let id = format!("prod-{}", s.next_id);
            s.products.push(json!({
                "_id": id,
                "name": name,
                "description": format!("{name} description"),
                "pricing": pricing,
                "category": "Furniture",
                "stock": { "total": 5, "status": "in_stock" },
                "color": ["Black"],
                "metadata": { "brand": "Acme", "weight": 2.0, "dimensions": { "width": 1.0, "height": 2.0, "length": 3.0 } },
                "images": [format!("https://images.test/{name}.png")],
            }));
            id
        })
    }

    pub fn seed_order(&self, id: &str, date: i64) {
        self.with_state(|s| {
            s.orders.push(json!({
                "_id": id,
                "items": [{ "name": "Chair A", "quantity": 2, "size": null }],
                "address": { "firstName": "Ada", "lastName": "Lovelace", "city": "London" },
                "amount": 99.98,
                "paymentMethod": "COD",
                "payment": false,
                "date": date,
                "status": "Order Placed",
            }));
        })
    }

    pub fn product_count(&self) -> usize {
        self.with_state(|s| s.products.len())
    }

    pub fn search_calls(&self) -> Vec<String> {
        self.with_state(|s| s.searches.clone())
    }

    pub fn upload_calls(&self) -> usize {
        self.with_state(|s| s.uploads)
    }
}

impl Drop for FakeBackend {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {TOKEN}"))
}

fn envelope(status: StatusCode, success: bool, message: &str) -> Response {
    (status, Json(json!({ "success": success, "message": message }))).into_response()
}

fn unauthorized() -> Response {
    envelope(StatusCode::UNAUTHORIZED, false, "Not Authorized. Login again")
}

async fn list_products(
    State(state): State<Shared>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let search = params.get("search").cloned().unwrap_or_default();
    let mut s = state.lock().unwrap();
    s.searches.push(search.clone());
    let needle = search.to_lowercase();
    let products: Vec<Value> = s
        .products
        .iter()
        .filter(|p| {
            p["name"]
                .as_str()
                .is_some_and(|n| n.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect();
    Json(json!({ "success": true, "products": products })).into_response()
}

async fn create_product(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut s = state.lock().unwrap();
    if s.reject_writes {
        return envelope(StatusCode::OK, false, "Product rejected");
    }
    s.next_id += 1;
    let mut product = body.clone();
    product["_id"] = json!(format!("prod-{}", s.next_id));
    s.products.push(product);
    s.created.push(body);
    envelope(StatusCode::OK, true, "Product added")
}

async fn update_product(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut s = state.lock().unwrap();
    if s.reject_writes {
        return envelope(StatusCode::OK, false, "Update rejected");
    }
    s.updates.push((id.clone(), body.clone()));
    let Some(product) = s.products.iter_mut().find(|p| p["_id"] == id.as_str()) else {
        return envelope(StatusCode::NOT_FOUND, false, "Product not found");
    };
    for key in ["name", "description", "pricing", "category", "stock", "color"] {
        if let Some(v) = body.get(key) {
            product[key] = v.clone();
        }
    }
    envelope(StatusCode::OK, true, "Product updated successfully")
}

async fn delete_product(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut s = state.lock().unwrap();
    let before = s.products.len();
    s.products.retain(|p| p["_id"] != id.as_str());
    if s.products.len() == before {
        return envelope(StatusCode::NOT_FOUND, false, "Product not found");
    }
    envelope(StatusCode::OK, true, "Product deleted successfully")
}

async fn list_orders(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let s = state.lock().unwrap();
    Json(json!({ "success": true, "orders": s.orders })).into_response()
}

async fn update_order_status(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut s = state.lock().unwrap();
    let Some(order) = s.orders.iter_mut().find(|o| o["_id"] == id.as_str()) else {
        return envelope(StatusCode::NOT_FOUND, false, "Order not found");
    };
    order["status"] = body["status"].clone();
    envelope(StatusCode::OK, true, "Status Updated")
}

/// Files named `slow-*` take longer, so completion order can be forced.
async fn upload_image(
    State(state): State<Shared>,
    Path(cloud): Path<String>,
    mut multipart: Multipart,
) -> Response {
    let mut file_name = None;
    let mut preset = None;
    while let Ok(Some(field)) = multipart.next_field().await {
        match field.name() {
            Some("file") => {
                file_name = field.file_name().map(str::to_string);
                let _ = field.bytes().await;
            }
            Some("upload_preset") => preset = field.text().await.ok(),
            _ => {}
        }
    }
    if cloud != CLOUD || preset.as_deref() != Some(PRESET) {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": { "message": "bad preset" } })))
            .into_response();
    }
    let file_name = file_name.unwrap_or_else(|| "upload".to_string());
    if file_name.starts_with("slow-") {
        tokio::time::sleep(Duration::from_millis(150)).await;
    }
    state.lock().unwrap().uploads += 1;
    Json(json!({ "secure_url": format!("https://images.test/{cloud}/{file_name}") }))
        .into_response()
}
