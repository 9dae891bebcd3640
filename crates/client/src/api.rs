//! Backend REST client.
//!
//! Every endpoint answers with a `{ success, message?, ... }` envelope. A
//! well-formed `success: false` is surfaced as [`ClientError::Rejected`] and is
//! reported to the operator exactly like a transport failure.

use std::time::Duration;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use catalogdesk_core::{OrderId, ProductId};
use catalogdesk_orders::{Order, OrderStatus};
use catalogdesk_products::{NewProduct, Product, ProductUpdate};

use crate::error::{ClientError, ClientResult};

/// The backend as seen by the controllers.
#[async_trait::async_trait]
pub trait CatalogApi: Send + Sync {
    /// Whether authenticated calls can be made at all.
    fn has_credential(&self) -> bool;

    /// `GET /api/products?search=` in backend order. No credential needed.
    async fn list_products(&self, search: &str) -> ClientResult<Vec<Product>>;

    /// `POST /api/products`; returns the backend message.
    async fn create_product(&self, product: &NewProduct) -> ClientResult<String>;

    /// `PUT /api/products/:id`; returns the backend message.
    async fn update_product(&self, id: &ProductId, update: &ProductUpdate) -> ClientResult<String>;

    /// `DELETE /api/products/:id`; returns the backend message.
    async fn delete_product(&self, id: &ProductId) -> ClientResult<String>;

    /// `GET /api/orders` in backend order.
    async fn list_orders(&self) -> ClientResult<Vec<Order>>;

    /// `PUT /api/orders/:id/status`.
    async fn update_order_status(&self, id: &OrderId, status: OrderStatus) -> ClientResult<()>;
}

#[derive(Debug, Deserialize)]
struct MessageEnvelope {
    success: bool,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProductsEnvelope {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    products: Vec<Product>,
}

#[derive(Debug, Deserialize)]
struct OrdersEnvelope {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    orders: Vec<Order>,
}

fn rejected(message: Option<String>, fallback: &str) -> ClientError {
    ClientError::Rejected(message.unwrap_or_else(|| fallback.to_string()))
}

/// `reqwest`-backed [`CatalogApi`].
#[derive(Debug, Clone)]
pub struct HttpCatalogApi {
    http: reqwest::Client,
    api_url: String,
    token: Option<String>,
}

impl HttpCatalogApi {
    pub fn new(api_url: String, timeout: Duration) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    pub fn with_token(api_url: String, token: String, timeout: Duration) -> ClientResult<Self> {
        let mut api = Self::new(api_url, timeout)?;
        api.token = Some(token);
        Ok(api)
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    fn authed(&self, req: reqwest::RequestBuilder) -> ClientResult<reqwest::RequestBuilder> {
        match &self.token {
            Some(token) => Ok(req.bearer_auth(token)),
            None => Err(ClientError::MissingCredential),
        }
    }

    /// Send and decode a JSON body, mapping non-2xx to [`ClientError::Api`].
    async fn send_json<T: DeserializeOwned>(&self, req: reqwest::RequestBuilder) -> ClientResult<T> {
        let resp = req.send().await.map_err(|e| {
            if e.is_timeout() {
                ClientError::Network(format!("request timed out: {e}"))
            } else {
                ClientError::Network(e.to_string())
            }
        })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            // Error responses usually still carry the envelope.
            let message = serde_json::from_str::<MessageEnvelope>(&body)
                .ok()
                .and_then(|env| env.message)
                .unwrap_or(body);
            return Err(ClientError::Api(status.as_u16(), message));
        }

        let bytes = resp.bytes().await.map_err(|e| ClientError::Network(e.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|e| ClientError::Parse(e.to_string()))
    }

    async fn send_message(&self, req: reqwest::RequestBuilder, fallback: &str) -> ClientResult<String> {
        let env: MessageEnvelope = self.send_json(req).await?;
        if !env.success {
            return Err(rejected(env.message, fallback));
        }
        Ok(env.message.unwrap_or_else(|| fallback.to_string()))
    }
}

#[async_trait::async_trait]
impl CatalogApi for HttpCatalogApi {
    fn has_credential(&self) -> bool {
        self.token.is_some()
    }

    async fn list_products(&self, search: &str) -> ClientResult<Vec<Product>> {
        let req = self
            .http
            .get(self.url("/api/products"))
            .query(&[("search", search)]);
        let env: ProductsEnvelope = self.send_json(req).await?;
        if !env.success {
            return Err(rejected(env.message, "failed to load products"));
        }
        tracing::debug!(search, count = env.products.len(), "fetched products");
        Ok(env.products)
    }

    async fn create_product(&self, product: &NewProduct) -> ClientResult<String> {
        let req = self.authed(self.http.post(self.url("/api/products")).json(product))?;
        self.send_message(req, "product created").await
    }

    async fn update_product(&self, id: &ProductId, update: &ProductUpdate) -> ClientResult<String> {
        let url = self.url(&format!("/api/products/{id}"));
        let req = self.authed(self.http.put(url).json(update))?;
        self.send_message(req, "product updated").await
    }

    async fn delete_product(&self, id: &ProductId) -> ClientResult<String> {
        let url = self.url(&format!("/api/products/{id}"));
        let req = self.authed(self.http.delete(url))?;
        self.send_message(req, "product deleted").await
    }

    async fn list_orders(&self) -> ClientResult<Vec<Order>> {
        let req = self.authed(self.http.get(self.url("/api/orders")))?;
        let env: OrdersEnvelope = self.send_json(req).await?;
        if !env.success {
            return Err(rejected(env.message, "failed to load orders"));
        }
        tracing::debug!(count = env.orders.len(), "fetched orders");
        Ok(env.orders)
    }

    async fn update_order_status(&self, id: &OrderId, status: OrderStatus) -> ClientResult<()> {
        let url = self.url(&format!("/api/orders/{id}/status"));
        let body = serde_json::json!({ "status": status });
        let req = self.authed(self.http.put(url).json(&body))?;
        self.send_message(req, "order status updated").await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_drops_trailing_slash() {
        let api = HttpCatalogApi::new("http://localhost:3000/".to_string(), Duration::from_secs(1))
            .unwrap();
        assert_eq!(api.url("/api/products"), "http://localhost:3000/api/products");
        assert!(!api.has_credential());
    }

    #[tokio::test]
    async fn authenticated_calls_need_a_token() {
        let api = HttpCatalogApi::new("http://127.0.0.1:9".to_string(), Duration::from_secs(1))
            .unwrap();
        let err = api.delete_product(&ProductId::new("p1")).await.unwrap_err();
        assert!(matches!(err, ClientError::MissingCredential));
    }

    #[test]
    fn envelopes_tolerate_missing_lists() {
        let env: ProductsEnvelope =
            serde_json::from_str(r#"{"success":false,"message":"nope"}"#).unwrap();
        assert!(!env.success);
        assert!(env.products.is_empty());
        assert!(matches!(
            rejected(env.message, "fallback"),
            ClientError::Rejected(m) if m == "nope"
        ));
    }
}
