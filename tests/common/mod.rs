#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{Method, Request},
    response::Response,
    Router,
};
use rust_decimal::Decimal;
use serde_json::Value;
use store_sales_api::{
    config::AppConfig,
    db,
    dto::{CreateProductRequest, CustomerRequest, CustomerView, ProductView},
    AppState,
};
use tower::ServiceExt;

/// Helper harness for spinning up an application state backed by an in-memory SQLite database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Like [`TestApp::new`], letting the caller adjust the configuration first.
    pub async fn with_config(adjust: impl FnOnce(&mut AppConfig)) -> Self {
        let mut cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        // A single connection keeps every query on the same in-memory database.
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;
        adjust(&mut cfg);

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let state = AppState::new(Arc::new(pool), cfg);
        let router = store_sales_api::app_router(state.clone());

        Self { router, state }
    }

    /// Send a request against the router.
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> Response {
        self.request_with_headers(method, uri, body, &[]).await
    }

    pub async fn request_with_headers(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        headers: &[(&str, &str)],
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// Send a `multipart/form-data` body with a single `file` part.
    pub async fn upload_file(&self, uri: &str, file_name: &str, contents: &str) -> Response {
        let boundary = "store-sales-test-boundary";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n\
             Content-Type: text/csv\r\n\r\n\
             {contents}\r\n\
             --{boundary}--\r\n"
        );

        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(
                "content-type",
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .expect("failed to build multipart request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    pub async fn seed_customer(&self, name: &str, last_name: &str, email: &str) -> CustomerView {
        self.state
            .services
            .customers
            .create_customer(CustomerRequest {
                name: name.to_string(),
                last_name: last_name.to_string(),
                email: email.to_string(),
            })
            .await
            .expect("seed customer for tests")
    }

    pub async fn seed_product(
        &self,
        name: &str,
        brand: &str,
        price: Decimal,
        stock: i32,
    ) -> ProductView {
        self.state
            .services
            .products
            .create_product(CreateProductRequest {
                name: name.to_string(),
                brand: brand.to_string(),
                price,
                stock,
            })
            .await
            .expect("seed product for tests")
    }

    pub async fn stock_of(&self, product_id: uuid::Uuid) -> i32 {
        self.state
            .services
            .products
            .get_product(product_id)
            .await
            .expect("product should exist")
            .stock
    }
}

/// Read a response body as JSON.
pub async fn response_json(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).expect("response body is not valid JSON")
}

/// Parse a decimal that the API rendered as a JSON string.
pub fn json_decimal(value: &Value) -> Decimal {
    value
        .as_str()
        .expect("decimal fields are rendered as strings")
        .parse()
        .expect("valid decimal string")
}
