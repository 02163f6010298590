use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use jsonwebtoken::{EncodingKey, Header, encode};
use product_catalog_api::{
    catalog::{filter::ProductFilter, pagination::PriceSort},
    config::MockSettings,
    middleware::auth::Claims,
    models::{NewProduct, Product},
    routes::build_app,
    state::AppState,
    store::{InMemoryProductStore, ProductStore, StoreError},
};
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

const SECRET: &str = "test-secret";

/// Wraps the in-memory store and counts every call that reaches it.
#[derive(Default)]
struct CountingStore {
    inner: InMemoryProductStore,
    calls: AtomicUsize,
}

impl CountingStore {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ProductStore for CountingStore {
    async fn count(&self, filter: &ProductFilter) -> Result<u64, StoreError> {
        self.hit();
        self.inner.count(filter).await
    }

    async fn find_page(
        &self,
        filter: &ProductFilter,
        sort: Option<PriceSort>,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Product>, StoreError> {
        self.hit();
        self.inner.find_page(filter, sort, offset, limit).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, StoreError> {
        self.hit();
        self.inner.find_by_id(id).await
    }

    async fn insert(&self, product: NewProduct) -> Result<Product, StoreError> {
        self.hit();
        self.inner.insert(product).await
    }

    async fn replace(&self, product: Product) -> Result<Option<Product>, StoreError> {
        self.hit();
        self.inner.replace(product).await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        self.hit();
        self.inner.delete(id).await
    }
}

fn app() -> (Router, Arc<CountingStore>) {
    let store = Arc::new(CountingStore::default());
    let mocks = MockSettings {
        routes_enabled: true,
        seed: Some(7),
        max_quantity: 50,
    };
    let state = AppState::new(store.clone(), &mocks, SECRET);
    (build_app(state, mocks.routes_enabled), store)
}

fn token(role: &str) -> String {
    let claims = Claims {
        sub: Uuid::new_v4().to_string(),
        role: role.to_string(),
        exp: (chrono::Utc::now().timestamp() + 3600) as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .expect("token")
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    role: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(role) = role {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token(role)));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request");

    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

fn shoe(code: &str) -> Value {
    json!({
        "code": code,
        "title": "Trail Shoe",
        "price": 49.99,
        "category": "shoes",
        "stock": 10
    })
}

#[tokio::test]
async fn invalid_page_parameters_never_reach_the_store() {
    let (app, store) = app();

    for uri in [
        "/api/products?limit=0",
        "/api/products?limit=-3",
        "/api/products?limit=abc",
        "/api/products?page=0",
        "/api/products?page=two",
    ] {
        let (status, body) = send(&app, Method::GET, uri, Some("user"), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["message"], "Validation failed");
    }
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn listing_requires_a_valid_token() {
    let (app, store) = app();

    let (status, _) = send(&app, Method::GET, "/api/products", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let request = Request::builder()
        .uri("/api/products")
        .header(header::AUTHORIZATION, "Bearer not-a-jwt")
        .body(Body::empty())
        .expect("request");
    let response = app.clone().oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn create_list_update_delete_round_trip() {
    let (app, _) = app();

    let (status, created) = send(&app, Method::POST, "/api/products", Some("admin"), Some(shoe("SKU-1"))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["data"]["code"], "SKU-1");
    assert_eq!(created["data"]["status"], true);
    let id = created["data"]["id"].as_str().expect("id").to_string();

    let (status, listed) = send(
        &app,
        Method::GET,
        "/api/products?category=SHOE&limit=5&sort=asc",
        Some("user"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed["data"]["products"].as_array().map(Vec::len), Some(1));
    assert_eq!(listed["data"]["total_pages"], 1);
    assert_eq!(listed["data"]["has_next_page"], false);
    assert_eq!(listed["data"]["prev_page"], Value::Null);
    assert_eq!(listed["meta"]["total"], 1);

    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/api/products/{id}"),
        Some("admin"),
        Some(json!({ "stock": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["data"]["stock"], 3);
    assert_eq!(updated["data"]["title"], "Trail Shoe");

    let (status, _) = send(&app, Method::DELETE, &format!("/api/products/{id}"), Some("admin"), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, Method::GET, &format!("/api/products/{id}"), Some("user"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn mutations_require_admin_role() {
    let (app, store) = app();

    let (status, _) = send(&app, Method::POST, "/api/products", Some("user"), Some(shoe("SKU-1"))).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn validation_errors_are_listed_per_field() {
    let (app, store) = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/products",
        Some("admin"),
        Some(json!({ "code": "SKU-1", "price": "free", "stock": -1 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields: Vec<_> = body["data"]["details"]
        .as_array()
        .expect("details")
        .iter()
        .map(|d| d["field"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(fields, ["title", "category", "price", "stock"]);
    assert_eq!(store.calls(), 0);
}

fn detail_fields(body: &Value) -> Vec<String> {
    body["data"]["details"]
        .as_array()
        .map(|details| {
            details
                .iter()
                .map(|d| d["field"].as_str().unwrap_or_default().to_string())
                .collect()
        })
        .unwrap_or_default()
}

#[tokio::test]
async fn wrong_json_types_are_validation_errors() {
    let (app, store) = app();
    let mut body = shoe("SKU-1");
    body["title"] = json!(5);
    body["status"] = json!("yes");

    let (status, body) = send(&app, Method::POST, "/api/products", Some("admin"), Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Validation failed");
    assert_eq!(detail_fields(&body), ["title", "status"]);
    assert_eq!(body["data"]["details"][0]["reason"], "must be a string");
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn malformed_body_is_rejected_inside_the_envelope() {
    let (app, store) = app();
    let id = Uuid::new_v4();

    for (method, uri) in [
        (Method::POST, "/api/products".to_string()),
        (Method::PUT, format!("/api/products/{id}")),
    ] {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", token("admin")))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"title\": "))
            .expect("request");
        let response = app.clone().oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        let body: Value = serde_json::from_slice(&bytes).expect("json envelope");
        assert_eq!(detail_fields(&body), ["body"]);
    }
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn prices_outside_the_column_range_are_rejected() {
    let (app, store) = app();

    for price in [json!(0.001), json!(12_345_678_901.5)] {
        let mut body = shoe("SKU-1");
        body["price"] = price;
        let (status, body) = send(&app, Method::POST, "/api/products", Some("admin"), Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(detail_fields(&body), ["price"]);
    }
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn duplicate_code_returns_conflict() {
    let (app, _) = app();
    let (status, _) = send(&app, Method::POST, "/api/products", Some("admin"), Some(shoe("SKU-1"))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, Method::POST, "/api/products", Some("admin"), Some(shoe("SKU-1"))).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["data"]["error"], "Product code SKU-1 already exists");
}

#[tokio::test]
async fn malformed_ids_are_rejected_before_the_store() {
    let (app, store) = app();

    for (method, role) in [
        (Method::GET, "user"),
        (Method::PUT, "admin"),
        (Method::DELETE, "admin"),
    ] {
        let body = (method == Method::PUT).then(|| json!({ "stock": 1 }));
        let (status, _) = send(&app, method, "/api/products/123abc", Some(role), body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn deleting_unknown_product_is_not_found() {
    let (app, _) = app();

    let uri = format!("/api/products/{}", Uuid::new_v4());
    let (status, body) = send(&app, Method::DELETE, &uri, Some("admin"), None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Not Found");
}

#[tokio::test]
async fn mock_routes_need_no_token() {
    let (app, store) = app();

    let (status, one) = send(&app, Method::POST, "/api/products/mocks", None, None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(one["data"]["code"].as_str().is_some_and(|c| c.starts_with("MOCK-")));

    let (status, many) = send(&app, Method::POST, "/api/products/mocks/3", None, None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(many["data"].as_array().map(Vec::len), Some(3));
    assert_eq!(store.inner.len().await, 4);

    for bad in ["abc", "0"] {
        let (status, _) = send(&app, Method::POST, &format!("/api/products/mocks/{bad}"), None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
    assert_eq!(store.inner.len().await, 4);
}

#[tokio::test]
async fn mocks_segment_is_reserved_when_mock_routes_are_mounted() {
    let (app, store) = app();

    // the static POST route wins over `/{id}`, so other methods are 405
    let (status, _) = send(&app, Method::GET, "/api/products/mocks", Some("user"), None).await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn mock_routes_are_absent_unless_enabled() {
    let store = Arc::new(InMemoryProductStore::new());
    let mocks = MockSettings {
        routes_enabled: false,
        seed: None,
        max_quantity: 10,
    };
    let app = build_app(AppState::new(store.clone(), &mocks, SECRET), mocks.routes_enabled);

    let (status, _) = send(&app, Method::POST, "/api/products/mocks/3", None, None).await;
    assert_ne!(status, StatusCode::CREATED);

    let (status, _) = send(&app, Method::GET, "/api/products/mocks", Some("user"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn unknown_paths_return_json_not_found() {
    let (app, _) = app();

    let (status, body) = send(&app, Method::GET, "/nope", None, None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["data"]["path"], "/nope");
}
