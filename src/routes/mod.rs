use axum::{
    Json, Router,
    http::{StatusCode, Uri},
    routing::get,
};

use crate::{
    response::{ApiResponse, Meta},
    state::AppState,
};

pub mod doc;
pub mod health;
pub mod mocks;
pub mod params;
pub mod products;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router(mock_routes_enabled: bool) -> Router<AppState> {
    let mut products = products::router();
    if mock_routes_enabled {
        products = products.merge(mocks::router());
    }
    Router::new().nest("/products", products)
}

/// Full application router with state bound. Middleware layers are added by the binary.
pub fn build_app(state: AppState, mock_routes_enabled: bool) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", create_api_router(mock_routes_enabled))
        .merge(doc::scalar_docs())
        .fallback(not_found)
        .with_state(state)
}

async fn not_found(uri: Uri) -> (StatusCode, Json<ApiResponse<serde_json::Value>>) {
    let body = ApiResponse::success(
        "Not Found",
        serde_json::json!({ "path": uri.path() }),
        Some(Meta::empty()),
    );
    (StatusCode::NOT_FOUND, Json(body))
}
