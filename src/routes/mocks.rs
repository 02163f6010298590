//! Mock product seeding routes.
//!
//! These carry no [`AuthUser`](crate::middleware::auth::AuthUser) extractor and
//! are therefore reachable without credentials. They are only mounted when
//! `MOCK_ROUTES_ENABLED` is set.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::post,
};

use crate::{
    dto::products::ProductList,
    error::AppResult,
    models::Product,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/mocks", post(create_mock_product))
        .route("/mocks/{quantity}", post(create_mock_products))
}

#[utoipa::path(
    post,
    path = "/api/products/mocks",
    responses(
        (status = 201, description = "Created one mock product", body = ApiResponse<Product>)
    ),
    tag = "Mocks"
)]
pub async fn create_mock_product(
    State(state): State<AppState>,
) -> AppResult<(StatusCode, Json<ApiResponse<Product>>)> {
    let product = state.mocks.create_one().await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Created!", product, Some(Meta::empty()))),
    ))
}

#[utoipa::path(
    post,
    path = "/api/products/mocks/{quantity}",
    params(
        ("quantity" = String, Path, description = "Number of products to create")
    ),
    responses(
        (status = 201, description = "Created mock products", body = ApiResponse<ProductList>),
        (status = 400, description = "Quantity is not a positive integer"),
    ),
    tag = "Mocks"
)]
pub async fn create_mock_products(
    State(state): State<AppState>,
    Path(quantity): Path<String>,
) -> AppResult<(StatusCode, Json<ApiResponse<ProductList>>)> {
    let items = state.mocks.create_many(&quantity).await?;
    let message = format!("{} products created", items.len());

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            message,
            ProductList { items },
            Some(Meta::empty()),
        )),
    ))
}
