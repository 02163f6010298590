use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    routing::get,
};

use crate::{
    dto::products::{ProductFields, ProductPage},
    error::AppResult,
    middleware::auth::{AuthUser, ensure_admin},
    models::Product,
    response::{ApiResponse, Meta},
    routes::params::ProductQuery,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
}

#[utoipa::path(
    get,
    path = "/api/products",
    params(
        ("limit" = Option<i64>, Query, description = "Items per page, default 10"),
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("sort" = Option<String>, Query, description = "`asc` sorts by price ascending, anything else descending"),
        ("category" = Option<String>, Query, description = "Case-insensitive category substring"),
        ("query" = Option<String>, Query, description = "Case-insensitive title substring"),
    ),
    responses(
        (status = 200, description = "List products", body = ApiResponse<ProductPage>),
        (status = 400, description = "Invalid limit or page"),
        (status = 401, description = "Missing or invalid token"),
    ),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<ProductQuery>,
) -> AppResult<Json<ApiResponse<ProductPage>>> {
    let request = query.page_request()?;
    let filter = query.filter();

    let page = state.products.list_products(&filter, &request).await?;
    let meta = Meta::new(page.meta.page, page.meta.limit, page.meta.total);
    Ok(Json(ApiResponse::success("Products", page, Some(meta))))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(
        ("id" = String, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Get product", body = ApiResponse<Product>),
        (status = 400, description = "Malformed product id"),
        (status = 404, description = "Product not found"),
    ),
    tag = "Products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let product = state.products.get_product(&id).await?;
    Ok(Json(ApiResponse::success("Product", product, None)))
}

#[utoipa::path(
    post,
    path = "/api/products",
    request_body = ProductFields,
    responses(
        (status = 201, description = "Create product", body = ApiResponse<Product>),
        (status = 400, description = "Validation failed"),
        (status = 403, description = "Admin role required"),
        (status = 409, description = "Product code already exists"),
    ),
    tag = "Products"
)]
#[tracing::instrument(skip_all, fields(user_id = %user.user_id))]
pub async fn create_product(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<ProductFields>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ApiResponse<Product>>)> {
    ensure_admin(&user)?;
    let Json(payload) = payload?;
    let product = state.products.create_product(payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            "Product created",
            product,
            Some(Meta::empty()),
        )),
    ))
}

#[utoipa::path(
    put,
    path = "/api/products/{id}",
    params(
        ("id" = String, Path, description = "Product ID")
    ),
    request_body = ProductFields,
    responses(
        (status = 200, description = "Updated product", body = ApiResponse<Product>),
        (status = 400, description = "Malformed id or validation failed"),
        (status = 404, description = "Product not found"),
    ),
    tag = "Products"
)]
#[tracing::instrument(skip_all, fields(user_id = %user.user_id))]
pub async fn update_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    payload: Result<Json<ProductFields>, JsonRejection>,
) -> AppResult<Json<ApiResponse<Product>>> {
    ensure_admin(&user)?;
    let Json(payload) = payload?;
    let product = state.products.update_product(&id, payload).await?;

    Ok(Json(ApiResponse::success(
        "Updated",
        product,
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    params(
        ("id" = String, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Deleted product"),
        (status = 400, description = "Malformed product id"),
        (status = 404, description = "Product not found"),
    ),
    tag = "Products"
)]
#[tracing::instrument(skip_all, fields(user_id = %user.user_id))]
pub async fn delete_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    ensure_admin(&user)?;
    state.products.delete_product(&id).await?;

    Ok(Json(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    )))
}
