use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::{claims::Role, extractors::AuthUser},
    error::{AppError, AppResult},
    extract::{ApiJson, ApiPath, ApiQuery},
    products::{
        dto::{CreateProductRequest, CreatedProductResponse, ProductSearch, UpdateProductRequest},
        repo_types::Product,
    },
    state::AppState,
    validation::is_valid_search,
};

pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
}

fn product_not_found() -> AppError {
    AppError::NotFound("Product not found".into())
}

#[instrument(skip(state, _auth))]
pub async fn list_products(
    State(state): State<AppState>,
    _auth: AuthUser,
    ApiQuery(query): ApiQuery<ProductSearch>,
) -> AppResult<Json<Vec<Product>>> {
    let search = query.search.trim();
    if !is_valid_search(search) {
        return Err(AppError::Validation("Invalid search query".into()));
    }
    let products = Product::list_active(&state.db, search).await?;
    Ok(Json(products))
}

#[instrument(skip(state, _auth))]
pub async fn get_product(
    State(state): State<AppState>,
    _auth: AuthUser,
    ApiPath(product_id): ApiPath<i64>,
) -> AppResult<Json<Product>> {
    Product::find_active(&state.db, product_id)
        .await?
        .map(Json)
        .ok_or_else(product_not_found)
}

#[instrument(skip(state, auth, payload))]
pub async fn create_product(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(payload): ApiJson<CreateProductRequest>,
) -> AppResult<(StatusCode, Json<CreatedProductResponse>)> {
    auth.require(Role::Admin)?;
    payload.validate()?;

    let product_id = Product::create(&state.db, &payload).await.map_err(|e| {
        AppError::from_rejected_write(e, "Product could not be created (duplicate SKU or invalid data)")
    })?;
    info!(product_id, sku = %payload.sku, "product created");

    Ok((StatusCode::CREATED, Json(CreatedProductResponse { product_id })))
}

#[instrument(skip(state, auth, payload))]
pub async fn update_product(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(product_id): ApiPath<i64>,
    ApiJson(payload): ApiJson<UpdateProductRequest>,
) -> AppResult<Json<Product>> {
    auth.require(Role::Admin)?;
    payload.validate()?;

    Product::update(&state.db, product_id, &payload)
        .await
        .map_err(|e| AppError::from_rejected_write(e, "Product could not be updated"))?
        .map(Json)
        .ok_or_else(product_not_found)
}

#[instrument(skip(state, auth))]
pub async fn delete_product(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(product_id): ApiPath<i64>,
) -> AppResult<StatusCode> {
    auth.require(Role::Admin)?;
    if !Product::deactivate(&state.db, product_id).await? {
        return Err(product_not_found());
    }
    info!(product_id, "product deactivated");
    Ok(StatusCode::NO_CONTENT)
}
