use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::{claims::Role, extractors::AuthUser},
    error::{AppError, AppResult},
    extract::{ApiJson, ApiPath},
    inventory::{
        dto::{CreatedVariantResponse, NewVariantRequest, StockUpdateRequest},
        repo_types::{InventoryRow, ProductVariant},
    },
    state::AppState,
};

pub fn inventory_routes() -> Router<AppState> {
    Router::new()
        .route("/inventory", get(list_inventory))
        .route("/inventory/variants", post(create_variant))
        .route("/inventory/:variant_id", put(update_stock))
}

#[instrument(skip(state, _auth))]
pub async fn list_inventory(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> AppResult<Json<Vec<InventoryRow>>> {
    Ok(Json(InventoryRow::list(&state.db).await?))
}

#[instrument(skip(state, auth, payload))]
pub async fn update_stock(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(variant_id): ApiPath<i64>,
    ApiJson(payload): ApiJson<StockUpdateRequest>,
) -> AppResult<Json<ProductVariant>> {
    auth.require(Role::Admin)?;
    payload.validate()?;

    let variant = ProductVariant::set_stock(&state.db, variant_id, &payload)
        .await
        .map_err(|e| AppError::from_rejected_write(e, "Stock could not be updated"))?
        .ok_or_else(|| AppError::NotFound("Variant not found".into()))?;
    info!(
        variant_id,
        current_stock = variant.current_stock,
        by = auth.user_id(),
        "stock adjusted"
    );
    Ok(Json(variant))
}

#[instrument(skip(state, auth, payload))]
pub async fn create_variant(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(payload): ApiJson<NewVariantRequest>,
) -> AppResult<(StatusCode, Json<CreatedVariantResponse>)> {
    auth.require(Role::Admin)?;
    payload.validate()?;

    let variant_id = ProductVariant::create(&state.db, &payload)
        .await
        .map_err(|e| AppError::from_rejected_write(e, "Variant could not be created (unknown product?)"))?;
    info!(variant_id, product_id = payload.product_id, "variant created");
    Ok((StatusCode::CREATED, Json(CreatedVariantResponse { variant_id })))
}
