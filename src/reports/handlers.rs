use axum::{extract::State, routing::get, Json, Router};
use tracing::instrument;

use super::repo::{self, DailySales, ProductPerformance};
use crate::{
    auth::{claims::Role, extractors::AuthUser},
    error::AppResult,
    extract::ApiQuery,
    inventory::repo_types::{InventoryRow, ProductVariant},
    state::AppState,
    validation::DateRange,
};

pub fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/reports/sales", get(sales_report))
        .route("/reports/inventory", get(inventory_report))
        .route("/reports/product-performance", get(product_performance_report))
}

#[instrument(skip(state, auth))]
pub async fn sales_report(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(range): ApiQuery<DateRange>,
) -> AppResult<Json<Vec<DailySales>>> {
    auth.require(Role::Admin)?;
    let (start, end) = range.bounds()?;
    Ok(Json(repo::daily_sales(&state.db, start, end).await?))
}

#[instrument(skip(state, auth))]
pub async fn inventory_report(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<Vec<InventoryRow>>> {
    auth.require(Role::Admin)?;
    Ok(Json(ProductVariant::low_stock(&state.db).await?))
}

#[instrument(skip(state, auth))]
pub async fn product_performance_report(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(range): ApiQuery<DateRange>,
) -> AppResult<Json<Vec<ProductPerformance>>> {
    auth.require(Role::Admin)?;
    let (start, end) = range.bounds()?;
    Ok(Json(repo::product_performance(&state.db, start, end).await?))
}
