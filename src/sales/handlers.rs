use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use tracing::instrument;

use crate::{
    auth::extractors::AuthUser,
    error::AppResult,
    extract::ApiJson,
    sales::{
        dto::{SaleRequest, SaleResponse},
        services,
    },
    state::AppState,
};

pub fn sales_routes() -> Router<AppState> {
    Router::new().route("/sales", post(create_sale))
}

#[instrument(skip(state, auth, payload), fields(cashier = auth.user_id()))]
pub async fn create_sale(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(payload): ApiJson<SaleRequest>,
) -> AppResult<(StatusCode, Json<SaleResponse>)> {
    let receipt = services::record_sale(&state, auth.user_id(), &payload).await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}
