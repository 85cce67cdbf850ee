use axum::{extract::State, routing::get, Json, Router};
use serde::Deserialize;
use tracing::instrument;

use super::repo::{self, AuditLogEntry};
use crate::{
    auth::{claims::Role, extractors::AuthUser},
    error::AppResult,
    extract::ApiQuery,
    state::AppState,
    validation::parse_date_param,
};

#[derive(Debug, Deserialize)]
pub struct AuditLogQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    500
}

pub fn audit_routes() -> Router<AppState> {
    Router::new().route("/admin/audit-logs", get(list_audit_logs))
}

#[instrument(skip(state, auth))]
pub async fn list_audit_logs(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(q): ApiQuery<AuditLogQuery>,
) -> AppResult<Json<Vec<AuditLogEntry>>> {
    auth.require(Role::Admin)?;
    let start = parse_date_param("start_date", q.start_date.as_deref())?;
    let end = parse_date_param("end_date", q.end_date.as_deref())?;
    let rows = repo::list(&state.db, start, end, q.limit.clamp(1, 5000)).await?;
    Ok(Json(rows))
}
