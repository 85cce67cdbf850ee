use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::{instrument, warn};

use crate::{
    auth::{
        dto::{
            AccessTokenResponse, AuthResponse, LoginRequest, MessageResponse, PasswordResetRequest,
            PublicUser, ResetPasswordRequest,
        },
        extractors::{AuthUser, ClientMeta, RefreshUser},
        repo_types::User,
        services,
    },
    error::{AppError, AppResult},
    extract::ApiJson,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/auth/request-password-reset", post(request_password_reset))
        .route("/auth/reset-password", post(reset_password))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/auth/me", get(get_me))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    client: ClientMeta,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    services::login(&state, &client, payload).await.map(Json)
}

#[instrument(skip(state, claims))]
pub async fn refresh(
    State(state): State<AppState>,
    RefreshUser(claims): RefreshUser,
) -> AppResult<Json<AccessTokenResponse>> {
    services::refresh(&state, &claims).await.map(Json)
}

#[instrument(skip(state, payload))]
pub async fn request_password_reset(
    State(state): State<AppState>,
    client: ClientMeta,
    ApiJson(payload): ApiJson<PasswordResetRequest>,
) -> AppResult<Json<MessageResponse>> {
    services::request_password_reset(&state, &client, payload)
        .await
        .map(Json)
}

#[instrument(skip(state, payload))]
pub async fn reset_password(
    State(state): State<AppState>,
    client: ClientMeta,
    ApiJson(payload): ApiJson<ResetPasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    services::complete_password_reset(&state, &client, payload)
        .await
        .map(Json)
}

#[instrument(skip(state, auth))]
pub async fn get_me(State(state): State<AppState>, auth: AuthUser) -> AppResult<Json<PublicUser>> {
    let user = User::find_by_id(&state.db, auth.user_id())
        .await?
        .filter(|u| u.is_active)
        .ok_or_else(|| {
            warn!(user_id = auth.user_id(), "token for missing or inactive user");
            AppError::Authentication("User not found".into())
        })?;
    Ok(Json(user.into()))
}
