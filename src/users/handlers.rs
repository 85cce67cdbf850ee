use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::{
        claims::Role,
        extractors::AuthUser,
        repo_types::{User, UserChanges},
    },
    error::{AppError, AppResult},
    extract::{ApiJson, ApiPath},
    state::AppState,
    users::{
        dto::{parse_role, CreateUserRequest, CreatedUserResponse, UpdateUserRequest},
        services,
    },
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/users", get(list_users).post(create_user))
        .route("/admin/users/:id", put(update_user).delete(deactivate_user))
}

#[instrument(skip(state, auth))]
pub async fn list_users(State(state): State<AppState>, auth: AuthUser) -> AppResult<Json<Vec<User>>> {
    auth.require(Role::Admin)?;
    Ok(Json(User::list(&state.db).await?))
}

#[instrument(skip(state, auth, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(payload): ApiJson<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<CreatedUserResponse>)> {
    auth.require(Role::Admin)?;
    let role = parse_role(&payload.role)?;
    let user = services::create_user(
        &state.db,
        &payload.email,
        &payload.password,
        role,
        payload.full_name.as_deref(),
    )
    .await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedUserResponse {
            user_id: user.user_id,
        }),
    ))
}

#[instrument(skip(state, auth, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(user_id): ApiPath<i64>,
    ApiJson(payload): ApiJson<UpdateUserRequest>,
) -> AppResult<Json<User>> {
    auth.require(Role::Admin)?;
    let changes = payload.into_changes()?;
    apply_changes(&state, &auth, user_id, changes).await.map(Json)
}

#[instrument(skip(state, auth))]
pub async fn deactivate_user(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(user_id): ApiPath<i64>,
) -> AppResult<StatusCode> {
    auth.require(Role::Admin)?;
    let changes = UserChanges {
        is_active: Some(false),
        ..Default::default()
    };
    apply_changes(&state, &auth, user_id, changes).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn apply_changes(
    state: &AppState,
    auth: &AuthUser,
    user_id: i64,
    changes: UserChanges,
) -> AppResult<User> {
    if user_id == auth.user_id() && (changes.is_active == Some(false) || changes.role == Some(Role::Sales)) {
        return Err(AppError::Validation(
            "Administrators cannot demote or deactivate themselves".into(),
        ));
    }
    let user = User::update(&state.db, user_id, &changes)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    info!(
        user_id,
        by = auth.user_id(),
        role = %user.role,
        is_active = user.is_active,
        "user updated"
    );
    Ok(user)
}
