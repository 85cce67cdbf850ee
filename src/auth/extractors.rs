use std::net::{IpAddr, SocketAddr};

use axum::{
    async_trait,
    extract::{ConnectInfo, FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use tracing::warn;

use super::{
    claims::{Claims, Role},
    jwt::JwtKeys,
};
use crate::{error::AppError, state::AppState};

fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    let auth_header = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Authentication("Missing Authorization header".into()))?;

    auth_header
        .strip_prefix("Bearer ")
        .or_else(|| auth_header.strip_prefix("bearer "))
        .ok_or_else(|| AppError::Authentication("Invalid Authorization header".into()))
}

/// Validated access-token claims of the caller.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        let token = bearer_token(parts)?;
        let claims = keys.verify_access(token).map_err(|e| {
            warn!(error = %e, "access token rejected");
            AppError::from(e)
        })?;
        Ok(AuthUser(claims))
    }
}

/// Validated refresh-token claims, read from the bearer header.
#[derive(Debug, Clone)]
pub struct RefreshUser(pub Claims);

#[async_trait]
impl<S> FromRequestParts<S> for RefreshUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        let token = bearer_token(parts)?;
        let claims = keys.verify_refresh(token).map_err(|e| {
            warn!(error = %e, "refresh token rejected");
            AppError::from(e)
        })?;
        Ok(RefreshUser(claims))
    }
}

/// Reject the call unless the caller holds exactly `required`.
pub fn ensure_role(claims: &Claims, required: Role) -> Result<(), AppError> {
    if claims.role != required {
        warn!(user_id = claims.sub, role = %claims.role, required = %required, "insufficient role");
        return Err(AppError::InsufficientPermissions);
    }
    Ok(())
}

impl AuthUser {
    pub fn require(&self, role: Role) -> Result<(), AppError> {
        ensure_role(&self.0, role)
    }

    pub fn user_id(&self) -> i64 {
        self.0.sub
    }
}

/// Caller address and user agent, recorded with audit events and used as the
/// rate-limit key.
#[derive(Debug, Clone, Default)]
pub struct ClientMeta {
    pub ip: Option<IpAddr>,
    pub user_agent: Option<String>,
}

impl ClientMeta {
    pub fn from_parts(parts: &Parts, trust_forwarded_for: bool) -> Self {
        let forwarded = trust_forwarded_for
            .then(|| {
                parts
                    .headers
                    .get("x-forwarded-for")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.split(',').next())
                    .and_then(|v| v.trim().parse::<IpAddr>().ok())
            })
            .flatten();
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip());
        let user_agent = parts
            .headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        Self {
            ip: forwarded.or(peer),
            user_agent,
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for ClientMeta {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(ClientMeta::from_parts(parts, state.config.trust_forwarded_for))
    }
}
