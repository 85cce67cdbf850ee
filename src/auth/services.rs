//! Login, token refresh and the password-reset flow.

use std::net::{IpAddr, Ipv4Addr};

use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::{
    claims::Claims,
    dto::{AccessTokenResponse, AuthResponse, LoginRequest, MessageResponse, PasswordResetRequest, ResetPasswordRequest},
    extractors::ClientMeta,
    password::{hash_password, verify_against_dummy, verify_password},
    repo_types::{PasswordResetToken, User},
};
use crate::{
    audit::{self, AuditAction},
    error::{AppError, AppResult},
    state::AppState,
    validation::{is_valid_email, is_valid_login_password, is_valid_new_password, normalize_email},
};

pub const RESET_REQUESTED_MESSAGE: &str = "If the email exists, a reset link has been sent";
pub const PASSWORD_UPDATED_MESSAGE: &str = "Password updated successfully";

fn invalid_credentials() -> AppError {
    AppError::Authentication("Invalid credentials".into())
}

pub async fn login(state: &AppState, client: &ClientMeta, req: LoginRequest) -> AppResult<AuthResponse> {
    let key = client.ip.unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));
    let decision = state.login_limiter.check(key);
    if !decision.allowed {
        warn!(client = %key, retry_after_secs = decision.retry_after.as_secs(), "login rate limited");
        return Err(AppError::RateLimited);
    }
    debug!(client = %key, remaining = decision.remaining, "login attempt");

    let email = normalize_email(&req.email);
    if !is_valid_email(&email) {
        return Err(AppError::Validation("Invalid email format".into()));
    }
    if !is_valid_login_password(&req.password) {
        return Err(AppError::Validation("Password must be 6-50 characters".into()));
    }

    let user = User::find_by_email(&state.db, &email).await?;

    // Unknown, inactive and wrong-password logins must look the same to the caller.
    let accepted = match &user {
        Some(u) => {
            let matches = verify_password(&req.password, &u.password_hash).unwrap_or_else(|e| {
                error!(error = %e, user_id = u.user_id, "stored password hash unreadable");
                false
            });
            matches && u.is_active
        }
        None => verify_against_dummy(&req.password),
    };

    let user = match user {
        Some(u) if accepted => u,
        other => {
            warn!(
                email = %email,
                known = other.is_some(),
                "login rejected"
            );
            audit::record(&state.db, None, AuditAction::LoginFailed, client).await;
            return Err(invalid_credentials());
        }
    };

    let pair = state.keys.issue(&user.identity())?;
    audit::record(&state.db, Some(user.user_id), AuditAction::LoginSuccess, client).await;
    info!(user_id = user.user_id, role = %user.role, "user logged in");

    Ok(AuthResponse {
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
        user: user.into(),
    })
}

/// Mint an access token for the identity in a verified refresh token, as long
/// as the account still exists and is active.
pub async fn refresh(state: &AppState, refresh_claims: &Claims) -> AppResult<AccessTokenResponse> {
    let active = User::find_by_id(&state.db, refresh_claims.sub)
        .await?
        .is_some_and(|u| u.is_active);
    if !active {
        warn!(user_id = refresh_claims.sub, "refresh for missing or inactive user");
        return Err(AppError::Authentication("User not found".into()));
    }
    let access_token = state.keys.sign_access(&refresh_claims.identity())?;
    debug!(user_id = refresh_claims.sub, "access token refreshed");
    Ok(AccessTokenResponse { access_token })
}

pub async fn request_password_reset(
    state: &AppState,
    client: &ClientMeta,
    req: PasswordResetRequest,
) -> AppResult<MessageResponse> {
    let email = normalize_email(&req.email);
    if email.is_empty() {
        return Err(AppError::Validation("Email is required".into()));
    }
    if !is_valid_email(&email) {
        return Err(AppError::Validation("Invalid email format".into()));
    }

    match User::find_by_email(&state.db, &email).await? {
        Some(user) if user.is_active => {
            let token = Uuid::new_v4().to_string();
            let expires_at = OffsetDateTime::now_utc()
                + TimeDuration::minutes(state.config.password_reset.ttl_minutes);
            PasswordResetToken::create(&state.db, user.user_id, &token, expires_at).await?;

            let link = reset_link(&state.config.password_reset.url_base, &token);
            info!(user_id = user.user_id, "password reset token issued");
            // No mail transport: the link is only available in debug logs.
            debug!(user_id = user.user_id, %link, "password reset link");

            audit::record(&state.db, Some(user.user_id), AuditAction::PasswordResetRequest, client)
                .await;
        }
        _ => debug!("password reset requested for unknown or inactive email"),
    }

    Ok(MessageResponse::new(RESET_REQUESTED_MESSAGE))
}

pub async fn complete_password_reset(
    state: &AppState,
    client: &ClientMeta,
    req: ResetPasswordRequest,
) -> AppResult<MessageResponse> {
    let token = req.token.trim();
    if token.is_empty() || req.new_password.is_empty() {
        return Err(AppError::Validation("Token and new password are required".into()));
    }
    if !is_valid_new_password(&req.new_password) {
        return Err(AppError::Validation("Password must be 8-50 characters".into()));
    }

    let hash = hash_password(&req.new_password)?;

    // Password update and token consumption commit together or not at all.
    let mut tx = state.db.begin().await?;
    let Some(reset) = PasswordResetToken::find_redeemable_for_update(&mut *tx, token).await? else {
        warn!("password reset with invalid or expired token");
        return Err(AppError::InvalidOrExpiredToken);
    };
    User::update_password(&mut *tx, reset.user_id, &hash).await?;
    PasswordResetToken::mark_used(&mut *tx, reset.token_id).await?;
    tx.commit().await?;

    info!(user_id = reset.user_id, "password reset completed");
    audit::record(&state.db, Some(reset.user_id), AuditAction::PasswordResetComplete, client).await;

    Ok(MessageResponse::new(PASSWORD_UPDATED_MESSAGE))
}

fn reset_link(base: &str, token: &str) -> String {
    format!("{}/reset-password?token={}", base.trim_end_matches('/'), token)
}
