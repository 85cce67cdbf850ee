mod common;

use std::net::{IpAddr, Ipv4Addr};

use common::{state, unique, user};
use pos_backend::{
    auth::{
        claims::Role,
        dto::{LoginRequest, PasswordResetRequest, ResetPasswordRequest},
        extractors::ClientMeta,
        password::verify_password,
        repo_types::{PasswordResetToken, User},
        services,
    },
    error::AppError,
    state::AppState,
};
use time::{Duration, OffsetDateTime};

fn client() -> ClientMeta {
    client_as("integration")
}

fn client_as(user_agent: &str) -> ClientMeta {
    ClientMeta {
        ip: Some(IpAddr::V4(Ipv4Addr::new(203, 0, 113, 9))),
        user_agent: Some(user_agent.into()),
    }
}

fn forgot(email: &str) -> PasswordResetRequest {
    PasswordResetRequest {
        email: email.into(),
    }
}

async fn reset_tokens_for(state: &AppState, user_id: i64) -> Vec<String> {
    sqlx::query_scalar("SELECT token FROM password_reset_tokens WHERE user_id = $1")
        .bind(user_id)
        .fetch_all(&state.db)
        .await
        .unwrap()
}

/// `(user_id, action)` rows written for one client, oldest first.
async fn audit_trail(state: &AppState, user_agent: &str) -> Vec<(Option<i64>, String)> {
    sqlx::query_as("SELECT user_id, action FROM audit_log WHERE user_agent = $1 ORDER BY log_id")
        .bind(user_agent)
        .fetch_all(&state.db)
        .await
        .unwrap()
}

fn login(email: &str, password: &str) -> LoginRequest {
    LoginRequest {
        email: email.into(),
        password: password.into(),
    }
}

fn reset(token: &str, new_password: &str) -> ResetPasswordRequest {
    ResetPasswordRequest {
        token: token.into(),
        new_password: new_password.into(),
    }
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn login_issues_tokens_for_the_stored_identity() {
    let state = state().await;
    let admin = user(&state, "admin-pass", Role::Admin, true).await;

    let res = services::login(&state, &client(), login(&admin.email, "admin-pass"))
        .await
        .unwrap();

    let claims = state.keys.verify_access(&res.access_token).unwrap();
    assert_eq!(claims.identity(), admin.identity());
    assert_eq!(claims.role, Role::Admin);
    assert!(state.keys.verify_refresh(&res.refresh_token).is_ok());
    assert_eq!(res.user.user_id, admin.user_id);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn failed_logins_are_indistinguishable() {
    let state = state().await;
    let active = user(&state, "right-pass", Role::Sales, true).await;
    let inactive = user(&state, "right-pass", Role::Sales, false).await;
    let missing = format!("{}@shop.test", unique("ghost"));

    let wrong = services::login(&state, &client(), login(&active.email, "wrong-pass"))
        .await
        .unwrap_err();
    let disabled = services::login(&state, &client(), login(&inactive.email, "right-pass"))
        .await
        .unwrap_err();
    let unknown = services::login(&state, &client(), login(&missing, "right-pass"))
        .await
        .unwrap_err();

    for err in [&wrong, &disabled, &unknown] {
        assert!(matches!(err, AppError::Authentication(_)));
        assert_eq!(err.to_string(), "Invalid credentials");
    }
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn reset_tokens_are_single_use() {
    let state = state().await;
    let u = user(&state, "old-password", Role::Sales, true).await;
    let expires = OffsetDateTime::now_utc() + Duration::hours(1);
    let first = unique("tok");
    let second = unique("tok");
    PasswordResetToken::create(&state.db, u.user_id, &first, expires).await.unwrap();
    PasswordResetToken::create(&state.db, u.user_id, &second, expires).await.unwrap();

    services::complete_password_reset(&state, &client(), reset(&first, "new-password-1"))
        .await
        .unwrap();
    let err = services::complete_password_reset(&state, &client(), reset(&first, "new-password-2"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidOrExpiredToken));

    let stored = User::find_by_id(&state.db, u.user_id).await.unwrap().unwrap();
    assert!(verify_password("new-password-1", &stored.password_hash).unwrap());

    services::complete_password_reset(&state, &client(), reset(&second, "new-password-3"))
        .await
        .unwrap();
    let stored = User::find_by_id(&state.db, u.user_id).await.unwrap().unwrap();
    assert!(verify_password("new-password-3", &stored.password_hash).unwrap());
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn expired_reset_token_leaves_password_alone() {
    let state = state().await;
    let u = user(&state, "old-password", Role::Sales, true).await;
    let token = unique("tok");
    PasswordResetToken::create(
        &state.db,
        u.user_id,
        &token,
        OffsetDateTime::now_utc() - Duration::minutes(1),
    )
    .await
    .unwrap();

    let err = services::complete_password_reset(&state, &client(), reset(&token, "new-password-1"))
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);

    let stored = User::find_by_id(&state.db, u.user_id).await.unwrap().unwrap();
    assert_eq!(stored.password_hash, u.password_hash);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn each_reset_request_issues_a_fresh_token() {
    let state = state().await;
    let u = user(&state, "old-password", Role::Sales, true).await;

    services::request_password_reset(&state, &client(), forgot(&u.email))
        .await
        .unwrap();
    services::request_password_reset(&state, &client(), forgot(&u.email))
        .await
        .unwrap();

    let tokens = reset_tokens_for(&state, u.user_id).await;
    assert_eq!(tokens.len(), 2);
    assert_ne!(tokens[0], tokens[1]);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn reset_request_reply_does_not_reveal_the_account() {
    let state = state().await;
    let active = user(&state, "old-password", Role::Sales, true).await;
    let inactive = user(&state, "old-password", Role::Sales, false).await;
    let missing = format!("{}@shop.test", unique("ghost"));

    let known = services::request_password_reset(&state, &client(), forgot(&active.email))
        .await
        .unwrap();
    let disabled = services::request_password_reset(&state, &client(), forgot(&inactive.email))
        .await
        .unwrap();
    let unknown = services::request_password_reset(&state, &client(), forgot(&missing))
        .await
        .unwrap();

    assert_eq!(known.message, services::RESET_REQUESTED_MESSAGE);
    assert_eq!(disabled.message, known.message);
    assert_eq!(unknown.message, known.message);
    assert!(reset_tokens_for(&state, inactive.user_id).await.is_empty());
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn login_and_reset_leave_an_audit_trail() {
    let state = state().await;
    let u = user(&state, "old-password", Role::Sales, true).await;
    let agent = unique("agent");
    let meta = client_as(&agent);

    services::login(&state, &meta, login(&u.email, "old-password"))
        .await
        .unwrap();
    services::login(&state, &meta, login(&u.email, "wrong-password"))
        .await
        .unwrap_err();
    services::request_password_reset(&state, &meta, forgot(&u.email))
        .await
        .unwrap();
    let token = reset_tokens_for(&state, u.user_id).await.remove(0);
    services::complete_password_reset(&state, &meta, reset(&token, "new-password-1"))
        .await
        .unwrap();

    let trail = audit_trail(&state, &agent).await;
    assert_eq!(
        trail,
        vec![
            (Some(u.user_id), "login_success".to_string()),
            (None, "login_failed".to_string()),
            (Some(u.user_id), "password_reset_request".to_string()),
            (Some(u.user_id), "password_reset_complete".to_string()),
        ]
    );
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn refresh_stops_once_the_account_is_deactivated() {
    let state = state().await;
    let u = user(&state, "cashier-pass", Role::Sales, true).await;
    let refresh_token = state.keys.sign_refresh(&u.identity()).unwrap();
    let claims = state.keys.verify_refresh(&refresh_token).unwrap();

    let res = services::refresh(&state, &claims).await.unwrap();
    let access = state.keys.verify_access(&res.access_token).unwrap();
    assert_eq!(access.identity(), u.identity());

    sqlx::query("UPDATE users SET is_active = FALSE WHERE user_id = $1")
        .bind(u.user_id)
        .execute(&state.db)
        .await
        .unwrap();

    let err = services::refresh(&state, &claims).await.unwrap_err();
    assert!(matches!(err, AppError::Authentication(_)));
    assert_eq!(err.status_code(), axum::http::StatusCode::UNAUTHORIZED);
}
