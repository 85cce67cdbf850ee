#![allow(dead_code)]

use std::sync::Arc;

use pos_backend::{
    auth::{
        claims::Role,
        password::hash_password,
        repo_types::{NewUser, User},
    },
    config::{AppConfig, JwtConfig, PasswordResetConfig, RateLimitConfig},
    db,
    state::AppState,
};
use rust_decimal::Decimal;
use uuid::Uuid;

/// State against the database named by `DATABASE_URL`, schema migrated.
pub async fn state() -> AppState {
    state_with(false).await
}

/// Same as [`state`] but sales may drive stock below zero.
pub async fn state_with_negative_stock() -> AppState {
    state_with(true).await
}

async fn state_with(allow_negative_stock: bool) -> AppState {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = db::connect_url(&database_url, 4).await.expect("connect");
    db::migrate(&pool).await.expect("migrate");

    let config = AppConfig {
        database_url,
        db_max_connections: 4,
        jwt: JwtConfig {
            secret: "integration-secret".into(),
            issuer: "pos-backend".into(),
            audience: "pos-clients".into(),
            ttl_minutes: 60,
            refresh_ttl_minutes: 60 * 24 * 30,
        },
        login_rate_limit: RateLimitConfig {
            max_attempts: 1000,
            window_secs: 60,
        },
        password_reset: PasswordResetConfig {
            ttl_minutes: 60,
            url_base: "http://localhost:5173".into(),
        },
        allow_negative_stock,
        trust_forwarded_for: false,
    };
    AppState::from_parts(pool, Arc::new(config))
}

pub fn unique(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4().simple())
}

pub fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

pub async fn user(state: &AppState, password: &str, role: Role, active: bool) -> User {
    let email = format!("{}@shop.test", unique("user"));
    let hash = hash_password(password).unwrap();
    let user = User::create(
        &state.db,
        &NewUser {
            email: &email,
            password_hash: &hash,
            role,
            full_name: Some("Test User"),
        },
    )
    .await
    .unwrap();
    if !active {
        sqlx::query("UPDATE users SET is_active = FALSE WHERE user_id = $1")
            .bind(user.user_id)
            .execute(&state.db)
            .await
            .unwrap();
    }
    User::find_by_id(&state.db, user.user_id).await.unwrap().unwrap()
}

/// Insert an active product with one variant per entry of `stocks`.
pub async fn product_with_variants(state: &AppState, stocks: &[i32]) -> Vec<i64> {
    let product_id: i64 = sqlx::query_scalar(
        "INSERT INTO products (sku, name, category, base_price, cost_price) \
         VALUES ($1, 'Test product', 'cases', 10, 4) RETURNING product_id",
    )
    .bind(unique("SKU"))
    .fetch_one(&state.db)
    .await
    .unwrap();

    let mut ids = Vec::new();
    for stock in stocks {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO product_variants (product_id, color, current_stock, low_stock_threshold) \
             VALUES ($1, 'black', $2, 2) RETURNING variant_id",
        )
        .bind(product_id)
        .bind(*stock)
        .fetch_one(&state.db)
        .await
        .unwrap();
        ids.push(id);
    }
    ids
}

pub async fn stock(state: &AppState, variant_id: i64) -> i32 {
    sqlx::query_scalar("SELECT current_stock FROM product_variants WHERE variant_id = $1")
        .bind(variant_id)
        .fetch_one(&state.db)
        .await
        .unwrap()
}
