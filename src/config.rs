use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    pub max_attempts: u32,
    pub window_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PasswordResetConfig {
    pub ttl_minutes: i64,
    /// Frontend page the reset link points at; the token is appended as a query param.
    pub url_base: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub jwt: JwtConfig,
    pub login_rate_limit: RateLimitConfig,
    pub password_reset: PasswordResetConfig,
    pub allow_negative_stock: bool,
    /// Take the client address from `X-Forwarded-For` (only behind a trusted proxy).
    pub trust_forwarded_for: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "pos-backend".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "pos-clients".into()),
            ttl_minutes: env_or("JWT_TTL_MINUTES", 60),
            refresh_ttl_minutes: env_or("JWT_REFRESH_TTL_MINUTES", 60 * 24 * 30),
        };
        let login_rate_limit = RateLimitConfig {
            max_attempts: env_or("LOGIN_RATE_LIMIT_MAX", 5),
            window_secs: env_or("LOGIN_RATE_LIMIT_WINDOW_SECS", 60),
        };
        let password_reset = PasswordResetConfig {
            ttl_minutes: env_or("PASSWORD_RESET_TTL_MINUTES", 60),
            url_base: std::env::var("PASSWORD_RESET_URL_BASE")
                .unwrap_or_else(|_| "http://localhost:5173".into()),
        };
        Ok(Self {
            database_url,
            db_max_connections: env_or("DB_MAX_CONNECTIONS", 10),
            jwt,
            login_rate_limit,
            password_reset,
            allow_negative_stock: env_or("SALES_ALLOW_NEGATIVE_STOCK", false),
            trust_forwarded_for: env_or("TRUST_FORWARDED_FOR", false),
        })
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}
