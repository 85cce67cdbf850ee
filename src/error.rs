use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::auth::jwt::TokenError;

pub type AppResult<T> = Result<T, AppError>;

/// Every failure a handler can surface. Rendered as `{"error": message}`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Authentication(String),

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token has expired")]
    ExpiredToken,

    #[error("Insufficient permissions")]
    InsufficientPermissions,

    #[error("{0}")]
    NotFound(String),

    #[error("Too many requests")]
    RateLimited,

    /// The store refused a business write (constraint, missing reference, stock).
    #[error("{0}")]
    Rejected(String),

    #[error("Invalid or expired token")]
    InvalidOrExpiredToken,

    #[error("database error: {0}")]
    Store(#[from] sqlx::Error),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Rejected(_) | AppError::InvalidOrExpiredToken => {
                StatusCode::BAD_REQUEST
            }
            AppError::Authentication(_) | AppError::InvalidToken | AppError::ExpiredToken => {
                StatusCode::UNAUTHORIZED
            }
            AppError::InsufficientPermissions => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AppError::Store(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Map a failed business write: constraint violations become a 400 with
    /// `message`, anything else (connectivity, pool) stays a 500.
    pub fn from_rejected_write(err: sqlx::Error, message: &str) -> Self {
        match err {
            sqlx::Error::Database(db) => {
                warn!(error = %db, "store rejected write");
                AppError::Rejected(message.to_string())
            }
            other => AppError::Store(other),
        }
    }

    fn public_message(&self) -> String {
        match self {
            AppError::Store(_) | AppError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }

    fn log(&self) {
        match self {
            AppError::Store(e) => error!(error = %e, "database error"),
            AppError::Internal(e) => error!(error = ?e, "internal error"),
            AppError::Authentication(_) | AppError::InsufficientPermissions => {
                warn!(error = %self, "access denied")
            }
            AppError::RateLimited => warn!("rate limit exceeded"),
            _ => debug!(error = %self, "request rejected"),
        }
    }
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => AppError::ExpiredToken,
            TokenError::Invalid(_) | TokenError::WrongKind => AppError::InvalidToken,
            TokenError::Signing(e) => AppError::Internal(anyhow::anyhow!(e)),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.log();
        let status = self.status_code();
        (status, Json(json!({ "error": self.public_message() }))).into_response()
    }
}

/// Fallback for unmatched routes.
pub async fn not_found() -> AppError {
    AppError::NotFound("Resource not found".into())
}
