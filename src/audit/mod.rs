//! Append-only record of security-relevant events.
//!
//! Writes are best-effort: a failed insert is logged and swallowed so the
//! caller's response never depends on the audit table.

pub mod handlers;
pub mod repo;

use std::fmt;

use sqlx::PgPool;
use tracing::{debug, error};

use crate::auth::extractors::ClientMeta;

pub use handlers::audit_routes as router;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    LoginSuccess,
    LoginFailed,
    PasswordResetRequest,
    PasswordResetComplete,
}

impl AuditAction {
    pub fn as_str(self) -> &'static str {
        match self {
            AuditAction::LoginSuccess => "login_success",
            AuditAction::LoginFailed => "login_failed",
            AuditAction::PasswordResetRequest => "password_reset_request",
            AuditAction::PasswordResetComplete => "password_reset_complete",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub async fn record(db: &PgPool, user_id: Option<i64>, action: AuditAction, client: &ClientMeta) {
    let ip = client.ip.map(|ip| ip.to_string());
    match repo::insert(db, user_id, action.as_str(), ip.as_deref(), client.user_agent.as_deref())
        .await
    {
        Ok(()) => debug!(?user_id, %action, "audit event recorded"),
        Err(e) => error!(error = %e, ?user_id, %action, "audit event dropped"),
    }
}
