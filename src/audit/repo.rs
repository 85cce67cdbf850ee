use serde::Serialize;
use sqlx::{FromRow, PgExecutor};
use time::{Date, OffsetDateTime};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AuditLogEntry {
    pub log_id: i64,
    pub user_id: Option<i64>,
    pub user_email: Option<String>,
    pub action: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

pub async fn insert<'e>(
    db: impl PgExecutor<'e>,
    user_id: Option<i64>,
    action: &str,
    ip_address: Option<&str>,
    user_agent: Option<&str>,
) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO audit_log (user_id, action, ip_address, user_agent)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(user_id)
    .bind(action)
    .bind(ip_address)
    .bind(user_agent)
    .execute(db)
    .await?;
    Ok(())
}

/// Newest first, optionally bounded by inclusive calendar dates (UTC).
pub async fn list<'e>(
    db: impl PgExecutor<'e>,
    start: Option<Date>,
    end: Option<Date>,
    limit: i64,
) -> sqlx::Result<Vec<AuditLogEntry>> {
    sqlx::query_as::<_, AuditLogEntry>(
        r#"
        SELECT a.log_id, a.user_id, u.email AS user_email, a.action,
               a.ip_address, a.user_agent, a.created_at
          FROM audit_log a
          LEFT JOIN users u ON u.user_id = a.user_id
         WHERE ($1::date IS NULL OR (a.created_at AT TIME ZONE 'UTC')::date >= $1)
           AND ($2::date IS NULL OR (a.created_at AT TIME ZONE 'UTC')::date <= $2)
         ORDER BY a.created_at DESC, a.log_id DESC
         LIMIT $3
        "#,
    )
    .bind(start)
    .bind(end)
    .bind(limit)
    .fetch_all(db)
    .await
}
