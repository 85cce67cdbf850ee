use sqlx::PgExecutor;
use time::OffsetDateTime;

use super::claims::Role;
use super::repo_types::{NewUser, PasswordResetToken, User, UserChanges};

impl User {
    /// Find a user by email.
    pub async fn find_by_email<'e>(
        db: impl PgExecutor<'e>,
        email: &str,
    ) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, email, password_hash, role, full_name, is_active, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await
    }

    pub async fn find_by_id<'e>(db: impl PgExecutor<'e>, user_id: i64) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, email, password_hash, role, full_name, is_active, created_at
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(db)
        .await
    }

    /// Create a new user with an already hashed password.
    pub async fn create<'e>(db: impl PgExecutor<'e>, new: &NewUser<'_>) -> sqlx::Result<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash, role, full_name, is_active)
            VALUES ($1, $2, $3, $4, TRUE)
            RETURNING user_id, email, password_hash, role, full_name, is_active, created_at
            "#,
        )
        .bind(new.email)
        .bind(new.password_hash)
        .bind(new.role.as_str())
        .bind(new.full_name)
        .fetch_one(db)
        .await
    }

    pub async fn list<'e>(db: impl PgExecutor<'e>) -> sqlx::Result<Vec<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, email, password_hash, role, full_name, is_active, created_at
            FROM users
            ORDER BY user_id
            "#,
        )
        .fetch_all(db)
        .await
    }

    pub async fn count<'e>(db: impl PgExecutor<'e>) -> sqlx::Result<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(db)
            .await
    }

    /// Returns the number of rows touched (0 when the user does not exist).
    pub async fn update_password<'e>(
        db: impl PgExecutor<'e>,
        user_id: i64,
        password_hash: &str,
    ) -> sqlx::Result<u64> {
        let res = sqlx::query(
            "UPDATE users SET password_hash = $1, updated_at = now() WHERE user_id = $2",
        )
        .bind(password_hash)
        .bind(user_id)
        .execute(db)
        .await?;
        Ok(res.rows_affected())
    }

    pub async fn update<'e>(
        db: impl PgExecutor<'e>,
        user_id: i64,
        changes: &UserChanges,
    ) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
               SET role = COALESCE($2, role),
                   full_name = COALESCE($3, full_name),
                   is_active = COALESCE($4, is_active),
                   updated_at = now()
             WHERE user_id = $1
            RETURNING user_id, email, password_hash, role, full_name, is_active, created_at
            "#,
        )
        .bind(user_id)
        .bind(changes.role.map(Role::as_str))
        .bind(changes.full_name.as_deref())
        .bind(changes.is_active)
        .fetch_optional(db)
        .await
    }
}

impl PasswordResetToken {
    pub async fn create<'e>(
        db: impl PgExecutor<'e>,
        user_id: i64,
        token: &str,
        expires_at: OffsetDateTime,
    ) -> sqlx::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO password_reset_tokens (user_id, token, expires_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(user_id)
        .bind(token)
        .bind(expires_at)
        .execute(db)
        .await?;
        Ok(())
    }

    /// Lock a token that is still unused and unexpired. Call inside a transaction.
    pub async fn find_redeemable_for_update<'e>(
        db: impl PgExecutor<'e>,
        token: &str,
    ) -> sqlx::Result<Option<PasswordResetToken>> {
        sqlx::query_as::<_, PasswordResetToken>(
            r#"
            SELECT token_id, user_id, token, expires_at, used
              FROM password_reset_tokens
             WHERE token = $1 AND used = FALSE AND expires_at > now()
               FOR UPDATE
            "#,
        )
        .bind(token)
        .fetch_optional(db)
        .await
    }

    pub async fn mark_used<'e>(db: impl PgExecutor<'e>, token_id: i64) -> sqlx::Result<()> {
        sqlx::query("UPDATE password_reset_tokens SET used = TRUE WHERE token_id = $1")
            .bind(token_id)
            .execute(db)
            .await?;
        Ok(())
    }
}
