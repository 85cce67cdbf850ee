use sqlx::PgPool;
use tracing::info;

use crate::{
    auth::{
        claims::Role,
        password::hash_password,
        repo_types::{NewUser, User},
    },
    error::{AppError, AppResult},
    validation::{is_valid_email, is_valid_new_password, normalize_email},
};

pub const DEFAULT_ADMIN_EMAIL: &str = "admin@clessa.com";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";
pub const DEFAULT_ADMIN_NAME: &str = "System Administrator";

/// Check the password rules used for every newly chosen password.
pub fn check_new_password(password: &str) -> AppResult<()> {
    if !is_valid_new_password(password) {
        return Err(AppError::Validation("Password must be 8-50 characters".into()));
    }
    Ok(())
}

/// Validate, hash and insert a user. A taken email is a 400.
pub async fn create_user(
    db: &PgPool,
    email: &str,
    password: &str,
    role: Role,
    full_name: Option<&str>,
) -> AppResult<User> {
    let email = normalize_email(email);
    if !is_valid_email(&email) {
        return Err(AppError::Validation("Invalid email format".into()));
    }
    check_new_password(password)?;

    let password_hash = hash_password(password)?;
    let full_name = full_name.map(str::trim).filter(|n| !n.is_empty());
    let user = User::create(
        db,
        &NewUser {
            email: &email,
            password_hash: &password_hash,
            role,
            full_name,
        },
    )
    .await
    .map_err(|e| AppError::from_rejected_write(e, "A user with this email already exists"))?;

    info!(user_id = user.user_id, email = %user.email, role = %user.role, "user created");
    Ok(user)
}

/// Replace a user's password hash. 404 when the email is unknown.
pub async fn set_password(db: &PgPool, email: &str, password: &str) -> AppResult<User> {
    check_new_password(password)?;
    let user = User::find_by_email(db, &normalize_email(email))
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    let password_hash = hash_password(password)?;
    User::update_password(db, user.user_id, &password_hash).await?;
    info!(user_id = user.user_id, "password replaced");
    Ok(user)
}
