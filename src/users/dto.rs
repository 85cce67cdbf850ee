use serde::{Deserialize, Serialize};

use crate::{
    auth::{claims::Role, repo_types::UserChanges},
    error::{AppError, AppResult},
};

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    pub role: String,
    pub full_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub role: Option<String>,
    pub full_name: Option<String>,
    pub is_active: Option<bool>,
}

impl UpdateUserRequest {
    pub fn into_changes(self) -> AppResult<UserChanges> {
        let role = self.role.as_deref().map(parse_role).transpose()?;
        Ok(UserChanges {
            role,
            full_name: self.full_name.map(|n| n.trim().to_string()),
            is_active: self.is_active,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct CreatedUserResponse {
    pub user_id: i64,
}

pub fn parse_role(raw: &str) -> AppResult<Role> {
    raw.trim()
        .to_lowercase()
        .parse()
        .map_err(|_| AppError::Validation("Role must be 'admin' or 'sales'".into()))
}
