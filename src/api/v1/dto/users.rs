/*
 * Responsibility
 * - Users の request/response DTO
 * - validate() で形式チェック (失敗は 400 BAD_USER_INPUT)
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::repos::user_repo::{UserPatch, UserRow};

const MAX_EMAIL_LEN: usize = 256;

fn validate_email(email: &str) -> Result<(), &'static str> {
    let email = email.trim();
    if email.is_empty() {
        return Err("email is required");
    }
    if email.len() > MAX_EMAIL_LEN {
        return Err("email must be <= 256 chars");
    }
    if !email.contains('@') {
        return Err("email is invalid");
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub fullname: String,
}

impl CreateUserRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        validate_email(&self.email)?;
        if self.fullname.trim().is_empty() {
            return Err("fullname is required");
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub fullname: Option<String>,
}

impl UpdateUserRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        if let Some(name) = &self.fullname
            && name.trim().is_empty()
        {
            return Err("fullname cannot be empty");
        }
        Ok(())
    }

    pub fn as_patch(&self) -> UserPatch<'_> {
        UserPatch {
            email: self.email.as_deref().map(str::trim),
            fullname: self.fullname.as_deref().map(str::trim),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub fullname: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserRow> for UserResponse {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            fullname: row.fullname,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
