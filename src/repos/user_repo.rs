/*
 * Responsibility
 * - users テーブル向け SQLx 操作
 * - UserRepository trait と PgPool ベースの実装
 * - DB エラーは RepoError に変換して返す (unique 違反 → Conflict)
 */
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::repos::error::{RepoError, RepoResult};

const USER_COLUMNS: &str = "id, email, fullname, created_at, updated_at";

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: String,
    pub email: String,
    pub fullname: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields to change; `None` leaves the column untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserPatch<'a> {
    pub email: Option<&'a str>,
    pub fullname: Option<&'a str>,
}

impl UserPatch<'_> {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.fullname.is_none()
    }
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn list(&self) -> RepoResult<Vec<UserRow>>;

    async fn create(&self, email: &str, fullname: &str) -> RepoResult<UserRow>;

    async fn get(&self, user_id: &str) -> RepoResult<Option<UserRow>>;

    async fn get_by_email(&self, email: &str) -> RepoResult<Option<UserRow>>;

    async fn update(&self, user_id: &str, patch: UserPatch<'_>) -> RepoResult<Option<UserRow>>;

    async fn delete(&self, user_id: &str) -> RepoResult<bool>;
}

#[derive(Clone, Debug)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn list(&self) -> RepoResult<Vec<UserRow>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn create(&self, email: &str, fullname: &str) -> RepoResult<UserRow> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO users (id, email, fullname) VALUES ($1, $2, $3) RETURNING {USER_COLUMNS}"
        ))
        .bind(Uuid::new_v4().to_string())
        .bind(email)
        .bind(fullname)
        .fetch_one(&self.pool)
        .await
        .map_err(RepoError::from_sqlx)?;

        Ok(row)
    }

    async fn get(&self, user_id: &str) -> RepoResult<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn get_by_email(&self, email: &str) -> RepoResult<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn update(&self, user_id: &str, patch: UserPatch<'_>) -> RepoResult<Option<UserRow>> {
        // Nothing to assign: updated_at stays as it is
        if patch.is_empty() {
            return self.get(user_id).await;
        }

        // Only the supplied columns are assigned; every value goes through push_bind.
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE users SET updated_at = now()");
        if let Some(email) = patch.email {
            qb.push(", email = ").push_bind(email);
        }
        if let Some(fullname) = patch.fullname {
            qb.push(", fullname = ").push_bind(fullname);
        }
        qb.push(" WHERE id = ").push_bind(user_id);
        qb.push(" RETURNING ").push(USER_COLUMNS);

        let row = qb
            .build_query_as::<UserRow>()
            .fetch_optional(&self.pool)
            .await
            .map_err(RepoError::from_sqlx)?;

        Ok(row)
    }

    async fn delete(&self, user_id: &str) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
