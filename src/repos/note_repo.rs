/*
 * Responsibility
 * - notes CRUD (常に所有者 user_id で絞り込む)
 * - 他人の note は「存在しない」と同じ扱い (None / false)
 * - user_id の FK (CASCADE) 前提で削除挙動を意識
 */
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

use crate::repos::error::{RepoError, RepoResult};

const NOTE_COLUMNS: &str = "id, user_id, title, description, text, created_at, updated_at";

#[derive(Debug, Clone, FromRow)]
pub struct NoteRow {
    pub id: i64,
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy)]
pub struct NewNote<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub text: &'a str,
}

/// Fields to change; `None` leaves the column untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotePatch<'a> {
    pub title: Option<&'a str>,
    pub description: Option<&'a str>,
    pub text: Option<&'a str>,
}

#[async_trait]
pub trait NoteRepository: Send + Sync {
    async fn list(&self, user_id: &str) -> RepoResult<Vec<NoteRow>>;

    async fn create(&self, user_id: &str, note: NewNote<'_>) -> RepoResult<NoteRow>;

    async fn get(&self, user_id: &str, note_id: i64) -> RepoResult<Option<NoteRow>>;

    async fn update(
        &self,
        user_id: &str,
        note_id: i64,
        patch: NotePatch<'_>,
    ) -> RepoResult<Option<NoteRow>>;

    async fn delete(&self, user_id: &str, note_id: i64) -> RepoResult<bool>;
}

#[derive(Clone, Debug)]
pub struct PgNoteRepository {
    pool: PgPool,
}

impl PgNoteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NoteRepository for PgNoteRepository {
    async fn list(&self, user_id: &str) -> RepoResult<Vec<NoteRow>> {
        let rows = sqlx::query_as::<_, NoteRow>(&format!(
            "SELECT {NOTE_COLUMNS} FROM notes WHERE user_id = $1 ORDER BY id DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn create(&self, user_id: &str, note: NewNote<'_>) -> RepoResult<NoteRow> {
        let row = sqlx::query_as::<_, NoteRow>(&format!(
            r#"
            INSERT INTO notes (user_id, title, description, text)
            VALUES ($1, $2, $3, $4)
            RETURNING {NOTE_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(note.title)
        .bind(note.description)
        .bind(note.text)
        .fetch_one(&self.pool)
        .await
        .map_err(RepoError::from_sqlx)?;

        Ok(row)
    }

    async fn get(&self, user_id: &str, note_id: i64) -> RepoResult<Option<NoteRow>> {
        let row = sqlx::query_as::<_, NoteRow>(&format!(
            "SELECT {NOTE_COLUMNS} FROM notes WHERE id = $1 AND user_id = $2"
        ))
        .bind(note_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn update(
        &self,
        user_id: &str,
        note_id: i64,
        patch: NotePatch<'_>,
    ) -> RepoResult<Option<NoteRow>> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE notes SET updated_at = now()");
        if let Some(title) = patch.title {
            qb.push(", title = ").push_bind(title);
        }
        if let Some(description) = patch.description {
            qb.push(", description = ").push_bind(description);
        }
        if let Some(text) = patch.text {
            qb.push(", text = ").push_bind(text);
        }
        qb.push(" WHERE id = ").push_bind(note_id);
        qb.push(" AND user_id = ").push_bind(user_id);
        qb.push(" RETURNING ").push(NOTE_COLUMNS);

        let row = qb
            .build_query_as::<NoteRow>()
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    async fn delete(&self, user_id: &str, note_id: i64) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM notes WHERE id = $1 AND user_id = $2")
            .bind(note_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
