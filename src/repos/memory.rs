/*
 * Responsibility
 * - UserRepository / NoteRepository の in-memory 実装 (test 専用)
 * - PostgreSQL 実装と同じ意味 (email 一意 / note は所有者で絞り込み / FK 相当) を再現する
 */
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicI64, Ordering},
};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::repos::error::{RepoError, RepoResult};
use crate::repos::note_repo::{NewNote, NotePatch, NoteRepository, NoteRow};
use crate::repos::user_repo::{UserPatch, UserRepository, UserRow};

#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    rows: Mutex<Vec<UserRow>>,
}

impl InMemoryUserRepository {
    /// Insert a row with a caller-chosen id (tokens in tests name the subject up front).
    pub fn insert_with_id(&self, id: &str, email: &str, fullname: &str) {
        let now = Utc::now();
        self.rows.lock().unwrap().push(UserRow {
            id: id.to_string(),
            email: email.to_string(),
            fullname: fullname.to_string(),
            created_at: now,
            updated_at: now,
        });
    }

    fn exists(&self, id: &str) -> bool {
        self.rows.lock().unwrap().iter().any(|u| u.id == id)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn list(&self) -> RepoResult<Vec<UserRow>> {
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn create(&self, email: &str, fullname: &str) -> RepoResult<UserRow> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|u| u.email == email) {
            return Err(RepoError::Conflict);
        }
        let now = Utc::now();
        let row = UserRow {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            fullname: fullname.to_string(),
            created_at: now,
            updated_at: now,
        };
        rows.push(row.clone());
        Ok(row)
    }

    async fn get(&self, user_id: &str) -> RepoResult<Option<UserRow>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == user_id)
            .cloned())
    }

    async fn get_by_email(&self, email: &str) -> RepoResult<Option<UserRow>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn update(&self, user_id: &str, patch: UserPatch<'_>) -> RepoResult<Option<UserRow>> {
        if patch.is_empty() {
            return self.get(user_id).await;
        }
        let mut rows = self.rows.lock().unwrap();
        if let Some(email) = patch.email
            && rows.iter().any(|u| u.email == email && u.id != user_id)
        {
            return Err(RepoError::Conflict);
        }
        let Some(row) = rows.iter_mut().find(|u| u.id == user_id) else {
            return Ok(None);
        };
        if let Some(email) = patch.email {
            row.email = email.to_string();
        }
        if let Some(fullname) = patch.fullname {
            row.fullname = fullname.to_string();
        }
        row.updated_at = Utc::now();
        Ok(Some(row.clone()))
    }

    async fn delete(&self, user_id: &str) -> RepoResult<bool> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|u| u.id != user_id);
        Ok(rows.len() != before)
    }
}

#[derive(Debug)]
pub struct InMemoryNoteRepository {
    users: Arc<InMemoryUserRepository>,
    rows: Mutex<Vec<NoteRow>>,
    next_id: AtomicI64,
}

impl InMemoryNoteRepository {
    pub fn new(users: Arc<InMemoryUserRepository>) -> Self {
        Self {
            users,
            rows: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

#[async_trait]
impl NoteRepository for InMemoryNoteRepository {
    async fn list(&self, user_id: &str) -> RepoResult<Vec<NoteRow>> {
        let mut notes: Vec<NoteRow> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect();
        notes.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(notes)
    }

    async fn create(&self, user_id: &str, note: NewNote<'_>) -> RepoResult<NoteRow> {
        if !self.users.exists(user_id) {
            return Err(RepoError::MissingReference);
        }
        let now = Utc::now();
        let row = NoteRow {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            user_id: user_id.to_string(),
            title: note.title.to_string(),
            description: note.description.to_string(),
            text: note.text.to_string(),
            created_at: now,
            updated_at: now,
        };
        self.rows.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn get(&self, user_id: &str, note_id: i64) -> RepoResult<Option<NoteRow>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|n| n.id == note_id && n.user_id == user_id)
            .cloned())
    }

    async fn update(
        &self,
        user_id: &str,
        note_id: i64,
        patch: NotePatch<'_>,
    ) -> RepoResult<Option<NoteRow>> {
        let mut rows = self.rows.lock().unwrap();
        let Some(row) = rows
            .iter_mut()
            .find(|n| n.id == note_id && n.user_id == user_id)
        else {
            return Ok(None);
        };
        if let Some(title) = patch.title {
            row.title = title.to_string();
        }
        if let Some(description) = patch.description {
            row.description = description.to_string();
        }
        if let Some(text) = patch.text {
            row.text = text.to_string();
        }
        row.updated_at = Utc::now();
        Ok(Some(row.clone()))
    }

    async fn delete(&self, user_id: &str, note_id: i64) -> RepoResult<bool> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|n| !(n.id == note_id && n.user_id == user_id));
        Ok(rows.len() != before)
    }
}
