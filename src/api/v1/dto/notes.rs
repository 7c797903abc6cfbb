/*
 * Responsibility
 * - Notes の request/response DTO
 * - id は encode 済みの公開 ID を返す (内部 ID を漏らさない)
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::repos::note_repo::{NewNote, NotePatch};

#[derive(Debug, Deserialize)]
pub struct CreateNoteRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub text: String,
}

impl CreateNoteRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.title.trim().is_empty() {
            return Err("title is required");
        }
        Ok(())
    }

    pub fn as_new_note(&self) -> NewNote<'_> {
        NewNote {
            title: self.title.trim(),
            description: &self.description,
            text: &self.text,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateNoteRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub text: Option<String>,
}

impl UpdateNoteRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if let Some(title) = &self.title
            && title.trim().is_empty()
        {
            return Err("title cannot be empty");
        }
        Ok(())
    }

    pub fn as_patch(&self) -> NotePatch<'_> {
        NotePatch {
            title: self.title.as_deref().map(str::trim),
            description: self.description.as_deref(),
            text: self.text.as_deref(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NoteResponse {
    pub id: String, // encoded
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
