/*
 * Responsibility
 * - データアクセスの trait (UserRepository / NoteRepository) と PostgreSQL 実装
 * - 実装は起動時に 1 つだけ AppState に束ねる
 */
pub mod error;
pub mod note_repo;
pub mod user_repo;

#[cfg(test)]
pub mod memory;

pub use note_repo::{NoteRepository, PgNoteRepository};
pub use user_repo::{PgUserRepository, UserRepository};
