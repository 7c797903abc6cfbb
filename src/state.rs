/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - users / notes repository (trait object, 実装は起動時に 1 つ), id_codec, 認証 codec
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 * - リクエストごとの値 (RequestScope) はここに置かない
 */
use std::sync::Arc;

use crate::repos::{NoteRepository, UserRepository};
use crate::services::{auth::CredentialCodec, id_codec::IdCodec};

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub notes: Arc<dyn NoteRepository>,
    pub id_codec: IdCodec,
    pub auth: Arc<CredentialCodec>,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserRepository>,
        notes: Arc<dyn NoteRepository>,
        id_codec: IdCodec,
        auth: Arc<CredentialCodec>,
    ) -> Self {
        Self {
            users,
            notes,
            id_codec,
            auth,
        }
    }
}
