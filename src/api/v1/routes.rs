/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - /health, /users, /notes
 * - 認証ゲートは app.rs で v1 全体に掛ける。Identity が必須かどうかは handler の extractor で決まる
 */
use axum::{Router, routing::get};

use crate::state::AppState;

use crate::api::v1::handlers::{
    health::health,
    notes::{create_note, delete_note, get_note, list_notes, update_note},
    users::{create_user, delete_user, get_user, list_users, me, update_user},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/users", get(list_users).post(create_user))
        .route("/users/me", get(me))
        .route(
            "/users/{user_id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/notes", get(list_notes).post(create_note))
        .route(
            "/notes/{note_id}",
            get(get_note).put(update_note).delete(delete_note),
        )
}
