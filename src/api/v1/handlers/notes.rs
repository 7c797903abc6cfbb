/*
 * Responsibility
 * - /notes 系 CRUD handler (全て CurrentUser 必須)
 * - Path の {note_id} は公開 ID → extractor で復号して内部 ID を受け取る
 * - repo には常に Identity.id を渡し、他人の note は 404 として見せる
 */
use axum::{Json, extract::State, http::StatusCode};

use crate::{
    api::v1::{
        dto::{
            DataResponse,
            notes::{CreateNoteRequest, NoteResponse, UpdateNoteRequest},
        },
        extractors::{CurrentUser, public_id::PublicNoteId},
    },
    error::AppError,
    repos::note_repo::NoteRow,
    state::AppState,
};

type NoteJson = Json<DataResponse<NoteResponse>>;

fn row_to_response(state: &AppState, row: NoteRow) -> Result<NoteResponse, AppError> {
    Ok(NoteResponse {
        id: state.id_codec.encode(row.id)?,
        user_id: row.user_id,
        title: row.title,
        description: row.description,
        text: row.text,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

pub async fn list_notes(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
) -> Result<Json<DataResponse<Vec<NoteResponse>>>, AppError> {
    let rows = state.notes.list(&identity.id).await?;

    let mut res = Vec::with_capacity(rows.len());
    for row in rows {
        res.push(row_to_response(&state, row)?);
    }

    Ok(Json(DataResponse::new(res)))
}

pub async fn create_note(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Json(req): Json<CreateNoteRequest>,
) -> Result<(StatusCode, NoteJson), AppError> {
    req.validate()
        .map_err(|m| AppError::bad_request("BAD_USER_INPUT", m))?;

    let row = state.notes.create(&identity.id, req.as_new_note()).await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse::new(row_to_response(&state, row)?)),
    ))
}

pub async fn get_note(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    note_id: PublicNoteId,
) -> Result<NoteJson, AppError> {
    let row = state
        .notes
        .get(&identity.id, note_id.id)
        .await?
        .ok_or(AppError::not_found("note"))?;

    Ok(Json(DataResponse::new(row_to_response(&state, row)?)))
}

pub async fn update_note(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    note_id: PublicNoteId,
    Json(req): Json<UpdateNoteRequest>,
) -> Result<NoteJson, AppError> {
    req.validate()
        .map_err(|m| AppError::bad_request("BAD_USER_INPUT", m))?;

    let row = state
        .notes
        .update(&identity.id, note_id.id, req.as_patch())
        .await?
        .ok_or(AppError::not_found("note"))?;

    Ok(Json(DataResponse::new(row_to_response(&state, row)?)))
}

pub async fn delete_note(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    note_id: PublicNoteId,
) -> Result<StatusCode, AppError> {
    if state.notes.delete(&identity.id, note_id.id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("note"))
    }
}
