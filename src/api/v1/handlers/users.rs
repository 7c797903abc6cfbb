/*
 * Responsibility
 * - /users 系 CRUD handler
 * - 作成・参照は anonymous でも可、更新・削除は本人 (Identity.id == user_id) のみ
 * - /users/me は CurrentUser から本人の行を返す
 */
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    api::v1::{
        dto::{
            DataResponse,
            users::{CreateUserRequest, UpdateUserRequest, UserResponse},
        },
        extractors::{CurrentUser, Identity},
    },
    error::AppError,
    state::AppState,
};

type UserJson = Json<DataResponse<UserResponse>>;

fn ensure_self(identity: &Identity, user_id: &str) -> Result<(), AppError> {
    if identity.id == user_id {
        Ok(())
    } else {
        Err(AppError::forbidden("cannot modify another user"))
    }
}

pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<DataResponse<Vec<UserResponse>>>, AppError> {
    let rows = state.users.list().await?;
    let res = rows.into_iter().map(UserResponse::from).collect();

    Ok(Json(DataResponse::new(res)))
}

pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, UserJson), AppError> {
    req.validate()
        .map_err(|m| AppError::bad_request("BAD_USER_INPUT", m))?;

    let email = req.email.trim();
    if state.users.get_by_email(email).await?.is_some() {
        return Err(AppError::Conflict("email already registered".into()));
    }

    let row = state.users.create(email, req.fullname.trim()).await?;
    tracing::info!(user_id = %row.id, "user created");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse::new(UserResponse::from(row))),
    ))
}

pub async fn me(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
) -> Result<UserJson, AppError> {
    let row = state
        .users
        .get(&identity.id)
        .await?
        .ok_or(AppError::not_found("user"))?;

    Ok(Json(DataResponse::new(row.into())))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<UserJson, AppError> {
    let row = state
        .users
        .get(&user_id)
        .await?
        .ok_or(AppError::not_found("user"))?;

    Ok(Json(DataResponse::new(row.into())))
}

pub async fn update_user(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(user_id): Path<String>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<UserJson, AppError> {
    ensure_self(&identity, &user_id)?;
    req.validate()
        .map_err(|m| AppError::bad_request("BAD_USER_INPUT", m))?;

    let row = state
        .users
        .update(&user_id, req.as_patch())
        .await?
        .ok_or(AppError::not_found("user"))?;

    Ok(Json(DataResponse::new(row.into())))
}

pub async fn delete_user(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(user_id): Path<String>,
) -> Result<StatusCode, AppError> {
    ensure_self(&identity, &user_id)?;

    if state.users.delete(&user_id).await? {
        tracing::info!(user_id = %user_id, "user deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("user"))
    }
}
