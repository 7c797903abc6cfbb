/*
 * Responsibility
 * - extensions の RequestScope を handler に渡す extractor (RequestScope / CurrentUser)
 * - 認証の強制はここ (CurrentUser) で行い、gate では行わない
 */
use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;

use super::{Identity, RequestScope};

fn scope_of(parts: &Parts) -> RequestScope {
    parts
        .extensions
        .get::<RequestScope>()
        .cloned()
        .unwrap_or_default()
}

/// Handler で RequestScope をそのまま受け取る。
/// middleware を通っていないリクエストは anonymous として扱う。
impl<S> FromRequestParts<S> for RequestScope
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(scope_of(parts))
    }
}

/// 認証済みの Identity を必須とする extractor
/// Identity が無い (anonymous) 場合は 401 (UNAUTHENTICATED) を返す
pub struct CurrentUser(pub Identity);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        scope_of(parts)
            .identity()
            .cloned()
            .map(CurrentUser)
            .ok_or(AppError::Unauthenticated)
    }
}
