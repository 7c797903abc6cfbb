/*
 * Responsibility
 * - request/response DTO
 * - 成功時の envelope `{ "data": ... }` (エラー側は error.rs の ErrorResponse)
 */
use serde::Serialize;

pub mod notes;
pub mod users;

#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}
