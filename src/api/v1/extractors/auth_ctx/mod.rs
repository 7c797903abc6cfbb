/*!
 * Authentication context extractor
 *
 * Responsibility:
 * - リクエスト単位の RequestScope / 認証済み Identity を handler に提供する
 * - HTTP / axum 依存は core に閉じ込め、型定義は types に分離する
 *
 * Public API:
 * - Identity, RequestScope, current_identity
 * - CurrentUser
 */

mod core;
mod types;

pub use core::CurrentUser;
pub use types::{Identity, RequestScope, current_identity};
