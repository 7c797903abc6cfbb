/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth (認証ゲート), cors, http (request-id/trace/timeout/panic), security_headers
 */
pub mod auth;
pub mod cors;
pub mod http;
pub mod security_headers;
