//! Auth gate: verify the `Authorization` header and put a `RequestScope` into the
//! request extensions.
//!
//! - No header / empty value: anonymous scope, request continues (authentication is
//!   not enforced here)
//! - `Bearer <token>` or a bare `<token>`: verified by `CredentialCodec`; on success the
//!   scope carries the `Identity`
//! - Verification failure: the handler is not called; 403 (FORBIDDEN, "Invalid token")
//!
//! The scope only lives in the request's extensions, so it is created with the request
//! and dropped with it on completion, error, panic, or cancellation (future drop).

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::{Identity, RequestScope};
use crate::error::AppError;
use crate::services::auth::{CredentialCodec, InvalidCredential};

const BEARER_PREFIX: &str = "Bearer ";

/// Put the auth gate in front of every route of `router`.
///
/// Example:
/// ```ignore
/// let v1 = api::v1::routes();
/// let v1 = middleware::auth::access::apply(v1, state.auth.clone());
/// app = app.nest("/api/v1", v1);
/// ```
pub fn apply<S>(router: Router<S>, codec: Arc<CredentialCodec>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(middleware::from_fn_with_state(codec, access_middleware))
}

/// What the request presented in `Authorization`.
#[derive(Debug, PartialEq, Eq)]
enum Presented<'a> {
    Nothing,
    Credential(&'a str),
    /// Present but not representable as a string (non-visible ASCII)
    Unreadable,
}

fn presented_credential(headers: &HeaderMap) -> Presented<'_> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Presented::Nothing;
    };
    if value.is_empty() {
        return Presented::Nothing;
    }
    match value.to_str() {
        // "Bearer " with nothing after it stays a (blank) credential and is rejected by the codec
        Ok(raw) => Presented::Credential(raw.strip_prefix(BEARER_PREFIX).unwrap_or(raw)),
        Err(_) => Presented::Unreadable,
    }
}

/// Decide the scope for one request. Strictly sequential: read → validate → attach.
fn resolve_scope(
    codec: &CredentialCodec,
    headers: &HeaderMap,
) -> Result<RequestScope, InvalidCredential> {
    let scope = RequestScope::anonymous();

    match presented_credential(headers) {
        Presented::Nothing => Ok(scope),
        Presented::Unreadable => Err(InvalidCredential),
        Presented::Credential(raw) => {
            let claims = codec.validate(raw)?;
            Ok(scope.attach(Identity::new(claims.sub).with_email(claims.email)))
        }
    }
}

async fn access_middleware(
    State(codec): State<Arc<CredentialCodec>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let scope = resolve_scope(&codec, req.headers()).map_err(|_| {
        tracing::debug!("credential rejected");
        AppError::InvalidToken
    })?;

    tracing::debug!(authenticated = scope.is_authenticated(), "request scope resolved");

    // Always overwrite: a scope set before the gate must not survive
    req.extensions_mut().insert(scope);

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::{http::StatusCode, routing::get};
    use tokio::task::JoinSet;
    use tower::ServiceExt;

    use crate::api::v1::extractors::current_identity;
    use crate::test_support::{
        body_string, codec, expired_token_for, now, sign_hs256, token_for,
    };

    const REJECTION: &str =
        r#"{"data":null,"errors":[{"message":"Invalid token","extensions":{"code":"FORBIDDEN"}}]}"#;

    async fn whoami(scope: RequestScope) -> String {
        current_identity(&scope)
            .map(|identity| identity.id.clone())
            .unwrap_or_else(|| "anonymous".to_string())
    }

    /// Router whose handler echoes the caller and counts invocations.
    fn test_app(hits: Arc<AtomicUsize>) -> Router {
        let router = Router::new().route(
            "/whoami",
            get(move |scope: RequestScope| {
                let hits = hits.clone();
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    whoami(scope).await
                }
            }),
        );
        apply(router, codec())
    }

    fn request(authorization: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri("/whoami");
        if let Some(value) = authorization {
            builder = builder.header("Authorization", value);
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn send(authorization: Option<&str>) -> (StatusCode, String, usize) {
        let hits = Arc::new(AtomicUsize::new(0));
        let response = test_app(hits.clone())
            .oneshot(request(authorization))
            .await
            .unwrap();
        let status = response.status();
        (status, body_string(response).await, hits.load(Ordering::SeqCst))
    }

    #[tokio::test]
    async fn missing_header_passes_through_anonymously() {
        let (status, body, hits) = send(None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "anonymous");
        assert_eq!(hits, 1);
    }

    #[tokio::test]
    async fn empty_header_passes_through_anonymously() {
        let (status, body, hits) = send(Some("")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "anonymous");
        assert_eq!(hits, 1);
    }

    #[tokio::test]
    async fn bearer_token_attaches_identity() {
        let (status, body, hits) = send(Some(&format!("Bearer {}", token_for("u1")))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "u1");
        assert_eq!(hits, 1);
    }

    #[tokio::test]
    async fn raw_token_without_scheme_is_accepted() {
        let (status, body, _) = send(Some(&token_for("u1"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "u1");
    }

    #[tokio::test]
    async fn bad_signature_is_rejected_without_calling_the_handler() {
        let forged = sign_hs256(
            &serde_json::json!({ "sub": "u1", "exp": now() + 600 }),
            "not-the-server-secret",
        );
        let hits = Arc::new(AtomicUsize::new(0));
        let response = test_app(hits.clone())
            .oneshot(request(Some(&format!("Bearer {forged}"))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(response.headers()["content-type"], "application/json");
        assert_eq!(body_string(response).await, REJECTION);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn expired_token_is_rejected_the_same_way() {
        let (status, body, hits) =
            send(Some(&format!("Bearer {}", expired_token_for("u1")))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, REJECTION);
        assert_eq!(hits, 0);
    }

    #[tokio::test]
    async fn scheme_prefix_without_token_is_rejected_not_anonymous() {
        let (status, body, hits) = send(Some("Bearer ")).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, REJECTION);
        assert_eq!(hits, 0);
    }

    #[tokio::test]
    async fn scheme_prefix_is_case_sensitive() {
        let (status, _, hits) = send(Some(&format!("bearer {}", token_for("u1")))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(hits, 0);
    }

    #[tokio::test]
    async fn unreadable_header_is_rejected() {
        let hits = Arc::new(AtomicUsize::new(0));
        let mut req = request(None);
        req.headers_mut().insert(
            header::AUTHORIZATION,
            axum::http::HeaderValue::from_bytes(b"Bearer \xff\xfe").unwrap(),
        );
        let response = test_app(hits.clone()).oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn client_supplied_scope_is_overwritten() {
        let hits = Arc::new(AtomicUsize::new(0));
        let mut req = request(None);
        req.extensions_mut()
            .insert(RequestScope::anonymous().attach(Identity::new("intruder")));
        let response = test_app(hits).oneshot(req).await.unwrap();
        assert_eq!(body_string(response).await, "anonymous");
    }

    #[tokio::test]
    async fn retried_request_resolves_the_same_identity() {
        let token = format!("Bearer {}", token_for("u1"));
        let (_, first, _) = send(Some(&token)).await;
        let (_, second, _) = send(Some(&token)).await;
        assert_eq!(first, "u1");
        assert_eq!(first, second);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_requests_never_see_each_others_identity() {
        let app = test_app(Arc::new(AtomicUsize::new(0)));
        let mut tasks = JoinSet::new();

        for i in 0..200 {
            let app = app.clone();
            tasks.spawn(async move {
                // every third request is anonymous, the rest carry their own subject
                let expected = if i % 3 == 0 {
                    "anonymous".to_string()
                } else {
                    format!("user-{i}")
                };
                let authorization =
                    (i % 3 != 0).then(|| format!("Bearer {}", token_for(&expected)));

                tokio::task::yield_now().await;
                let response = app
                    .oneshot(request(authorization.as_deref()))
                    .await
                    .unwrap();
                (expected, body_string(response).await)
            });
        }

        let mut seen = 0;
        while let Some(joined) = tasks.join_next().await {
            let (expected, actual) = joined.unwrap();
            assert_eq!(expected, actual);
            seen += 1;
        }
        assert_eq!(seen, 200);
    }

    #[test]
    fn presented_credential_strips_only_the_exact_prefix() {
        let mut headers = HeaderMap::new();
        assert_eq!(presented_credential(&headers), Presented::Nothing);

        headers.insert(header::AUTHORIZATION, "Bearer abc".parse().unwrap());
        assert_eq!(presented_credential(&headers), Presented::Credential("abc"));

        headers.insert(header::AUTHORIZATION, "Bearer ".parse().unwrap());
        assert_eq!(presented_credential(&headers), Presented::Credential(""));

        headers.insert(header::AUTHORIZATION, "Basic abc".parse().unwrap());
        assert_eq!(
            presented_credential(&headers),
            Presented::Credential("Basic abc")
        );
    }

    #[test]
    fn resolved_scope_is_authenticated_only_with_a_valid_credential() {
        let codec = codec();
        let mut headers = HeaderMap::new();
        assert!(!resolve_scope(&codec, &headers).unwrap().is_authenticated());

        let bearer = format!("Bearer {}", token_for("u1"));
        headers.insert(header::AUTHORIZATION, bearer.parse().unwrap());
        let scope = resolve_scope(&codec, &headers).unwrap();
        assert!(scope.is_authenticated());
        assert_eq!(scope.identity().map(|i| i.id.as_str()), Some("u1"));

        headers.insert(header::AUTHORIZATION, "Bearer nope".parse().unwrap());
        assert_eq!(resolve_scope(&codec, &headers).unwrap_err(), InvalidCredential);
    }
}
