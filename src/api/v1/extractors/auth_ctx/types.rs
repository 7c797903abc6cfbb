/*
 * Responsibility
 * - Handler から見える「認証済み主体」(Identity) と、リクエスト単位のスコープ (RequestScope) の型
 * - middleware が検証して request extensions に格納し、handler はこの型だけを受け取る
 *
 * Notes
 * - JWT の検証ロジックは services/middleware 側の責務
 * - RequestScope は Request 値と一緒に運ばれ、Request と一緒に drop される
 *   (スレッドローカルやグローバルな表は使わない)
 */
use std::sync::Arc;

/// Authenticated subject of one request. Never mutated after creation.
///
/// - `id` is the credential's subject, treated as an opaque string
/// - `email` is carried when the credential has it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: String,
    pub email: Option<String>,
}

impl Identity {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: None,
        }
    }

    pub fn with_email(mut self, email: Option<String>) -> Self {
        self.email = email;
        self
    }
}

/// Immutable per-request value bag holding at most one `Identity`.
///
/// `attach` returns a derived scope and leaves `self` untouched, so a scope
/// already handed to other code can never change under it.
#[derive(Debug, Clone, Default)]
pub struct RequestScope {
    identity: Option<Arc<Identity>>,
}

impl RequestScope {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn attach(&self, identity: Identity) -> Self {
        Self {
            identity: Some(Arc::new(identity)),
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }
}

/// Who is calling, as established by the auth middleware for this request.
///
/// `None` means anonymous; deciding whether that is acceptable is up to the caller.
pub fn current_identity(scope: &RequestScope) -> Option<&Identity> {
    scope.identity()
}
