/*
 * Responsibility
 * - access credential (JWT) の検証 (署名 / exp / 設定時は iss・aud の存在と一致)
 * - 検証鍵は起動時に 1 度だけ読み込む (HS256 secret or Ed25519 公開鍵)
 * - 失敗理由は全て InvalidCredential に潰す (呼び出し側に理由は返さない)
 *
 * 置かないもの
 *  - ヘッダの読み取り / anonymous 扱いの判断 (middleware 側)
 */
use std::fmt;

use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use thiserror::Error;

/// Key material used to verify credential signatures.
///
/// The algorithm is fixed by the key kind, so a token signed with any other
/// algorithm is rejected.
#[derive(Clone, PartialEq, Eq)]
pub enum VerificationKey {
    /// HMAC shared secret (HS256)
    Secret(String),
    /// Ed25519 public key in SPKI PEM (EdDSA)
    Ed25519PublicPem(String),
}

impl fmt::Debug for VerificationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        match self {
            Self::Secret(_) => f.write_str("Secret([REDACTED])"),
            Self::Ed25519PublicPem(_) => f.write_str("Ed25519PublicPem(..)"),
        }
    }
}

/// Claim checks applied on top of signature + `exp`.
#[derive(Debug, Clone, Default)]
pub struct VerificationPolicy {
    pub issuer: Option<String>,
    pub audience: Option<String>,
    pub leeway_seconds: u64,
}

/// Startup failure while building the codec. Fatal: the server must not start.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("verification secret must not be empty")]
    EmptySecret,
    #[error("invalid ed25519 public key pem: {0}")]
    InvalidPublicKey(#[source] jsonwebtoken::errors::Error),
}

/// The single, reason-less verification failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid credential")]
pub struct InvalidCredential;

/// Verified credential payload.
#[derive(Debug, Clone, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: u64,

    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Clone)]
pub struct CredentialCodec {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl fmt::Debug for CredentialCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialCodec")
            .field("validation", &self.validation)
            .finish()
    }
}

impl CredentialCodec {
    pub fn new(key: &VerificationKey, policy: &VerificationPolicy) -> Result<Self, CodecError> {
        let (decoding_key, algorithm) = match key {
            VerificationKey::Secret(secret) => {
                if secret.is_empty() {
                    return Err(CodecError::EmptySecret);
                }
                (DecodingKey::from_secret(secret.as_bytes()), Algorithm::HS256)
            }
            VerificationKey::Ed25519PublicPem(pem) => (
                DecodingKey::from_ed_pem(pem.as_bytes()).map_err(CodecError::InvalidPublicKey)?,
                Algorithm::EdDSA,
            ),
        };

        let mut validation = Validation::new(algorithm);
        validation.leeway = policy.leeway_seconds;

        // A configured issuer/audience must also be present, not just match when present
        let mut required = vec!["exp", "sub"];
        if let Some(issuer) = &policy.issuer {
            validation.set_issuer(&[issuer]);
            required.push("iss");
        }
        match &policy.audience {
            Some(audience) => {
                validation.set_audience(&[audience]);
                required.push("aud");
            }
            // A token carrying `aud` would otherwise fail when no audience is configured
            None => validation.validate_aud = false,
        }
        validation.set_required_spec_claims(&required);

        Ok(Self {
            decoding_key,
            validation,
        })
    }

    /// Verify `raw` and return its claims.
    ///
    /// An empty string is always invalid; whether a missing credential means
    /// "anonymous" is the caller's decision.
    pub fn validate(&self, raw: &str) -> Result<Claims, InvalidCredential> {
        if raw.is_empty() {
            return Err(InvalidCredential);
        }

        let data = jsonwebtoken::decode::<Claims>(raw, &self.decoding_key, &self.validation)
            .map_err(|_| InvalidCredential)?;

        if data.claims.sub.trim().is_empty() {
            return Err(InvalidCredential);
        }

        Ok(data.claims)
    }
}
