/*
 * Responsibility
 * - Config から process 全体で共有する CredentialCodec を組み立てる
 */
use std::sync::Arc;

use crate::config::Config;
use crate::services::auth::credential::{CodecError, CredentialCodec, VerificationPolicy};

pub fn build_credential_codec(config: &Config) -> Result<Arc<CredentialCodec>, CodecError> {
    let policy = VerificationPolicy {
        issuer: config.auth_issuer.clone(),
        audience: config.auth_audience.clone(),
        leeway_seconds: config.access_token_leeway_seconds,
    };

    let codec = CredentialCodec::new(&config.verification_key, &policy)?;

    Ok(Arc::new(codec))
}
