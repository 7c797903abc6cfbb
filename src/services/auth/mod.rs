pub mod credential;
pub mod factory;

pub use credential::{Claims, CredentialCodec, InvalidCredential, VerificationKey};
pub use factory::build_credential_codec;
