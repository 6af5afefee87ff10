//! JWT error type.
use ack_keys::KeyError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JwtError {
    /// Not a three segment token, or a segment failed to decode.
    #[error("Invalid JWT: {0}")]
    InvalidJwt(String),
    #[error("Unsupported algorithm: '{0}'")]
    UnsupportedAlgorithm(String),
    #[error("JWT iss is required")]
    MissingIssuer,
    #[error("resolver_error: {0}")]
    ResolverError(String),
    #[error("no_suitable_keys: {0}")]
    NoSuitableKeys(String),
    #[error("invalid_signature: Signature invalid for JWT")]
    InvalidSignature,
    #[error("invalid_jwt: JWT has expired: exp: {0}")]
    Expired(i64),
    #[error("invalid_jwt: JWT not valid before nbf: {0}")]
    NotYetValid(i64),
    #[error("invalid_jwt: JWT not valid yet (issued in the future) iat: {0}")]
    IssuedInFuture(i64),
    #[error("Failed to serialize JWT: {0}")]
    Serialization(String),
    #[error("Key error: {0}")]
    Key(KeyError),
}

impl From<KeyError> for JwtError {
    fn from(err: KeyError) -> Self {
        JwtError::Key(err)
    }
}

impl From<serde_json::Error> for JwtError {
    fn from(err: serde_json::Error) -> Self {
        JwtError::Serialization(err.to_string())
    }
}
