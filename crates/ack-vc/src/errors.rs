//! Credential errors.
use ack_jwt::JwtError;
use thiserror::Error;

/// An error creating, signing or parsing a credential.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    /// The credential does not have the shape of a W3C credential.
    #[error("Invalid credential: {0}")]
    InvalidCredential(String),
    /// The value is not a compact JWT.
    #[error("Invalid JWT: {0}")]
    InvalidJwt(String),
    /// Signing or signature verification failed.
    #[error("JWT error: {0}")]
    Jwt(JwtError),
}

impl From<JwtError> for CredentialError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::InvalidJwt(message) => CredentialError::InvalidJwt(message),
            other => CredentialError::Jwt(other),
        }
    }
}

impl From<serde_json::Error> for CredentialError {
    fn from(err: serde_json::Error) -> Self {
        CredentialError::InvalidCredential(err.to_string())
    }
}

/// Kinds of [`CredentialVerificationError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CredentialErrorKind {
    InvalidCredential,
    InvalidControllerClaim,
    InvalidCredentialSubject,
    UnsupportedProofType,
    InvalidProof,
    CredentialExpired,
    CredentialRevoked,
    UntrustedIssuer,
    UnsupportedCredentialType,
}

impl CredentialErrorKind {
    pub fn default_message(&self) -> &'static str {
        match self {
            CredentialErrorKind::InvalidCredential => "Invalid credential",
            CredentialErrorKind::InvalidControllerClaim => "Invalid controller claim",
            CredentialErrorKind::InvalidCredentialSubject => "Invalid credential subject",
            CredentialErrorKind::UnsupportedProofType => "Unsupported proof type",
            CredentialErrorKind::InvalidProof => "Invalid proof",
            CredentialErrorKind::CredentialExpired => "Credential is expired",
            CredentialErrorKind::CredentialRevoked => "Credential is revoked",
            CredentialErrorKind::UntrustedIssuer => "Issuer is not a known trusted issuer",
            CredentialErrorKind::UnsupportedCredentialType => "Unsupported credential type",
        }
    }
}

/// A terminal failure of credential verification. Each variant carries its
/// human readable message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CredentialVerificationError {
    #[error("{0}")]
    InvalidCredential(String),
    #[error("{0}")]
    InvalidControllerClaim(String),
    #[error("{0}")]
    InvalidCredentialSubject(String),
    #[error("{0}")]
    UnsupportedProofType(String),
    #[error("{0}")]
    InvalidProof(String),
    #[error("{0}")]
    CredentialExpired(String),
    #[error("{0}")]
    CredentialRevoked(String),
    #[error("{0}")]
    UntrustedIssuer(String),
    #[error("{0}")]
    UnsupportedCredentialType(String),
}

impl CredentialVerificationError {
    /// Creates an error of `kind` with a custom message.
    pub fn new(kind: CredentialErrorKind, message: impl Into<String>) -> Self {
        let message = message.into();
        match kind {
            CredentialErrorKind::InvalidCredential => Self::InvalidCredential(message),
            CredentialErrorKind::InvalidControllerClaim => Self::InvalidControllerClaim(message),
            CredentialErrorKind::InvalidCredentialSubject => {
                Self::InvalidCredentialSubject(message)
            }
            CredentialErrorKind::UnsupportedProofType => Self::UnsupportedProofType(message),
            CredentialErrorKind::InvalidProof => Self::InvalidProof(message),
            CredentialErrorKind::CredentialExpired => Self::CredentialExpired(message),
            CredentialErrorKind::CredentialRevoked => Self::CredentialRevoked(message),
            CredentialErrorKind::UntrustedIssuer => Self::UntrustedIssuer(message),
            CredentialErrorKind::UnsupportedCredentialType => {
                Self::UnsupportedCredentialType(message)
            }
        }
    }

    pub fn kind(&self) -> CredentialErrorKind {
        match self {
            Self::InvalidCredential(_) => CredentialErrorKind::InvalidCredential,
            Self::InvalidControllerClaim(_) => CredentialErrorKind::InvalidControllerClaim,
            Self::InvalidCredentialSubject(_) => CredentialErrorKind::InvalidCredentialSubject,
            Self::UnsupportedProofType(_) => CredentialErrorKind::UnsupportedProofType,
            Self::InvalidProof(_) => CredentialErrorKind::InvalidProof,
            Self::CredentialExpired(_) => CredentialErrorKind::CredentialExpired,
            Self::CredentialRevoked(_) => CredentialErrorKind::CredentialRevoked,
            Self::UntrustedIssuer(_) => CredentialErrorKind::UntrustedIssuer,
            Self::UnsupportedCredentialType(_) => CredentialErrorKind::UnsupportedCredentialType,
        }
    }
}

impl From<CredentialErrorKind> for CredentialVerificationError {
    fn from(kind: CredentialErrorKind) -> Self {
        Self::new(kind, kind.default_message())
    }
}

/// Parsing failures surface as invalid proofs when the signature chain is at
/// fault, and as invalid credentials otherwise.
impl From<CredentialError> for CredentialVerificationError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::Jwt(_) => Self::InvalidProof(err.to_string()),
            CredentialError::InvalidCredential(_) | CredentialError::InvalidJwt(_) => {
                Self::InvalidCredential(err.to_string())
            }
        }
    }
}

/// An error reading or updating a status list.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RevocationError {
    #[error("Status list index must be a positive integer starting from 1, got {0}")]
    InvalidStatusListIndex(i64),
    #[error("Status list index {0} is out of range for a list of {1} entries")]
    IndexOutOfRange(usize, usize),
    #[error("Invalid bit string: {0}")]
    InvalidBitString(String),
    #[error("Failed to encode status list: {0}")]
    Encoding(String),
    #[error("Failed to decode status list: {0}")]
    Decoding(String),
    #[error("Status list unavailable: {0}")]
    StatusListUnavailable(String),
}
