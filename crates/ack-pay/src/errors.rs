use ack_jwt::JwtError;
use ack_vc::{CredentialErrorKind, CredentialVerificationError};
use thiserror::Error;

/// An error building or verifying payment requests, tokens and receipts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PaymentError {
    /// The payment token failed verification. Carries no detail of why.
    #[error("{0}")]
    InvalidPaymentToken(String),
    /// The payment request does not have a valid shape.
    #[error("Invalid payment request: {0}")]
    InvalidPaymentRequest(String),
    /// Signing a payment token failed.
    #[error("Failed to sign payment token: {0}")]
    Signing(JwtError),
    /// The receipt credential failed verification.
    #[error("{0}")]
    Verification(CredentialVerificationError),
}

impl PaymentError {
    pub fn invalid_payment_token() -> Self {
        PaymentError::InvalidPaymentToken("Invalid payment token".to_string())
    }

    /// The kind of credential verification failure, if this is one.
    pub fn verification_kind(&self) -> Option<CredentialErrorKind> {
        match self {
            PaymentError::Verification(err) => Some(err.kind()),
            _ => None,
        }
    }
}

impl From<JwtError> for PaymentError {
    fn from(err: JwtError) -> Self {
        PaymentError::Signing(err)
    }
}

impl From<CredentialVerificationError> for PaymentError {
    fn from(err: CredentialVerificationError) -> Self {
        PaymentError::Verification(err)
    }
}

impl From<CredentialErrorKind> for PaymentError {
    fn from(kind: CredentialErrorKind) -> Self {
        PaymentError::Verification(kind.into())
    }
}
