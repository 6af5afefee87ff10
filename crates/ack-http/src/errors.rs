//! Error type and conversions.
use ack_did::{DidError, DidResolutionError};
use ack_jwt::JwtError;
use ack_pay::PaymentError;
use ack_vc::{CredentialError, CredentialVerificationError, RevocationError};
use axum::{response::IntoResponse, Json};
use hyper::StatusCode;
use serde_json::json;
use thiserror::Error;

/// ACK HTTP error type.
#[derive(Error, Debug)]
pub enum AckHTTPError {
    #[error("{0}")]
    InternalError(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("{0}")]
    DidResolution(DidResolutionError),
    #[error("{0}")]
    Did(DidError),
    #[error("{0}")]
    CredentialVerification(CredentialVerificationError),
    #[error("{0}")]
    Payment(PaymentError),
    #[error("Failed to sign credential: {0}")]
    Credential(CredentialError),
    #[error("{0}")]
    Revocation(RevocationError),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("Server error: {0}")]
    Server(#[from] hyper::Error),
}

impl AckHTTPError {
    pub fn unauthorized(message: &str) -> Self {
        AckHTTPError::Unauthorized(message.to_string())
    }

    pub fn not_found(message: &str) -> Self {
        AckHTTPError::NotFound(message.to_string())
    }
}

impl From<DidResolutionError> for AckHTTPError {
    fn from(err: DidResolutionError) -> Self {
        AckHTTPError::DidResolution(err)
    }
}

impl From<DidError> for AckHTTPError {
    fn from(err: DidError) -> Self {
        AckHTTPError::Did(err)
    }
}

impl From<CredentialVerificationError> for AckHTTPError {
    fn from(err: CredentialVerificationError) -> Self {
        AckHTTPError::CredentialVerification(err)
    }
}

impl From<PaymentError> for AckHTTPError {
    fn from(err: PaymentError) -> Self {
        AckHTTPError::Payment(err)
    }
}

impl From<CredentialError> for AckHTTPError {
    fn from(err: CredentialError) -> Self {
        AckHTTPError::Credential(err)
    }
}

impl From<RevocationError> for AckHTTPError {
    fn from(err: RevocationError) -> Self {
        AckHTTPError::Revocation(err)
    }
}

impl From<JwtError> for AckHTTPError {
    fn from(err: JwtError) -> Self {
        AckHTTPError::Credential(CredentialError::from(err))
    }
}

impl From<ack_keys::KeyError> for AckHTTPError {
    fn from(err: ack_keys::KeyError) -> Self {
        AckHTTPError::Config(format!("Invalid issuer private key: {err}"))
    }
}

// Renders as `{"ok": false, "error": <message>}`.
impl IntoResponse for AckHTTPError {
    fn into_response(self) -> axum::response::Response {
        let (status, err_message) = match self {
            err @ AckHTTPError::InternalError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
            err @ AckHTTPError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            err @ AckHTTPError::DidResolution(_) => (StatusCode::BAD_REQUEST, err.to_string()),
            err @ AckHTTPError::Did(_) => (StatusCode::BAD_REQUEST, err.to_string()),
            err @ AckHTTPError::CredentialVerification(_) => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            err @ AckHTTPError::Payment(PaymentError::Signing(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
            err @ AckHTTPError::Payment(_) => (StatusCode::BAD_REQUEST, err.to_string()),
            err @ AckHTTPError::Credential(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
            err @ AckHTTPError::Revocation(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
            err @ AckHTTPError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, err.to_string()),
            err @ AckHTTPError::NotFound(_) => (StatusCode::NOT_FOUND, err.to_string()),
            err @ AckHTTPError::BadRequest(_) => (StatusCode::BAD_REQUEST, err.to_string()),
            err @ AckHTTPError::Server(_) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
        };
        let body = Json(json!({ "ok": false, "error": err_message }));
        (status, body).into_response()
    }
}
