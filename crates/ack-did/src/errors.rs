//! DID error types.
use ack_keys::{KeyError, KeypairAlgorithm};
use thiserror::Error;

/// Machine readable kind of a [`DidResolutionError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DidErrorKind {
    InvalidDidUri,
    UnsupportedDidMethod,
    DidDocumentNotFound,
    InvalidDidController,
}

/// An error resolving a DID to its document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DidResolutionError {
    #[error("Invalid DID URI: {0}")]
    InvalidDidUri(String),
    #[error("Unsupported DID method: {0}")]
    UnsupportedDidMethod(String),
    #[error("DID document not found: {0}")]
    DidDocumentNotFound(String),
    #[error("Invalid DID controller: {0}")]
    InvalidDidController(String),
}

impl DidResolutionError {
    pub fn kind(&self) -> DidErrorKind {
        match self {
            DidResolutionError::InvalidDidUri(_) => DidErrorKind::InvalidDidUri,
            DidResolutionError::UnsupportedDidMethod(_) => DidErrorKind::UnsupportedDidMethod,
            DidResolutionError::DidDocumentNotFound(_) => DidErrorKind::DidDocumentNotFound,
            DidResolutionError::InvalidDidController(_) => DidErrorKind::InvalidDidController,
        }
    }
}

/// An error constructing a DID or DID document.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DidError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("Invalid did:key URI: {0}")]
    InvalidDidKey(String),
    #[error("Invalid did:pkh URI: {0}")]
    InvalidDidPkh(String),
    #[error("Invalid CAIP-2 chain ID: {0}")]
    InvalidChainId(String),
    #[error("Invalid keypair algorithm. Expected {0} for chain {1}")]
    AlgorithmMismatch(KeypairAlgorithm, String),
    #[error("Key error: {0}")]
    Key(KeyError),
}

impl From<KeyError> for DidError {
    fn from(err: KeyError) -> Self {
        DidError::Key(err)
    }
}

impl From<url::ParseError> for DidError {
    fn from(err: url::ParseError) -> Self {
        DidError::InvalidUrl(err.to_string())
    }
}
