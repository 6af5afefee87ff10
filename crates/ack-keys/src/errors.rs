//! Key error type.
use thiserror::Error;

/// An error relating to keys, encodings or signatures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    /// Private key bytes were rejected by the curve implementation.
    #[error("Invalid private key for {0}.")]
    InvalidPrivateKey(String),
    /// Public key bytes were rejected by the curve implementation.
    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),
    /// Unexpected key length.
    #[error("Invalid key length for {0}. Expected {1} bytes, got {2}")]
    InvalidKeyLength(String, usize, usize),
    /// Signature bytes could not be parsed.
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),
    /// Signing failed.
    #[error("Failed to sign: {0}")]
    SigningFailure(String),
    /// Unsupported algorithm.
    #[error("Unsupported algorithm: '{0}'")]
    UnsupportedAlgorithm(String),
    /// Encoded value could not be decoded.
    #[error("Failed to decode {0}: {1}")]
    Decoding(String, String),
    /// Unsupported multibase prefix.
    #[error("Unsupported multibase prefix: {0}")]
    UnsupportedMultibasePrefix(String),
}

impl From<hex::FromHexError> for KeyError {
    fn from(err: hex::FromHexError) -> Self {
        KeyError::Decoding("hex".to_string(), err.to_string())
    }
}

impl From<bs58::decode::Error> for KeyError {
    fn from(err: bs58::decode::Error) -> Self {
        KeyError::Decoding("base58".to_string(), err.to_string())
    }
}

impl From<base64::DecodeError> for KeyError {
    fn from(err: base64::DecodeError) -> Self {
        KeyError::Decoding("base64".to_string(), err.to_string())
    }
}
