//! Keypair generation and serialisation.
use crate::curves::{ed25519, secp256k1};
use crate::encoding::{
    base58_to_bytes, base64_to_bytes, bytes_to_base58, bytes_to_base64, bytes_to_jwk,
    jwk_to_bytes, PrivateKeyJwk,
};
use crate::errors::KeyError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Signature algorithms a keypair can be generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum KeypairAlgorithm {
    #[default]
    #[serde(rename = "secp256k1")]
    Secp256k1,
    #[serde(rename = "Ed25519")]
    Ed25519,
}

impl Display for KeypairAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeypairAlgorithm::Secp256k1 => write!(f, "secp256k1"),
            KeypairAlgorithm::Ed25519 => write!(f, "Ed25519"),
        }
    }
}

impl TryFrom<&str> for KeypairAlgorithm {
    type Error = KeyError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "secp256k1" => Ok(KeypairAlgorithm::Secp256k1),
            "Ed25519" => Ok(KeypairAlgorithm::Ed25519),
            other => Err(KeyError::UnsupportedAlgorithm(other.to_string())),
        }
    }
}

/// A private key with its derived public key.
///
/// secp256k1 public keys are held uncompressed (65 bytes), Ed25519 public keys
/// are 32 bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct Keypair {
    pub algorithm: KeypairAlgorithm,
    pub public_key: Vec<u8>,
    private_key: Vec<u8>,
}

impl std::fmt::Debug for Keypair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Keypair")
            .field("algorithm", &self.algorithm)
            .field("public_key", &hex::encode(&self.public_key))
            .finish_non_exhaustive()
    }
}

impl Keypair {
    /// Builds a keypair from private key bytes, deriving the public key.
    pub fn from_private_key(
        algorithm: KeypairAlgorithm,
        private_key: &[u8],
    ) -> Result<Self, KeyError> {
        let public_key = match algorithm {
            KeypairAlgorithm::Secp256k1 => secp256k1::public_key_from_private(private_key)?,
            KeypairAlgorithm::Ed25519 => ed25519::public_key_from_private(private_key)?,
        };
        Ok(Self {
            algorithm,
            public_key,
            private_key: private_key.to_vec(),
        })
    }

    pub fn private_key(&self) -> &[u8] {
        &self.private_key
    }

    /// Signs a message with the curve's native scheme: 64 byte ES256K or Ed25519.
    pub fn sign(&self, message: &[u8]) -> Result<Vec<u8>, KeyError> {
        match self.algorithm {
            KeypairAlgorithm::Secp256k1 => secp256k1::sign(&self.private_key, message),
            KeypairAlgorithm::Ed25519 => ed25519::sign(&self.private_key, message),
        }
    }

    pub fn verify(&self, message: &[u8], signature: &[u8]) -> bool {
        match self.algorithm {
            KeypairAlgorithm::Secp256k1 => secp256k1::verify(&self.public_key, message, signature),
            KeypairAlgorithm::Ed25519 => ed25519::verify(&self.public_key, message, signature),
        }
    }
}

/// Generates a keypair, optionally from existing private key bytes.
pub fn generate_keypair(
    algorithm: KeypairAlgorithm,
    private_key: Option<&[u8]>,
) -> Result<Keypair, KeyError> {
    let private_key = match private_key {
        Some(bytes) => bytes.to_vec(),
        None => match algorithm {
            KeypairAlgorithm::Secp256k1 => secp256k1::generate_private_key(),
            KeypairAlgorithm::Ed25519 => ed25519::generate_private_key(),
        },
    };
    Keypair::from_private_key(algorithm, &private_key)
}

/// A keypair with base58 encoded key material.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeypairBase58 {
    pub public_key: String,
    pub private_key: String,
    pub algorithm: KeypairAlgorithm,
}

pub fn keypair_to_base58(keypair: &Keypair) -> KeypairBase58 {
    KeypairBase58 {
        public_key: bytes_to_base58(&keypair.public_key),
        private_key: bytes_to_base58(&keypair.private_key),
        algorithm: keypair.algorithm,
    }
}

pub fn keypair_from_base58(base58: &KeypairBase58) -> Result<Keypair, KeyError> {
    Ok(Keypair {
        algorithm: base58.algorithm,
        public_key: base58_to_bytes(&base58.public_key)?,
        private_key: base58_to_bytes(&base58.private_key)?,
    })
}

pub fn keypair_to_jwk(keypair: &Keypair) -> Result<PrivateKeyJwk, KeyError> {
    Ok(PrivateKeyJwk {
        public: bytes_to_jwk(&keypair.public_key, keypair.algorithm)?,
        d: bytes_to_base64(&keypair.private_key),
    })
}

pub fn jwk_to_keypair(jwk: &PrivateKeyJwk) -> Result<Keypair, KeyError> {
    Ok(Keypair {
        algorithm: KeypairAlgorithm::try_from(jwk.public.crv.as_str())?,
        public_key: jwk_to_bytes(&jwk.public)?,
        private_key: base64_to_bytes(&jwk.d)?,
    })
}
