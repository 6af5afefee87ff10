//! Signers producing JWS signature bytes.
use crate::algorithm::JwtAlgorithm;
use crate::errors::JwtError;
use ack_keys::curves::{ed25519, secp256k1};
use ack_keys::{Keypair, KeypairAlgorithm};
use std::sync::Arc;

/// Signs JWS signing input. Implementations must be deterministic per key and message.
pub trait JwtSigner: Send + Sync {
    /// The curve of the signing key.
    fn algorithm(&self) -> KeypairAlgorithm;

    fn sign(&self, data: &[u8], alg: JwtAlgorithm) -> Result<Vec<u8>, JwtError>;
}

/// A [`JwtSigner`] holding a keypair in memory.
#[derive(Debug, Clone)]
pub struct KeypairSigner {
    keypair: Keypair,
}

impl KeypairSigner {
    pub fn new(keypair: Keypair) -> Self {
        Self { keypair }
    }
}

impl JwtSigner for KeypairSigner {
    fn algorithm(&self) -> KeypairAlgorithm {
        self.keypair.algorithm
    }

    fn sign(&self, data: &[u8], alg: JwtAlgorithm) -> Result<Vec<u8>, JwtError> {
        let private_key = self.keypair.private_key();
        let signature = match (self.keypair.algorithm, alg) {
            (KeypairAlgorithm::Secp256k1, JwtAlgorithm::ES256K) => {
                secp256k1::sign(private_key, data)?
            }
            (KeypairAlgorithm::Secp256k1, JwtAlgorithm::ES256KR) => {
                secp256k1::sign_recoverable(private_key, data)?
            }
            (KeypairAlgorithm::Ed25519, JwtAlgorithm::EdDSA) => ed25519::sign(private_key, data)?,
            (algorithm, alg) => {
                return Err(JwtError::UnsupportedAlgorithm(format!(
                    "{alg} cannot be signed with a {algorithm} key"
                )))
            }
        };
        Ok(signature)
    }
}

/// Creates a signer for a keypair: ES256K for secp256k1, EdDSA for Ed25519.
pub fn create_jwt_signer(keypair: &Keypair) -> Arc<dyn JwtSigner> {
    Arc::new(KeypairSigner::new(keypair.clone()))
}
