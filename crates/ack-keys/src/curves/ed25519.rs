//! Ed25519 signatures.
use crate::errors::KeyError;
use crate::ED25519_PUBLIC_KEY_LENGTH;
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;

// Accepts a 32 byte seed, or a 64 byte `seed || public key` secret.
fn signing_key(private_key: &[u8]) -> Result<SigningKey, KeyError> {
    let seed: [u8; 32] = private_key
        .get(..32)
        .and_then(|bytes| bytes.try_into().ok())
        .filter(|_| private_key.len() == 32 || private_key.len() == 64)
        .ok_or_else(|| KeyError::InvalidKeyLength("Ed25519".to_string(), 32, private_key.len()))?;
    Ok(SigningKey::from_bytes(&seed))
}

pub fn generate_private_key() -> Vec<u8> {
    SigningKey::generate(&mut OsRng).to_bytes().to_vec()
}

pub fn public_key_from_private(private_key: &[u8]) -> Result<Vec<u8>, KeyError> {
    Ok(signing_key(private_key)?.verifying_key().to_bytes().to_vec())
}

pub fn sign(private_key: &[u8], message: &[u8]) -> Result<Vec<u8>, KeyError> {
    Ok(signing_key(private_key)?.sign(message).to_bytes().to_vec())
}

pub fn verify(public_key: &[u8], message: &[u8], signature: &[u8]) -> bool {
    let Ok(public_key): Result<[u8; ED25519_PUBLIC_KEY_LENGTH], _> = public_key.try_into() else {
        return false;
    };
    let Ok(verifying_key) = VerifyingKey::from_bytes(&public_key) else {
        return false;
    };
    let Ok(signature): Result<[u8; 64], _> = signature.try_into() else {
        return false;
    };
    verifying_key
        .verify(message, &Signature::from_bytes(&signature))
        .is_ok()
}
