//! secp256k1 ECDSA over SHA-256, with recoverable signatures and Ethereum addresses.
use crate::errors::KeyError;
use k256::ecdsa::signature::{Signer, Verifier};
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::PublicKey;
use rand::rngs::OsRng;
use sha3::{Digest, Keccak256};

const ALGORITHM: &str = "secp256k1";

fn signing_key(private_key: &[u8]) -> Result<SigningKey, KeyError> {
    SigningKey::from_slice(private_key)
        .map_err(|_| KeyError::InvalidPrivateKey(ALGORITHM.to_string()))
}

fn public_key(bytes: &[u8]) -> Result<PublicKey, KeyError> {
    PublicKey::from_sec1_bytes(bytes).map_err(|e| KeyError::InvalidPublicKey(e.to_string()))
}

/// Generates 32 random private key bytes.
pub fn generate_private_key() -> Vec<u8> {
    SigningKey::random(&mut OsRng).to_bytes().to_vec()
}

/// Derives the uncompressed (65 byte) public key for a private key.
pub fn public_key_from_private(private_key: &[u8]) -> Result<Vec<u8>, KeyError> {
    Ok(signing_key(private_key)?
        .verifying_key()
        .to_encoded_point(false)
        .as_bytes()
        .to_vec())
}

/// Compresses a SEC1 encoded public key to 33 bytes.
pub fn compress_public_key(public_key_bytes: &[u8]) -> Result<Vec<u8>, KeyError> {
    Ok(public_key(public_key_bytes)?
        .to_encoded_point(true)
        .as_bytes()
        .to_vec())
}

/// Decompresses a SEC1 encoded public key to 65 bytes.
pub fn decompress_public_key(public_key_bytes: &[u8]) -> Result<Vec<u8>, KeyError> {
    Ok(public_key(public_key_bytes)?
        .to_encoded_point(false)
        .as_bytes()
        .to_vec())
}

/// Signs a message, returning the 64 byte `r || s` signature.
pub fn sign(private_key: &[u8], message: &[u8]) -> Result<Vec<u8>, KeyError> {
    let signature: Signature = signing_key(private_key)?
        .try_sign(message)
        .map_err(|e| KeyError::SigningFailure(e.to_string()))?;
    Ok(signature.to_bytes().to_vec())
}

/// Signs a message, returning the 65 byte `r || s || v` recoverable signature.
pub fn sign_recoverable(private_key: &[u8], message: &[u8]) -> Result<Vec<u8>, KeyError> {
    let (signature, recovery_id) = signing_key(private_key)?
        .sign_recoverable(message)
        .map_err(|e| KeyError::SigningFailure(e.to_string()))?;
    let mut bytes = signature.to_bytes().to_vec();
    bytes.push(recovery_id.to_byte());
    Ok(bytes)
}

/// Verifies a 64 byte signature against a SEC1 encoded public key.
pub fn verify(public_key_bytes: &[u8], message: &[u8], signature: &[u8]) -> bool {
    let Ok(verifying_key) = VerifyingKey::from_sec1_bytes(public_key_bytes) else {
        return false;
    };
    let Some(signature) = signature.get(..64).and_then(|s| Signature::from_slice(s).ok()) else {
        return false;
    };
    verifying_key.verify(message, &signature).is_ok()
}

/// Recovers the uncompressed public key that produced a signature.
///
/// Recovery ids of 27 and 28 (Ethereum style) are normalised to 0 and 1.
pub fn recover_public_key(
    message: &[u8],
    signature: &[u8],
    recovery_id: u8,
) -> Result<Vec<u8>, KeyError> {
    let signature = signature
        .get(..64)
        .ok_or_else(|| KeyError::InvalidSignature("expected 64 bytes".to_string()))
        .and_then(|s| {
            Signature::from_slice(s).map_err(|e| KeyError::InvalidSignature(e.to_string()))
        })?;
    let recovery_id = if recovery_id >= 27 {
        recovery_id - 27
    } else {
        recovery_id
    };
    let recovery_id = RecoveryId::from_byte(recovery_id)
        .ok_or_else(|| KeyError::InvalidSignature(format!("recovery id {recovery_id}")))?;
    let verifying_key = VerifyingKey::recover_from_msg(message, &signature, recovery_id)
        .map_err(|e| KeyError::InvalidSignature(e.to_string()))?;
    Ok(verifying_key.to_encoded_point(false).as_bytes().to_vec())
}

/// Derives the `0x` prefixed, lowercase Ethereum address of a public key.
pub fn ethereum_address(public_key_bytes: &[u8]) -> Result<String, KeyError> {
    let uncompressed = decompress_public_key(public_key_bytes)?;
    let hash = Keccak256::digest(&uncompressed[1..]);
    Ok(format!("0x{}", hex::encode(&hash[12..])))
}
