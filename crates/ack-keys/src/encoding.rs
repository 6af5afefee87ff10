//! Byte encodings used for key material: hex, base58, base64url, multibase and JWK.
use crate::errors::KeyError;
use crate::keypair::KeypairAlgorithm;
use crate::{ED25519_PUBLIC_KEY_LENGTH, SECP256K1_UNCOMPRESSED_LENGTH};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// Encodes bytes as lowercase hex without a `0x` prefix.
pub fn bytes_to_hex_string(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Decodes a hex string, accepting an optional `0x` prefix.
pub fn hex_string_to_bytes(value: &str) -> Result<Vec<u8>, KeyError> {
    let stripped = value.strip_prefix("0x").unwrap_or(value);
    Ok(hex::decode(stripped)?)
}

/// Returns `true` if the value is a non-empty hex string (optionally `0x` prefixed).
pub fn is_hex_string(value: &str) -> bool {
    let stripped = value.strip_prefix("0x").unwrap_or(value);
    !stripped.is_empty() && stripped.chars().all(|c| c.is_ascii_hexdigit())
}

pub fn bytes_to_base58(bytes: &[u8]) -> String {
    bs58::encode(bytes).into_string()
}

pub fn base58_to_bytes(value: &str) -> Result<Vec<u8>, KeyError> {
    Ok(bs58::decode(value).into_vec()?)
}

/// Encodes bytes as unpadded base64url.
pub fn bytes_to_base64(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Decodes unpadded base64url, tolerating trailing padding.
pub fn base64_to_bytes(value: &str) -> Result<Vec<u8>, KeyError> {
    Ok(URL_SAFE_NO_PAD.decode(value.trim_end_matches('='))?)
}

/// Supported multibase encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultibaseEncoding {
    /// Bitcoin base58 alphabet, prefix `z`.
    Base58Btc,
    /// URL-safe base64 without padding, prefix `u`.
    Base64Url,
    /// Lowercase hex, prefix `f`.
    Base16,
}

impl MultibaseEncoding {
    pub fn prefix(&self) -> char {
        match self {
            MultibaseEncoding::Base58Btc => 'z',
            MultibaseEncoding::Base64Url => 'u',
            MultibaseEncoding::Base16 => 'f',
        }
    }
}

/// Gets the multibase encoding from the leading prefix character.
pub fn get_multibase_encoding(value: &str) -> Option<MultibaseEncoding> {
    match value.chars().next()? {
        'z' => Some(MultibaseEncoding::Base58Btc),
        'u' => Some(MultibaseEncoding::Base64Url),
        'f' => Some(MultibaseEncoding::Base16),
        _ => None,
    }
}

pub fn bytes_to_multibase(bytes: &[u8], encoding: MultibaseEncoding) -> String {
    let body = match encoding {
        MultibaseEncoding::Base58Btc => bytes_to_base58(bytes),
        MultibaseEncoding::Base64Url => bytes_to_base64(bytes),
        MultibaseEncoding::Base16 => bytes_to_hex_string(bytes),
    };
    format!("{}{}", encoding.prefix(), body)
}

pub fn multibase_to_bytes(value: &str) -> Result<Vec<u8>, KeyError> {
    if value.is_empty() {
        return Err(KeyError::Decoding(
            "multibase".to_string(),
            "Empty multibase string".to_string(),
        ));
    }
    let encoding = get_multibase_encoding(value)
        .ok_or_else(|| KeyError::UnsupportedMultibasePrefix(value.chars().take(1).collect()))?;
    let body = &value[1..];
    match encoding {
        MultibaseEncoding::Base58Btc => base58_to_bytes(body),
        MultibaseEncoding::Base64Url => base64_to_bytes(body),
        MultibaseEncoding::Base16 => hex_string_to_bytes(body),
    }
}

/// A public key in JSON Web Key form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKeyJwk {
    pub kty: String,
    #[serde(default)]
    pub crv: String,
    #[serde(default)]
    pub x: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<String>,
}

/// A private key in JSON Web Key form.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateKeyJwk {
    #[serde(flatten)]
    pub public: PublicKeyJwk,
    pub d: String,
}

impl std::fmt::Debug for PrivateKeyJwk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivateKeyJwk")
            .field("public", &self.public)
            .finish_non_exhaustive()
    }
}

/// Converts raw public key bytes to a JWK.
///
/// secp256k1 keys must be uncompressed (65 bytes, `0x04` prefix).
pub fn bytes_to_jwk(bytes: &[u8], algorithm: KeypairAlgorithm) -> Result<PublicKeyJwk, KeyError> {
    match algorithm {
        KeypairAlgorithm::Secp256k1 => {
            let uncompressed = crate::curves::secp256k1::decompress_public_key(bytes)?;
            if uncompressed.len() != SECP256K1_UNCOMPRESSED_LENGTH {
                return Err(KeyError::InvalidKeyLength(
                    algorithm.to_string(),
                    SECP256K1_UNCOMPRESSED_LENGTH,
                    uncompressed.len(),
                ));
            }
            Ok(PublicKeyJwk {
                kty: "EC".to_string(),
                crv: "secp256k1".to_string(),
                x: bytes_to_base64(&uncompressed[1..33]),
                y: Some(bytes_to_base64(&uncompressed[33..65])),
            })
        }
        KeypairAlgorithm::Ed25519 => {
            if bytes.len() != ED25519_PUBLIC_KEY_LENGTH {
                return Err(KeyError::InvalidKeyLength(
                    algorithm.to_string(),
                    ED25519_PUBLIC_KEY_LENGTH,
                    bytes.len(),
                ));
            }
            Ok(PublicKeyJwk {
                kty: "OKP".to_string(),
                crv: "Ed25519".to_string(),
                x: bytes_to_base64(bytes),
                y: None,
            })
        }
    }
}

/// Converts a JWK back to raw public key bytes (uncompressed for secp256k1).
pub fn jwk_to_bytes(jwk: &PublicKeyJwk) -> Result<Vec<u8>, KeyError> {
    match (jwk.kty.as_str(), jwk.crv.as_str()) {
        ("EC", "secp256k1") => {
            let y = jwk
                .y
                .as_deref()
                .ok_or_else(|| KeyError::InvalidPublicKey("missing y coordinate".to_string()))?;
            let mut bytes = vec![0x04];
            bytes.extend(base64_to_bytes(&jwk.x)?);
            bytes.extend(base64_to_bytes(y)?);
            Ok(bytes)
        }
        ("OKP", "Ed25519") => base64_to_bytes(&jwk.x),
        (kty, crv) => Err(KeyError::UnsupportedAlgorithm(format!("{kty}/{crv}"))),
    }
}

/// Gets the key algorithm a JWK belongs to.
pub fn jwk_algorithm(jwk: &PublicKeyJwk) -> Option<KeypairAlgorithm> {
    match jwk.crv.as_str() {
        "secp256k1" => Some(KeypairAlgorithm::Secp256k1),
        "Ed25519" => Some(KeypairAlgorithm::Ed25519),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_prefix() {
        assert_eq!(hex_string_to_bytes("0x0a0b").unwrap(), vec![10, 11]);
        assert_eq!(hex_string_to_bytes("0a0b").unwrap(), vec![10, 11]);
        assert!(is_hex_string("0xC0ffee"));
        assert!(!is_hex_string("0x"));
        assert!(!is_hex_string("xyz"));
        assert!(hex_string_to_bytes("zz").is_err());
    }

    #[test]
    fn test_multibase_prefixes() {
        let bytes = b"hello world";
        let encoded = bytes_to_multibase(bytes, MultibaseEncoding::Base58Btc);
        assert_eq!(encoded, "zStV1DL6CwTryKyV");
        assert_eq!(multibase_to_bytes(&encoded).unwrap(), bytes);

        let encoded = bytes_to_multibase(bytes, MultibaseEncoding::Base16);
        assert_eq!(encoded, "f68656c6c6f20776f726c64");
        assert_eq!(multibase_to_bytes(&encoded).unwrap(), bytes);

        let encoded = bytes_to_multibase(bytes, MultibaseEncoding::Base64Url);
        assert_eq!(encoded, "uaGVsbG8gd29ybGQ");
        assert_eq!(multibase_to_bytes(&encoded).unwrap(), bytes);
    }

    #[test]
    fn test_multibase_rejects_unknown_prefix() {
        assert_eq!(
            multibase_to_bytes("mabc"),
            Err(KeyError::UnsupportedMultibasePrefix("m".to_string()))
        );
        assert!(multibase_to_bytes("").is_err());
    }

    #[test]
    fn test_ed25519_jwk() {
        let bytes = [7u8; 32];
        let jwk = bytes_to_jwk(&bytes, KeypairAlgorithm::Ed25519).unwrap();
        assert_eq!(jwk.kty, "OKP");
        assert_eq!(jwk.crv, "Ed25519");
        assert!(jwk.y.is_none());
        assert_eq!(jwk_to_bytes(&jwk).unwrap(), bytes);
        assert!(bytes_to_jwk(&bytes[..31], KeypairAlgorithm::Ed25519).is_err());
    }
}
