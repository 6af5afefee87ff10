//! JWT signature algorithms.
use crate::errors::JwtError;
use ack_keys::KeypairAlgorithm;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// A JWS `alg`. `secp256k1` and `Ed25519` are accepted as aliases of
/// `ES256K` and `EdDSA`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum JwtAlgorithm {
    #[default]
    ES256K,
    /// ES256K with a trailing recovery byte.
    ES256KR,
    EdDSA,
}

impl JwtAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            JwtAlgorithm::ES256K => "ES256K",
            JwtAlgorithm::ES256KR => "ES256K-R",
            JwtAlgorithm::EdDSA => "EdDSA",
        }
    }

    /// The curve a signing key must be on.
    pub fn keypair_algorithm(&self) -> KeypairAlgorithm {
        match self {
            JwtAlgorithm::ES256K | JwtAlgorithm::ES256KR => KeypairAlgorithm::Secp256k1,
            JwtAlgorithm::EdDSA => KeypairAlgorithm::Ed25519,
        }
    }

    /// Verification method types that can carry a key for this algorithm.
    pub fn verification_method_types(&self) -> &'static [&'static str] {
        match self {
            JwtAlgorithm::ES256K | JwtAlgorithm::ES256KR => &[
                "EcdsaSecp256k1VerificationKey2019",
                "EcdsaSecp256k1RecoveryMethod2020",
                "Secp256k1VerificationKey2018",
                "Secp256k1SignatureVerificationKey2018",
                "EcdsaPublicKeySecp256k1",
                "JsonWebKey2020",
                "Multikey",
            ],
            JwtAlgorithm::EdDSA => &[
                "ED25519SignatureVerification",
                "Ed25519VerificationKey2018",
                "Ed25519VerificationKey2020",
                "JsonWebKey2020",
                "Multikey",
            ],
        }
    }
}

impl From<KeypairAlgorithm> for JwtAlgorithm {
    fn from(algorithm: KeypairAlgorithm) -> Self {
        match algorithm {
            KeypairAlgorithm::Secp256k1 => JwtAlgorithm::ES256K,
            KeypairAlgorithm::Ed25519 => JwtAlgorithm::EdDSA,
        }
    }
}

impl Display for JwtAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for JwtAlgorithm {
    type Err = JwtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        resolve_jwt_algorithm(s)
    }
}

impl TryFrom<String> for JwtAlgorithm {
    type Error = JwtError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        resolve_jwt_algorithm(&value)
    }
}

impl From<JwtAlgorithm> for String {
    fn from(algorithm: JwtAlgorithm) -> Self {
        algorithm.as_str().to_string()
    }
}

/// Resolves an algorithm name, including the key algorithm aliases.
pub fn resolve_jwt_algorithm(algorithm: &str) -> Result<JwtAlgorithm, JwtError> {
    match algorithm {
        "ES256K" | "secp256k1" => Ok(JwtAlgorithm::ES256K),
        "ES256K-R" => Ok(JwtAlgorithm::ES256KR),
        "EdDSA" | "Ed25519" => Ok(JwtAlgorithm::EdDSA),
        other => Err(JwtError::UnsupportedAlgorithm(other.to_string())),
    }
}

pub fn is_jwt_algorithm(algorithm: &str) -> bool {
    resolve_jwt_algorithm(algorithm).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_aliases() {
        assert_eq!(resolve_jwt_algorithm("secp256k1").unwrap(), JwtAlgorithm::ES256K);
        assert_eq!(resolve_jwt_algorithm("Ed25519").unwrap(), JwtAlgorithm::EdDSA);
        assert_eq!(resolve_jwt_algorithm("ES256K-R").unwrap(), JwtAlgorithm::ES256KR);
        assert_eq!(
            resolve_jwt_algorithm("RS256"),
            Err(JwtError::UnsupportedAlgorithm("RS256".to_string()))
        );
        assert!(is_jwt_algorithm("EdDSA"));
        assert!(!is_jwt_algorithm("none"));
    }

    #[test]
    fn test_serde() {
        assert_eq!(
            serde_json::to_string(&JwtAlgorithm::ES256KR).unwrap(),
            "\"ES256K-R\""
        );
        assert_eq!(
            serde_json::from_str::<JwtAlgorithm>("\"Ed25519\"").unwrap(),
            JwtAlgorithm::EdDSA
        );
        assert!(serde_json::from_str::<JwtAlgorithm>("\"HS256\"").is_err());
    }

    #[test]
    fn test_from_keypair_algorithm() {
        assert_eq!(JwtAlgorithm::from(KeypairAlgorithm::Ed25519), JwtAlgorithm::EdDSA);
        assert_eq!(
            JwtAlgorithm::ES256KR.keypair_algorithm(),
            KeypairAlgorithm::Secp256k1
        );
    }
}
