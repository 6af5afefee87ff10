//! Public key formats used in DID documents.
use crate::curves::secp256k1;
use crate::encoding::{
    bytes_to_base58, bytes_to_hex_string, bytes_to_jwk, bytes_to_multibase, MultibaseEncoding,
    PublicKeyJwk,
};
use crate::errors::KeyError;
use crate::keypair::{Keypair, KeypairAlgorithm};
use serde::{Deserialize, Serialize};

/// The representation a public key is published in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PublicKeyFormat {
    Hex,
    #[default]
    Jwk,
    Multibase,
    Base58,
}

impl std::fmt::Display for PublicKeyFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PublicKeyFormat::Hex => "hex",
            PublicKeyFormat::Jwk => "jwk",
            PublicKeyFormat::Multibase => "multibase",
            PublicKeyFormat::Base58 => "base58",
        };
        write!(f, "{name}")
    }
}

/// A public key rendered in one of the [`PublicKeyFormat`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormattedPublicKey {
    Hex(String),
    Jwk(PublicKeyJwk),
    Multibase(String),
    Base58(String),
}

impl FormattedPublicKey {
    pub fn format(&self) -> PublicKeyFormat {
        match self {
            FormattedPublicKey::Hex(_) => PublicKeyFormat::Hex,
            FormattedPublicKey::Jwk(_) => PublicKeyFormat::Jwk,
            FormattedPublicKey::Multibase(_) => PublicKeyFormat::Multibase,
            FormattedPublicKey::Base58(_) => PublicKeyFormat::Base58,
        }
    }
}

pub fn format_public_key(
    keypair: &Keypair,
    format: PublicKeyFormat,
) -> Result<FormattedPublicKey, KeyError> {
    Ok(match format {
        PublicKeyFormat::Hex => FormattedPublicKey::Hex(bytes_to_hex_string(&keypair.public_key)),
        PublicKeyFormat::Jwk => {
            FormattedPublicKey::Jwk(bytes_to_jwk(&keypair.public_key, keypair.algorithm)?)
        }
        PublicKeyFormat::Multibase => FormattedPublicKey::Multibase(bytes_to_multibase(
            &keypair.public_key,
            MultibaseEncoding::Base58Btc,
        )),
        PublicKeyFormat::Base58 => FormattedPublicKey::Base58(bytes_to_base58(&keypair.public_key)),
    })
}

/// Gets the 33 byte compressed key for secp256k1, or the raw key for Ed25519.
pub fn get_compressed_public_key(keypair: &Keypair) -> Result<Vec<u8>, KeyError> {
    match keypair.algorithm {
        KeypairAlgorithm::Secp256k1 => secp256k1::compress_public_key(&keypair.public_key),
        KeypairAlgorithm::Ed25519 => Ok(keypair.public_key.clone()),
    }
}
