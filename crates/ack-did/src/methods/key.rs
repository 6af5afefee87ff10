//! did:key URIs and their derived documents.
//!
//! `did:key:<multibase base58btc(multicodec prefix || compressed public key)>`
use crate::did_uri::ParsedDid;
use crate::document::{
    create_did_document, create_verification_method, resolution_errors, DidDocument,
    DidDocumentOptions, ResolutionResult,
};
use crate::errors::DidError;
use crate::resolver::DidMethodResolver;
use ack_keys::encoding::{
    bytes_to_base58, bytes_to_multibase, multibase_to_bytes, MultibaseEncoding,
};
use ack_keys::{
    get_compressed_public_key, FormattedPublicKey, Keypair, KeypairAlgorithm,
    ED25519_PUBLIC_KEY_LENGTH, SECP256K1_COMPRESSED_LENGTH,
};
use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;

/// Varint encoded multicodec prefix of secp256k1 public keys (`0xe7`).
pub const SECP256K1_MULTICODEC_PREFIX: [u8; 2] = [0xe7, 0x01];
/// Varint encoded multicodec prefix of Ed25519 public keys (`0xed`).
pub const ED25519_MULTICODEC_PREFIX: [u8; 2] = [0xed, 0x01];

lazy_static! {
    static ref DID_KEY: Regex = Regex::new(r"^did:key:z[a-km-zA-HJ-NP-Z1-9]+$").unwrap();
}

fn multicodec_prefix(algorithm: KeypairAlgorithm) -> ([u8; 2], usize) {
    match algorithm {
        KeypairAlgorithm::Secp256k1 => (SECP256K1_MULTICODEC_PREFIX, SECP256K1_COMPRESSED_LENGTH),
        KeypairAlgorithm::Ed25519 => (ED25519_MULTICODEC_PREFIX, ED25519_PUBLIC_KEY_LENGTH),
    }
}

pub fn is_did_key_uri(did: &str) -> bool {
    DID_KEY.is_match(did)
}

/// Creates a did:key URI from a keypair's compressed public key.
pub fn create_did_key_uri(keypair: &Keypair) -> Result<String, DidError> {
    let (prefix, key_length) = multicodec_prefix(keypair.algorithm);
    let public_key = get_compressed_public_key(keypair)?;
    if public_key.len() != key_length {
        return Err(ack_keys::KeyError::InvalidKeyLength(
            keypair.algorithm.to_string(),
            key_length,
            public_key.len(),
        )
        .into());
    }
    let bytes = [prefix.as_slice(), public_key.as_slice()].concat();
    Ok(format!(
        "did:key:{}",
        bytes_to_multibase(&bytes, MultibaseEncoding::Base58Btc)
    ))
}

/// Decodes the algorithm and compressed public key of a did:key URI.
pub fn public_key_from_did_key_uri(did: &str) -> Result<(KeypairAlgorithm, Vec<u8>), DidError> {
    if !is_did_key_uri(did) {
        return Err(DidError::InvalidDidKey(did.to_string()));
    }
    let fingerprint = did.trim_start_matches("did:key:");
    let bytes = multibase_to_bytes(fingerprint)?;
    for algorithm in [KeypairAlgorithm::Secp256k1, KeypairAlgorithm::Ed25519] {
        let (prefix, key_length) = multicodec_prefix(algorithm);
        if let Some(public_key) = bytes.strip_prefix(prefix.as_slice()) {
            if public_key.len() != key_length {
                return Err(ack_keys::KeyError::InvalidKeyLength(
                    algorithm.to_string(),
                    key_length,
                    public_key.len(),
                )
                .into());
            }
            return Ok((algorithm, public_key.to_vec()));
        }
    }
    Err(DidError::InvalidDidKey(format!(
        "{did} has an unsupported multicodec prefix"
    )))
}

/// Derives the document of a did:key, publishing the key in base58.
pub fn create_did_key_document(did: &str) -> Result<DidDocument, DidError> {
    let (algorithm, public_key) = public_key_from_did_key_uri(did)?;
    let fingerprint = did.trim_start_matches("did:key:");
    let public_key = FormattedPublicKey::Base58(bytes_to_base58(&public_key));
    let mut verification_method = create_verification_method(did, algorithm, public_key.clone());
    verification_method.id = format!("{did}#{fingerprint}");
    Ok(create_did_document(
        did,
        algorithm,
        public_key,
        DidDocumentOptions {
            verification_method: Some(verification_method),
            ..Default::default()
        },
    ))
}

/// Resolver for `did:key`. Resolution is a pure derivation.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyDidResolver;

#[async_trait]
impl DidMethodResolver for KeyDidResolver {
    async fn resolve(&self, did: &str, _parsed: &ParsedDid) -> ResolutionResult {
        match create_did_key_document(did) {
            Ok(document) => ResolutionResult::from_document(document, "application/did+ld+json"),
            Err(e) => {
                ResolutionResult::from_error(resolution_errors::INVALID_DID, Some(e.to_string()))
            }
        }
    }
}
