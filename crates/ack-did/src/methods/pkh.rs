//! did:pkh URIs: blockchain accounts identified by a CAIP-2 chain ID and address.
use crate::did_uri::ParsedDid;
use crate::document::{
    create_did_document_from_keypair, resolution_errors, DidDocument, DidDocumentOptions,
    DidWithDocument, ResolutionResult, VerificationMethod, VerificationRelationship, DID_CONTEXT,
};
use crate::errors::DidError;
use crate::resolver::DidMethodResolver;
use ack_keys::curves::secp256k1::ethereum_address;
use ack_keys::encoding::bytes_to_base58;
use ack_keys::{Keypair, KeypairAlgorithm, PublicKeyFormat};
use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

lazy_static! {
    static ref CAIP2_CHAIN_ID: Regex =
        Regex::new(r"^[-a-z0-9]{3,8}:[-_a-zA-Z0-9]{1,32}$").unwrap();
}

/// CAIP-2 chain IDs of select networks.
pub mod chain_ids {
    pub mod evm {
        pub const MAINNET: &str = "eip155:1";
        pub const SEPOLIA: &str = "eip155:11155111";
        pub const BASE: &str = "eip155:8453";
        pub const BASE_SEPOLIA: &str = "eip155:84532";
        pub const ARBITRUM: &str = "eip155:42161";
        pub const ARBITRUM_SEPOLIA: &str = "eip155:421614";
    }
    pub mod svm {
        pub const MAINNET: &str = "solana:5eykt4UsFv8P8NJdTREpY1vzqKqZKvdp";
        pub const DEVNET: &str = "solana:EtWTRABZaYq6iMfeYKouRu166VU2xqa1";
    }
}

const RECOVERY_METHOD_CONTEXT: &str = "https://identity.foundation/EcdsaSecp256k1RecoverySignature2020#EcdsaSecp256k1RecoveryMethod2020";
const BLOCKCHAIN_ACCOUNT_ID_CONTEXT: &str = "https://w3id.org/security#blockchainAccountId";
const PUBLIC_KEY_JWK_CONTEXT: &str = "https://w3id.org/security#publicKeyJwk";

/// Returns `true` for a valid CAIP-2 chain ID (`namespace:reference`).
pub fn is_did_pkh_chain_id(chain_id: &str) -> bool {
    CAIP2_CHAIN_ID.is_match(chain_id)
}

/// The parts of a did:pkh URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DidPkhParts {
    pub chain_namespace: String,
    pub chain_reference: String,
    pub address: String,
}

impl DidPkhParts {
    pub fn chain_id(&self) -> String {
        format!("{}:{}", self.chain_namespace, self.chain_reference)
    }
}

/// Splits a did:pkh URI, validating its chain ID. The address is everything
/// after the chain reference.
pub fn did_pkh_parts(did: &str) -> Result<DidPkhParts, DidError> {
    let invalid = || DidError::InvalidDidPkh(did.to_string());
    let mut parts = did.split(':');
    if parts.next() != Some("did") || parts.next() != Some("pkh") {
        return Err(invalid());
    }
    let chain_namespace = parts.next().filter(|p| !p.is_empty()).ok_or_else(invalid)?;
    let chain_reference = parts.next().filter(|p| !p.is_empty()).ok_or_else(invalid)?;
    let address = parts.collect::<Vec<_>>().join(":");
    let chain_id = format!("{chain_namespace}:{chain_reference}");
    if address.is_empty() || !is_did_pkh_chain_id(&chain_id) {
        return Err(invalid());
    }
    Ok(DidPkhParts {
        chain_namespace: chain_namespace.to_string(),
        chain_reference: chain_reference.to_string(),
        address,
    })
}

pub fn is_did_pkh_uri(did: &str) -> bool {
    did_pkh_parts(did).is_ok()
}

pub fn address_from_did_pkh_uri(did: &str) -> Result<String, DidError> {
    Ok(did_pkh_parts(did)?.address)
}

pub fn create_blockchain_account_id(address: &str, chain_id: &str) -> String {
    format!("{chain_id}:{address}")
}

/// Creates a did:pkh URI, e.g. `did:pkh:eip155:1:0xab16...`.
pub fn create_did_pkh_uri(address: &str, chain_id: &str) -> Result<String, DidError> {
    if !is_did_pkh_chain_id(chain_id) {
        return Err(DidError::InvalidChainId(chain_id.to_string()));
    }
    Ok(format!(
        "did:pkh:{}",
        create_blockchain_account_id(address, chain_id)
    ))
}

fn chain_algorithm(chain_id: &str) -> KeypairAlgorithm {
    if chain_id.starts_with("solana") {
        KeypairAlgorithm::Ed25519
    } else {
        KeypairAlgorithm::Secp256k1
    }
}

/// Derives the account address of a keypair: an Ethereum address for
/// secp256k1, the base58 public key for Ed25519 (Solana).
pub fn address_from_keypair(keypair: &Keypair) -> Result<String, DidError> {
    match keypair.algorithm {
        KeypairAlgorithm::Secp256k1 => Ok(ethereum_address(&keypair.public_key)?),
        KeypairAlgorithm::Ed25519 => Ok(bytes_to_base58(&keypair.public_key)),
    }
}

/// Creates a did:pkh document. The keypair algorithm must match the chain:
/// Ed25519 for `solana`, secp256k1 otherwise.
pub fn create_did_pkh_document(
    keypair: &Keypair,
    address: &str,
    chain_id: &str,
    controller: Option<String>,
) -> Result<DidWithDocument, DidError> {
    let algorithm = chain_algorithm(chain_id);
    if keypair.algorithm != algorithm {
        return Err(DidError::AlgorithmMismatch(algorithm, chain_id.to_string()));
    }
    let blockchain_account_id = create_blockchain_account_id(address, chain_id);
    let did = create_did_pkh_uri(address, chain_id)?;

    let did_document = match algorithm {
        KeypairAlgorithm::Secp256k1 => {
            let mut verification_method = VerificationMethod::new(
                &format!("{did}#blockchainAccountId"),
                "EcdsaSecp256k1RecoveryMethod2020",
                &did,
            );
            verification_method.blockchain_account_id = Some(blockchain_account_id);
            create_did_document_from_keypair(
                &did,
                keypair,
                PublicKeyFormat::Hex,
                DidDocumentOptions {
                    controller,
                    additional_contexts: vec![
                        RECOVERY_METHOD_CONTEXT.to_string(),
                        BLOCKCHAIN_ACCOUNT_ID_CONTEXT.to_string(),
                    ],
                    verification_method: Some(verification_method),
                    ..Default::default()
                },
            )?
        }
        KeypairAlgorithm::Ed25519 => {
            let mut document = create_did_document_from_keypair(
                &did,
                keypair,
                PublicKeyFormat::Jwk,
                DidDocumentOptions {
                    controller,
                    additional_contexts: vec![
                        PUBLIC_KEY_JWK_CONTEXT.to_string(),
                        BLOCKCHAIN_ACCOUNT_ID_CONTEXT.to_string(),
                    ],
                    ..Default::default()
                },
            )?;
            if let Some(method) = document.verification_method.first_mut() {
                method.blockchain_account_id = Some(blockchain_account_id);
            }
            document
        }
    };
    Ok(DidWithDocument { did, did_document })
}

fn resolved_document(did: &str, parts: &DidPkhParts) -> Option<DidDocument> {
    let blockchain_account_id = create_blockchain_account_id(&parts.address, &parts.chain_id());
    let (method, contexts) = match parts.chain_namespace.as_str() {
        "eip155" => {
            let mut method = VerificationMethod::new(
                &format!("{did}#blockchainAccountId"),
                "EcdsaSecp256k1RecoveryMethod2020",
                did,
            );
            method.blockchain_account_id = Some(blockchain_account_id);
            (method, [RECOVERY_METHOD_CONTEXT, BLOCKCHAIN_ACCOUNT_ID_CONTEXT])
        }
        "solana" => {
            let mut method = VerificationMethod::new(
                &format!("{did}#controller"),
                "Ed25519VerificationKey2018",
                did,
            );
            method.public_key_base58 = Some(parts.address.clone());
            method.blockchain_account_id = Some(blockchain_account_id);
            (
                method,
                [
                    "https://w3id.org/security#Ed25519VerificationKey2018",
                    BLOCKCHAIN_ACCOUNT_ID_CONTEXT,
                ],
            )
        }
        _ => return None,
    };
    let mut document = DidDocument::new(did);
    document.context = Some(Value::Array(
        std::iter::once(DID_CONTEXT)
            .chain(contexts)
            .map(|c| Value::String(c.to_string()))
            .collect(),
    ));
    document.authentication = vec![VerificationRelationship::Reference(method.id.clone())];
    document.assertion_method = vec![VerificationRelationship::Reference(method.id.clone())];
    document.verification_method = vec![method];
    Some(document)
}

/// Resolver for `did:pkh` on `eip155` and `solana` chains. Resolution is a
/// pure derivation.
#[derive(Debug, Clone, Copy, Default)]
pub struct PkhDidResolver;

#[async_trait]
impl DidMethodResolver for PkhDidResolver {
    async fn resolve(&self, did: &str, _parsed: &ParsedDid) -> ResolutionResult {
        let parts = match did_pkh_parts(did) {
            Ok(parts) => parts,
            Err(e) => {
                return ResolutionResult::from_error(
                    resolution_errors::INVALID_DID,
                    Some(e.to_string()),
                )
            }
        };
        match resolved_document(did, &parts) {
            Some(document) => {
                ResolutionResult::from_document(document, "application/did+ld+json")
            }
            None => ResolutionResult::from_error(
                resolution_errors::INVALID_DID,
                Some(format!(
                    "chain namespace not supported: {}",
                    parts.chain_namespace
                )),
            ),
        }
    }
}
