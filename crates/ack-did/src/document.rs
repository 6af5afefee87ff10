//! DID documents, verification methods and resolution results.
use crate::errors::DidError;
use ack_keys::{
    format_public_key, FormattedPublicKey, Keypair, KeypairAlgorithm, PublicKeyFormat, PublicKeyJwk,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DID_CONTEXT: &str = "https://www.w3.org/ns/did/v1";

/// A single value or an array of values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn first(&self) -> Option<&T> {
        match self {
            OneOrMany::One(value) => Some(value),
            OneOrMany::Many(values) => values.first(),
        }
    }

    pub fn to_vec(&self) -> Vec<&T> {
        match self {
            OneOrMany::One(value) => vec![value],
            OneOrMany::Many(values) => values.iter().collect(),
        }
    }
}

/// A public key bound to a DID document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationMethod {
    pub id: String,
    #[serde(rename = "type")]
    pub type_: String,
    pub controller: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_key_hex: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_key_jwk: Option<PublicKeyJwk>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_key_multibase: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_key_base58: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blockchain_account_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ethereum_address: Option<String>,
}

impl VerificationMethod {
    pub fn new(id: &str, type_: &str, controller: &str) -> Self {
        Self {
            id: id.to_string(),
            type_: type_.to_string(),
            controller: controller.to_string(),
            public_key_hex: None,
            public_key_jwk: None,
            public_key_multibase: None,
            public_key_base58: None,
            blockchain_account_id: None,
            ethereum_address: None,
        }
    }
}

/// An entry of `authentication` or `assertionMethod`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VerificationRelationship {
    Reference(String),
    Embedded(VerificationMethod),
}

impl VerificationRelationship {
    pub fn id(&self) -> &str {
        match self {
            VerificationRelationship::Reference(id) => id,
            VerificationRelationship::Embedded(method) => &method.id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    #[serde(rename = "type")]
    pub type_: String,
    pub service_endpoint: Value,
}

/// A DID document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DidDocument {
    #[serde(rename = "@context", skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub controller: Option<OneOrMany<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub also_known_as: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub verification_method: Vec<VerificationMethod>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authentication: Vec<VerificationRelationship>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assertion_method: Vec<VerificationRelationship>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<Vec<Service>>,
    /// Members not modelled above, kept as-is.
    #[serde(flatten)]
    pub property_set: Map<String, Value>,
}

impl DidDocument {
    pub fn new(id: &str) -> Self {
        Self {
            context: Some(Value::String(DID_CONTEXT.to_string())),
            id: id.to_string(),
            controller: None,
            also_known_as: None,
            verification_method: vec![],
            authentication: vec![],
            assertion_method: vec![],
            service: None,
            property_set: Map::new(),
        }
    }

    /// Gets the controller when it is a single value.
    pub fn controller_did(&self) -> Option<&str> {
        match self.controller.as_ref()? {
            OneOrMany::One(controller) => Some(controller),
            OneOrMany::Many(_) => None,
        }
    }

    /// All verification methods, including those embedded in relationships.
    pub fn verification_methods(&self) -> Vec<&VerificationMethod> {
        let embedded = self
            .authentication
            .iter()
            .chain(self.assertion_method.iter())
            .filter_map(|relationship| match relationship {
                VerificationRelationship::Embedded(method) => Some(method),
                VerificationRelationship::Reference(_) => None,
            });
        let mut methods: Vec<&VerificationMethod> = self.verification_method.iter().collect();
        for method in embedded {
            if !methods.iter().any(|m| m.id == method.id) {
                methods.push(method);
            }
        }
        methods
    }
}

/// A DID together with its document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DidWithDocument {
    pub did: String,
    pub did_document: DidDocument,
}

/// Returns `true` if the document is the document of `did`.
pub fn is_did_document_for_did(document: &DidDocument, did: &str) -> bool {
    document.id == did
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
}

/// The outcome of resolving a DID. Failures are reported through
/// `did_resolution_metadata.error` rather than as a Rust error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionResult {
    #[serde(default)]
    pub did_resolution_metadata: ResolutionMetadata,
    pub did_document: Option<DidDocument>,
    #[serde(default)]
    pub did_document_metadata: DocumentMetadata,
}

impl ResolutionResult {
    pub fn from_error(error: &str, message: Option<String>) -> Self {
        Self {
            did_resolution_metadata: ResolutionMetadata {
                error: Some(error.to_string()),
                content_type: None,
                message,
            },
            did_document: None,
            did_document_metadata: DocumentMetadata::default(),
        }
    }

    pub fn from_document(document: DidDocument, content_type: &str) -> Self {
        Self {
            did_resolution_metadata: ResolutionMetadata {
                error: None,
                content_type: Some(content_type.to_string()),
                message: None,
            },
            did_document: Some(document),
            did_document_metadata: DocumentMetadata::default(),
        }
    }
}

/// Resolution error codes.
pub mod resolution_errors {
    pub const INVALID_DID: &str = "invalidDid";
    pub const NOT_FOUND: &str = "notFound";
    pub const UNSUPPORTED_DID_METHOD: &str = "unsupportedDidMethod";
}

/// Verification method type for a key algorithm.
pub fn verification_key_type(algorithm: KeypairAlgorithm) -> &'static str {
    match algorithm {
        KeypairAlgorithm::Secp256k1 => "EcdsaSecp256k1VerificationKey2019",
        KeypairAlgorithm::Ed25519 => "Ed25519VerificationKey2018",
    }
}

/// JSON-LD context for a key algorithm's verification method type.
pub fn verification_key_context(algorithm: KeypairAlgorithm) -> &'static str {
    match algorithm {
        KeypairAlgorithm::Secp256k1 => {
            "https://w3id.org/security#EcdsaSecp256k1VerificationKey2019"
        }
        KeypairAlgorithm::Ed25519 => "https://w3id.org/security#Ed25519VerificationKey2018",
    }
}

/// Builds the `<did>#<format>-1` verification method for a formatted key.
pub fn create_verification_method(
    did: &str,
    algorithm: KeypairAlgorithm,
    public_key: FormattedPublicKey,
) -> VerificationMethod {
    let mut method = VerificationMethod::new(
        &format!("{did}#{}-1", public_key.format()),
        verification_key_type(algorithm),
        did,
    );
    match public_key {
        FormattedPublicKey::Hex(value) => method.public_key_hex = Some(value),
        FormattedPublicKey::Jwk(value) => method.public_key_jwk = Some(value),
        FormattedPublicKey::Multibase(value) => method.public_key_multibase = Some(value),
        FormattedPublicKey::Base58(value) => method.public_key_base58 = Some(value),
    }
    method
}

/// Optional members of a created DID document.
#[derive(Debug, Clone, Default)]
pub struct DidDocumentOptions {
    pub controller: Option<String>,
    pub also_known_as: Option<Vec<String>>,
    pub service: Option<Vec<Service>>,
    pub additional_contexts: Vec<String>,
    /// Replaces the verification method derived from the public key.
    pub verification_method: Option<VerificationMethod>,
}

/// Creates a DID document with a single verification method, referenced from
/// both `authentication` and `assertionMethod`.
pub fn create_did_document(
    did: &str,
    algorithm: KeypairAlgorithm,
    public_key: FormattedPublicKey,
    options: DidDocumentOptions,
) -> DidDocument {
    let verification_method = options
        .verification_method
        .unwrap_or_else(|| create_verification_method(did, algorithm, public_key));

    let contexts = [DID_CONTEXT, verification_key_context(algorithm)]
        .into_iter()
        .map(str::to_string)
        .chain(options.additional_contexts)
        .map(Value::String)
        .collect();

    DidDocument {
        context: Some(Value::Array(contexts)),
        id: did.to_string(),
        controller: options.controller.map(OneOrMany::One),
        also_known_as: options.also_known_as,
        authentication: vec![VerificationRelationship::Reference(
            verification_method.id.clone(),
        )],
        assertion_method: vec![VerificationRelationship::Reference(
            verification_method.id.clone(),
        )],
        verification_method: vec![verification_method],
        service: options.service,
        property_set: Map::new(),
    }
}

/// Creates a DID document publishing a keypair's public key in `format`.
pub fn create_did_document_from_keypair(
    did: &str,
    keypair: &Keypair,
    format: PublicKeyFormat,
    options: DidDocumentOptions,
) -> Result<DidDocument, DidError> {
    let public_key = format_public_key(keypair, format)?;
    Ok(create_did_document(
        did,
        keypair.algorithm,
        public_key,
        options,
    ))
}
