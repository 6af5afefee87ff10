//! Decentralized identifiers: URIs, documents, methods and resolution.
#[cfg(test)]
pub(crate) mod data;
pub mod did_uri;
pub mod document;
pub mod errors;
pub mod methods;
pub mod resolve;
pub mod resolver;
pub mod web_resolver;

pub use did_uri::{is_did_uri, parse_did, ParsedDid};
pub use document::{
    create_did_document, create_did_document_from_keypair, DidDocument, DidDocumentOptions,
    DidWithDocument, OneOrMany, ResolutionResult, Service, VerificationMethod,
    VerificationRelationship,
};
pub use errors::{DidError, DidErrorKind, DidResolutionError};
pub use methods::key::{create_did_key_uri, is_did_key_uri};
pub use methods::pkh::{chain_ids, create_did_pkh_document, create_did_pkh_uri, is_did_pkh_uri};
pub use methods::web::{create_did_web_document_from_keypair, create_did_web_uri, is_did_web_uri};
pub use resolve::{resolve_did, resolve_did_with_controller, DidWithControlledDocument};
pub use resolver::{
    get_did_resolver, DidMethodResolver, DidResolver, GetDidResolverOptions, Resolvable,
    ResolverCache,
};
