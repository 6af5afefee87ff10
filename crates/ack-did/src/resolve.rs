//! Resolution of DIDs to documents, with typed errors.
use crate::did_uri::{is_did_uri, parse_did};
use crate::document::{resolution_errors, DidWithDocument};
use crate::errors::DidResolutionError;
use crate::resolver::Resolvable;
use serde::{Deserialize, Serialize};

/// A resolved DID together with its resolved controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DidWithControlledDocument {
    #[serde(flatten)]
    pub subject: DidWithDocument,
    pub controller: DidWithDocument,
}

/// Resolves a DID, requiring the returned document to be the document of `did_uri`.
pub async fn resolve_did(
    did_uri: &str,
    resolver: &dyn Resolvable,
) -> Result<DidWithDocument, DidResolutionError> {
    if !is_did_uri(did_uri) {
        return Err(DidResolutionError::InvalidDidUri(format!(
            "Invalid DID URI format: {did_uri}"
        )));
    }

    let result = resolver.resolve(did_uri).await;

    match result.did_resolution_metadata.error.as_deref() {
        Some(resolution_errors::UNSUPPORTED_DID_METHOD) => {
            return Err(DidResolutionError::UnsupportedDidMethod(format!(
                "DID method not supported: {did_uri}"
            )))
        }
        Some(resolution_errors::NOT_FOUND) => {
            return Err(DidResolutionError::DidDocumentNotFound(format!(
                "DID document not found: {did_uri}"
            )))
        }
        Some(resolution_errors::INVALID_DID) => {
            return Err(DidResolutionError::InvalidDidUri(format!(
                "Invalid DID URI: {did_uri}"
            )))
        }
        _ => {}
    }

    let Some(did_document) = result.did_document else {
        return Err(DidResolutionError::DidDocumentNotFound(format!(
            "No DID document returned for: {did_uri}"
        )));
    };

    if !is_did_uri(&did_document.id) {
        return Err(DidResolutionError::InvalidDidUri(format!(
            "Invalid DID document ID format: {}",
            did_document.id
        )));
    }

    let requested = parse_did(did_uri)
        .map(|parsed| parsed.did)
        .unwrap_or_else(|| did_uri.to_string());
    if did_document.id != requested {
        return Err(DidResolutionError::DidDocumentNotFound(format!(
            "DID document id {} does not match {requested}",
            did_document.id
        )));
    }

    Ok(DidWithDocument {
        did: did_document.id.clone(),
        did_document,
    })
}

/// Resolves a DID and its controller (one level only).
///
/// The document must name a single controller that is a DID other than itself.
pub async fn resolve_did_with_controller(
    did_uri: &str,
    resolver: &dyn Resolvable,
) -> Result<DidWithControlledDocument, DidResolutionError> {
    let subject = resolve_did(did_uri, resolver).await?;

    let controller = match (
        subject.did_document.controller.as_ref(),
        subject.did_document.controller_did(),
    ) {
        (None, _) => {
            return Err(DidResolutionError::InvalidDidController(format!(
                "DID {did_uri} is missing a controller"
            )))
        }
        (Some(_), Some(controller)) if is_did_uri(controller) => controller.to_string(),
        (Some(controller), _) => {
            return Err(DidResolutionError::InvalidDidController(format!(
                "Controller of DID {did_uri} is not a valid DID: {controller:?}"
            )))
        }
    };

    if controller == subject.did {
        return Err(DidResolutionError::InvalidDidController(format!(
            "DID {did_uri} cannot be its own controller"
        )));
    }

    let controller = resolve_did(&controller, resolver).await?;
    Ok(DidWithControlledDocument {
        subject,
        controller,
    })
}
