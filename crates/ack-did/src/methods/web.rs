//! did:web URIs and documents.
use crate::document::{
    create_did_document, create_did_document_from_keypair, DidDocumentOptions, DidWithDocument,
};
use crate::errors::DidError;
use ack_keys::{FormattedPublicKey, Keypair, KeypairAlgorithm, PublicKeyFormat};
use url::Url;

/// Creates a did:web from a URL.
///
/// The port colon is percent-encoded and path slashes become colons, e.g.
/// `https://example.com:8080/a/b` gives `did:web:example.com%3A8080:a:b`.
pub fn create_did_web_uri(input: &str) -> Result<String, DidError> {
    let url = Url::parse(input)?;
    let hostname = url
        .host_str()
        .ok_or_else(|| DidError::InvalidUrl(format!("{input} has no host")))?;
    let path = url.path();
    let path = path.strip_prefix('/').unwrap_or(path);
    let path = path.strip_suffix('/').unwrap_or(path).replace('/', ":");
    let port = url.port().map(|p| format!("%3A{p}")).unwrap_or_default();

    if path.is_empty() {
        Ok(format!("did:web:{hostname}{port}"))
    } else {
        Ok(format!("did:web:{hostname}{port}:{path}"))
    }
}

pub fn is_did_web_uri(did: &str) -> bool {
    did.starts_with("did:web:")
}

pub fn create_did_web_document(
    base_url: &str,
    algorithm: KeypairAlgorithm,
    public_key: FormattedPublicKey,
    options: DidDocumentOptions,
) -> Result<DidWithDocument, DidError> {
    let did = create_did_web_uri(base_url)?;
    let did_document = create_did_document(&did, algorithm, public_key, options);
    Ok(DidWithDocument { did, did_document })
}

pub fn create_did_web_document_from_keypair(
    base_url: &str,
    keypair: &Keypair,
    format: PublicKeyFormat,
    options: DidDocumentOptions,
) -> Result<DidWithDocument, DidError> {
    let did = create_did_web_uri(base_url)?;
    let did_document = create_did_document_from_keypair(&did, keypair, format, options)?;
    Ok(DidWithDocument { did, did_document })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ack_keys::generate_keypair;

    #[test]
    fn test_create_did_web_uri() {
        assert_eq!(
            create_did_web_uri("https://example.com:8080/a/b").unwrap(),
            "did:web:example.com%3A8080:a:b"
        );
        assert_eq!(
            create_did_web_uri("https://example.com").unwrap(),
            "did:web:example.com"
        );
        assert_eq!(
            create_did_web_uri("https://example.com/").unwrap(),
            "did:web:example.com"
        );
        assert_eq!(
            create_did_web_uri("http://localhost:3000/agents/alice/").unwrap(),
            "did:web:localhost%3A3000:agents:alice"
        );
        // Default ports are dropped.
        assert_eq!(
            create_did_web_uri("https://example.com:443").unwrap(),
            "did:web:example.com"
        );
        assert!(create_did_web_uri("not a url").is_err());
    }

    #[test]
    fn test_create_did_web_document_from_keypair() {
        let keypair = generate_keypair(KeypairAlgorithm::Ed25519, None).unwrap();
        let result = create_did_web_document_from_keypair(
            "https://agent.example.com/",
            &keypair,
            PublicKeyFormat::Multibase,
            DidDocumentOptions::default(),
        )
        .unwrap();
        assert_eq!(result.did, "did:web:agent.example.com");
        assert_eq!(result.did_document.id, result.did);
        let method = &result.did_document.verification_method[0];
        assert_eq!(method.id, "did:web:agent.example.com#multibase-1");
        assert_eq!(method.type_, "Ed25519VerificationKey2018");
        assert!(method.public_key_multibase.as_ref().unwrap().starts_with('z'));
        assert!(is_did_web_uri(&result.did));
    }
}
