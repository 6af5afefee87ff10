//! Controller credentials and their claim verifier.
use ack_did::{resolve_did_with_controller, Resolvable};
use ack_vc::{
    create_credential, ClaimVerifier, CreateCredentialParams, CredentialErrorKind,
    CredentialSubject, CredentialVerificationError, W3CCredential,
};
use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

pub const CONTROLLER_CREDENTIAL_TYPE: &str = "ControllerCredential";

/// The claim of a controller credential: `controller` owns the agent `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerClaim {
    pub id: String,
    pub controller: String,
}

#[derive(Debug, Clone, Default)]
pub struct CreateControllerCredentialParams {
    pub id: Option<String>,
    /// The agent DID.
    pub subject: String,
    pub controller: String,
    /// Defaults to the controller.
    pub issuer: Option<String>,
}

/// Creates an unsigned controller credential.
pub fn create_controller_credential(params: CreateControllerCredentialParams) -> W3CCredential {
    let mut attestation = Map::new();
    attestation.insert("controller".to_string(), Value::from(params.controller.as_str()));
    create_credential(CreateCredentialParams {
        id: params.id,
        types: vec![CONTROLLER_CREDENTIAL_TYPE.to_string()],
        issuer: params.issuer.unwrap_or_else(|| params.controller.clone()),
        subject: params.subject,
        attestation,
        ..Default::default()
    })
}

/// Returns `true` if the value is a credential with a controller claim.
pub fn is_controller_credential(value: &Value) -> bool {
    serde_json::from_value::<W3CCredential>(value.clone())
        .map(|credential| {
            credential
                .credential_subject
                .parse_claim::<ControllerClaim>()
                .is_ok()
        })
        .unwrap_or(false)
}

/// Accepts `ControllerCredential`s and checks the claimed controller is the
/// controller named in the agent's resolved DID document.
#[derive(Debug, Clone, Copy, Default)]
pub struct ControllerClaimVerifier;

#[async_trait]
impl ClaimVerifier for ControllerClaimVerifier {
    fn accepts(&self, types: &[String]) -> bool {
        types.iter().any(|t| t == CONTROLLER_CREDENTIAL_TYPE)
    }

    async fn verify(
        &self,
        subject: &CredentialSubject,
        resolver: &dyn Resolvable,
    ) -> Result<(), CredentialVerificationError> {
        let claim: ControllerClaim = subject
            .parse_claim()
            .map_err(|_| {
                CredentialVerificationError::from(CredentialErrorKind::InvalidCredentialSubject)
            })?;

        let resolved = resolve_did_with_controller(&claim.id, resolver)
            .await
            .map_err(|e| CredentialVerificationError::InvalidControllerClaim(e.to_string()))?;

        if resolved.controller.did != claim.controller {
            debug!(
                "Controller claim {} does not match document controller {}",
                claim.controller, resolved.controller.did
            );
            return Err(CredentialErrorKind::InvalidControllerClaim.into());
        }
        Ok(())
    }
}

pub fn get_controller_claim_verifier() -> Arc<dyn ClaimVerifier> {
    Arc::new(ControllerClaimVerifier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ack_did::{
        create_did_key_uri, create_did_web_document_from_keypair, get_did_resolver,
        DidDocumentOptions, DidResolver,
    };
    use ack_jwt::create_jwt_signer;
    use ack_keys::{generate_keypair, KeypairAlgorithm, PublicKeyFormat};
    use ack_vc::{
        sign_credential, verify_parsed_credential, SignCredentialOptions,
        VerifyCredentialOptions,
    };

    const AGENT_URL: &str = "https://agent.example.com";
    const OWNER_URL: &str = "https://owner.example.com";

    fn publish(resolver: &DidResolver, url: &str, controller: Option<String>) -> String {
        let keypair = generate_keypair(KeypairAlgorithm::Secp256k1, None).unwrap();
        let published = create_did_web_document_from_keypair(
            url,
            &keypair,
            PublicKeyFormat::Jwk,
            DidDocumentOptions {
                controller,
                ..Default::default()
            },
        )
        .unwrap();
        resolver.add_to_cache(&published.did, published.did_document);
        published.did
    }

    fn subject(id: &str, controller: &str) -> CredentialSubject {
        create_controller_credential(CreateControllerCredentialParams {
            subject: id.to_string(),
            controller: controller.to_string(),
            ..Default::default()
        })
        .credential_subject
    }

    #[test]
    fn test_create_controller_credential() {
        let credential = create_controller_credential(CreateControllerCredentialParams {
            id: Some("urn:uuid:1".to_string()),
            subject: "did:web:agent.example.com".to_string(),
            controller: "did:web:owner.example.com".to_string(),
            issuer: None,
        });
        assert_eq!(
            credential.type_,
            vec!["VerifiableCredential", "ControllerCredential"]
        );
        assert_eq!(credential.issuer.id, "did:web:owner.example.com");
        let claim: ControllerClaim = credential.credential_subject.parse_claim().unwrap();
        assert_eq!(
            claim,
            ControllerClaim {
                id: "did:web:agent.example.com".to_string(),
                controller: "did:web:owner.example.com".to_string(),
            }
        );
        assert!(is_controller_credential(&serde_json::to_value(&credential).unwrap()));

        let credential = create_controller_credential(CreateControllerCredentialParams {
            subject: "did:web:agent.example.com".to_string(),
            controller: "did:web:owner.example.com".to_string(),
            issuer: Some("did:web:issuer.example.com".to_string()),
            ..Default::default()
        });
        assert_eq!(credential.issuer.id, "did:web:issuer.example.com");
    }

    #[test]
    fn test_accepts() {
        let verifier = ControllerClaimVerifier;
        assert!(verifier.accepts(&[
            "VerifiableCredential".to_string(),
            "ControllerCredential".to_string()
        ]));
        assert!(!verifier.accepts(&["VerifiableCredential".to_string()]));
    }

    #[tokio::test]
    async fn test_verify_controller_claim() {
        let resolver = get_did_resolver(Default::default());
        let owner = publish(&resolver, OWNER_URL, None);
        let agent = publish(&resolver, AGENT_URL, Some(owner.clone()));

        let verifier = ControllerClaimVerifier;
        assert!(verifier
            .verify(&subject(&agent, &owner), &resolver)
            .await
            .is_ok());

        let err = verifier
            .verify(&subject(&agent, "did:web:someone-else.example.com"), &resolver)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), CredentialErrorKind::InvalidControllerClaim);
    }

    #[tokio::test]
    async fn test_verify_agent_without_controller() {
        let resolver = get_did_resolver(Default::default());
        let owner = publish(&resolver, OWNER_URL, None);
        let agent = publish(&resolver, AGENT_URL, None);

        let err = ControllerClaimVerifier
            .verify(&subject(&agent, &owner), &resolver)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), CredentialErrorKind::InvalidControllerClaim);
    }

    #[tokio::test]
    async fn test_verify_invalid_subject() {
        let resolver = get_did_resolver(Default::default());
        let mut subject = CredentialSubject::default();
        subject.id = Some("did:web:agent.example.com".to_string());
        let err = ControllerClaimVerifier
            .verify(&subject, &resolver)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), CredentialErrorKind::InvalidCredentialSubject);
    }

    #[tokio::test]
    async fn test_pipeline_with_controller_verifier() {
        let resolver = get_did_resolver(Default::default());
        let owner_keypair = generate_keypair(KeypairAlgorithm::Ed25519, None).unwrap();
        let owner = create_did_key_uri(&owner_keypair).unwrap();
        let agent = publish(&resolver, AGENT_URL, Some(owner.clone()));

        let credential = create_controller_credential(CreateControllerCredentialParams {
            subject: agent,
            controller: owner.clone(),
            ..Default::default()
        });
        let signer = create_jwt_signer(&owner_keypair);
        let signed = sign_credential(
            &credential,
            SignCredentialOptions {
                did: &owner,
                signer: signer.as_ref(),
                alg: None,
                resolver: &resolver,
            },
        )
        .await
        .unwrap();

        let options = VerifyCredentialOptions::new(&resolver)
            .with_trusted_issuers(Some(vec![owner]))
            .with_verifiers(vec![get_controller_claim_verifier()]);
        assert!(verify_parsed_credential(&signed.verifiable_credential, &options)
            .await
            .is_ok());
    }
}
