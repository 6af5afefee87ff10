//! The server's own did:web identity and signing key.
use crate::config::HTTPConfig;
use crate::errors::AckHTTPError;
use ack_did::{create_did_web_document_from_keypair, DidDocument, DidDocumentOptions, DidResolver};
use ack_jwt::{create_jwt_signer, JwtAlgorithm, JwtSigner};
use ack_keys::encoding::hex_string_to_bytes;
use ack_keys::{generate_keypair, KeypairAlgorithm, PublicKeyFormat};
use ack_vc::{sign_credential, SignCredentialOptions, SignedCredential, W3CCredential};
use log::{info, warn};
use std::sync::Arc;

/// Algorithm of every credential the server signs.
pub const ISSUER_ALGORITHM: JwtAlgorithm = JwtAlgorithm::ES256K;

pub struct ServerIdentity {
    pub did: String,
    pub did_document: DidDocument,
    pub signer: Arc<dyn JwtSigner>,
}

impl ServerIdentity {
    /// Derives the identity from `base_url` and `issuer_private_key`, generating
    /// a key when none is configured.
    pub fn from_config(config: &HTTPConfig) -> Result<Self, AckHTTPError> {
        let private_key = match &config.issuer_private_key {
            Some(hex) => Some(hex_string_to_bytes(hex)?),
            None => {
                warn!("No issuer private key configured, generating a new one");
                None
            }
        };
        let keypair = generate_keypair(KeypairAlgorithm::Secp256k1, private_key.as_deref())?;
        let did_with_document = create_did_web_document_from_keypair(
            &config.base_url,
            &keypair,
            PublicKeyFormat::Jwk,
            DidDocumentOptions::default(),
        )?;
        info!("Issuer DID: {}", did_with_document.did);
        Ok(Self {
            did: did_with_document.did,
            did_document: did_with_document.did_document,
            signer: create_jwt_signer(&keypair),
        })
    }

    /// Signs a credential as this server.
    pub async fn sign(
        &self,
        credential: &W3CCredential,
        resolver: &DidResolver,
    ) -> Result<SignedCredential, AckHTTPError> {
        Ok(sign_credential(
            credential,
            SignCredentialOptions {
                did: &self.did,
                signer: self.signer.as_ref(),
                alg: Some(ISSUER_ALGORITHM),
                resolver,
            },
        )
        .await?)
    }
}
