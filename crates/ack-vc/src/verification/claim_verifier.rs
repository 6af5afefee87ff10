use crate::credential::CredentialSubject;
use crate::errors::CredentialVerificationError;
use ack_did::Resolvable;
use async_trait::async_trait;

/// Validates the claims of one kind of credential.
#[async_trait]
pub trait ClaimVerifier: Send + Sync {
    /// Whether this verifier handles a credential with these types.
    fn accepts(&self, types: &[String]) -> bool;

    async fn verify(
        &self,
        subject: &CredentialSubject,
        resolver: &dyn Resolvable,
    ) -> Result<(), CredentialVerificationError>;
}
