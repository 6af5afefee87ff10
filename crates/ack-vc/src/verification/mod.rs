//! Credential verification.
pub mod claim_verifier;
pub mod pipeline;

pub use claim_verifier::ClaimVerifier;
pub use pipeline::{
    is_expired, is_expired_at, verify_credential, verify_parsed_credential, verify_proof,
    CredentialInput, VerifyCredentialOptions,
};
