//! W3C Verifiable Credentials as JWTs, StatusList2021 revocation and the
//! credential verification pipeline.
pub mod credential;
#[cfg(test)]
pub(crate) mod data;
pub mod errors;
pub mod jwt_credential;
pub mod revocation;
pub mod verification;

pub use credential::{
    create_credential, is_credential, CreateCredentialParams, CredentialStatus,
    CredentialSubject, Issuer, Proof, W3CCredential, CREDENTIALS_V1_CONTEXT, JWT_PROOF_TYPE,
    VERIFIABLE_CREDENTIAL_TYPE,
};
pub use errors::{
    CredentialError, CredentialErrorKind, CredentialVerificationError, RevocationError,
};
pub use jwt_credential::{
    parse_jwt_credential, sign_credential, SignCredentialOptions, SignedCredential,
};
pub use revocation::{
    compress_bit_string, create_status_list_credential, get_status_list_position, is_revocable,
    is_revoked, is_status_list_credential, make_revocable, HttpStatusListFetcher,
    RevocationOptions, RevocationPolicy, StatusList, StatusListFetcher, STATUS_LIST_MAX_SIZE,
};
pub use verification::{
    verify_credential, verify_parsed_credential, ClaimVerifier, CredentialInput,
    VerifyCredentialOptions,
};
