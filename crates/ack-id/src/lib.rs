//! Agent identity: controller credentials binding an agent DID to its owner.
pub mod controller;

pub use controller::{
    create_controller_credential, get_controller_claim_verifier, is_controller_credential,
    ControllerClaim, ControllerClaimVerifier, CreateControllerCredentialParams,
    CONTROLLER_CREDENTIAL_TYPE,
};
