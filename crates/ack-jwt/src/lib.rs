//! Compact JWS tokens signed and verified with keys published in DID documents.
pub mod algorithm;
pub mod errors;
pub mod jwt;
pub mod signer;
pub mod verify;

pub use algorithm::{resolve_jwt_algorithm, JwtAlgorithm};
pub use errors::JwtError;
pub use jwt::{create_jwt, decode_jwt, is_jwt_string, DecodedJwt, JwtHeader, JwtPayload};
pub use signer::{create_jwt_signer, JwtSigner, KeypairSigner};
pub use verify::{verify_jwt, JwtVerified, JwtVerifyPolicies};
