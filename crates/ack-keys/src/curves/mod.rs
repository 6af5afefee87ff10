//! Curve specific key derivation, signing and verification.
pub mod ed25519;
pub mod secp256k1;
