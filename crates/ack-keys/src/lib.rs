//! Keypairs, public key encodings and raw signature primitives.
pub mod curves;
pub mod encoding;
pub mod errors;
pub mod keypair;
pub mod public_key;

pub use errors::KeyError;
pub use encoding::{PrivateKeyJwk, PublicKeyJwk};
pub use keypair::{
    generate_keypair, jwk_to_keypair, keypair_from_base58, keypair_to_base58, keypair_to_jwk,
    Keypair, KeypairAlgorithm, KeypairBase58,
};
pub use public_key::{
    format_public_key, get_compressed_public_key, FormattedPublicKey, PublicKeyFormat,
};

/// Length in bytes of a compressed secp256k1 public key.
pub const SECP256K1_COMPRESSED_LENGTH: usize = 33;

/// Length in bytes of an uncompressed secp256k1 public key.
pub const SECP256K1_UNCOMPRESSED_LENGTH: usize = 65;

/// Length in bytes of an Ed25519 public key.
pub const ED25519_PUBLIC_KEY_LENGTH: usize = 32;
