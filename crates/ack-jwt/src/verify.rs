//! JWT verification against keys published in the issuer's DID document.
use crate::algorithm::{resolve_jwt_algorithm, JwtAlgorithm};
use crate::errors::JwtError;
use crate::jwt::{decode_jwt, DecodedJwt, JwtPayload};
use ack_did::{Resolvable, VerificationMethod};
use ack_keys::curves::{ed25519, secp256k1};
use ack_keys::encoding::{base58_to_bytes, hex_string_to_bytes, jwk_to_bytes, multibase_to_bytes};
use chrono::Utc;
use log::debug;
use serde_json::Value;

/// Default clock skew tolerated for time claims, in seconds.
pub const DEFAULT_SKEW: i64 = 300;

/// Time claim checks applied by [`verify_jwt`]. Audience is never checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JwtVerifyPolicies {
    pub exp: bool,
    pub nbf: bool,
    pub iat: bool,
    pub skew: i64,
    /// Overrides the current time (seconds since the epoch).
    pub now: Option<i64>,
}

impl Default for JwtVerifyPolicies {
    fn default() -> Self {
        Self {
            exp: true,
            nbf: true,
            iat: true,
            skew: DEFAULT_SKEW,
            now: None,
        }
    }
}

impl JwtVerifyPolicies {
    /// Default policies with expiry checking disabled.
    pub fn ignore_expiry() -> Self {
        Self {
            exp: false,
            ..Self::default()
        }
    }
}

/// A JWT whose signature checked out.
#[derive(Debug, Clone, PartialEq)]
pub struct JwtVerified {
    pub payload: JwtPayload,
    pub issuer: String,
    /// The verification method whose key produced the signature.
    pub signer: VerificationMethod,
    pub jwt: String,
}

fn numeric_claim(payload: &JwtPayload, name: &str) -> Option<i64> {
    payload
        .get(name)
        .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64)))
}

fn check_time_claims(payload: &JwtPayload, policies: &JwtVerifyPolicies) -> Result<(), JwtError> {
    let now = policies.now.unwrap_or_else(|| Utc::now().timestamp());
    if let Some(nbf) = numeric_claim(payload, "nbf") {
        if policies.nbf && nbf > now + policies.skew {
            return Err(JwtError::NotYetValid(nbf));
        }
    } else if let Some(iat) = numeric_claim(payload, "iat") {
        if policies.iat && iat > now + policies.skew {
            return Err(JwtError::IssuedInFuture(iat));
        }
    }
    if let Some(exp) = numeric_claim(payload, "exp") {
        if policies.exp && exp <= now - policies.skew {
            return Err(JwtError::Expired(exp));
        }
    }
    Ok(())
}

fn strip_multicodec(bytes: Vec<u8>) -> Vec<u8> {
    match bytes.as_slice() {
        [0xe7, 0x01, rest @ ..] if rest.len() == 33 => rest.to_vec(),
        [0xed, 0x01, rest @ ..] if rest.len() == 32 => rest.to_vec(),
        _ => bytes,
    }
}

/// Raw public key bytes published by a verification method, if any.
fn public_key_bytes(method: &VerificationMethod) -> Option<Vec<u8>> {
    if let Some(hex) = &method.public_key_hex {
        return hex_string_to_bytes(hex).ok();
    }
    if let Some(base58) = &method.public_key_base58 {
        return base58_to_bytes(base58).ok();
    }
    if let Some(jwk) = &method.public_key_jwk {
        return jwk_to_bytes(jwk).ok();
    }
    if let Some(multibase) = &method.public_key_multibase {
        return multibase_to_bytes(multibase).ok().map(strip_multicodec);
    }
    None
}

/// Lowercase Ethereum address a verification method commits to, if any.
fn account_address(method: &VerificationMethod) -> Option<String> {
    method
        .ethereum_address
        .as_deref()
        .or_else(|| {
            method
                .blockchain_account_id
                .as_deref()
                .and_then(|id| id.rsplit(':').next())
        })
        .map(str::to_lowercase)
}

fn recovered_matches(method: &VerificationMethod, recovered: &[u8]) -> bool {
    if let Some(public_key) = public_key_bytes(method) {
        let (Ok(a), Ok(b)) = (
            secp256k1::compress_public_key(&public_key),
            secp256k1::compress_public_key(recovered),
        ) else {
            return false;
        };
        return a == b;
    }
    match (account_address(method), secp256k1::ethereum_address(recovered)) {
        (Some(address), Ok(recovered)) => address == recovered,
        _ => false,
    }
}

fn recover_signer<'a>(
    decoded: &DecodedJwt,
    authenticators: &[&'a VerificationMethod],
) -> Option<&'a VerificationMethod> {
    let recovery_ids: Vec<u8> = match decoded.signature.len() {
        65 => vec![decoded.signature[64]],
        64 => vec![0, 1],
        _ => return None,
    };
    recovery_ids.into_iter().find_map(|recovery_id| {
        let recovered =
            secp256k1::recover_public_key(decoded.data.as_bytes(), &decoded.signature, recovery_id)
                .ok()?;
        authenticators
            .iter()
            .find(|method| recovered_matches(method, &recovered))
            .copied()
    })
}

fn find_signer<'a>(
    alg: JwtAlgorithm,
    decoded: &DecodedJwt,
    authenticators: &[&'a VerificationMethod],
) -> Option<&'a VerificationMethod> {
    let data = decoded.data.as_bytes();
    let signature = decoded.signature.as_slice();
    match alg {
        JwtAlgorithm::EdDSA => authenticators.iter().copied().find(|method| {
            public_key_bytes(method).is_some_and(|key| ed25519::verify(&key, data, signature))
        }),
        JwtAlgorithm::ES256K => {
            if signature.len() != 64 {
                return None;
            }
            authenticators
                .iter()
                .copied()
                .find(|method| {
                    public_key_bytes(method)
                        .is_some_and(|key| secp256k1::verify(&key, data, signature))
                })
                .or_else(|| {
                    let address_keys: Vec<&VerificationMethod> = authenticators
                        .iter()
                        .copied()
                        .filter(|method| account_address(method).is_some())
                        .collect();
                    recover_signer(decoded, &address_keys)
                })
        }
        JwtAlgorithm::ES256KR => recover_signer(decoded, authenticators),
    }
}

/// Verifies a JWT issued by the DID in its `iss` claim.
///
/// The issuer is resolved and each verification method whose type suits the
/// header `alg` is tried until one verifies the signature.
pub async fn verify_jwt(
    jwt: &str,
    resolver: &dyn Resolvable,
    policies: &JwtVerifyPolicies,
) -> Result<JwtVerified, JwtError> {
    let decoded = decode_jwt(jwt)?;
    let alg = resolve_jwt_algorithm(&decoded.header.alg)?;
    let issuer = decoded
        .payload
        .get("iss")
        .and_then(Value::as_str)
        .ok_or(JwtError::MissingIssuer)?
        .to_string();

    let result = resolver.resolve(&issuer).await;
    if let Some(error) = &result.did_resolution_metadata.error {
        return Err(JwtError::ResolverError(format!(
            "Unable to resolve DID document for {issuer}: {error}, {}",
            result
                .did_resolution_metadata
                .message
                .as_deref()
                .unwrap_or_default()
        )));
    }
    let Some(document) = result.did_document else {
        return Err(JwtError::ResolverError(format!(
            "Unable to resolve DID document for {issuer}"
        )));
    };

    let types = alg.verification_method_types();
    let authenticators: Vec<&VerificationMethod> = document
        .verification_methods()
        .into_iter()
        .filter(|method| types.contains(&method.type_.as_str()))
        .collect();
    if authenticators.is_empty() {
        return Err(JwtError::NoSuitableKeys(format!(
            "DID document for {issuer} does not have public keys for {alg}"
        )));
    }

    let signer = find_signer(alg, &decoded, &authenticators)
        .ok_or(JwtError::InvalidSignature)?
        .clone();
    check_time_claims(&decoded.payload, policies)?;
    debug!("Verified JWT from {issuer} signed by {}", signer.id);

    Ok(JwtVerified {
        payload: decoded.payload,
        issuer,
        signer,
        jwt: jwt.to_string(),
    })
}
