//! Compact JWS encoding and decoding.
use crate::algorithm::JwtAlgorithm;
use crate::errors::JwtError;
use crate::signer::JwtSigner;
use ack_keys::encoding::{base64_to_bytes, bytes_to_base64};
use chrono::Utc;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// JWT claims as a JSON object.
pub type JwtPayload = Map<String, Value>;

lazy_static! {
    static ref JWT_STRING: Regex =
        Regex::new(r"^[a-zA-Z0-9_-]+\.[a-zA-Z0-9_-]+\.[a-zA-Z0-9_-]+$").unwrap();
}

/// Returns `true` for three base64url segments separated by dots.
pub fn is_jwt_string(value: &str) -> bool {
    JWT_STRING.is_match(value)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtHeader {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub typ: Option<String>,
    pub alg: String,
    #[serde(flatten)]
    pub property_set: Map<String, Value>,
}

impl JwtHeader {
    pub fn new(alg: JwtAlgorithm) -> Self {
        Self {
            typ: Some("JWT".to_string()),
            alg: alg.to_string(),
            property_set: Map::new(),
        }
    }
}

/// A JWT split into its parts. Nothing is verified.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedJwt {
    pub header: JwtHeader,
    pub payload: JwtPayload,
    pub signature: Vec<u8>,
    /// The signing input: `<header>.<payload>`.
    pub data: String,
}

fn decode_segment<T: serde::de::DeserializeOwned>(
    segment: &str,
    name: &str,
) -> Result<T, JwtError> {
    let bytes = base64_to_bytes(segment)
        .map_err(|e| JwtError::InvalidJwt(format!("{name} is not base64url: {e}")))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| JwtError::InvalidJwt(format!("{name} is not a JSON object: {e}")))
}

/// Decodes a JWT without checking its signature.
pub fn decode_jwt(jwt: &str) -> Result<DecodedJwt, JwtError> {
    if !is_jwt_string(jwt) {
        return Err(JwtError::InvalidJwt("incorrect format JWT".to_string()));
    }
    let mut parts = jwt.split('.');
    let (Some(header), Some(payload), Some(signature)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(JwtError::InvalidJwt("incorrect format JWT".to_string()));
    };
    Ok(DecodedJwt {
        header: decode_segment(header, "header")?,
        payload: decode_segment(payload, "payload")?,
        signature: base64_to_bytes(signature)
            .map_err(|e| JwtError::InvalidJwt(format!("signature is not base64url: {e}")))?,
        data: format!("{header}.{payload}"),
    })
}

/// Signs `payload` as a JWT issued by `issuer`.
///
/// `iat` is set to the current time unless the payload carries one, and `iss`
/// is always overwritten with `issuer`.
pub fn create_jwt<T: Serialize>(
    payload: &T,
    issuer: &str,
    signer: &dyn JwtSigner,
    alg: JwtAlgorithm,
) -> Result<String, JwtError> {
    if alg.keypair_algorithm() != signer.algorithm() {
        return Err(JwtError::UnsupportedAlgorithm(format!(
            "{alg} cannot be signed with a {} key",
            signer.algorithm()
        )));
    }
    let Value::Object(claims) = serde_json::to_value(payload)? else {
        return Err(JwtError::Serialization(
            "JWT payload must be a JSON object".to_string(),
        ));
    };

    let mut full_payload = JwtPayload::new();
    full_payload.insert("iat".to_string(), Value::from(Utc::now().timestamp()));
    full_payload.extend(claims);
    full_payload.insert("iss".to_string(), Value::from(issuer));

    let header = bytes_to_base64(&serde_json::to_vec(&JwtHeader::new(alg))?);
    let body = bytes_to_base64(&serde_json::to_vec(&full_payload)?);
    let data = format!("{header}.{body}");
    let signature = signer.sign(data.as_bytes(), alg)?;
    Ok(format!("{data}.{}", bytes_to_base64(&signature)))
}
