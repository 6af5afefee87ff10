//! Request bodies carried as signed JWT payloads.
use crate::errors::AckHTTPError;
use crate::state::AppState;
use ack_did::{is_did_uri, Resolvable};
use ack_jwt::{is_jwt_string, verify_jwt, JwtVerified, JwtVerifyPolicies};
use axum::http::HeaderMap;
use log::debug;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Names the issuer of an unsigned body in development mode.
pub const PAYLOAD_ISSUER_HEADER: &str = "X-Payload-Issuer";

/// A request body and the DID that signed it.
#[derive(Debug, Clone, PartialEq)]
pub struct SignedPayload<T> {
    pub issuer: String,
    pub body: T,
}

/// Verifies a JWT and reads its payload as `T`.
pub async fn validate_payload<T: DeserializeOwned>(
    jwt: &str,
    resolver: &dyn Resolvable,
) -> Result<(JwtVerified, T), AckHTTPError> {
    let parsed = verify_jwt(jwt, resolver, &JwtVerifyPolicies::default())
        .await
        .map_err(|e| {
            debug!("Payload verification failed: {e}");
            AckHTTPError::unauthorized("Invalid payload")
        })?;
    let body = serde_json::from_value(Value::Object(parsed.payload.clone()))
        .map_err(|e| AckHTTPError::BadRequest(format!("Invalid request body: {e}")))?;
    Ok((parsed, body))
}

async fn validate_signed(
    value: &Value,
    resolver: &dyn Resolvable,
) -> Result<(String, Value), AckHTTPError> {
    let jwt = value
        .get("payload")
        .and_then(Value::as_str)
        .filter(|jwt| is_jwt_string(jwt))
        .ok_or_else(|| AckHTTPError::BadRequest("Invalid JWT format".to_string()))?;
    let (parsed, body) = validate_payload::<Value>(jwt, resolver).await?;
    if !is_did_uri(&parsed.issuer) {
        return Err(AckHTTPError::unauthorized("Invalid issuer"));
    }
    Ok((parsed.issuer, body))
}

/// Validates a `{"payload": <JWT>}` request body signed by a DID.
///
/// In development mode a failing request is accepted when its raw body parses
/// as `T` and the `X-Payload-Issuer` header holds a DID.
pub async fn validate_signed_payload<T: DeserializeOwned>(
    value: &Value,
    headers: &HeaderMap,
    state: &AppState,
) -> Result<SignedPayload<T>, AckHTTPError> {
    let error = match validate_signed(value, &state.resolver).await {
        Ok((issuer, body)) => {
            let body = serde_json::from_value(body)
                .map_err(|e| AckHTTPError::BadRequest(format!("Invalid request body: {e}")))?;
            return Ok(SignedPayload { issuer, body });
        }
        Err(error) => error,
    };

    if state.config.development {
        let issuer = headers
            .get(PAYLOAD_ISSUER_HEADER)
            .and_then(|header| header.to_str().ok())
            .filter(|issuer| is_did_uri(issuer));
        if let (Some(issuer), Ok(body)) = (issuer, serde_json::from_value::<T>(value.clone())) {
            debug!("Accepting unsigned payload from {issuer}");
            return Ok(SignedPayload {
                issuer: issuer.to_string(),
                body,
            });
        }
    }
    Err(error)
}
