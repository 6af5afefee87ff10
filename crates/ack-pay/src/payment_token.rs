//! Payment tokens: payment requests signed as JWTs.
use crate::errors::PaymentError;
use crate::payment_request::PaymentRequest;
use ack_did::Resolvable;
use ack_jwt::{create_jwt, verify_jwt, JwtAlgorithm, JwtSigner, JwtVerified, JwtVerifyPolicies};
use log::debug;
use serde_json::Value;

pub struct PaymentTokenOptions<'a> {
    pub issuer: &'a str,
    pub signer: &'a dyn JwtSigner,
    pub algorithm: JwtAlgorithm,
}

/// Signs a payment request as a JWT with `sub` set to the request id.
pub fn create_payment_token(
    payment_request: &PaymentRequest,
    options: &PaymentTokenOptions<'_>,
) -> Result<String, PaymentError> {
    let mut payload = match serde_json::to_value(payment_request) {
        Ok(Value::Object(map)) => map,
        _ => {
            return Err(PaymentError::InvalidPaymentRequest(
                "payment request is not an object".to_string(),
            ))
        }
    };
    payload.insert("sub".to_string(), Value::from(payment_request.id.as_str()));
    Ok(create_jwt(
        &payload,
        options.issuer,
        options.signer,
        options.algorithm,
    )?)
}

#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedPaymentToken {
    pub payment_request: PaymentRequest,
    pub parsed: JwtVerified,
}

/// Verifies a payment token and reads the payment request out of it.
///
/// Any failure is reported as [`PaymentError::InvalidPaymentToken`] without
/// the underlying cause.
pub async fn verify_payment_token(
    token: &str,
    resolver: &dyn Resolvable,
    verify_expiry: bool,
) -> Result<VerifiedPaymentToken, PaymentError> {
    let policies = JwtVerifyPolicies {
        exp: verify_expiry,
        ..Default::default()
    };
    let parsed = verify_jwt(token, resolver, &policies).await.map_err(|e| {
        debug!("Payment token verification failed: {e}");
        PaymentError::invalid_payment_token()
    })?;

    let payment_request = PaymentRequest::from_value(Value::Object(parsed.payload.clone()))
        .map_err(|e| {
            debug!("Payment token payload is not a payment request: {e}");
            PaymentError::InvalidPaymentToken(
                "Payment token is not a valid PaymentRequest".to_string(),
            )
        })?;

    Ok(VerifiedPaymentToken {
        payment_request,
        parsed,
    })
}
