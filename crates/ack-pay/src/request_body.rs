//! The body of an HTTP 402 Payment Required response.
use crate::errors::PaymentError;
use crate::payment_request::{PaymentRequest, PaymentRequestInit};
use crate::payment_token::{create_payment_token, PaymentTokenOptions};
use serde::{Deserialize, Serialize};

pub const PAYMENT_REQUIRED_STATUS: u16 = 402;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequestBody {
    pub payment_request: PaymentRequest,
    pub payment_token: String,
}

/// A 402 response ready to be written by an HTTP framework.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRequiredResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: PaymentRequestBody,
}

/// Validates the payment request and signs it into a payment token.
pub fn create_payment_request_body(
    init: PaymentRequestInit,
    options: &PaymentTokenOptions<'_>,
) -> Result<PaymentRequestBody, PaymentError> {
    let payment_request = PaymentRequest::try_from(init)?;
    let payment_token = create_payment_token(&payment_request, options)?;
    Ok(PaymentRequestBody {
        payment_request,
        payment_token,
    })
}

pub fn payment_required_response(
    init: PaymentRequestInit,
    options: &PaymentTokenOptions<'_>,
) -> Result<PaymentRequiredResponse, PaymentError> {
    Ok(PaymentRequiredResponse {
        status: PAYMENT_REQUIRED_STATUS,
        content_type: "application/json",
        body: create_payment_request_body(init, options)?,
    })
}
