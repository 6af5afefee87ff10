//! Payment requests and the payment options they offer.
use crate::errors::PaymentError;
use ack_did::is_did_uri;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

/// One way of paying a [`PaymentRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentOption {
    pub id: String,
    /// Amount in minor units, scaled by `decimals`.
    pub amount: u64,
    pub decimals: u32,
    pub currency: String,
    pub recipient: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    /// URL or DID of the service that executes the payment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_service: Option<String>,
    /// URL or DID of the service that issues receipts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt_service: Option<String>,
}

/// A request for payment as supplied by the caller. `expires_at` may be any
/// RFC 3339 date and is normalised when converted into a [`PaymentRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequestInit {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_callback: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
    pub payment_options: Vec<PaymentOption>,
}

/// A validated payment request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_callback: Option<String>,
    /// ISO 8601 in UTC with milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
    pub payment_options: Vec<PaymentOption>,
}

fn is_url(value: &str) -> bool {
    Url::parse(value).is_ok()
}

fn is_url_or_did(value: &str) -> bool {
    is_did_uri(value) || is_url(value)
}

fn invalid(message: impl Into<String>) -> PaymentError {
    PaymentError::InvalidPaymentRequest(message.into())
}

fn normalise_date(value: &str) -> Result<String, PaymentError> {
    DateTime::parse_from_rfc3339(value)
        .map(|date| {
            date.with_timezone(&Utc)
                .to_rfc3339_opts(SecondsFormat::Millis, true)
        })
        .map_err(|_| invalid(format!("expiresAt is not a valid date: {value}")))
}

impl PaymentOption {
    pub fn validate(&self) -> Result<(), PaymentError> {
        if self.amount == 0 {
            return Err(invalid(format!(
                "amount of payment option {} must be positive",
                self.id
            )));
        }
        for (name, service) in [
            ("paymentService", &self.payment_service),
            ("receiptService", &self.receipt_service),
        ] {
            if let Some(service) = service {
                if !is_url_or_did(service) {
                    return Err(invalid(format!("{name} must be a URL or DID: {service}")));
                }
            }
        }
        Ok(())
    }
}

impl PaymentRequest {
    pub fn validate(&self) -> Result<(), PaymentError> {
        if self.payment_options.is_empty() {
            return Err(invalid("paymentOptions must not be empty"));
        }
        if let Some(callback) = &self.service_callback {
            if !is_url(callback) {
                return Err(invalid(format!("serviceCallback must be a URL: {callback}")));
            }
        }
        if let Some(expires_at) = &self.expires_at {
            normalise_date(expires_at)?;
        }
        self.payment_options
            .iter()
            .try_for_each(PaymentOption::validate)
    }

    /// Parses and validates a JSON value, such as a payment token payload.
    /// Members other than those of a payment request are ignored.
    pub fn from_value(value: Value) -> Result<Self, PaymentError> {
        let init: PaymentRequestInit =
            serde_json::from_value(value).map_err(|e| invalid(e.to_string()))?;
        init.try_into()
    }
}

impl TryFrom<PaymentRequestInit> for PaymentRequest {
    type Error = PaymentError;

    fn try_from(init: PaymentRequestInit) -> Result<Self, Self::Error> {
        let expires_at = init.expires_at.as_deref().map(normalise_date).transpose()?;
        let request = PaymentRequest {
            id: init.id,
            description: init.description,
            service_callback: init.service_callback,
            expires_at,
            payment_options: init.payment_options,
        };
        request.validate()?;
        Ok(request)
    }
}

/// Returns `true` if the value is a valid payment request.
pub fn is_payment_request(value: &Value) -> bool {
    PaymentRequest::from_value(value.clone()).is_ok()
}
