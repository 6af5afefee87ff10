//! Payment receipt credentials.
use ack_did::Resolvable;
use ack_vc::{
    create_credential, ClaimVerifier, CreateCredentialParams, CredentialErrorKind,
    CredentialSubject, CredentialVerificationError, W3CCredential,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

pub const PAYMENT_RECEIPT_CREDENTIAL_TYPE: &str = "PaymentReceiptCredential";

/// The claim of a payment receipt: the payment token that was paid and the
/// option used to pay it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReceiptClaim {
    /// Usually a JWT but not required to be one.
    pub payment_token: String,
    pub payment_option_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Default)]
pub struct CreatePaymentReceiptParams {
    pub id: Option<String>,
    pub payment_token: String,
    pub payment_option_id: String,
    pub issuer: String,
    pub payer_did: String,
    pub expiration_date: Option<DateTime<Utc>>,
    pub metadata: Option<Map<String, Value>>,
}

/// Creates an unsigned receipt issued to the payer.
pub fn create_payment_receipt(params: CreatePaymentReceiptParams) -> W3CCredential {
    let mut attestation = Map::new();
    attestation.insert("paymentToken".to_string(), Value::from(params.payment_token));
    attestation.insert(
        "paymentOptionId".to_string(),
        Value::from(params.payment_option_id),
    );
    if let Some(metadata) = params.metadata {
        attestation.insert("metadata".to_string(), Value::Object(metadata));
    }
    create_credential(CreateCredentialParams {
        id: params.id,
        types: vec![PAYMENT_RECEIPT_CREDENTIAL_TYPE.to_string()],
        issuer: params.issuer,
        subject: params.payer_did,
        attestation,
        expiration_date: params.expiration_date,
        ..Default::default()
    })
}

fn receipt_claim(subject: &CredentialSubject) -> Option<PaymentReceiptClaim> {
    subject.parse_claim().ok()
}

/// Returns the receipt claim of a credential carrying one.
pub fn payment_receipt_claim(credential: &W3CCredential) -> Option<PaymentReceiptClaim> {
    receipt_claim(&credential.credential_subject)
}

/// Returns `true` if the value is a credential with a payment receipt claim.
pub fn is_payment_receipt_credential(value: &Value) -> bool {
    serde_json::from_value::<W3CCredential>(value.clone())
        .ok()
        .and_then(|credential| payment_receipt_claim(&credential))
        .is_some()
}

/// Accepts `PaymentReceiptCredential`s and checks the shape of their claim.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReceiptClaimVerifier;

#[async_trait]
impl ClaimVerifier for ReceiptClaimVerifier {
    fn accepts(&self, types: &[String]) -> bool {
        types.iter().any(|t| t == PAYMENT_RECEIPT_CREDENTIAL_TYPE)
    }

    async fn verify(
        &self,
        subject: &CredentialSubject,
        _resolver: &dyn Resolvable,
    ) -> Result<(), CredentialVerificationError> {
        receipt_claim(subject)
            .map(|_| ())
            .ok_or_else(|| CredentialErrorKind::InvalidCredentialSubject.into())
    }
}

pub fn get_receipt_claim_verifier() -> Arc<dyn ClaimVerifier> {
    Arc::new(ReceiptClaimVerifier)
}
