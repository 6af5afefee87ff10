//! Payment requests, payment tokens and payment receipts.
#[cfg(test)]
pub(crate) mod data;
pub mod errors;
pub mod payment_request;
pub mod payment_token;
pub mod receipt;
pub mod request_body;
pub mod verify_receipt;

pub use errors::PaymentError;
pub use payment_request::{is_payment_request, PaymentOption, PaymentRequest, PaymentRequestInit};
pub use payment_token::{
    create_payment_token, verify_payment_token, PaymentTokenOptions, VerifiedPaymentToken,
};
pub use receipt::{
    create_payment_receipt, get_receipt_claim_verifier, is_payment_receipt_credential,
    CreatePaymentReceiptParams, PaymentReceiptClaim, ReceiptClaimVerifier,
    PAYMENT_RECEIPT_CREDENTIAL_TYPE,
};
pub use request_body::{
    create_payment_request_body, payment_required_response, PaymentRequestBody,
    PaymentRequiredResponse, PAYMENT_REQUIRED_STATUS,
};
pub use verify_receipt::{
    verify_payment_receipt, VerifiedPaymentReceipt, VerifyPaymentReceiptOptions,
};
