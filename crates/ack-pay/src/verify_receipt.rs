//! Verification of payment receipts and the payment tokens they embed.
use crate::errors::PaymentError;
use crate::payment_request::PaymentRequest;
use crate::payment_token::verify_payment_token;
use crate::receipt::{get_receipt_claim_verifier, payment_receipt_claim};
use ack_did::Resolvable;
use ack_jwt::{is_jwt_string, JwtVerifyPolicies};
use ack_vc::jwt_credential::parse_jwt_credential_with_policies;
use ack_vc::{
    verify_parsed_credential, CredentialInput, CredentialVerificationError, HttpStatusListFetcher,
    RevocationPolicy, StatusListFetcher, VerifyCredentialOptions, W3CCredential,
};
use log::debug;
use std::sync::Arc;

pub struct VerifyPaymentReceiptOptions<'a> {
    pub resolver: &'a dyn Resolvable,
    /// Issuers trusted to issue receipts. Any issuer when `None`.
    pub trusted_receipt_issuers: Option<Vec<String>>,
    /// Whether the embedded payment token is verified as a JWT.
    pub verify_payment_token_jwt: bool,
    /// When set, the payment token must have been issued by this DID.
    pub payment_request_issuer: Option<String>,
    pub revocation_policy: RevocationPolicy,
    pub fetcher: Arc<dyn StatusListFetcher>,
}

impl<'a> VerifyPaymentReceiptOptions<'a> {
    pub fn new(resolver: &'a dyn Resolvable) -> Self {
        Self {
            resolver,
            trusted_receipt_issuers: None,
            verify_payment_token_jwt: true,
            payment_request_issuer: None,
            revocation_policy: RevocationPolicy::default(),
            fetcher: Arc::new(HttpStatusListFetcher::default()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedPaymentReceipt {
    pub receipt: W3CCredential,
    pub payment_token: String,
    /// `None` when the payment token was not verified.
    pub payment_request: Option<PaymentRequest>,
}

/// Verifies a receipt credential, then the payment token it embeds.
///
/// The payment token's own expiry is not enforced: a receipt outlives the
/// request it pays.
pub async fn verify_payment_receipt(
    receipt: CredentialInput,
    options: &VerifyPaymentReceiptOptions<'_>,
) -> Result<VerifiedPaymentReceipt, PaymentError> {
    let credential = match receipt {
        CredentialInput::Jwt(jwt) if is_jwt_string(&jwt) => parse_jwt_credential_with_policies(
            &jwt,
            options.resolver,
            &JwtVerifyPolicies::ignore_expiry(),
        )
        .await
        .map_err(CredentialVerificationError::from)?,
        CredentialInput::Jwt(_) => {
            return Err(CredentialVerificationError::InvalidCredential(
                "Receipt is not a JWT or Credential".to_string(),
            )
            .into())
        }
        CredentialInput::Credential(credential) => *credential,
    };

    let Some(claim) = payment_receipt_claim(&credential) else {
        return Err(CredentialVerificationError::InvalidCredential(
            "Credential is not a PaymentReceiptCredential".to_string(),
        )
        .into());
    };

    let verify_options = VerifyCredentialOptions::new(options.resolver)
        .with_trusted_issuers(options.trusted_receipt_issuers.clone())
        .with_verifiers(vec![get_receipt_claim_verifier()])
        .with_revocation_policy(options.revocation_policy)
        .with_fetcher(options.fetcher.clone());
    verify_parsed_credential(&credential, &verify_options).await?;

    let payment_token = claim.payment_token;
    if !options.verify_payment_token_jwt {
        return Ok(VerifiedPaymentReceipt {
            receipt: credential,
            payment_token,
            payment_request: None,
        });
    }

    if !is_jwt_string(&payment_token) {
        return Err(CredentialVerificationError::InvalidCredentialSubject(
            "Payment token is not a JWT".to_string(),
        )
        .into());
    }

    let verified = verify_payment_token(&payment_token, options.resolver, false).await?;
    if let Some(issuer) = &options.payment_request_issuer {
        if &verified.parsed.issuer != issuer {
            debug!(
                "Payment token issued by {}, expected {issuer}",
                verified.parsed.issuer
            );
            return Err(CredentialVerificationError::InvalidCredentialSubject(
                "Payment token issuer does not match".to_string(),
            )
            .into());
        }
    }

    Ok(VerifiedPaymentReceipt {
        receipt: credential,
        payment_token,
        payment_request: Some(verified.payment_request),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::TEST_PAYMENT_REQUEST;
    use crate::payment_request::PaymentRequestInit;
    use crate::payment_token::{create_payment_token, PaymentTokenOptions};
    use crate::receipt::{create_payment_receipt, CreatePaymentReceiptParams};
    use ack_did::{create_did_key_uri, get_did_resolver, DidResolver};
    use ack_jwt::{create_jwt, create_jwt_signer, JwtAlgorithm, JwtSigner};
    use ack_keys::{generate_keypair, KeypairAlgorithm};
    use ack_vc::{sign_credential, CredentialErrorKind, SignCredentialOptions};
    use chrono::Utc;
    use serde_json::Value;

    struct Party {
        did: String,
        signer: Arc<dyn JwtSigner>,
    }

    fn party(algorithm: KeypairAlgorithm) -> Party {
        let keypair = generate_keypair(algorithm, None).unwrap();
        Party {
            did: create_did_key_uri(&keypair).unwrap(),
            signer: create_jwt_signer(&keypair),
        }
    }

    struct Fixture {
        resolver: DidResolver,
        server: Party,
        receipt_service: Party,
        payer: Party,
    }

    fn fixture() -> Fixture {
        Fixture {
            resolver: get_did_resolver(Default::default()),
            server: party(KeypairAlgorithm::Secp256k1),
            receipt_service: party(KeypairAlgorithm::Ed25519),
            payer: party(KeypairAlgorithm::Secp256k1),
        }
    }

    fn payment_token(issuer: &Party) -> String {
        let init: PaymentRequestInit = serde_json::from_str(TEST_PAYMENT_REQUEST).unwrap();
        let request = PaymentRequest::try_from(init).unwrap();
        create_payment_token(
            &request,
            &PaymentTokenOptions {
                issuer: &issuer.did,
                signer: issuer.signer.as_ref(),
                algorithm: JwtAlgorithm::ES256K,
            },
        )
        .unwrap()
    }

    async fn signed_receipt(fixture: &Fixture, issuer: &Party, payment_token: String) -> String {
        let receipt = create_payment_receipt(CreatePaymentReceiptParams {
            payment_token,
            payment_option_id: "test-payment-option-id".to_string(),
            issuer: issuer.did.clone(),
            payer_did: fixture.payer.did.clone(),
            ..Default::default()
        });
        sign_credential(
            &receipt,
            SignCredentialOptions {
                did: &issuer.did,
                signer: issuer.signer.as_ref(),
                alg: None,
                resolver: &fixture.resolver,
            },
        )
        .await
        .unwrap()
        .jwt
    }

    #[tokio::test]
    async fn test_verify_payment_receipt() {
        let fixture = fixture();
        let token = payment_token(&fixture.server);
        let jwt = signed_receipt(&fixture, &fixture.receipt_service, token.clone()).await;

        let mut options = VerifyPaymentReceiptOptions::new(&fixture.resolver);
        options.trusted_receipt_issuers = Some(vec![fixture.receipt_service.did.clone()]);
        options.payment_request_issuer = Some(fixture.server.did.clone());

        let verified = verify_payment_receipt(CredentialInput::Jwt(jwt), &options)
            .await
            .unwrap();
        assert_eq!(verified.payment_token, token);
        assert_eq!(
            verified.payment_request.unwrap().id,
            "test-payment-request-id"
        );
        assert_eq!(verified.receipt.issuer.id, fixture.receipt_service.did);
    }

    #[tokio::test]
    async fn test_parsed_receipt() {
        let fixture = fixture();
        let jwt = signed_receipt(
            &fixture,
            &fixture.receipt_service,
            payment_token(&fixture.server),
        )
        .await;
        let credential = ack_vc::parse_jwt_credential(&jwt, &fixture.resolver)
            .await
            .unwrap();
        let options = VerifyPaymentReceiptOptions::new(&fixture.resolver);
        assert!(verify_payment_receipt(
            CredentialInput::Credential(Box::new(credential)),
            &options
        )
        .await
        .is_ok());
    }

    #[tokio::test]
    async fn test_not_a_receipt() {
        let fixture = fixture();
        let options = VerifyPaymentReceiptOptions::new(&fixture.resolver);
        let err = verify_payment_receipt(CredentialInput::Jwt("receipt".to_string()), &options)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Receipt is not a JWT or Credential");

        let credential = ack_vc::create_credential(ack_vc::CreateCredentialParams {
            issuer: fixture.receipt_service.did.clone(),
            subject: fixture.payer.did.clone(),
            ..Default::default()
        });
        let err = verify_payment_receipt(
            CredentialInput::Credential(Box::new(credential)),
            &options,
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "Credential is not a PaymentReceiptCredential");
    }

    #[tokio::test]
    async fn test_untrusted_receipt_issuer() {
        let fixture = fixture();
        let jwt = signed_receipt(
            &fixture,
            &fixture.payer,
            payment_token(&fixture.server),
        )
        .await;
        let mut options = VerifyPaymentReceiptOptions::new(&fixture.resolver);
        options.trusted_receipt_issuers = Some(vec![fixture.receipt_service.did.clone()]);
        let err = verify_payment_receipt(CredentialInput::Jwt(jwt), &options)
            .await
            .unwrap_err();
        assert_eq!(
            err.verification_kind(),
            Some(CredentialErrorKind::UntrustedIssuer)
        );
    }

    #[tokio::test]
    async fn test_payment_request_issuer_mismatch() {
        let fixture = fixture();
        let jwt = signed_receipt(
            &fixture,
            &fixture.receipt_service,
            payment_token(&fixture.server),
        )
        .await;
        let mut options = VerifyPaymentReceiptOptions::new(&fixture.resolver);
        options.payment_request_issuer = Some(fixture.payer.did.clone());
        let err = verify_payment_receipt(CredentialInput::Jwt(jwt), &options)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            PaymentError::Verification(CredentialVerificationError::InvalidCredentialSubject(
                "Payment token issuer does not match".to_string()
            ))
        );
    }

    #[tokio::test]
    async fn test_payment_token_not_verified() {
        let fixture = fixture();
        let jwt = signed_receipt(
            &fixture,
            &fixture.receipt_service,
            "not-a-jwt".to_string(),
        )
        .await;
        let mut options = VerifyPaymentReceiptOptions::new(&fixture.resolver);
        let err = verify_payment_receipt(CredentialInput::Jwt(jwt.clone()), &options)
            .await
            .unwrap_err();
        assert_eq!(
            err.verification_kind(),
            Some(CredentialErrorKind::InvalidCredentialSubject)
        );

        options.verify_payment_token_jwt = false;
        let verified = verify_payment_receipt(CredentialInput::Jwt(jwt), &options)
            .await
            .unwrap();
        assert_eq!(verified.payment_token, "not-a-jwt");
        assert!(verified.payment_request.is_none());
    }

    #[tokio::test]
    async fn test_expired_payment_token_is_accepted() {
        let fixture = fixture();
        let mut payload: Value = serde_json::from_str(TEST_PAYMENT_REQUEST).unwrap();
        payload["exp"] = Value::from(Utc::now().timestamp() - 3600);
        let token = create_jwt(
            &payload,
            &fixture.server.did,
            fixture.server.signer.as_ref(),
            JwtAlgorithm::ES256K,
        )
        .unwrap();
        let jwt = signed_receipt(&fixture, &fixture.receipt_service, token).await;

        let options = VerifyPaymentReceiptOptions::new(&fixture.resolver);
        assert!(verify_payment_receipt(CredentialInput::Jwt(jwt), &options)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_forged_payment_token() {
        let fixture = fixture();
        let token = payment_token(&fixture.server);
        let other = payment_token(&fixture.payer);
        let (signing_input, _) = token.rsplit_once('.').unwrap();
        let (_, other_signature) = other.rsplit_once('.').unwrap();
        let forged = format!("{signing_input}.{other_signature}");
        let jwt = signed_receipt(&fixture, &fixture.receipt_service, forged).await;

        let options = VerifyPaymentReceiptOptions::new(&fixture.resolver);
        assert_eq!(
            verify_payment_receipt(CredentialInput::Jwt(jwt), &options)
                .await
                .unwrap_err(),
            PaymentError::invalid_payment_token()
        );
    }
}
