use agentcommercekit::did::{
    create_did_key_uri, create_did_web_document_from_keypair, get_did_resolver, DidDocumentOptions,
    DidResolver, GetDidResolverOptions,
};
use agentcommercekit::id::{
    create_controller_credential, get_controller_claim_verifier, CreateControllerCredentialParams,
};
use agentcommercekit::jwt::{create_jwt_signer, JwtSigner};
use agentcommercekit::keys::{generate_keypair, KeypairAlgorithm, PublicKeyFormat};
use agentcommercekit::pay::{
    create_payment_receipt, payment_required_response, verify_payment_receipt,
    CreatePaymentReceiptParams, PaymentOption, PaymentRequestInit, PaymentTokenOptions,
    VerifyPaymentReceiptOptions,
};
use agentcommercekit::vc::{
    sign_credential, verify_credential, CredentialErrorKind, CredentialInput,
    SignCredentialOptions, SignedCredential, VerifyCredentialOptions,
};
use std::sync::Arc;

struct Party {
    did: String,
    signer: Arc<dyn JwtSigner>,
}

impl Party {
    fn new(algorithm: KeypairAlgorithm) -> Self {
        let keypair = generate_keypair(algorithm, None).unwrap();
        Self {
            did: create_did_key_uri(&keypair).unwrap(),
            signer: create_jwt_signer(&keypair),
        }
    }
}

/// A resolver that knows `https://agent.example.com` is controlled by `owner`.
fn resolver_with_agent(owner: &str) -> (DidResolver, String) {
    let resolver = get_did_resolver(GetDidResolverOptions::default());
    let keypair = generate_keypair(KeypairAlgorithm::Secp256k1, None).unwrap();
    let agent = create_did_web_document_from_keypair(
        "https://agent.example.com",
        &keypair,
        PublicKeyFormat::Jwk,
        DidDocumentOptions {
            controller: Some(owner.to_string()),
            ..Default::default()
        },
    )
    .unwrap();
    resolver.add_to_cache(&agent.did, agent.did_document);
    (resolver, agent.did)
}

async fn controller_credential(
    issuer: &Party,
    agent_did: &str,
    controller: &str,
    resolver: &DidResolver,
) -> SignedCredential {
    let credential = create_controller_credential(CreateControllerCredentialParams {
        subject: agent_did.to_string(),
        controller: controller.to_string(),
        issuer: Some(issuer.did.clone()),
        ..Default::default()
    });
    sign_credential(
        &credential,
        SignCredentialOptions {
            did: &issuer.did,
            signer: issuer.signer.as_ref(),
            alg: None,
            resolver,
        },
    )
    .await
    .unwrap()
}

#[tokio::test]
async fn test_agent_identity() {
    let owner = Party::new(KeypairAlgorithm::Ed25519);
    let issuer = Party::new(KeypairAlgorithm::Secp256k1);
    let (resolver, agent_did) = resolver_with_agent(&owner.did);

    let options = VerifyCredentialOptions::new(&resolver)
        .with_trusted_issuers(Some(vec![issuer.did.clone()]))
        .with_verifiers(vec![get_controller_claim_verifier()]);

    let signed = controller_credential(&issuer, &agent_did, &owner.did, &resolver).await;
    let verified = verify_credential(CredentialInput::Jwt(signed.jwt), &options)
        .await
        .unwrap();
    assert_eq!(verified.credential_subject.id.as_deref(), Some(agent_did.as_str()));

    // An impostor cannot claim the agent, whoever signs the credential.
    let impostor = Party::new(KeypairAlgorithm::Ed25519);
    let signed = controller_credential(&issuer, &agent_did, &impostor.did, &resolver).await;
    let err = verify_credential(CredentialInput::Jwt(signed.jwt), &options)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), CredentialErrorKind::InvalidControllerClaim);
}

#[tokio::test]
async fn test_agent_payment() {
    let merchant = Party::new(KeypairAlgorithm::Secp256k1);
    let receipt_service = Party::new(KeypairAlgorithm::Secp256k1);
    let payer = Party::new(KeypairAlgorithm::Ed25519);
    let resolver = get_did_resolver(GetDidResolverOptions::default());

    // The merchant answers an unpaid request with 402 and a payment token.
    let response = payment_required_response(
        PaymentRequestInit {
            id: "order-1".to_string(),
            description: Some("One premium API call".to_string()),
            payment_options: vec![PaymentOption {
                id: "usdc-base".to_string(),
                amount: 500,
                decimals: 2,
                currency: "USDC".to_string(),
                recipient: merchant.did.clone(),
                network: Some("eip155:84532".to_string()),
                payment_service: None,
                receipt_service: Some("https://receipts.example.com".to_string()),
            }],
            ..Default::default()
        },
        &PaymentTokenOptions {
            issuer: &merchant.did,
            signer: merchant.signer.as_ref(),
            algorithm: Default::default(),
        },
    )
    .unwrap();
    assert_eq!(response.status, 402);

    // The receipt service issues a receipt to the payer for that token.
    let receipt = create_payment_receipt(CreatePaymentReceiptParams {
        payment_token: response.body.payment_token,
        payment_option_id: "usdc-base".to_string(),
        issuer: receipt_service.did.clone(),
        payer_did: payer.did.clone(),
        ..Default::default()
    });
    let signed = sign_credential(
        &receipt,
        SignCredentialOptions {
            did: &receipt_service.did,
            signer: receipt_service.signer.as_ref(),
            alg: None,
            resolver: &resolver,
        },
    )
    .await
    .unwrap();

    // The merchant accepts receipts from the receipt service for its own tokens.
    let mut options = VerifyPaymentReceiptOptions::new(&resolver);
    options.trusted_receipt_issuers = Some(vec![receipt_service.did.clone()]);
    options.payment_request_issuer = Some(merchant.did.clone());
    let verified = verify_payment_receipt(CredentialInput::Jwt(signed.jwt.clone()), &options)
        .await
        .unwrap();
    assert_eq!(verified.payment_request.unwrap().id, "order-1");

    // A token issued by another merchant is rejected.
    options.payment_request_issuer = Some(payer.did.clone());
    let err = verify_payment_receipt(CredentialInput::Jwt(signed.jwt.clone()), &options)
        .await
        .unwrap_err();
    assert_eq!(
        err.verification_kind(),
        Some(CredentialErrorKind::InvalidCredentialSubject)
    );

    // So is a receipt from an untrusted issuer.
    options.payment_request_issuer = None;
    options.trusted_receipt_issuers = Some(vec![payer.did.clone()]);
    let err = verify_payment_receipt(CredentialInput::Jwt(signed.jwt), &options)
        .await
        .unwrap_err();
    assert_eq!(err.verification_kind(), Some(CredentialErrorKind::UntrustedIssuer));
}
