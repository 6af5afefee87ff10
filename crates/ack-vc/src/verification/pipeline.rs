//! The credential verification pipeline.
//!
//! Stages run in order and the first failure is returned: shape, proof,
//! expiry, revocation, issuer trust, then claims.
use crate::credential::{Proof, W3CCredential, JWT_PROOF_TYPE};
use crate::errors::{CredentialErrorKind, CredentialVerificationError};
use crate::jwt_credential::parse_jwt_credential_with_policies;
use crate::revocation::{is_revoked, HttpStatusListFetcher, RevocationPolicy, StatusListFetcher};
use crate::verification::claim_verifier::ClaimVerifier;
use ack_did::Resolvable;
use ack_jwt::{is_jwt_string, JwtVerifyPolicies};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// A credential to verify, either compact or already parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CredentialInput {
    Jwt(String),
    Credential(Box<W3CCredential>),
}

impl CredentialInput {
    pub fn from_value(value: Value) -> Result<Self, CredentialVerificationError> {
        match value {
            Value::String(jwt) => Ok(CredentialInput::Jwt(jwt)),
            other => serde_json::from_value::<W3CCredential>(other)
                .map(|c| CredentialInput::Credential(Box::new(c)))
                .map_err(|_| {
                    CredentialVerificationError::InvalidCredential(
                        "Credential is not a JWT or Credential".to_string(),
                    )
                }),
        }
    }
}

/// Options for [`verify_parsed_credential`].
#[derive(Clone)]
pub struct VerifyCredentialOptions<'a> {
    pub resolver: &'a dyn Resolvable,
    /// When set, even to an empty list, the issuer must be one of these.
    pub trusted_issuers: Option<Vec<String>>,
    /// When empty, claims are not checked.
    pub verifiers: Vec<Arc<dyn ClaimVerifier>>,
    pub revocation_policy: RevocationPolicy,
    pub fetcher: Arc<dyn StatusListFetcher>,
}

impl<'a> VerifyCredentialOptions<'a> {
    pub fn new(resolver: &'a dyn Resolvable) -> Self {
        Self {
            resolver,
            trusted_issuers: None,
            verifiers: Vec::new(),
            revocation_policy: RevocationPolicy::default(),
            fetcher: Arc::new(HttpStatusListFetcher::default()),
        }
    }

    pub fn with_trusted_issuers(mut self, trusted_issuers: Option<Vec<String>>) -> Self {
        self.trusted_issuers = trusted_issuers;
        self
    }

    pub fn with_verifiers(mut self, verifiers: Vec<Arc<dyn ClaimVerifier>>) -> Self {
        self.verifiers = verifiers;
        self
    }

    pub fn with_revocation_policy(mut self, policy: RevocationPolicy) -> Self {
        self.revocation_policy = policy;
        self
    }

    pub fn with_fetcher(mut self, fetcher: Arc<dyn StatusListFetcher>) -> Self {
        self.fetcher = fetcher;
        self
    }
}

/// Parses an `expirationDate`. Besides RFC 3339, dates without a timezone are
/// read as UTC and date-only values as UTC midnight.
fn parse_expiration_date(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_rfc3339(value) {
        return Some(date.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(Utc.from_utc_datetime(&date));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|date| Utc.from_utc_datetime(&date))
}

/// Returns `true` if `expirationDate` is before `now`. Unparsable dates are
/// not expired.
pub fn is_expired_at(credential: &W3CCredential, now: DateTime<Utc>) -> bool {
    let Some(expiration_date) = &credential.expiration_date else {
        return false;
    };
    match parse_expiration_date(expiration_date) {
        Some(expiration_date) => expiration_date < now,
        None => false,
    }
}

pub fn is_expired(credential: &W3CCredential) -> bool {
    is_expired_at(credential, Utc::now())
}

/// Checks a credential proof against the issuer's resolved keys. Expiry is
/// left to the expiry stage.
pub async fn verify_proof(
    proof: &Proof,
    resolver: &dyn Resolvable,
) -> Result<(), CredentialVerificationError> {
    match proof.type_.as_deref() {
        Some(JWT_PROOF_TYPE) => {
            let Some(jwt) = proof.jwt.as_deref() else {
                return Err(CredentialErrorKind::InvalidProof.into());
            };
            parse_jwt_credential_with_policies(jwt, resolver, &JwtVerifyPolicies::ignore_expiry())
                .await
                .map(|_| ())
                .map_err(|e| {
                    debug!("Proof verification failed: {e}");
                    CredentialErrorKind::InvalidProof.into()
                })
        }
        other => Err(CredentialVerificationError::UnsupportedProofType(format!(
            "Unsupported proof type: {}",
            other.unwrap_or_default()
        ))),
    }
}

/// Runs every verification stage over a parsed credential.
pub async fn verify_parsed_credential(
    credential: &W3CCredential,
    options: &VerifyCredentialOptions<'_>,
) -> Result<(), CredentialVerificationError> {
    credential
        .validate()
        .map_err(CredentialVerificationError::InvalidCredential)?;

    let Some(proof) = credential.proof.as_ref().filter(|p| p.type_.is_some()) else {
        return Err(CredentialVerificationError::InvalidProof(
            "Credential does not contain a proof".to_string(),
        ));
    };
    verify_proof(proof, options.resolver).await?;

    if is_expired(credential) {
        return Err(CredentialErrorKind::CredentialExpired.into());
    }

    match is_revoked(credential, options.fetcher.as_ref(), options.revocation_policy).await {
        Ok(false) => {}
        Ok(true) => return Err(CredentialErrorKind::CredentialRevoked.into()),
        Err(e) => {
            return Err(CredentialVerificationError::CredentialRevoked(format!(
                "Revocation status could not be checked: {e}"
            )))
        }
    }

    if let Some(trusted_issuers) = &options.trusted_issuers {
        if !trusted_issuers.contains(&credential.issuer.id) {
            return Err(CredentialVerificationError::UntrustedIssuer(format!(
                "Issuer is not trusted '{}'",
                credential.issuer.id
            )));
        }
    }

    if !options.verifiers.is_empty() {
        let accepted: Vec<&Arc<dyn ClaimVerifier>> = options
            .verifiers
            .iter()
            .filter(|v| v.accepts(&credential.type_))
            .collect();
        if accepted.is_empty() {
            return Err(CredentialVerificationError::UnsupportedCredentialType(
                format!("Unsupported credential type: {}", credential.type_.join(", ")),
            ));
        }
        for verifier in accepted {
            verifier
                .verify(&credential.credential_subject, options.resolver)
                .await?;
        }
    }

    debug!("Verified credential issued by {}", credential.issuer.id);
    Ok(())
}

/// Parses the input if needed, then runs [`verify_parsed_credential`].
pub async fn verify_credential(
    input: CredentialInput,
    options: &VerifyCredentialOptions<'_>,
) -> Result<W3CCredential, CredentialVerificationError> {
    let credential = match input {
        CredentialInput::Jwt(jwt) => {
            if !is_jwt_string(&jwt) {
                return Err(CredentialVerificationError::InvalidCredential(
                    "Credential is not a JWT or Credential".to_string(),
                ));
            }
            parse_jwt_credential_with_policies(
                &jwt,
                options.resolver,
                &JwtVerifyPolicies::ignore_expiry(),
            )
            .await?
        }
        CredentialInput::Credential(credential) => *credential,
    };
    verify_parsed_credential(&credential, options).await?;
    Ok(credential)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::{
        create_credential, to_iso_string, CreateCredentialParams, CredentialSubject,
    };
    use crate::errors::RevocationError;
    use crate::jwt_credential::{credential_to_jwt_payload, sign_credential, SignCredentialOptions};
    use crate::revocation::fetcher::MockStatusListFetcher;
    use crate::revocation::{
        create_status_list_credential, make_revocable, RevocationOptions, StatusList,
    };
    use ack_did::{create_did_web_document_from_keypair, get_did_resolver, DidResolver};
    use ack_jwt::{create_jwt, create_jwt_signer, JwtAlgorithm};
    use ack_keys::{generate_keypair, Keypair, KeypairAlgorithm, PublicKeyFormat};
    use async_trait::async_trait;
    use chrono::Duration;
    use serde_json::json;

    const STATUS_LIST_URL: &str = "https://issuer.example.com/status/0";

    struct StaticVerifier {
        accepts: bool,
        fails: bool,
    }

    #[async_trait]
    impl ClaimVerifier for StaticVerifier {
        fn accepts(&self, _types: &[String]) -> bool {
            self.accepts
        }

        async fn verify(
            &self,
            _subject: &CredentialSubject,
            _resolver: &dyn Resolvable,
        ) -> Result<(), CredentialVerificationError> {
            if self.fails {
                Err(CredentialErrorKind::InvalidCredentialSubject.into())
            } else {
                Ok(())
            }
        }
    }

    fn verifier(accepts: bool, fails: bool) -> Arc<dyn ClaimVerifier> {
        Arc::new(StaticVerifier { accepts, fails })
    }

    struct Setup {
        resolver: DidResolver,
        keypair: Keypair,
        issuer: String,
    }

    fn setup() -> Setup {
        let resolver = get_did_resolver(Default::default());
        let keypair = generate_keypair(KeypairAlgorithm::Secp256k1, None).unwrap();
        let issuer = create_did_web_document_from_keypair(
            "https://issuer.example.com",
            &keypair,
            PublicKeyFormat::Jwk,
            Default::default(),
        )
        .unwrap();
        resolver.add_to_cache(&issuer.did, issuer.did_document);
        Setup {
            resolver,
            keypair,
            issuer: issuer.did,
        }
    }

    fn unsigned(setup: &Setup, expiration_date: Option<DateTime<Utc>>) -> W3CCredential {
        create_credential(CreateCredentialParams {
            id: Some("test-credential".to_string()),
            types: vec!["TestCredential".to_string()],
            issuer: setup.issuer.clone(),
            subject: "did:web:subject.example.com".to_string(),
            attestation: json!({"test": "test"}).as_object().cloned().unwrap(),
            expiration_date,
            ..Default::default()
        })
    }

    /// Signs without the self-check so expired credentials can be produced.
    async fn sign(setup: &Setup, credential: &W3CCredential) -> (W3CCredential, String) {
        let signer = create_jwt_signer(&setup.keypair);
        let payload = credential_to_jwt_payload(credential).unwrap();
        let jwt = create_jwt(&payload, &setup.issuer, signer.as_ref(), JwtAlgorithm::ES256K)
            .unwrap();
        let parsed = parse_jwt_credential_with_policies(
            &jwt,
            &setup.resolver,
            &JwtVerifyPolicies::ignore_expiry(),
        )
        .await
        .unwrap();
        (parsed, jwt)
    }

    fn options(setup: &Setup) -> VerifyCredentialOptions<'_> {
        VerifyCredentialOptions::new(&setup.resolver)
            .with_trusted_issuers(Some(vec![setup.issuer.clone()]))
            .with_fetcher(Arc::new(MockStatusListFetcher::new()))
    }

    fn fetcher_with(revoked: &[usize]) -> Arc<dyn StatusListFetcher> {
        let list = StatusList::from_indices(revoked, 8192).unwrap();
        let document = serde_json::to_value(create_status_list_credential(
            STATUS_LIST_URL,
            &list.encode().unwrap(),
            "did:web:issuer.example.com",
        ))
        .unwrap();
        let mut fetcher = MockStatusListFetcher::new();
        fetcher
            .expect_fetch_status_list()
            .returning(move |_| Ok(document.clone()));
        Arc::new(fetcher)
    }

    #[tokio::test]
    async fn test_verify_valid_credential() {
        let setup = setup();
        let (credential, jwt) = sign(&setup, &unsigned(&setup, None)).await;

        assert!(verify_parsed_credential(&credential, &options(&setup))
            .await
            .is_ok());
        let verified = verify_credential(CredentialInput::Jwt(jwt), &options(&setup))
            .await
            .unwrap();
        assert_eq!(verified, credential);
    }

    #[tokio::test]
    async fn test_missing_proof() {
        let setup = setup();
        let (mut credential, _) = sign(&setup, &unsigned(&setup, None)).await;
        credential.proof = None;
        let err = verify_parsed_credential(&credential, &options(&setup))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), CredentialErrorKind::InvalidProof);
    }

    #[tokio::test]
    async fn test_unsupported_proof_type() {
        let setup = setup();
        let (mut credential, _) = sign(&setup, &unsigned(&setup, None)).await;
        credential.proof = Some(Proof {
            type_: Some("Ed25519Signature2020".to_string()),
            ..Default::default()
        });
        let err = verify_parsed_credential(&credential, &options(&setup))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), CredentialErrorKind::UnsupportedProofType);
        assert_eq!(err.to_string(), "Unsupported proof type: Ed25519Signature2020");
    }

    #[tokio::test]
    async fn test_invalid_proof() {
        let setup = setup();
        let (mut credential, _) = sign(&setup, &unsigned(&setup, None)).await;

        // A proof signed by a key the issuer never published.
        let impostor = generate_keypair(KeypairAlgorithm::Secp256k1, None).unwrap();
        let signer = create_jwt_signer(&impostor);
        let payload = credential_to_jwt_payload(&unsigned(&setup, None)).unwrap();
        let forged = create_jwt(&payload, &setup.issuer, signer.as_ref(), JwtAlgorithm::ES256K)
            .unwrap();
        credential.proof = Some(Proof::jwt_proof(&forged));

        let err = verify_parsed_credential(&credential, &options(&setup))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            CredentialVerificationError::from(CredentialErrorKind::InvalidProof)
        );

        credential.proof = Some(Proof {
            type_: Some(JWT_PROOF_TYPE.to_string()),
            ..Default::default()
        });
        let err = verify_parsed_credential(&credential, &options(&setup))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), CredentialErrorKind::InvalidProof);
    }

    #[tokio::test]
    async fn test_expired_credential() {
        let setup = setup();
        let (credential, jwt) =
            sign(&setup, &unsigned(&setup, Some(Utc::now() - Duration::hours(1)))).await;

        let err = verify_parsed_credential(&credential, &options(&setup))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), CredentialErrorKind::CredentialExpired);
        assert_eq!(err.to_string(), "Credential is expired");

        let err = verify_credential(CredentialInput::Jwt(jwt), &options(&setup))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), CredentialErrorKind::CredentialExpired);
    }

    #[tokio::test]
    async fn test_unparsable_expiration_date_is_not_expired() {
        let setup = setup();
        let (mut credential, _) = sign(&setup, &unsigned(&setup, None)).await;
        credential.expiration_date = Some("invalid-date".to_string());
        assert!(!is_expired(&credential));
        assert!(verify_parsed_credential(&credential, &options(&setup))
            .await
            .is_ok());
    }

    #[test]
    fn test_is_expired_at() {
        let now = Utc::now();
        let mut credential: W3CCredential =
            serde_json::from_str(crate::data::TEST_CREDENTIAL).unwrap();
        assert!(!is_expired_at(&credential, now));
        credential.expiration_date = Some(to_iso_string(&(now - Duration::days(365))));
        assert!(is_expired_at(&credential, now));
        credential.expiration_date = Some(to_iso_string(&(now + Duration::days(365))));
        assert!(!is_expired_at(&credential, now));
    }

    #[test]
    fn test_is_expired_without_timezone() {
        let now = Utc::now();
        let mut credential: W3CCredential =
            serde_json::from_str(crate::data::TEST_CREDENTIAL).unwrap();
        for expired in ["2020-01-01", "2020-01-01T00:00:00", "2020-01-01T00:00:00.250"] {
            credential.expiration_date = Some(expired.to_string());
            assert!(is_expired_at(&credential, now), "{expired}");
        }
        for valid in ["2999-01-01", "2999-01-01T00:00:00"] {
            credential.expiration_date = Some(valid.to_string());
            assert!(!is_expired_at(&credential, now), "{valid}");
        }
        credential.expiration_date = Some("2020-13-01".to_string());
        assert!(!is_expired_at(&credential, now));
    }

    fn revocable(setup: &Setup) -> W3CCredential {
        make_revocable(
            unsigned(setup, None),
            RevocationOptions {
                id: format!("{STATUS_LIST_URL}#5"),
                status_list_index: 5,
                status_list_url: STATUS_LIST_URL.to_string(),
            },
        )
    }

    #[tokio::test]
    async fn test_revoked_credential() {
        let setup = setup();
        let (credential, _) = sign(&setup, &revocable(&setup)).await;

        let err = verify_parsed_credential(
            &credential,
            &options(&setup).with_fetcher(fetcher_with(&[5])),
        )
        .await
        .unwrap_err();
        assert_eq!(err.kind(), CredentialErrorKind::CredentialRevoked);

        assert!(verify_parsed_credential(
            &credential,
            &options(&setup).with_fetcher(fetcher_with(&[4]))
        )
        .await
        .is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_status_list() {
        let setup = setup();
        let (credential, _) = sign(&setup, &revocable(&setup)).await;
        let unreachable = || -> Arc<dyn StatusListFetcher> {
            let mut fetcher = MockStatusListFetcher::new();
            fetcher.expect_fetch_status_list().returning(|_| {
                Err(RevocationError::StatusListUnavailable("Network error".to_string()))
            });
            Arc::new(fetcher)
        };

        assert!(verify_parsed_credential(
            &credential,
            &options(&setup).with_fetcher(unreachable())
        )
        .await
        .is_ok());

        let err = verify_parsed_credential(
            &credential,
            &options(&setup)
                .with_fetcher(unreachable())
                .with_revocation_policy(RevocationPolicy::FailClosed),
        )
        .await
        .unwrap_err();
        assert_eq!(err.kind(), CredentialErrorKind::CredentialRevoked);
    }

    #[tokio::test]
    async fn test_trusted_issuers() {
        let setup = setup();
        let (credential, _) = sign(&setup, &unsigned(&setup, None)).await;

        let err = verify_parsed_credential(
            &credential,
            &options(&setup).with_trusted_issuers(Some(vec!["did:example:123".to_string()])),
        )
        .await
        .unwrap_err();
        assert_eq!(err.kind(), CredentialErrorKind::UntrustedIssuer);

        let err = verify_parsed_credential(
            &credential,
            &options(&setup).with_trusted_issuers(Some(vec![])),
        )
        .await
        .unwrap_err();
        assert_eq!(err.kind(), CredentialErrorKind::UntrustedIssuer);

        assert!(verify_parsed_credential(&credential, &options(&setup).with_trusted_issuers(None))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_claim_verifiers() {
        let setup = setup();
        let (credential, _) = sign(&setup, &unsigned(&setup, None)).await;

        let err = verify_parsed_credential(
            &credential,
            &options(&setup).with_verifiers(vec![verifier(true, false), verifier(true, true)]),
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "Invalid credential subject");

        let err = verify_parsed_credential(
            &credential,
            &options(&setup).with_verifiers(vec![verifier(false, false)]),
        )
        .await
        .unwrap_err();
        assert_eq!(err.kind(), CredentialErrorKind::UnsupportedCredentialType);
        assert_eq!(
            err.to_string(),
            "Unsupported credential type: VerifiableCredential, TestCredential"
        );

        // A failing verifier that does not accept the type is never run.
        assert!(verify_parsed_credential(
            &credential,
            &options(&setup).with_verifiers(vec![verifier(true, false), verifier(false, true)]),
        )
        .await
        .is_ok());
    }

    #[tokio::test]
    async fn test_stage_order() {
        // Expired and untrusted: the expiry stage runs first.
        let setup = setup();
        let (credential, _) =
            sign(&setup, &unsigned(&setup, Some(Utc::now() - Duration::hours(1)))).await;
        let err = verify_parsed_credential(
            &credential,
            &options(&setup).with_trusted_issuers(Some(vec![])),
        )
        .await
        .unwrap_err();
        assert_eq!(err.kind(), CredentialErrorKind::CredentialExpired);
    }

    #[tokio::test]
    async fn test_credential_input() {
        let setup = setup();
        let signer = create_jwt_signer(&setup.keypair);
        let signed = sign_credential(
            &unsigned(&setup, None),
            SignCredentialOptions {
                did: &setup.issuer,
                signer: signer.as_ref(),
                alg: None,
                resolver: &setup.resolver,
            },
        )
        .await
        .unwrap();

        let input = CredentialInput::from_value(json!(signed.jwt)).unwrap();
        assert_eq!(input, CredentialInput::Jwt(signed.jwt.clone()));
        let value = serde_json::to_value(&signed.verifiable_credential).unwrap();
        let input = CredentialInput::from_value(value).unwrap();
        assert!(verify_credential(input, &options(&setup)).await.is_ok());

        let err = CredentialInput::from_value(json!({"foo": "bar"})).unwrap_err();
        assert_eq!(err.kind(), CredentialErrorKind::InvalidCredential);
        let err = verify_credential(CredentialInput::Jwt("nope".to_string()), &options(&setup))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), CredentialErrorKind::InvalidCredential);
    }
}
