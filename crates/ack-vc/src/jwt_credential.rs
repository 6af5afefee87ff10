//! Credentials encoded as JWTs, with the credential under the `vc` claim.
use crate::credential::{to_iso_string, Issuer, Proof, W3CCredential, CREDENTIALS_V1_CONTEXT};
use crate::errors::CredentialError;
use ack_did::Resolvable;
use ack_jwt::{
    create_jwt, is_jwt_string, verify_jwt, JwtAlgorithm, JwtPayload, JwtSigner,
    JwtVerifyPolicies,
};
use chrono::{DateTime, TimeZone, Utc};
use log::info;
use serde_json::{Map, Value};

fn seconds(date: &str, field: &str) -> Result<i64, CredentialError> {
    DateTime::parse_from_rfc3339(date)
        .map(|d| d.timestamp())
        .map_err(|_| CredentialError::InvalidCredential(format!("invalid {field}: {date}")))
}

/// Moves the registered credential members into JWT claims.
pub fn credential_to_jwt_payload(
    credential: &W3CCredential,
) -> Result<JwtPayload, CredentialError> {
    credential.validate().map_err(CredentialError::InvalidCredential)?;

    let mut vc = Map::new();
    vc.insert("@context".to_string(), serde_json::to_value(&credential.context)?);
    vc.insert("type".to_string(), serde_json::to_value(&credential.type_)?);
    vc.insert(
        "credentialSubject".to_string(),
        Value::Object(credential.credential_subject.claims.clone()),
    );
    if let Some(status) = &credential.credential_status {
        vc.insert("credentialStatus".to_string(), serde_json::to_value(status)?);
    }
    for (key, value) in &credential.property_set {
        vc.insert(key.clone(), value.clone());
    }

    let mut payload = JwtPayload::new();
    payload.insert("vc".to_string(), Value::Object(vc));
    if let Some(subject) = &credential.credential_subject.id {
        payload.insert("sub".to_string(), Value::from(subject.as_str()));
    }
    if let Some(id) = &credential.id {
        payload.insert("jti".to_string(), Value::from(id.as_str()));
    }
    payload.insert(
        "nbf".to_string(),
        Value::from(seconds(&credential.issuance_date, "issuanceDate")?),
    );
    if let Some(expiration_date) = &credential.expiration_date {
        payload.insert(
            "exp".to_string(),
            Value::from(seconds(expiration_date, "expirationDate")?),
        );
    }
    Ok(payload)
}

fn iso_from_seconds(value: Option<&Value>) -> Option<String> {
    let seconds = value?.as_i64()?;
    Utc.timestamp_opt(seconds, 0).single().as_ref().map(to_iso_string)
}

/// Rebuilds a credential from verified JWT claims, attaching a `JwtProof2020`.
pub fn jwt_payload_to_credential(
    payload: &JwtPayload,
    jwt: &str,
) -> Result<W3CCredential, CredentialError> {
    let Some(Value::Object(vc)) = payload.get("vc") else {
        return Err(CredentialError::InvalidCredential(
            "JWT payload does not contain a vc claim".to_string(),
        ));
    };
    let mut credential = vc.clone();

    if !credential.contains_key("@context") {
        credential.insert(
            "@context".to_string(),
            Value::Array(vec![Value::from(CREDENTIALS_V1_CONTEXT)]),
        );
    }
    let mut subject = match credential.remove("credentialSubject") {
        Some(Value::Object(subject)) => subject,
        _ => Map::new(),
    };
    if let Some(sub) = payload.get("sub") {
        subject.insert("id".to_string(), sub.clone());
    }
    credential.insert("credentialSubject".to_string(), Value::Object(subject));

    let issuer = payload
        .get("iss")
        .and_then(Value::as_str)
        .ok_or_else(|| CredentialError::InvalidCredential("JWT has no issuer".to_string()))?;
    credential.insert("issuer".to_string(), serde_json::to_value(Issuer::new(issuer))?);
    if let Some(jti) = payload.get("jti") {
        credential.insert("id".to_string(), jti.clone());
    }
    let issuance_date = iso_from_seconds(payload.get("nbf"))
        .or_else(|| iso_from_seconds(payload.get("iat")))
        .ok_or_else(|| {
            CredentialError::InvalidCredential("JWT has no nbf or iat claim".to_string())
        })?;
    credential.insert("issuanceDate".to_string(), Value::from(issuance_date));
    if let Some(expiration_date) = iso_from_seconds(payload.get("exp")) {
        credential.insert("expirationDate".to_string(), Value::from(expiration_date));
    }
    credential.insert("proof".to_string(), serde_json::to_value(Proof::jwt_proof(jwt))?);

    Ok(serde_json::from_value(Value::Object(credential))?)
}

/// Options for [`sign_credential`].
pub struct SignCredentialOptions<'a> {
    /// The issuer DID. It becomes the credential's issuer.
    pub did: &'a str,
    pub signer: &'a dyn JwtSigner,
    /// Defaults to the signer's natural algorithm.
    pub alg: Option<JwtAlgorithm>,
    /// Used to check the signed credential verifies against the issuer's
    /// published keys.
    pub resolver: &'a dyn Resolvable,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignedCredential {
    pub verifiable_credential: W3CCredential,
    pub jwt: String,
}

/// Signs a credential as a JWT, then parses it back through the resolver so
/// a credential that would fail verification is never returned.
pub async fn sign_credential(
    credential: &W3CCredential,
    options: SignCredentialOptions<'_>,
) -> Result<SignedCredential, CredentialError> {
    let alg = options
        .alg
        .unwrap_or_else(|| JwtAlgorithm::from(options.signer.algorithm()));
    let payload = credential_to_jwt_payload(credential)?;
    let jwt = create_jwt(&payload, options.did, options.signer, alg)?;
    if !is_jwt_string(&jwt) {
        return Err(CredentialError::InvalidJwt("Failed to sign credential".to_string()));
    }

    let verifiable_credential = parse_jwt_credential(&jwt, options.resolver).await?;
    info!(
        "Signed credential {} issued by {}",
        verifiable_credential.id.as_deref().unwrap_or("(no id)"),
        options.did
    );
    Ok(SignedCredential {
        verifiable_credential,
        jwt,
    })
}

/// Verifies a credential JWT and returns the embedded credential.
pub async fn parse_jwt_credential(
    jwt: &str,
    resolver: &dyn Resolvable,
) -> Result<W3CCredential, CredentialError> {
    parse_jwt_credential_with_policies(jwt, resolver, &JwtVerifyPolicies::default()).await
}

pub async fn parse_jwt_credential_with_policies(
    jwt: &str,
    resolver: &dyn Resolvable,
    policies: &JwtVerifyPolicies,
) -> Result<W3CCredential, CredentialError> {
    if !is_jwt_string(jwt) {
        return Err(CredentialError::InvalidJwt(
            "Credential is not a JWT string".to_string(),
        ));
    }
    let verified = verify_jwt(jwt, resolver, policies).await?;
    let credential = jwt_payload_to_credential(&verified.payload, jwt)?;
    credential.validate().map_err(CredentialError::InvalidCredential)?;
    Ok(credential)
}
