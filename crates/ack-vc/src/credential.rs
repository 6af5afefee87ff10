//! The W3C credential data model.
use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const CREDENTIALS_V1_CONTEXT: &str = "https://www.w3.org/2018/credentials/v1";
pub const VERIFIABLE_CREDENTIAL_TYPE: &str = "VerifiableCredential";
pub const JWT_PROOF_TYPE: &str = "JwtProof2020";

/// Formats a timestamp the way credential dates are written.
pub fn to_iso_string(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IssuerRepr {
    Id(String),
    Object {
        id: String,
        #[serde(flatten)]
        property_set: Map<String, Value>,
    },
}

/// The credential issuer. Deserializes from a bare DID or an object with `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "IssuerRepr")]
pub struct Issuer {
    pub id: String,
    #[serde(flatten)]
    pub property_set: Map<String, Value>,
}

impl Issuer {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            property_set: Map::new(),
        }
    }
}

impl From<IssuerRepr> for Issuer {
    fn from(repr: IssuerRepr) -> Self {
        match repr {
            IssuerRepr::Id(id) => Issuer::new(&id),
            IssuerRepr::Object { id, property_set } => Issuer { id, property_set },
        }
    }
}

/// The subject of a credential: an optional `id` plus type specific claims.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CredentialSubject {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub claims: Map<String, Value>,
}

impl CredentialSubject {
    /// Reads the subject (including `id`) as a typed claim.
    pub fn parse_claim<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::to_value(self).and_then(serde_json::from_value)
    }
}

/// A `credentialStatus` entry. For StatusList2021 entries `status_list_index`
/// and `status_list_credential` are populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialStatus {
    pub id: String,
    #[serde(rename = "type")]
    pub type_: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_purpose: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_list_index: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_list_credential: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Proof {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jwt: Option<String>,
    #[serde(flatten)]
    pub property_set: Map<String, Value>,
}

impl Proof {
    pub fn jwt_proof(jwt: &str) -> Self {
        Self {
            type_: Some(JWT_PROOF_TYPE.to_string()),
            jwt: Some(jwt.to_string()),
            property_set: Map::new(),
        }
    }
}

/// A W3C Verifiable Credential (data model 1.1). A credential with a
/// `proof` is verifiable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct W3CCredential {
    #[serde(rename = "@context")]
    pub context: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub type_: Vec<String>,
    pub issuer: Issuer,
    pub issuance_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<String>,
    pub credential_subject: CredentialSubject,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential_status: Option<CredentialStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof: Option<Proof>,
    #[serde(flatten)]
    pub property_set: Map<String, Value>,
}

impl W3CCredential {
    pub fn has_type(&self, type_: &str) -> bool {
        self.type_.iter().any(|t| t == type_)
    }

    /// Structural checks beyond what deserialization enforces.
    pub fn validate(&self) -> Result<(), String> {
        if self.context.first().map(String::as_str) != Some(CREDENTIALS_V1_CONTEXT) {
            return Err(format!("@context must begin with {CREDENTIALS_V1_CONTEXT}"));
        }
        if !self.has_type(VERIFIABLE_CREDENTIAL_TYPE) {
            return Err(format!("type must include {VERIFIABLE_CREDENTIAL_TYPE}"));
        }
        if self.issuer.id.is_empty() {
            return Err("issuer id must not be empty".to_string());
        }
        if DateTime::parse_from_rfc3339(&self.issuance_date).is_err() {
            return Err(format!("invalid issuanceDate: {}", self.issuance_date));
        }
        if self.credential_subject.id.is_none() && self.credential_subject.claims.is_empty() {
            return Err("credentialSubject must not be empty".to_string());
        }
        Ok(())
    }
}

/// Returns `true` if the value has the shape of a W3C credential.
pub fn is_credential(value: &Value) -> bool {
    serde_json::from_value::<W3CCredential>(value.clone()).is_ok()
}

/// Parameters of [`create_credential`].
#[derive(Debug, Clone, Default)]
pub struct CreateCredentialParams {
    pub id: Option<String>,
    /// Types in addition to `VerifiableCredential`.
    pub types: Vec<String>,
    pub issuer: String,
    pub subject: String,
    /// Claims about the subject. An `id` member is ignored.
    pub attestation: Map<String, Value>,
    /// Defaults to now.
    pub issuance_date: Option<DateTime<Utc>>,
    pub expiration_date: Option<DateTime<Utc>>,
}

/// Creates an unsigned credential.
pub fn create_credential(params: CreateCredentialParams) -> W3CCredential {
    let type_ = std::iter::once(VERIFIABLE_CREDENTIAL_TYPE.to_string())
        .chain(
            params
                .types
                .into_iter()
                .filter(|t| !t.is_empty() && t != VERIFIABLE_CREDENTIAL_TYPE),
        )
        .collect();

    let mut claims = params.attestation;
    claims.remove("id");

    W3CCredential {
        context: vec![CREDENTIALS_V1_CONTEXT.to_string()],
        id: params.id,
        type_,
        issuer: Issuer::new(&params.issuer),
        issuance_date: to_iso_string(&params.issuance_date.unwrap_or_else(Utc::now)),
        expiration_date: params.expiration_date.as_ref().map(to_iso_string),
        credential_subject: CredentialSubject {
            id: Some(params.subject),
            claims,
        },
        credential_status: None,
        proof: None,
        property_set: Map::new(),
    }
}
