//! StatusList2021 credentials and credential status entries.
use crate::credential::{create_credential, CreateCredentialParams, CredentialStatus, W3CCredential};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const STATUS_LIST_CREDENTIAL_TYPE: &str = "StatusList2021Credential";
pub const STATUS_LIST_ENTRY_TYPE: &str = "StatusList2021Entry";
pub const STATUS_LIST_CLAIM_TYPE: &str = "StatusList2021";
pub const REVOCATION_PURPOSE: &str = "revocation";

/// The subject of a StatusList2021 credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusList2021Claim {
    pub id: String,
    #[serde(rename = "type")]
    pub type_: String,
    pub status_purpose: String,
    pub encoded_list: String,
}

/// Where a credential's revocation bit lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevocationOptions {
    /// Id of the status entry, usually `<statusListUrl>#<index>`.
    pub id: String,
    pub status_list_index: usize,
    pub status_list_url: String,
}

/// Attaches a StatusList2021 revocation entry to a credential.
pub fn make_revocable(mut credential: W3CCredential, options: RevocationOptions) -> W3CCredential {
    credential.credential_status = Some(CredentialStatus {
        id: options.id,
        type_: STATUS_LIST_ENTRY_TYPE.to_string(),
        status_purpose: Some(REVOCATION_PURPOSE.to_string()),
        status_list_index: Some(options.status_list_index.to_string()),
        status_list_credential: Some(options.status_list_url),
    });
    credential
}

/// Returns `true` if the credential names both a status list and an index in it.
pub fn is_revocable(credential: &W3CCredential) -> bool {
    credential.credential_status.as_ref().is_some_and(|status| {
        status.status_list_index.is_some() && status.status_list_credential.is_some()
    })
}

/// Creates an unsigned StatusList2021 credential for the list published at `url`.
pub fn create_status_list_credential(url: &str, encoded_list: &str, issuer: &str) -> W3CCredential {
    let claim = StatusList2021Claim {
        id: format!("{url}#list"),
        type_: STATUS_LIST_CLAIM_TYPE.to_string(),
        status_purpose: REVOCATION_PURPOSE.to_string(),
        encoded_list: encoded_list.to_string(),
    };
    let mut attestation = Map::new();
    attestation.insert("type".to_string(), Value::from(claim.type_));
    attestation.insert("statusPurpose".to_string(), Value::from(claim.status_purpose));
    attestation.insert("encodedList".to_string(), Value::from(claim.encoded_list));

    create_credential(CreateCredentialParams {
        id: Some(url.to_string()),
        types: vec![STATUS_LIST_CREDENTIAL_TYPE.to_string()],
        issuer: issuer.to_string(),
        subject: claim.id,
        attestation,
        ..Default::default()
    })
}

/// Reads the StatusList2021 claim of a credential, if it has one.
pub fn status_list_claim(credential: &W3CCredential) -> Option<StatusList2021Claim> {
    credential
        .credential_subject
        .parse_claim::<StatusList2021Claim>()
        .ok()
        .filter(|claim| claim.type_ == STATUS_LIST_CLAIM_TYPE)
}

/// Returns `true` if the value is a credential carrying a StatusList2021 claim.
pub fn is_status_list_credential(value: &Value) -> bool {
    serde_json::from_value::<W3CCredential>(value.clone())
        .ok()
        .and_then(|credential| status_list_claim(&credential))
        .is_some()
}
