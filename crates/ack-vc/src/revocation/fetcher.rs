//! Fetching status lists and checking revocation.
use crate::credential::W3CCredential;
use crate::errors::RevocationError;
use crate::revocation::credential::{is_revocable, status_list_claim};
use crate::revocation::status_list::StatusList;
use async_trait::async_trait;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What to do when a status list cannot be fetched or read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevocationPolicy {
    /// Treat the credential as not revoked.
    #[default]
    FailOpen,
    /// Fail the revocation check.
    FailClosed,
}

/// Retrieves the JSON published at a status list URL.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatusListFetcher: Send + Sync {
    async fn fetch_status_list(&self, url: &str) -> Result<Value, RevocationError>;
}

/// Fetches status lists over HTTP(S).
#[derive(Debug, Clone, Default)]
pub struct HttpStatusListFetcher {
    client: reqwest::Client,
}

impl HttpStatusListFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl StatusListFetcher for HttpStatusListFetcher {
    async fn fetch_status_list(&self, url: &str) -> Result<Value, RevocationError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| RevocationError::StatusListUnavailable(e.to_string()))?;
        response
            .json()
            .await
            .map_err(|e| RevocationError::StatusListUnavailable(e.to_string()))
    }
}

/// Reads the status list out of a fetched document: either the credential
/// itself or an `{ok, data}` envelope wrapping it.
fn status_list_from_document(document: Value) -> Result<StatusList, RevocationError> {
    let credential = match document {
        Value::Object(mut map) if !map.contains_key("credentialSubject") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    };
    let credential: W3CCredential = serde_json::from_value(credential).map_err(|e| {
        RevocationError::StatusListUnavailable(format!("not a status list credential: {e}"))
    })?;
    let claim = status_list_claim(&credential).ok_or_else(|| {
        RevocationError::StatusListUnavailable("not a status list credential".to_string())
    })?;
    StatusList::decode(&claim.encoded_list)
}

/// Checks the credential's revocation bit.
///
/// Credentials without a status entry are not revoked. When the list cannot be
/// fetched or decoded, [`RevocationPolicy::FailOpen`] reports not revoked and
/// [`RevocationPolicy::FailClosed`] returns the error.
pub async fn is_revoked(
    credential: &W3CCredential,
    fetcher: &dyn StatusListFetcher,
    policy: RevocationPolicy,
) -> Result<bool, RevocationError> {
    if !is_revocable(credential) {
        return Ok(false);
    }
    let (Some(url), Some(index)) = credential
        .credential_status
        .as_ref()
        .map(|s| (s.status_list_credential.as_deref(), s.status_list_index.as_deref()))
        .unwrap_or_default()
    else {
        return Ok(false);
    };

    let status_list = match fetcher.fetch_status_list(url).await {
        Ok(document) => status_list_from_document(document),
        Err(err) => Err(err),
    };
    let status_list = match (status_list, policy) {
        (Ok(list), _) => list,
        (Err(err), RevocationPolicy::FailOpen) => {
            warn!("Could not check revocation status at {url}, treating as not revoked: {err}");
            return Ok(false);
        }
        (Err(err), RevocationPolicy::FailClosed) => return Err(err),
    };

    let index: usize = match (index.parse(), policy) {
        (Ok(index), _) => index,
        (Err(_), RevocationPolicy::FailOpen) => {
            warn!("Invalid statusListIndex {index} for {url}, treating as not revoked");
            return Ok(false);
        }
        (Err(_), RevocationPolicy::FailClosed) => {
            return Err(RevocationError::InvalidBitString(format!(
                "invalid statusListIndex: {index}"
            )))
        }
    };
    let revoked = status_list.test(index);
    debug!("Revocation bit {index} of {url} is {revoked}");
    Ok(revoked)
}
