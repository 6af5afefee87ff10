//! Success envelopes and credential responses.
use ack_vc::W3CCredential;
use serde::{Deserialize, Serialize};

/// `{"ok": true, "data": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiSuccess<T> {
    pub ok: bool,
    pub data: T,
}

impl<T> ApiSuccess<T> {
    pub fn new(data: T) -> Self {
        Self { ok: true, data }
    }
}

/// A signed credential in both parsed and compact form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialResponse {
    pub credential: W3CCredential,
    pub jwt: String,
}
