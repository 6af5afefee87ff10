//! Verification of presented credentials.
use crate::errors::AckHTTPError;
use crate::response::ApiSuccess;
use crate::state::AppState;
use ack_id::get_controller_claim_verifier;
use ack_pay::get_receipt_claim_verifier;
use ack_vc::{verify_credential, CredentialInput, VerifyCredentialOptions, W3CCredential};
use async_trait::async_trait;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use log::{debug, info};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    /// A credential JWT or a parsed credential.
    pub credential: Value,
}

/// An API for the ACK verifier server.
#[async_trait]
pub trait AckVerifierHTTP {
    /// Runs the full verification pipeline with the controller and receipt
    /// claim verifiers.
    async fn verify(
        credential: CredentialInput,
        app_state: &AppState,
    ) -> Result<W3CCredential, AckHTTPError>;
}

pub struct AckVerifierHTTPHandler;

#[async_trait]
impl AckVerifierHTTP for AckVerifierHTTPHandler {
    async fn verify(
        credential: CredentialInput,
        app_state: &AppState,
    ) -> Result<W3CCredential, AckHTTPError> {
        let trusted_issuers = app_state
            .config
            .trusted_issuers
            .clone()
            .unwrap_or_else(|| vec![app_state.identity.did.clone()]);
        let options = VerifyCredentialOptions::new(&app_state.resolver)
            .with_trusted_issuers(Some(trusted_issuers))
            .with_verifiers(vec![
                get_controller_claim_verifier(),
                get_receipt_claim_verifier(),
            ])
            .with_revocation_policy(app_state.config.revocation_policy)
            .with_fetcher(app_state.fetcher.clone());
        let credential = verify_credential(credential, &options).await?;
        info!(
            "Verified {} issued by {}",
            credential.type_.join(", "),
            credential.issuer.id
        );
        Ok(credential)
    }
}

impl AckVerifierHTTPHandler {
    pub async fn post_verify(
        State(app_state): State<Arc<AppState>>,
        Json(request): Json<VerifyRequest>,
    ) -> impl IntoResponse {
        debug!("Received credential to verify");
        let result = match CredentialInput::from_value(request.credential) {
            Ok(credential) => Self::verify(credential, &app_state).await.map(|_| ()),
            Err(err) => Err(err.into()),
        };
        result.map(|_| (StatusCode::OK, Json(ApiSuccess::new(Value::Null))))
    }
}
