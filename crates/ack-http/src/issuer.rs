//! Issuance and revocation of controller credentials and payment receipts.
use crate::errors::AckHTTPError;
use crate::payload::{validate_signed_payload, SignedPayload};
use crate::response::{ApiSuccess, CredentialResponse};
use crate::state::AppState;
use crate::store::StoredCredential;
use ack_did::{is_did_uri, resolve_did_with_controller};
use ack_id::{create_controller_credential, ControllerClaim, CreateControllerCredentialParams};
use ack_id::CONTROLLER_CREDENTIAL_TYPE;
use ack_pay::receipt::payment_receipt_claim;
use ack_pay::{
    create_payment_receipt, verify_payment_token, CreatePaymentReceiptParams,
    PAYMENT_RECEIPT_CREDENTIAL_TYPE,
};
use ack_vc::{
    create_status_list_credential, get_status_list_position, make_revocable, RevocationOptions,
    W3CCredential,
};
use async_trait::async_trait;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

pub const CONTROLLER_CREDENTIALS_PATH: &str = "/credentials/controller";
pub const RECEIPTS_PATH: &str = "/credentials/receipts";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerCredentialRequest {
    pub controller: String,
    pub subject: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptMetadata {
    #[serde(rename = "txHash")]
    pub tx_hash: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptRequest {
    pub metadata: ReceiptMetadata,
    pub payer_did: String,
    pub payment_token: String,
    pub payment_option_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevokeRequest {
    pub id: u64,
}

fn require_did(name: &str, value: &str) -> Result<(), AckHTTPError> {
    if is_did_uri(value) {
        Ok(())
    } else {
        Err(AckHTTPError::BadRequest(format!("Invalid {name}: {value}")))
    }
}

/// An API for the ACK issuer server.
#[async_trait]
pub trait AckIssuerHTTP {
    /// Issues a controller credential for a subject whose DID document names
    /// the signer of the request as its controller.
    async fn issue_controller_credential(
        payload: SignedPayload<ControllerCredentialRequest>,
        app_state: &AppState,
    ) -> Result<CredentialResponse, AckHTTPError>;

    /// Issues a receipt for a payment made against a valid payment token.
    async fn issue_payment_receipt(
        payload: SignedPayload<ReceiptRequest>,
        app_state: &AppState,
    ) -> Result<CredentialResponse, AckHTTPError>;

    /// Revokes a controller credential on behalf of its controller.
    async fn revoke_controller_credential(
        payload: SignedPayload<RevokeRequest>,
        app_state: &AppState,
    ) -> Result<(), AckHTTPError>;

    /// Revokes a receipt on behalf of the payment token's issuer.
    async fn revoke_payment_receipt(
        payload: SignedPayload<RevokeRequest>,
        app_state: &AppState,
    ) -> Result<(), AckHTTPError>;

    /// Signs a stored credential with its id and status entry filled in.
    async fn build_signed_credential(
        stored: &StoredCredential,
        path: &str,
        app_state: &AppState,
    ) -> Result<CredentialResponse, AckHTTPError>;

    /// Signs the current state of a status list.
    async fn signed_status_list(
        list_id: u64,
        app_state: &AppState,
    ) -> Result<W3CCredential, AckHTTPError>;
}

/// Type for implementing the AckIssuerHTTP trait that will contain additional handler methods.
pub struct AckIssuerHTTPHandler;

#[async_trait]
impl AckIssuerHTTP for AckIssuerHTTPHandler {
    async fn issue_controller_credential(
        payload: SignedPayload<ControllerCredentialRequest>,
        app_state: &AppState,
    ) -> Result<CredentialResponse, AckHTTPError> {
        let request = payload.body;
        require_did("controller", &request.controller)?;
        require_did("subject", &request.subject)?;
        if payload.issuer != request.controller {
            return Err(AckHTTPError::unauthorized("Target controller does not match"));
        }

        let resolved = resolve_did_with_controller(&request.subject, &app_state.resolver).await?;
        if resolved.controller.did != request.controller {
            return Err(AckHTTPError::unauthorized("Target controller does not match"));
        }

        let base_credential = create_controller_credential(CreateControllerCredentialParams {
            subject: resolved.subject.did,
            controller: resolved.controller.did,
            issuer: Some(app_state.identity.did.clone()),
            ..Default::default()
        });
        let stored = app_state
            .store
            .create(CONTROLLER_CREDENTIAL_TYPE, base_credential)?;
        Self::build_signed_credential(&stored, CONTROLLER_CREDENTIALS_PATH, app_state).await
    }

    async fn issue_payment_receipt(
        payload: SignedPayload<ReceiptRequest>,
        app_state: &AppState,
    ) -> Result<CredentialResponse, AckHTTPError> {
        let request = payload.body;
        require_did("payerDid", &request.payer_did)?;

        let verified =
            verify_payment_token(&request.payment_token, &app_state.resolver, true).await?;
        if !verified
            .payment_request
            .payment_options
            .iter()
            .any(|option| option.id == request.payment_option_id)
        {
            return Err(AckHTTPError::BadRequest(format!(
                "Unknown payment option: {}",
                request.payment_option_id
            )));
        }
        // The payment itself is taken on trust from the signed transaction hash.
        debug!(
            "Payment {} for {} reported by {}",
            request.metadata.tx_hash, verified.payment_request.id, payload.issuer
        );

        let mut metadata = Map::new();
        metadata.insert("txHash".to_string(), Value::from(request.metadata.tx_hash));
        let receipt = create_payment_receipt(CreatePaymentReceiptParams {
            payment_token: request.payment_token,
            payment_option_id: request.payment_option_id,
            issuer: app_state.identity.did.clone(),
            payer_did: request.payer_did,
            metadata: Some(metadata),
            ..Default::default()
        });
        let stored = app_state
            .store
            .create(PAYMENT_RECEIPT_CREDENTIAL_TYPE, receipt)?;
        Self::build_signed_credential(&stored, RECEIPTS_PATH, app_state).await
    }

    async fn revoke_controller_credential(
        payload: SignedPayload<RevokeRequest>,
        app_state: &AppState,
    ) -> Result<(), AckHTTPError> {
        let stored = stored_credential(payload.body.id, CONTROLLER_CREDENTIAL_TYPE, app_state)?;
        let claim = stored
            .base_credential
            .credential_subject
            .parse_claim::<ControllerClaim>()
            .map_err(|_| AckHTTPError::InternalError("Invalid stored credential".to_string()))?;
        if claim.controller != payload.issuer {
            return Err(AckHTTPError::unauthorized("Unauthorized"));
        }
        app_state.store.revoke(stored.id)?;
        info!("Controller credential {} revoked by {}", stored.id, payload.issuer);
        Ok(())
    }

    async fn revoke_payment_receipt(
        payload: SignedPayload<RevokeRequest>,
        app_state: &AppState,
    ) -> Result<(), AckHTTPError> {
        let stored =
            stored_credential(payload.body.id, PAYMENT_RECEIPT_CREDENTIAL_TYPE, app_state)?;
        let claim = payment_receipt_claim(&stored.base_credential)
            .ok_or_else(|| AckHTTPError::InternalError("Invalid stored credential".to_string()))?;
        // An expired payment token does not stop its issuer revoking the receipt.
        let verified =
            verify_payment_token(&claim.payment_token, &app_state.resolver, false).await?;
        if verified.parsed.issuer != payload.issuer {
            return Err(AckHTTPError::unauthorized("Unauthorized"));
        }
        app_state.store.revoke(stored.id)?;
        info!("Payment receipt {} revoked by {}", stored.id, payload.issuer);
        Ok(())
    }

    async fn build_signed_credential(
        stored: &StoredCredential,
        path: &str,
        app_state: &AppState,
    ) -> Result<CredentialResponse, AckHTTPError> {
        let position = get_status_list_position(stored.id as i64)?;
        let status_list_url = app_state.status_list_url(position.id);

        let mut credential = stored.base_credential.clone();
        credential.id = Some(format!(
            "{}{path}/{}",
            app_state.config.base_url.trim_end_matches('/'),
            stored.id
        ));
        let credential = make_revocable(
            credential,
            RevocationOptions {
                id: format!("{status_list_url}#{}", position.index),
                status_list_index: position.index,
                status_list_url,
            },
        );

        let signed = app_state
            .identity
            .sign(&credential, &app_state.resolver)
            .await?;
        Ok(CredentialResponse {
            credential: signed.verifiable_credential,
            jwt: signed.jwt,
        })
    }

    async fn signed_status_list(
        list_id: u64,
        app_state: &AppState,
    ) -> Result<W3CCredential, AckHTTPError> {
        let encoded_list = app_state
            .store
            .encoded_status_list(list_id)?
            .ok_or_else(|| AckHTTPError::not_found("Status list not found"))?;
        let credential = create_status_list_credential(
            &app_state.status_list_url(list_id),
            &encoded_list,
            &app_state.identity.did,
        );
        Ok(app_state
            .identity
            .sign(&credential, &app_state.resolver)
            .await?
            .verifiable_credential)
    }
}

/// Looks up a stored credential of the given type. Credentials of any other
/// type are not found.
fn stored_credential(
    id: u64,
    credential_type: &str,
    app_state: &AppState,
) -> Result<StoredCredential, AckHTTPError> {
    app_state
        .store
        .get(id)?
        .filter(|stored| stored.credential_type == credential_type)
        .ok_or_else(|| AckHTTPError::not_found("Credential not found"))
}

impl AckIssuerHTTPHandler {
    async fn get_credential(
        id: &str,
        credential_type: &str,
        path: &str,
        app_state: &AppState,
    ) -> Result<CredentialResponse, AckHTTPError> {
        let id = id
            .parse::<u64>()
            .map_err(|_| AckHTTPError::not_found("Credential not found"))?;
        let stored = stored_credential(id, credential_type, app_state)?;
        Self::build_signed_credential(&stored, path, app_state).await
    }

    pub async fn post_controller_credential(
        State(app_state): State<Arc<AppState>>,
        headers: HeaderMap,
        Json(value): Json<Value>,
    ) -> impl IntoResponse {
        debug!("Received controller credential request");
        let result = match validate_signed_payload(&value, &headers, &app_state).await {
            Ok(payload) => Self::issue_controller_credential(payload, &app_state).await,
            Err(err) => Err(err),
        };

        result.map(|response| (StatusCode::OK, Json(ApiSuccess::new(response))))
    }

    pub async fn get_controller_credential(
        Path(id): Path<String>,
        State(app_state): State<Arc<AppState>>,
    ) -> impl IntoResponse {
        debug!("Received request for controller credential {id}");
        Self::get_credential(
            &id,
            CONTROLLER_CREDENTIAL_TYPE,
            CONTROLLER_CREDENTIALS_PATH,
            &app_state,
        )
        .await
        .map(|response| (StatusCode::OK, Json(ApiSuccess::new(response))))
    }

    pub async fn delete_controller_credential(
        State(app_state): State<Arc<AppState>>,
        headers: HeaderMap,
        Json(value): Json<Value>,
    ) -> impl IntoResponse {
        let result = match validate_signed_payload(&value, &headers, &app_state).await {
            Ok(payload) => Self::revoke_controller_credential(payload, &app_state).await,
            Err(err) => Err(err),
        };

        result.map(|_| (StatusCode::OK, Json(ApiSuccess::new(Value::Null))))
    }

    pub async fn post_receipt(
        State(app_state): State<Arc<AppState>>,
        headers: HeaderMap,
        Json(value): Json<Value>,
    ) -> impl IntoResponse {
        debug!("Received payment receipt request");
        let result = match validate_signed_payload(&value, &headers, &app_state).await {
            Ok(payload) => Self::issue_payment_receipt(payload, &app_state).await,
            Err(err) => Err(err),
        };

        result.map(|response| (StatusCode::OK, Json(ApiSuccess::new(response))))
    }

    pub async fn get_receipt(
        Path(id): Path<String>,
        State(app_state): State<Arc<AppState>>,
    ) -> impl IntoResponse {
        debug!("Received request for payment receipt {id}");
        Self::get_credential(&id, PAYMENT_RECEIPT_CREDENTIAL_TYPE, RECEIPTS_PATH, &app_state)
            .await
            .map(|response| (StatusCode::OK, Json(ApiSuccess::new(response))))
    }

    pub async fn delete_receipt(
        State(app_state): State<Arc<AppState>>,
        headers: HeaderMap,
        Json(value): Json<Value>,
    ) -> impl IntoResponse {
        let result = match validate_signed_payload(&value, &headers, &app_state).await {
            Ok(payload) => Self::revoke_payment_receipt(payload, &app_state).await,
            Err(err) => Err(err),
        };

        result.map(|_| (StatusCode::OK, Json(ApiSuccess::new(Value::Null))))
    }

    pub async fn get_status_list(
        Path(list_id): Path<String>,
        State(app_state): State<Arc<AppState>>,
    ) -> impl IntoResponse {
        debug!("Received request for status list {list_id}");
        let result = match list_id.parse::<u64>() {
            Ok(list_id) => Self::signed_status_list(list_id, &app_state).await,
            Err(_) => Err(AckHTTPError::not_found("Status list not found")),
        };

        result.map(|credential| (StatusCode::OK, Json(ApiSuccess::new(credential))))
    }
}
