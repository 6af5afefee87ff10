#![allow(dead_code)]
use ack_did::{
    create_did_key_uri, create_did_web_document_from_keypair, DidDocumentOptions,
};
use ack_http::{AckRouter, AppState, HTTPConfig};
use ack_jwt::{create_jwt, create_jwt_signer, JwtAlgorithm, JwtSigner};
use ack_keys::{generate_keypair, KeypairAlgorithm, PublicKeyFormat};
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

pub const AGENT_URL: &str = "https://agent.example.com";
pub const AGENT_DID: &str = "did:web:agent.example.com";

/// A DID that signs request payloads.
pub struct Signer {
    pub did: String,
    pub signer: Arc<dyn JwtSigner>,
    pub alg: JwtAlgorithm,
}

impl Signer {
    pub fn ed25519() -> Self {
        let keypair = generate_keypair(KeypairAlgorithm::Ed25519, None).unwrap();
        Self {
            did: create_did_key_uri(&keypair).unwrap(),
            signer: create_jwt_signer(&keypair),
            alg: JwtAlgorithm::EdDSA,
        }
    }

    pub fn secp256k1() -> Self {
        let keypair = generate_keypair(KeypairAlgorithm::Secp256k1, None).unwrap();
        Self {
            did: create_did_key_uri(&keypair).unwrap(),
            signer: create_jwt_signer(&keypair),
            alg: JwtAlgorithm::ES256K,
        }
    }

    pub fn jwt(&self, payload: &Value) -> String {
        create_jwt(payload, &self.did, self.signer.as_ref(), self.alg).unwrap()
    }

    /// A `{"payload": <JWT>}` request body.
    pub fn sign(&self, payload: Value) -> Value {
        json!({ "payload": self.jwt(&payload) })
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
    /// Controller of `AGENT_DID`.
    pub owner: Signer,
}

/// App state with `AGENT_DID` resolvable and controlled by `owner`.
pub fn test_app(config: HTTPConfig) -> TestApp {
    let owner = Signer::ed25519();
    let state = AppState::new(config).unwrap();
    let agent_keypair = generate_keypair(KeypairAlgorithm::Secp256k1, None).unwrap();
    let agent = create_did_web_document_from_keypair(
        AGENT_URL,
        &agent_keypair,
        PublicKeyFormat::Jwk,
        DidDocumentOptions {
            controller: Some(owner.did.clone()),
            ..Default::default()
        },
    )
    .unwrap();
    state.resolver.add_to_cache(&agent.did, agent.did_document);

    let state = Arc::new(state);
    TestApp {
        router: AckRouter::from(state.clone()).into_router(),
        state,
        owner,
    }
}

/// Sends a JSON body with the given method, returning status and JSON response.
pub async fn send(router: &Router, method: Method, uri: &str, body: &Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}
