use crate::config::HTTPConfig;
use crate::handlers;
use crate::errors::AckHTTPError;
use crate::issuer::{AckIssuerHTTPHandler, CONTROLLER_CREDENTIALS_PATH, RECEIPTS_PATH};
use crate::middleware::log_request;
use crate::state::AppState;
use crate::verifier::AckVerifierHTTPHandler;
use axum::routing::{get, post};
use axum::{middleware, Router};
use log::info;
use std::sync::Arc;
use tower::ServiceBuilder;

/// Router for the issuer and verifier endpoints.
pub struct AckRouter {
    router: Router,
}

impl From<Arc<AppState>> for AckRouter {
    fn from(app_state: Arc<AppState>) -> Self {
        Self {
            router: Self::generate_router(app_state),
        }
    }
}

impl AckRouter {
    fn generate_router(shared_state: Arc<AppState>) -> Router {
        Router::new()
            .route("/ping", get(handlers::ping))
            .route("/.well-known/did.json", get(handlers::did_document))
            .route("/status/:list_id", get(AckIssuerHTTPHandler::get_status_list))
            .route(
                CONTROLLER_CREDENTIALS_PATH,
                post(AckIssuerHTTPHandler::post_controller_credential)
                    .delete(AckIssuerHTTPHandler::delete_controller_credential),
            )
            .route(
                &format!("{CONTROLLER_CREDENTIALS_PATH}/:id"),
                get(AckIssuerHTTPHandler::get_controller_credential),
            )
            .route(
                RECEIPTS_PATH,
                post(AckIssuerHTTPHandler::post_receipt)
                    .delete(AckIssuerHTTPHandler::delete_receipt),
            )
            .route(
                &format!("{RECEIPTS_PATH}/:id"),
                get(AckIssuerHTTPHandler::get_receipt),
            )
            .route("/verify", post(AckVerifierHTTPHandler::post_verify))
            .layer(ServiceBuilder::new().layer(middleware::from_fn(log_request)))
            .with_state(shared_state)
    }

    /// Moves wrapped app router and consumes.
    pub fn into_router(self) -> Router {
        self.router
    }
}

/// Serves the router on the configured address until the server stops.
pub async fn http_server(config: HTTPConfig) -> Result<(), AckHTTPError> {
    let addr = config.to_socket_address();
    let shared_state = Arc::new(AppState::new(config)?);
    let app = AckRouter::from(shared_state).into_router();
    info!("Listening on {addr}");
    axum::Server::try_bind(&addr)?
        .serve(app.into_make_service())
        .await?;
    Ok(())
}
