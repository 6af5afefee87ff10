//! Reference issuer and verifier HTTP service for ACK credentials.
pub mod config;
pub mod errors;
pub mod handlers;
pub mod identity;
pub mod issuer;
pub mod middleware;
pub mod payload;
pub mod response;
pub mod server;
pub mod state;
pub mod store;
pub mod verifier;

pub use config::HTTPConfig;
pub use errors::AckHTTPError;
pub use server::{http_server, AckRouter};
pub use state::AppState;
