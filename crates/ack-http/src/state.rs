use crate::config::HTTPConfig;
use crate::errors::AckHTTPError;
use crate::identity::ServerIdentity;
use crate::store::CredentialStore;
use ack_did::{get_did_resolver, DidResolver, GetDidResolverOptions};
use ack_did::web_resolver::DidWebResolverOptions;
use ack_vc::{
    create_status_list_credential, HttpStatusListFetcher, RevocationError, StatusListFetcher,
};
use async_trait::async_trait;
use log::debug;
use serde_json::Value;
use std::sync::Arc;

/// A shared app state for handlers.
pub struct AppState {
    pub config: HTTPConfig,
    pub identity: ServerIdentity,
    pub resolver: DidResolver,
    pub store: Arc<CredentialStore>,
    pub fetcher: Arc<dyn StatusListFetcher>,
}

impl AppState {
    pub fn new(config: HTTPConfig) -> Result<Self, AckHTTPError> {
        let identity = ServerIdentity::from_config(&config)?;
        let store = Arc::new(CredentialStore::new());
        let fetcher = Arc::new(LocalStatusListFetcher::new(
            &config.base_url,
            &identity.did,
            store.clone(),
        ));
        Ok(Self::new_with_store(config, identity, store, fetcher))
    }

    /// Builds the state around an existing store and status list fetcher.
    pub fn new_with_store(
        config: HTTPConfig,
        identity: ServerIdentity,
        store: Arc<CredentialStore>,
        fetcher: Arc<dyn StatusListFetcher>,
    ) -> Self {
        let resolver = get_did_resolver(GetDidResolverOptions {
            web: DidWebResolverOptions {
                allowed_http_hosts: config.allowed_http_hosts.clone(),
                ..Default::default()
            },
            ..Default::default()
        });
        // The server's own document is always resolvable, even before it is served.
        resolver.add_to_cache(&identity.did, identity.did_document.clone());
        Self {
            config,
            identity,
            resolver,
            store,
            fetcher,
        }
    }

    /// URL of a status list published by this server.
    pub fn status_list_url(&self, list_id: u64) -> String {
        status_list_url(&self.config.base_url, list_id)
    }
}

fn status_list_url(base_url: &str, list_id: u64) -> String {
    format!("{}/status/{list_id}", base_url.trim_end_matches('/'))
}

/// Serves this server's own status lists from the store and fetches any other
/// list over HTTP.
pub struct LocalStatusListFetcher {
    prefix: String,
    issuer: String,
    store: Arc<CredentialStore>,
    remote: HttpStatusListFetcher,
}

impl LocalStatusListFetcher {
    pub fn new(base_url: &str, issuer: &str, store: Arc<CredentialStore>) -> Self {
        Self {
            prefix: format!("{}/status/", base_url.trim_end_matches('/')),
            issuer: issuer.to_string(),
            store,
            remote: HttpStatusListFetcher::default(),
        }
    }
}

#[async_trait]
impl StatusListFetcher for LocalStatusListFetcher {
    async fn fetch_status_list(&self, url: &str) -> Result<Value, RevocationError> {
        let Some(list_id) = url
            .strip_prefix(&self.prefix)
            .and_then(|id| id.parse::<u64>().ok())
        else {
            return self.remote.fetch_status_list(url).await;
        };
        debug!("Reading status list {list_id} from the local store");
        let encoded_list = self
            .store
            .encoded_status_list(list_id)
            .map_err(|e| RevocationError::StatusListUnavailable(e.to_string()))?
            .ok_or_else(|| {
                RevocationError::StatusListUnavailable(format!("Status list not found: {url}"))
            })?;
        let credential = create_status_list_credential(url, &encoded_list, &self.issuer);
        serde_json::to_value(credential)
            .map_err(|e| RevocationError::StatusListUnavailable(e.to_string()))
    }
}
