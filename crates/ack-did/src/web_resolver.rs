//! did:web resolution over HTTP(S).
use crate::did_uri::ParsedDid;
use crate::document::{is_did_document_for_did, resolution_errors, DidDocument, ResolutionResult};
use crate::methods::web::is_did_web_uri;
use crate::resolver::DidMethodResolver;
use async_trait::async_trait;
use log::debug;
use percent_encoding::percent_decode_str;
use serde_json::Value;

const DEFAULT_DOC_PATH: &str = "/.well-known/did.json";
const INVALID_DOCUMENT: &str =
    "DID must resolve to a valid https URL containing a JSON document: Invalid JSON DID document";

/// Fetches a JSON document from a URL.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    async fn fetch_json(&self, url: &str) -> Result<Value, String>;
}

/// [`DocumentFetcher`] backed by `reqwest`.
#[derive(Debug, Clone, Default)]
pub struct HttpDocumentFetcher {
    client: reqwest::Client,
}

#[async_trait]
impl DocumentFetcher for HttpDocumentFetcher {
    async fn fetch_json(&self, url: &str) -> Result<Value, String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !response.status().is_success() {
            return Err(format!(
                "DID must resolve to a valid https URL containing a JSON document: Bad response {}",
                response.status()
            ));
        }
        response.json::<Value>().await.map_err(|e| e.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct DidWebResolverOptions {
    /// Appended to the host and path of the DID.
    pub doc_path: String,
    /// Hosts (without port) that may be fetched over plain `http`.
    pub allowed_http_hosts: Vec<String>,
}

impl Default for DidWebResolverOptions {
    fn default() -> Self {
        Self {
            doc_path: DEFAULT_DOC_PATH.to_string(),
            allowed_http_hosts: vec![],
        }
    }
}

/// Resolver for `did:web`.
pub struct WebDidResolver<F = HttpDocumentFetcher> {
    options: DidWebResolverOptions,
    fetcher: F,
}

impl WebDidResolver {
    pub fn new(options: DidWebResolverOptions) -> Self {
        Self::with_fetcher(options, HttpDocumentFetcher::default())
    }
}

impl<F: DocumentFetcher> WebDidResolver<F> {
    pub fn with_fetcher(options: DidWebResolverOptions, fetcher: F) -> Self {
        Self { options, fetcher }
    }

    /// Gets the URL the document of `did` is published at.
    pub fn document_url(&self, did: &str) -> Option<String> {
        let path = build_did_path(did, &self.options.doc_path)?;
        if is_http_allowed(&path, &self.options.allowed_http_hosts) {
            Some(format!("http://{path}"))
        } else {
            Some(format!("https://{path}"))
        }
    }

    async fn fetch_document(&self, did: &str, url: &str) -> Result<DidDocument, String> {
        let json = self.fetcher.fetch_json(url).await?;
        if !json.get("id").is_some_and(Value::is_string) {
            return Err(INVALID_DOCUMENT.to_string());
        }
        let document: DidDocument =
            serde_json::from_value(json).map_err(|_| INVALID_DOCUMENT.to_string())?;
        if !is_did_document_for_did(&document, did) {
            return Err("DID document id does not match requested did".to_string());
        }
        Ok(document)
    }
}

fn build_did_path(did: &str, doc_path: &str) -> Option<String> {
    if !is_did_web_uri(did) {
        return None;
    }
    let parts = did
        .strip_prefix("did:web:")?
        .split(':')
        .map(|part| percent_decode_str(part).decode_utf8_lossy().into_owned())
        .collect::<Vec<_>>();
    Some(parts.join("/") + doc_path)
}

fn is_http_allowed(path: &str, allowed_http_hosts: &[String]) -> bool {
    let host = path.split('/').next().unwrap_or_default();
    let host_without_port = host.split(':').next().unwrap_or_default();
    !host_without_port.is_empty() && allowed_http_hosts.iter().any(|h| h == host_without_port)
}

fn content_type(document: &DidDocument) -> &'static str {
    if document.context.is_some() {
        "application/did+ld+json"
    } else {
        "application/did+json"
    }
}

#[async_trait]
impl<F: DocumentFetcher> DidMethodResolver for WebDidResolver<F> {
    async fn resolve(&self, did: &str, _parsed: &ParsedDid) -> ResolutionResult {
        let Some(url) = self.document_url(did) else {
            return ResolutionResult::from_error(
                resolution_errors::INVALID_DID,
                Some("Invalid did:web DID".to_string()),
            );
        };
        debug!("Fetching did:web document from {}", url);
        match self.fetch_document(did, &url).await {
            Ok(document) => {
                let content_type = content_type(&document);
                ResolutionResult::from_document(document, content_type)
            }
            Err(message) => ResolutionResult::from_error(
                resolution_errors::NOT_FOUND,
                Some(format!("resolver_error: {message}")),
            ),
        }
    }
}
