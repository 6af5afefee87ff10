//! DID resolution traits and a multi-method resolver with a pre-resolution cache.
use crate::did_uri::{parse_did, ParsedDid};
use crate::document::{
    resolution_errors, DidDocument, DocumentMetadata, ResolutionMetadata, ResolutionResult,
};
use crate::methods::key::KeyDidResolver;
use crate::methods::pkh::PkhDidResolver;
use crate::web_resolver::{DidWebResolverOptions, WebDidResolver};
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use log::debug;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Anything that resolves a DID URL to a resolution result.
#[async_trait]
pub trait Resolvable: Send + Sync {
    async fn resolve(&self, did_url: &str) -> ResolutionResult;
}

/// Resolution for a single DID method.
#[async_trait]
pub trait DidMethodResolver: Send + Sync {
    /// Resolves `did`, the bare DID of the already parsed `parsed` URL.
    async fn resolve(&self, did: &str, parsed: &ParsedDid) -> ResolutionResult;
}

/// An explicitly owned DID to resolution result map.
///
/// Entries never expire and are only changed through `insert`, `remove`
/// and `clear`.
#[derive(Debug, Default)]
pub struct ResolverCache {
    entries: Mutex<HashMap<String, ResolutionResult>>,
}

impl ResolverCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, ResolutionResult>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn get(&self, did: &str) -> Option<ResolutionResult> {
        self.entries().get(did).cloned()
    }

    pub fn insert(&self, did: &str, result: ResolutionResult) {
        self.entries().insert(did.to_string(), result);
    }

    pub fn remove(&self, did: &str) {
        self.entries().remove(did);
    }

    pub fn clear(&self) {
        self.entries().clear();
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

/// Resolves DIDs by dispatching on their method, after first consulting the cache.
pub struct DidResolver {
    registry: HashMap<String, Arc<dyn DidMethodResolver>>,
    cache: Arc<ResolverCache>,
    use_cache: bool,
}

impl DidResolver {
    pub fn new(cache: Arc<ResolverCache>) -> Self {
        Self {
            registry: HashMap::new(),
            cache,
            use_cache: true,
        }
    }

    /// Registers a resolver for `method` (e.g. `"web"`).
    pub fn with_method(mut self, method: &str, resolver: Arc<dyn DidMethodResolver>) -> Self {
        self.registry.insert(method.to_string(), resolver);
        self
    }

    /// Disables cache lookups. Entries can still be added.
    pub fn without_cache(mut self) -> Self {
        self.use_cache = false;
        self
    }

    pub fn cache(&self) -> &Arc<ResolverCache> {
        &self.cache
    }

    pub fn add_resolution_result_to_cache(&self, did: &str, result: ResolutionResult) -> &Self {
        self.cache.insert(did, result);
        self
    }

    /// Caches a document as if it had been resolved now.
    pub fn add_to_cache(&self, did: &str, document: DidDocument) -> &Self {
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        self.add_resolution_result_to_cache(
            did,
            ResolutionResult {
                did_resolution_metadata: ResolutionMetadata {
                    content_type: Some("application/did+json".to_string()),
                    ..Default::default()
                },
                did_document: Some(document),
                did_document_metadata: DocumentMetadata {
                    created: Some(now.clone()),
                    updated: Some(now),
                },
            },
        )
    }

    pub fn remove_from_cache(&self, did: &str) -> &Self {
        self.cache.remove(did);
        self
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}

#[async_trait]
impl Resolvable for DidResolver {
    async fn resolve(&self, did_url: &str) -> ResolutionResult {
        if self.use_cache {
            if let Some(cached) = self.cache.get(did_url) {
                debug!("Resolved {} from cache", did_url);
                return cached;
            }
        }
        let Some(parsed) = parse_did(did_url) else {
            return ResolutionResult::from_error(resolution_errors::INVALID_DID, None);
        };
        let Some(method_resolver) = self.registry.get(&parsed.method) else {
            return ResolutionResult::from_error(
                resolution_errors::UNSUPPORTED_DID_METHOD,
                Some(format!("Unsupported DID method: '{}'", parsed.method)),
            );
        };
        debug!("Resolving {} with the did:{} resolver", did_url, parsed.method);
        method_resolver.resolve(&parsed.did, &parsed).await
    }
}

/// Options for [`get_did_resolver`].
#[derive(Debug, Clone)]
pub struct GetDidResolverOptions {
    pub web: DidWebResolverOptions,
    /// Whether the cache is consulted before resolving.
    pub cache: bool,
    /// A cache to share, a new one is created when `None`.
    pub resolver_cache: Option<Arc<ResolverCache>>,
}

impl Default for GetDidResolverOptions {
    fn default() -> Self {
        Self {
            web: DidWebResolverOptions {
                allowed_http_hosts: ["localhost", "127.0.0.1", "0.0.0.0"]
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
                ..Default::default()
            },
            cache: true,
            resolver_cache: None,
        }
    }
}

/// Gets a resolver for the `web`, `key` and `pkh` methods.
pub fn get_did_resolver(options: GetDidResolverOptions) -> DidResolver {
    let cache = options.resolver_cache.unwrap_or_default();
    let resolver = DidResolver::new(cache)
        .with_method("web", Arc::new(WebDidResolver::new(options.web)))
        .with_method("key", Arc::new(KeyDidResolver))
        .with_method("pkh", Arc::new(PkhDidResolver));
    if options.cache {
        resolver
    } else {
        resolver.without_cache()
    }
}
