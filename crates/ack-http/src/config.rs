//! ACK HTTP configuration types and utilities.
use crate::errors::AckHTTPError;
use ack_vc::RevocationPolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Environment variable holding the path of the TOML configuration file.
pub const ACK_CONFIG: &str = "ACK_CONFIG";

const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);
const DEFAULT_PORT: u16 = 3456;

/// HTTP configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HTTPConfig {
    /// Host address for server.
    pub host: IpAddr,
    /// Port for server.
    pub port: u16,
    /// Public URL of the server. The server's `did:web` is derived from it and
    /// credential and status list URLs are built on it.
    pub base_url: String,
    /// Hex encoded secp256k1 private key of the issuer. A new key is generated
    /// on start up when absent.
    pub issuer_private_key: Option<String>,
    /// Issuers trusted by `/verify`. Only the server itself when absent.
    pub trusted_issuers: Option<Vec<String>>,
    /// Hosts whose `did:web` documents may be fetched over plain `http`.
    pub allowed_http_hosts: Vec<String>,
    pub revocation_policy: RevocationPolicy,
    /// Accepts unsigned payloads with an `X-Payload-Issuer` header.
    pub development: bool,
}

impl std::fmt::Display for HTTPConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The private key is never printed.
        let redacted = HTTPConfig {
            issuer_private_key: self.issuer_private_key.as_ref().map(|_| "***".to_string()),
            ..self.clone()
        };
        writeln!(f, "{:?}", redacted)
    }
}

impl Default for HTTPConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST,
            port: DEFAULT_PORT,
            base_url: format!("http://localhost:{DEFAULT_PORT}"),
            issuer_private_key: None,
            trusted_issuers: None,
            allowed_http_hosts: ["localhost", "127.0.0.1", "0.0.0.0"]
                .into_iter()
                .map(str::to_string)
                .collect(),
            revocation_policy: RevocationPolicy::default(),
            development: false,
        }
    }
}

impl HTTPConfig {
    /// Provides formatted string of server config address.
    pub fn to_address(&self) -> String {
        self.to_socket_address().to_string()
    }

    /// Provides `SocketAddr` of server config address.
    pub fn to_socket_address(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Reads the file named by `ACK_CONFIG`, or the defaults when it is unset.
    pub fn from_env() -> Result<Self, AckHTTPError> {
        match std::env::var(ACK_CONFIG) {
            Ok(path) => {
                let toml_str = fs::read_to_string(&path).map_err(|e| {
                    AckHTTPError::Config(format!("Error reading {path}: {e}"))
                })?;
                parse_toml(&toml_str)
            }
            Err(_) => Ok(Self::default()),
        }
    }
}

/// Parses the `[http]` table of a TOML configuration.
pub fn parse_toml(toml_str: &str) -> Result<HTTPConfig, AckHTTPError> {
    toml::from_str::<Config>(toml_str)
        .map(|config| config.http)
        .map_err(|e| AckHTTPError::Config(format!("Error parsing config: {e}")))
}

/// Wrapper struct for parsing the `http` config table.
#[derive(Serialize, Deserialize, Debug, Clone)]
struct Config {
    /// HTTP configuration data.
    http: HTTPConfig,
}
