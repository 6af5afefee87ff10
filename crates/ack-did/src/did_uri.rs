//! DID URI detection and parsing.
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref DID_URL: Regex = Regex::new(concat!(
        r"^did:([a-z0-9]+):",
        r"((?:(?:[a-zA-Z0-9._-]|%[0-9a-fA-F]{2})*:)*(?:[a-zA-Z0-9._-]|%[0-9a-fA-F]{2})+)",
        r"(/[^#?]*)?",
        r"(\?[^#]*)?",
        r"(#.*)?$"
    ))
    .unwrap();
}

/// Returns `true` if the value looks like a DID: a `did:` prefix and at least
/// three colon separated parts.
pub fn is_did_uri(value: &str) -> bool {
    value.starts_with("did:") && value.split(':').count() >= 3
}

/// A DID URL split into its components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDid {
    /// The bare DID (`did:<method>:<id>`).
    pub did: String,
    /// The full input.
    pub did_url: String,
    pub method: String,
    pub id: String,
    pub path: Option<String>,
    pub query: Option<String>,
    pub fragment: Option<String>,
}

/// Parses a DID URL, returning `None` if it is malformed.
pub fn parse_did(did_url: &str) -> Option<ParsedDid> {
    let captures = DID_URL.captures(did_url)?;
    let method = captures.get(1)?.as_str().to_string();
    let id = captures.get(2)?.as_str().to_string();
    Some(ParsedDid {
        did: format!("did:{method}:{id}"),
        did_url: did_url.to_string(),
        method,
        id,
        path: captures.get(3).map(|m| m.as_str().to_string()),
        query: captures.get(4).map(|m| m.as_str()[1..].to_string()),
        fragment: captures.get(5).map(|m| m.as_str()[1..].to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_did_uri() {
        assert!(is_did_uri("did:web:example.com"));
        assert!(is_did_uri("did:pkh:eip155:1:0xabc"));
        assert!(!is_did_uri("did:web"));
        assert!(!is_did_uri("https://example.com"));
        assert!(!is_did_uri(""));
    }

    #[test]
    fn test_parse_did() {
        let parsed = parse_did("did:web:example.com%3A8080:users:alice#key-1").unwrap();
        assert_eq!(parsed.did, "did:web:example.com%3A8080:users:alice");
        assert_eq!(parsed.method, "web");
        assert_eq!(parsed.id, "example.com%3A8080:users:alice");
        assert_eq!(parsed.fragment.as_deref(), Some("key-1"));
        assert!(parsed.path.is_none());

        let parsed = parse_did("did:example:123/path?service=agent").unwrap();
        assert_eq!(parsed.path.as_deref(), Some("/path"));
        assert_eq!(parsed.query.as_deref(), Some("service=agent"));
    }

    #[test]
    fn test_parse_invalid_did() {
        assert!(parse_did("did:Web:example.com").is_none());
        assert!(parse_did("did:web:").is_none());
        assert!(parse_did("not-a-did").is_none());
    }
}
