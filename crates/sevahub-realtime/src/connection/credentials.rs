//! Credential extraction for the connection handshake.
//!
//! Credentials are pulled from the upgrade request by an ordered list of
//! extractor functions tried in sequence; the first match wins. Adding a new
//! transport means appending an extractor, not touching gateway logic.

use std::collections::HashMap;

/// Cookie that may carry the access token for same-site clients.
const SESSION_COOKIE: &str = "sevahub_session";

/// The transport-agnostic pieces of an upgrade request that may carry a
/// credential.
#[derive(Debug, Clone, Default)]
pub struct HandshakeParts {
    /// Explicit auth payload supplied by the client.
    pub auth: Option<String>,
    /// Remaining query-string parameters.
    pub query: HashMap<String, String>,
    /// Raw `Authorization` header value.
    pub authorization: Option<String>,
    /// Raw `Cookie` header value.
    pub cookies: Option<String>,
}

impl HandshakeParts {
    /// Assemble handshake parts from an upgrade request. The `auth` query
    /// field is treated as the explicit auth payload.
    pub fn new(
        mut query: HashMap<String, String>,
        authorization: Option<String>,
        cookies: Option<String>,
    ) -> Self {
        let auth = query.remove("auth");
        Self {
            auth,
            query,
            authorization,
            cookies,
        }
    }
}

/// A single credential source.
type CredentialExtractor = fn(&HandshakeParts) -> Option<String>;

/// Credential sources in priority order.
const EXTRACTORS: &[(&str, CredentialExtractor)] = &[
    ("auth_payload", from_auth_payload),
    ("query_token", from_query_token),
    ("authorization_header", from_bearer_header),
    ("session_cookie", from_session_cookie),
];

/// Extract a bearer credential, returning the winning source name and token.
pub fn extract_credential(parts: &HandshakeParts) -> Option<(&'static str, String)> {
    EXTRACTORS
        .iter()
        .find_map(|(name, extractor)| extractor(parts).map(|token| (*name, token)))
}

fn from_auth_payload(parts: &HandshakeParts) -> Option<String> {
    parts.auth.clone().filter(|t| !t.is_empty())
}

fn from_query_token(parts: &HandshakeParts) -> Option<String> {
    parts.query.get("token").cloned().filter(|t| !t.is_empty())
}

fn from_bearer_header(parts: &HandshakeParts) -> Option<String> {
    parts
        .authorization
        .as_deref()
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string)
        .filter(|t| !t.is_empty())
}

fn from_session_cookie(parts: &HandshakeParts) -> Option<String> {
    let cookies = parts.cookies.as_deref()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE && !value.is_empty()).then(|| value.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts_with_query(pairs: &[(&str, &str)]) -> HandshakeParts {
        HandshakeParts::new(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            None,
            None,
        )
    }

    #[test]
    fn test_no_credential() {
        assert!(extract_credential(&HandshakeParts::default()).is_none());
    }

    #[test]
    fn test_auth_payload_wins_over_everything() {
        let mut parts = parts_with_query(&[("auth", "payload-token"), ("token", "query-token")]);
        parts.authorization = Some("Bearer header-token".to_string());
        parts.cookies = Some(format!("{SESSION_COOKIE}=cookie-token"));

        let (source, token) = extract_credential(&parts).unwrap();
        assert_eq!(source, "auth_payload");
        assert_eq!(token, "payload-token");
    }

    #[test]
    fn test_query_token_beats_header() {
        let mut parts = parts_with_query(&[("token", "query-token")]);
        parts.authorization = Some("Bearer header-token".to_string());

        let (source, token) = extract_credential(&parts).unwrap();
        assert_eq!(source, "query_token");
        assert_eq!(token, "query-token");
    }

    #[test]
    fn test_bearer_header() {
        let mut parts = HandshakeParts::default();
        parts.authorization = Some("Bearer header-token".to_string());

        let (source, token) = extract_credential(&parts).unwrap();
        assert_eq!(source, "authorization_header");
        assert_eq!(token, "header-token");
    }

    #[test]
    fn test_non_bearer_authorization_is_ignored() {
        let mut parts = HandshakeParts::default();
        parts.authorization = Some("Basic dXNlcjpwYXNz".to_string());
        assert!(extract_credential(&parts).is_none());
    }

    #[test]
    fn test_session_cookie_is_last_resort() {
        let mut parts = HandshakeParts::default();
        parts.cookies = Some(format!("theme=dark; {SESSION_COOKIE}=cookie-token; lang=en"));

        let (source, token) = extract_credential(&parts).unwrap();
        assert_eq!(source, "session_cookie");
        assert_eq!(token, "cookie-token");
    }

    #[test]
    fn test_empty_values_do_not_match() {
        let parts = parts_with_query(&[("token", "")]);
        assert!(extract_credential(&parts).is_none());
    }
}
