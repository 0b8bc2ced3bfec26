//! Client identity derivation for rate limit keys.

use std::fmt;

/// Placeholder client when no network address can be derived.
const UNKNOWN_CLIENT: &str = "unknown";

/// A stable per-client rate limit identifier.
///
/// Composed of a scope (usually a route or feature name) and a client
/// address, rendered as `"scope:client"`. The limiter treats the rendered
/// form as an opaque string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientKey {
    /// The feature or route this limit applies to
    pub scope: String,
    /// The client the limit is counted against
    pub client: String,
}

impl ClientKey {
    /// Create a new client key.
    pub fn new(scope: &str, client: &str) -> Self {
        Self {
            scope: scope.to_string(),
            client: client.to_string(),
        }
    }
}

impl fmt::Display for ClientKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.scope, self.client)
    }
}

/// Extract the client address from a forwarding header value.
///
/// `X-Forwarded-For` carries a comma-separated chain; the first entry is the
/// originating client. Returns `"unknown"` when the header is missing or
/// empty rather than failing, so a misconfigured proxy degrades to one
/// shared bucket instead of unlimited traffic.
pub fn client_ip(forwarded_for: Option<&str>) -> String {
    forwarded_for
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .unwrap_or(UNKNOWN_CLIENT)
        .to_string()
}
