//! Canonical request construction for the CDN management API.
//!
//! The canonical request is a deterministic textual representation of an
//! outgoing HTTP request, used only as a hash input:
//!
//! ```text
//! HTTPRequestMethod\n
//! Path\n
//! DecodedQueryString\n
//! CanonicalHeaders\n
//! SignedHeaders\n
//! HashedPayload
//! ```
//!
//! Unlike SigV4-style schemes, the canonical headers are not derived from the
//! actual request headers: the API signs a fixed `content-type`/`host` pair,
//! so the headers block and the signed-header-names list are constants.

use percent_encoding::percent_decode_str;
use sha2::{Digest, Sha256};
use std::fmt;

/// The fixed list of header names included in signing.
///
/// This is a protocol constant, not derived from the request.
pub const SIGNED_HEADERS: &str = "content-type;host";

/// HTTP methods accepted by the management API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// HTTP GET. The body is never signed.
    Get,
    /// HTTP POST. The body is signed as supplied.
    Post,
    /// HTTP PUT. The body is signed as supplied.
    Put,
    /// HTTP DELETE. The body is never signed.
    Delete,
}

impl Method {
    /// The method name as it appears in the canonical request.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }

    /// Whether the request body participates in the signature.
    ///
    /// GET and DELETE requests sign an empty payload regardless of what body
    /// the caller supplies.
    #[must_use]
    pub fn signs_body(self) -> bool {
        matches!(self, Self::Post | Self::Put)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Split a request URI into its path and percent-decoded query string.
///
/// The query is everything after the first `?`, percent-decoded before
/// inclusion in the canonical request. Invalid percent sequences decode
/// lossily; a URI without a query yields an empty string.
///
/// # Examples
///
/// ```
/// use cdnwatch_auth::canonical::split_request_uri;
///
/// let (path, query) = split_request_uri("/api/domain?name=demo%2Dsite");
/// assert_eq!(path, "/api/domain");
/// assert_eq!(query, "name=demo-site");
///
/// let (path, query) = split_request_uri("/api/domain");
/// assert_eq!(path, "/api/domain");
/// assert_eq!(query, "");
/// ```
#[must_use]
pub fn split_request_uri(request_uri: &str) -> (&str, String) {
    match request_uri.split_once('?') {
        Some((path, query)) => (
            path,
            percent_decode_str(query).decode_utf8_lossy().into_owned(),
        ),
        None => (request_uri, String::new()),
    }
}

/// Build the full canonical request string from its components.
///
/// The canonical headers block is the constant
/// `content-type:application/json\nhost:<host>\n`; its trailing newline is
/// part of the block, which is why two newlines separate it from the
/// signed-header-names line.
///
/// # Examples
///
/// ```
/// use cdnwatch_auth::canonical::{Method, build_canonical_request};
///
/// let canonical = build_canonical_request(Method::Get, "/api/domain", b"{}", "api.cdnetworks.com");
/// assert!(canonical.starts_with("GET\n/api/domain\n\n"));
/// ```
#[must_use]
pub fn build_canonical_request(
    method: Method,
    request_uri: &str,
    payload: &[u8],
    host: &str,
) -> String {
    let payload: &[u8] = if method.signs_body() { payload } else { b"" };
    let (path, query) = split_request_uri(request_uri);
    let canonical_headers = format!("content-type:application/json\nhost:{host}\n");
    let hashed_payload = hex::encode(Sha256::digest(payload));

    format!("{method}\n{path}\n{query}\n{canonical_headers}\n{SIGNED_HEADERS}\n{hashed_payload}")
}

/// Compute the lowercase hex SHA-256 digest of the canonical request.
///
/// This is the value that feeds into the string to sign. Pure transform: for
/// identical inputs the output is always byte-identical, and there are no
/// error paths.
#[must_use]
pub fn canonical_request_hash(
    method: Method,
    request_uri: &str,
    payload: &[u8],
    host: &str,
) -> String {
    let canonical = build_canonical_request(method, request_uri, payload, host);
    hex::encode(Sha256::digest(canonical.as_bytes()))
}
