//! String-to-sign construction and `Authorization` header rendering.
//!
//! The credential proof is:
//!
//! ```text
//! StringToSign = CNC-HMAC-SHA256\n<unix timestamp>\n<hex(SHA256(canonical request))>
//! Signature    = UPPERHEX(HMAC-SHA256(secret key, StringToSign))
//! ```
//!
//! The uppercase hex rendering is part of the wire contract — the remote API
//! compares the signature textually, so lowercase hex is rejected.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::canonical::SIGNED_HEADERS;

/// The algorithm name carried in the string to sign and the header value.
pub const ALGORITHM: &str = "CNC-HMAC-SHA256";

type HmacSha256 = Hmac<Sha256>;

/// Access key / secret key pair for the management API.
///
/// Loaded once at startup and held in memory only; never mutated.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// The account's access key, transmitted in cleartext headers.
    pub access_key: String,
    /// The shared secret used to key the HMAC. Never transmitted.
    pub secret_key: String,
}

impl Credentials {
    /// Create a credential pair.
    ///
    /// An empty secret key is not rejected here: signing with one produces a
    /// signature the remote API will refuse, not a local failure. Callers are
    /// responsible for supplying a real secret.
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
        }
    }
}

/// Build the string to sign from a timestamp and a canonical-request hash.
///
/// # Examples
///
/// ```
/// use cdnwatch_auth::sign::build_string_to_sign;
///
/// let sts = build_string_to_sign(1_700_000_000, "0287d652");
/// assert_eq!(sts, "CNC-HMAC-SHA256\n1700000000\n0287d652");
/// ```
#[must_use]
pub fn build_string_to_sign(timestamp: i64, canonical_request_hash: &str) -> String {
    format!("{ALGORITHM}\n{timestamp}\n{canonical_request_hash}")
}

/// Compute the request signature as uppercase hex.
///
/// Pure transform with no error paths; determinism is the whole point —
/// identical inputs always yield byte-identical output.
#[must_use]
pub fn compute_signature(secret_key: &str, string_to_sign: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(secret_key.as_bytes())
        .expect("HMAC can accept keys of any length");
    mac.update(string_to_sign.as_bytes());
    hex::encode_upper(mac.finalize().into_bytes())
}

/// Render the full `Authorization` header value.
///
/// Format:
/// ```text
/// CNC-HMAC-SHA256 Credential=<accessKey>, SignedHeaders=content-type;host, Signature=<HEX>
/// ```
///
/// # Examples
///
/// ```
/// use cdnwatch_auth::sign::{Credentials, build_authorization_header};
///
/// let credentials = Credentials::new("AKIDEXAMPLE", "secretkey123");
/// let header = build_authorization_header(
///     &credentials,
///     1_700_000_000,
///     "0287d652b3e16d3c4dcb536d7370b94d8ad2ad3e5d355b6db072c7741d934a68",
/// );
/// assert!(header.contains("SignedHeaders=content-type;host, Signature="));
/// ```
#[must_use]
pub fn build_authorization_header(
    credentials: &Credentials,
    timestamp: i64,
    canonical_request_hash: &str,
) -> String {
    let string_to_sign = build_string_to_sign(timestamp, canonical_request_hash);
    let signature = compute_signature(&credentials.secret_key, &string_to_sign);
    format!(
        "{ALGORITHM} Credential={}, SignedHeaders={SIGNED_HEADERS}, Signature={signature}",
        credentials.access_key
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::{Method, canonical_request_hash};

    const ACCESS_KEY: &str = "AKIDEXAMPLE";
    const SECRET_KEY: &str = "secretkey123";
    const TIMESTAMP: i64 = 1_700_000_000;

    fn inventory_hash() -> String {
        canonical_request_hash(Method::Get, "/api/domain", b"{}", "api.cdnetworks.com")
    }

    #[test]
    fn test_should_build_string_to_sign() {
        let sts = build_string_to_sign(TIMESTAMP, &inventory_hash());
        let expected = "CNC-HMAC-SHA256\n1700000000\n\
                        0287d652b3e16d3c4dcb536d7370b94d8ad2ad3e5d355b6db072c7741d934a68";
        assert_eq!(sts, expected);
    }

    #[test]
    fn test_should_render_authorization_header_matching_reference_vector() {
        let credentials = Credentials::new(ACCESS_KEY, SECRET_KEY);
        let header = build_authorization_header(&credentials, TIMESTAMP, &inventory_hash());
        assert_eq!(
            header,
            "CNC-HMAC-SHA256 Credential=AKIDEXAMPLE, SignedHeaders=content-type;host, \
             Signature=DEBAB5F0EE136CD4A59D2EA4BD140A76DC90F749081F2B10FBE373D2AD7B3AE3"
        );
    }

    #[test]
    fn test_should_render_signature_as_uppercase_hex() {
        let sts = build_string_to_sign(TIMESTAMP, &inventory_hash());
        let signature = compute_signature(SECRET_KEY, &sts);
        assert_eq!(signature.len(), 64);
        assert!(signature.chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }

    #[test]
    fn test_should_change_signature_when_secret_changes() {
        let sts = build_string_to_sign(TIMESTAMP, &inventory_hash());
        assert_ne!(
            compute_signature(SECRET_KEY, &sts),
            compute_signature("another-secret", &sts)
        );
    }

    #[test]
    fn test_should_change_signature_when_timestamp_changes() {
        let hash = inventory_hash();
        let a = compute_signature(SECRET_KEY, &build_string_to_sign(TIMESTAMP, &hash));
        let b = compute_signature(SECRET_KEY, &build_string_to_sign(TIMESTAMP + 1, &hash));
        assert_ne!(a, b);
    }

    #[test]
    fn test_should_sign_with_empty_secret_without_failing() {
        // Wrong signature, not failure: the remote side rejects it.
        let sts = build_string_to_sign(TIMESTAMP, &inventory_hash());
        let signature = compute_signature("", &sts);
        assert_eq!(signature.len(), 64);
        assert_ne!(signature, compute_signature(SECRET_KEY, &sts));
    }

    #[test]
    fn test_should_be_deterministic_for_identical_inputs() {
        let credentials = Credentials::new(ACCESS_KEY, SECRET_KEY);
        let a = build_authorization_header(&credentials, TIMESTAMP, &inventory_hash());
        let b = build_authorization_header(&credentials, TIMESTAMP, &inventory_hash());
        assert_eq!(a, b);
    }
}
