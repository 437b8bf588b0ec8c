//! Request signing for the CDN management API.
//!
//! This crate implements the client side of the API's AKSK authentication
//! scheme: a canonical request is built from the outgoing HTTP request,
//! hashed, and signed with HMAC-SHA256 using the account's secret key. The
//! resulting credential proof travels in the `Authorization` header.
//!
//! The scheme is a fixed external contract. Every normalization step — which
//! headers are signed, how the query string is decoded, the casing of the hex
//! signature — must match the remote API byte-for-byte, so none of it is
//! configurable.
//!
//! # Usage
//!
//! ```rust
//! use cdnwatch_auth::canonical::{Method, canonical_request_hash};
//! use cdnwatch_auth::sign::{Credentials, build_authorization_header};
//!
//! let credentials = Credentials::new("AKIDEXAMPLE", "secretkey123");
//! let hash = canonical_request_hash(Method::Get, "/api/domain", b"{}", "api.cdnetworks.com");
//! let header = build_authorization_header(&credentials, 1_700_000_000, &hash);
//! assert!(header.starts_with("CNC-HMAC-SHA256 Credential=AKIDEXAMPLE, "));
//! ```
//!
//! # Modules
//!
//! - [`canonical`] - Canonical request construction and hashing
//! - [`sign`] - String-to-sign, HMAC signature, and `Authorization` header value

pub mod canonical;
pub mod sign;

pub use canonical::{Method, SIGNED_HEADERS, build_canonical_request, canonical_request_hash};
pub use sign::{ALGORITHM, Credentials, build_authorization_header, compute_signature};
