//! Live TLS certificate expiry probing.
//!
//! Given a hostname, the probe opens a TCP connection to port 443, completes
//! a TLS handshake against the webpki trust store, and reads the peer
//! certificate's `notAfter` field to compute whole days remaining.
//!
//! Every failure mode is a distinct [`ProbeError`] variant rather than a
//! collapsed sentinel, so callers can tell a refused connection from an
//! expired-certificate handshake failure from a parse error.
//!
//! # Modules
//!
//! - [`probe`] - The probe itself plus the pure expiry arithmetic
//! - [`error`] - The probe failure taxonomy

pub mod error;
pub mod probe;

pub use error::ProbeError;
pub use probe::{CertProbe, days_until, expiry_from_der};
