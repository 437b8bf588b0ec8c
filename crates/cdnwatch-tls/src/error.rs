//! Probe failure taxonomy.
//!
//! Each variant keeps the per-domain alert line informative without letting
//! one bad domain abort the batch.

/// Errors that can occur while probing a domain's certificate.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    /// The domain is not a valid TLS server name.
    #[error("invalid hostname: {0}")]
    InvalidHostname(String),

    /// The TCP connection was refused.
    #[error("connection refused")]
    ConnectionRefused,

    /// Connect or handshake did not complete within the probe timeout.
    #[error("timed out")]
    Timeout,

    /// Any other connect failure, including DNS resolution errors.
    #[error("connection failed: {0}")]
    Connect(String),

    /// The TLS handshake failed. An already-expired certificate surfaces
    /// here, since the trust store rejects it during verification.
    #[error("TLS handshake failed: {0}")]
    Handshake(String),

    /// The peer completed the handshake without presenting a certificate.
    #[error("peer presented no certificate")]
    NoPeerCertificate,

    /// The peer certificate could not be parsed.
    #[error("certificate parse failed: {0}")]
    CertificateParse(String),
}
