//! The certificate expiry probe.
//!
//! The probe performs a real handshake rather than inspecting cached data:
//! connect to `<domain>:443`, negotiate TLS with the webpki root store, pull
//! the end-entity certificate off the finished session, and read its
//! validity window. Connect and handshake each get the same fixed timeout.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rustls::pki_types::ServerName;
use rustls::{ClientConfig, RootCertStore};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_rustls::TlsConnector;
use tracing::debug;
use x509_parser::prelude::*;

use crate::error::ProbeError;

/// The port probed on every domain.
pub const TLS_PORT: u16 = 443;

/// Seconds per day, for whole-days-remaining arithmetic.
const SECONDS_PER_DAY: i64 = 86_400;

/// TLS certificate expiry probe.
///
/// One probe instance holds a single TLS client config and is reused across
/// every domain in a run.
#[derive(Clone)]
pub struct CertProbe {
    connector: TlsConnector,
    timeout: Duration,
}

impl std::fmt::Debug for CertProbe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CertProbe")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl CertProbe {
    /// Create a probe with the given per-phase timeout.
    #[must_use]
    pub fn new(probe_timeout: Duration) -> Self {
        let mut roots = RootCertStore::empty();
        roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

        let config = ClientConfig::builder()
            .with_root_certificates(roots)
            .with_no_client_auth();

        Self {
            connector: TlsConnector::from(Arc::new(config)),
            timeout: probe_timeout,
        }
    }

    /// Probe a domain and return the whole days remaining until its
    /// certificate expires, relative to current UTC time.
    ///
    /// A certificate past expiry would report a negative count, though in
    /// practice the handshake fails first and surfaces as
    /// [`ProbeError::Handshake`].
    ///
    /// # Errors
    ///
    /// Returns the [`ProbeError`] variant describing which phase failed.
    pub async fn remaining_days(&self, domain: &str) -> Result<i64, ProbeError> {
        let not_after = self.peer_cert_expiry(domain).await?;
        let days = days_until(not_after, Utc::now().timestamp());
        debug!(domain, not_after, days, "probed certificate expiry");
        Ok(days)
    }

    /// Handshake with the domain and return its certificate's `notAfter`
    /// as a unix timestamp.
    ///
    /// # Errors
    ///
    /// Returns the [`ProbeError`] variant describing which phase failed.
    pub async fn peer_cert_expiry(&self, domain: &str) -> Result<i64, ProbeError> {
        let server_name = ServerName::try_from(domain.to_owned())
            .map_err(|_| ProbeError::InvalidHostname(domain.to_owned()))?;

        let stream = timeout(self.timeout, TcpStream::connect((domain, TLS_PORT)))
            .await
            .map_err(|_| ProbeError::Timeout)?
            .map_err(map_connect_error)?;

        let tls = timeout(self.timeout, self.connector.connect(server_name, stream))
            .await
            .map_err(|_| ProbeError::Timeout)?
            .map_err(|e| ProbeError::Handshake(e.to_string()))?;

        let (_, session) = tls.get_ref();
        let der = session
            .peer_certificates()
            .and_then(|certs| certs.first())
            .ok_or(ProbeError::NoPeerCertificate)?;

        expiry_from_der(der.as_ref())
    }
}

/// Classify a TCP connect failure.
fn map_connect_error(e: std::io::Error) -> ProbeError {
    match e.kind() {
        std::io::ErrorKind::ConnectionRefused => ProbeError::ConnectionRefused,
        std::io::ErrorKind::TimedOut => ProbeError::Timeout,
        _ => ProbeError::Connect(e.to_string()),
    }
}

/// Extract the `notAfter` timestamp from a DER-encoded certificate.
///
/// # Errors
///
/// Returns [`ProbeError::CertificateParse`] if the bytes are not a valid
/// X.509 certificate.
pub fn expiry_from_der(der: &[u8]) -> Result<i64, ProbeError> {
    let (_, cert) = X509Certificate::from_der(der)
        .map_err(|e| ProbeError::CertificateParse(e.to_string()))?;
    Ok(cert.validity().not_after.timestamp())
}

/// Whole days from `now` until `expiry` (both unix seconds).
///
/// Floor division, matching calendar intuition: 3 days and one hour out is
/// still "3 days remaining", and one hour past expiry is "-1 days".
///
/// # Examples
///
/// ```
/// use cdnwatch_tls::days_until;
///
/// assert_eq!(days_until(86_400 * 3, 0), 3);
/// assert_eq!(days_until(86_400 * 3 + 3_600, 0), 3);
/// assert_eq!(days_until(0, 3_600), -1);
/// ```
#[must_use]
pub fn days_until(expiry: i64, now: i64) -> i64 {
    (expiry - now).div_euclid(SECONDS_PER_DAY)
}
