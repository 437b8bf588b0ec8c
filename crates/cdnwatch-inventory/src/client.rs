//! The signed management API client.
//!
//! A single blocking-style async call: sign the request, GET the inventory
//! URI, hand the body to the parser. There is no retry logic; a failure is
//! reported to the caller, which turns it into one aggregate alert.

use std::collections::BTreeSet;
use std::time::Duration;

use chrono::Utc;
use tracing::debug;

use cdnwatch_auth::canonical::{Method, canonical_request_hash};
use cdnwatch_auth::sign::{Credentials, build_authorization_header};
use cdnwatch_core::MonitorConfig;

use crate::error::InventoryError;
use crate::parse::parse_domains;

/// The payload placeholder signed for requests without a body.
///
/// GET requests discard it during canonicalization, but it is what travels
/// through the signing pipeline for every bodiless call.
const EMPTY_PAYLOAD: &[u8] = b"{}";

/// Authentication method marker sent alongside the signed header.
const AUTH_METHOD: &str = "AKSK";

/// Signed HTTP client for the CDN management API.
#[derive(Debug, Clone)]
pub struct InventoryClient {
    http: reqwest::Client,
    host: String,
    request_uri: String,
    credentials: Credentials,
}

impl InventoryClient {
    /// Create a client for the given host and inventory URI.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::Request`] if the underlying HTTP client
    /// cannot be constructed.
    pub fn new(
        host: impl Into<String>,
        request_uri: impl Into<String>,
        credentials: Credentials,
        timeout: Duration,
    ) -> Result<Self, InventoryError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            host: host.into(),
            request_uri: request_uri.into(),
            credentials,
        })
    }

    /// Create a client from the monitor configuration.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::MissingCredentials`] if the access key or
    /// secret key is absent — the monitor cannot do anything useful without
    /// them, so this is a fail-fast configuration error.
    pub fn from_config(config: &MonitorConfig) -> Result<Self, InventoryError> {
        let access_key = config
            .access_key
            .as_deref()
            .ok_or(InventoryError::MissingCredentials)?;
        let secret_key = config
            .secret_key
            .as_deref()
            .ok_or(InventoryError::MissingCredentials)?;

        Self::new(
            config.api_host.clone(),
            config.inventory_uri.clone(),
            Credentials::new(access_key, secret_key),
            config.api_timeout,
        )
    }

    /// Fetch the domain inventory as a deduplicated, ordered set.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::Request`] on any transport failure or
    /// non-success status, and [`InventoryError::UnparsableResponse`] if the
    /// body is neither JSON nor XML.
    pub async fn fetch_domains(&self) -> Result<BTreeSet<String>, InventoryError> {
        let timestamp = Utc::now().timestamp();
        let authorization = self.authorization(timestamp);
        let url = format!("https://{}{}", self.host, self.request_uri);

        debug!(%url, timestamp, "fetching domain inventory");

        let response = self
            .http
            .get(&url)
            .header("x-cnc-auth-method", AUTH_METHOD)
            .header("x-cnc-accessKey", &self.credentials.access_key)
            .header("x-cnc-timestamp", timestamp.to_string())
            .header(reqwest::header::AUTHORIZATION, authorization)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;
        let domains = parse_domains(&body)?;

        debug!(count = domains.len(), "parsed domain inventory");
        Ok(domains)
    }

    /// Build the `Authorization` header value for the inventory request.
    fn authorization(&self, timestamp: i64) -> String {
        let hash = canonical_request_hash(Method::Get, &self.request_uri, EMPTY_PAYLOAD, &self.host);
        build_authorization_header(&self.credentials, timestamp, &hash)
    }
}
