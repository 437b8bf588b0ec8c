//! The monitoring pipeline: fetch inventory, probe each domain, notify.
//!
//! Strictly sequential. The three collaborators sit behind traits so the
//! pipeline can be exercised with fakes; production wires in
//! [`InventoryClient`], [`CertProbe`], and [`TelegramNotifier`].

use std::collections::BTreeSet;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use cdnwatch_inventory::{InventoryClient, InventoryError};
use cdnwatch_notify::{NotifyStatus, TelegramNotifier};
use cdnwatch_tls::{CertProbe, ProbeError};

use crate::report::{DomainCheck, ExpiryReport};

/// Aggregate alert sent when the inventory cannot be fetched at all.
const INVENTORY_FAILURE_ALERT: &str = "❌ *CDN SSL check failed*\n\
     Could not fetch the domain list from the management API. Check the API credentials.";

/// Source of the domain inventory.
#[async_trait]
pub trait DomainSource {
    /// Fetch the deduplicated set of domains to probe.
    async fn fetch_domains(&self) -> Result<BTreeSet<String>, InventoryError>;
}

#[async_trait]
impl DomainSource for InventoryClient {
    async fn fetch_domains(&self) -> Result<BTreeSet<String>, InventoryError> {
        InventoryClient::fetch_domains(self).await
    }
}

/// Certificate expiry prober.
#[async_trait]
pub trait CertProber {
    /// Whole days remaining until the domain's certificate expires.
    async fn remaining_days(&self, domain: &str) -> Result<i64, ProbeError>;
}

#[async_trait]
impl CertProber for CertProbe {
    async fn remaining_days(&self, domain: &str) -> Result<i64, ProbeError> {
        CertProbe::remaining_days(self, domain).await
    }
}

/// Destination for rendered alerts.
#[async_trait]
pub trait AlertSink {
    /// Post a Markdown text alert.
    async fn send_text(&self, text: &str) -> NotifyStatus;
}

#[async_trait]
impl AlertSink for TelegramNotifier {
    async fn send_text(&self, text: &str) -> NotifyStatus {
        TelegramNotifier::send_text(self, text).await
    }
}

/// Run one monitoring pass.
///
/// Inventory failure (or an empty inventory) produces a single aggregate
/// alert and an early error return. Individual probe failures are folded
/// into the report; they never abort the batch.
///
/// # Errors
///
/// Returns an error when the inventory cannot be fetched or comes back
/// empty. Probe and notify failures are not errors at this level.
pub async fn run(
    source: &dyn DomainSource,
    prober: &dyn CertProber,
    sink: &dyn AlertSink,
    threshold_days: i64,
) -> Result<ExpiryReport> {
    let domains = match source.fetch_domains().await {
        Ok(domains) if !domains.is_empty() => domains,
        Ok(_) => {
            warn!("inventory returned no domains");
            log_send("inventory failure alert", sink.send_text(INVENTORY_FAILURE_ALERT).await);
            anyhow::bail!("domain inventory is empty");
        }
        Err(e) => {
            error!(error = %e, "failed to fetch domain inventory");
            log_send("inventory failure alert", sink.send_text(INVENTORY_FAILURE_ALERT).await);
            return Err(e.into());
        }
    };

    info!(count = domains.len(), "probing domains");

    let mut checks = Vec::with_capacity(domains.len());
    for domain in &domains {
        let outcome = prober.remaining_days(domain).await;
        match &outcome {
            Ok(days) => debug!(domain, days, "probe complete"),
            Err(e) => warn!(domain, error = %e, "probe failed"),
        }
        checks.push(DomainCheck {
            domain: domain.clone(),
            outcome,
        });
    }

    let report = ExpiryReport::new(threshold_days, checks);

    if let Some(message) = report.render_alert() {
        log_send("expiry alert", sink.send_text(&message).await);
    } else {
        info!("all domains healthy");
    }

    Ok(report)
}

/// Log the outcome of a fire-and-forget send.
fn log_send(what: &str, status: NotifyStatus) {
    match status {
        NotifyStatus::Sent => info!(what, "alert sent"),
        NotifyStatus::Skipped => warn!(what, "alert skipped, bot target unconfigured"),
        NotifyStatus::Failed(e) => error!(what, error = %e, "alert delivery failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct FakeSource {
        domains: Vec<&'static str>,
        fail: bool,
    }

    #[async_trait]
    impl DomainSource for FakeSource {
        async fn fetch_domains(&self) -> Result<BTreeSet<String>, InventoryError> {
            if self.fail {
                return Err(InventoryError::UnparsableResponse);
            }
            Ok(self.domains.iter().map(|d| (*d).to_owned()).collect())
        }
    }

    struct FakeProber {
        days: HashMap<&'static str, i64>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeProber {
        fn new(days: &[(&'static str, i64)]) -> Self {
            Self {
                days: days.iter().copied().collect(),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CertProber for FakeProber {
        async fn remaining_days(&self, domain: &str) -> Result<i64, ProbeError> {
            self.calls.lock().unwrap().push(domain.to_owned());
            self.days
                .get(domain)
                .copied()
                .ok_or(ProbeError::ConnectionRefused)
        }
    }

    #[derive(Default)]
    struct FakeSink {
        sent: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl AlertSink for FakeSink {
        async fn send_text(&self, text: &str) -> NotifyStatus {
            self.sent.lock().unwrap().push(text.to_owned());
            NotifyStatus::Sent
        }
    }

    #[tokio::test]
    async fn test_should_alert_only_for_domain_below_threshold() {
        let source = FakeSource {
            domains: vec!["a.example.com", "b.example.com"],
            fail: false,
        };
        let prober = FakeProber::new(&[("a.example.com", 3), ("b.example.com", 40)]);
        let sink = FakeSink::default();

        let report = run(&source, &prober, &sink, 5).await.unwrap();

        assert_eq!(report.checks().len(), 2);
        let lines = report.alert_lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("a.example.com"));
        assert!(lines[0].contains("*3*"));

        let sent = sink.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains("a.example.com"));
        assert!(!sent[0].contains("b.example.com"));
    }

    #[tokio::test]
    async fn test_should_probe_each_domain_once() {
        let source = FakeSource {
            domains: vec!["a.example.com", "a.example.com", "b.example.com"],
            fail: false,
        };
        let prober = FakeProber::new(&[("a.example.com", 30), ("b.example.com", 30)]);
        let sink = FakeSink::default();

        run(&source, &prober, &sink, 5).await.unwrap();

        // The source's set semantics collapse duplicates before probing.
        let calls = prober.calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
    }

    #[tokio::test]
    async fn test_should_continue_past_failing_domain() {
        let source = FakeSource {
            domains: vec!["down.example.com", "up.example.com"],
            fail: false,
        };
        let prober = FakeProber::new(&[("up.example.com", 2)]);
        let sink = FakeSink::default();

        let report = run(&source, &prober, &sink, 5).await.unwrap();

        assert_eq!(report.checks().len(), 2);
        let lines = report.alert_lines();
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().any(|l| l.starts_with("❌")));
        assert!(lines.iter().any(|l| l.contains("up.example.com")));
    }

    #[tokio::test]
    async fn test_should_send_aggregate_alert_on_inventory_failure() {
        let source = FakeSource {
            domains: vec![],
            fail: true,
        };
        let prober = FakeProber::new(&[]);
        let sink = FakeSink::default();

        let result = run(&source, &prober, &sink, 5).await;

        assert!(result.is_err());
        let sent = sink.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains("CDN SSL check failed"));
        assert!(prober.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_should_treat_empty_inventory_as_failure() {
        let source = FakeSource {
            domains: vec![],
            fail: false,
        };
        let prober = FakeProber::new(&[]);
        let sink = FakeSink::default();

        let result = run(&source, &prober, &sink, 5).await;

        assert!(result.is_err());
        assert_eq!(sink.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_should_not_notify_when_all_healthy() {
        let source = FakeSource {
            domains: vec!["a.example.com"],
            fail: false,
        };
        let prober = FakeProber::new(&[("a.example.com", 90)]);
        let sink = FakeSink::default();

        run(&source, &prober, &sink, 5).await.unwrap();

        assert!(sink.sent.lock().unwrap().is_empty());
    }
}
