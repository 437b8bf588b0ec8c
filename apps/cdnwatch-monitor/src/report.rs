//! Per-domain probe results and the rendered alert message.
//!
//! Every domain gets an explicit entry, success or failure, so one bad
//! domain never hides the rest. Only entries at or below the warning
//! threshold (or unreachable ones) contribute alert lines.

use cdnwatch_tls::ProbeError;

/// The probe outcome for a single domain.
#[derive(Debug)]
pub struct DomainCheck {
    /// The probed domain.
    pub domain: String,
    /// Days remaining, or the failure that prevented finding out.
    pub outcome: Result<i64, ProbeError>,
}

impl DomainCheck {
    /// Render this check as an alert line, if it warrants one.
    fn alert_line(&self, threshold_days: i64) -> Option<String> {
        match &self.outcome {
            Err(e) => Some(format!("❌ `{}`: unreachable ({e})", self.domain)),
            Ok(days) if *days <= threshold_days => {
                let marker = if *days <= 0 { "🚨" } else { "⚠️" };
                Some(format!("{marker} `{}`: *{days}* days remaining", self.domain))
            }
            Ok(_) => None,
        }
    }
}

/// The collected outcome of one monitoring run.
#[derive(Debug)]
pub struct ExpiryReport {
    threshold_days: i64,
    checks: Vec<DomainCheck>,
}

impl ExpiryReport {
    /// Build a report over the given checks.
    #[must_use]
    pub fn new(threshold_days: i64, checks: Vec<DomainCheck>) -> Self {
        Self {
            threshold_days,
            checks,
        }
    }

    /// All per-domain results, in probe order.
    #[must_use]
    pub fn checks(&self) -> &[DomainCheck] {
        &self.checks
    }

    /// The alert lines for domains that are unreachable or near expiry.
    #[must_use]
    pub fn alert_lines(&self) -> Vec<String> {
        self.checks
            .iter()
            .filter_map(|check| check.alert_line(self.threshold_days))
            .collect()
    }

    /// Render the full alert message, or `None` if every domain is healthy.
    #[must_use]
    pub fn render_alert(&self) -> Option<String> {
        let lines = self.alert_lines();
        if lines.is_empty() {
            return None;
        }
        Some(format!(
            "🔔 *CDN SSL expiry warning (≤{} days)*\n\n{}",
            self.threshold_days,
            lines.join("\n")
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(domain: &str, days: i64) -> DomainCheck {
        DomainCheck {
            domain: domain.to_owned(),
            outcome: Ok(days),
        }
    }

    #[test]
    fn test_should_alert_only_below_threshold() {
        let report = ExpiryReport::new(5, vec![ok("a.example.com", 3), ok("b.example.com", 40)]);
        let lines = report.alert_lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("a.example.com"));
        assert!(lines[0].contains("*3*"));
    }

    #[test]
    fn test_should_mark_expired_domains_distinctly() {
        let report = ExpiryReport::new(5, vec![ok("gone.example.com", 0)]);
        let lines = report.alert_lines();
        assert!(lines[0].starts_with("🚨"));

        let report = ExpiryReport::new(5, vec![ok("soon.example.com", 2)]);
        let lines = report.alert_lines();
        assert!(lines[0].starts_with("⚠️"));
    }

    #[test]
    fn test_should_render_unreachable_domains_with_reason() {
        let report = ExpiryReport::new(
            5,
            vec![DomainCheck {
                domain: "down.example.com".to_owned(),
                outcome: Err(cdnwatch_tls::ProbeError::ConnectionRefused),
            }],
        );
        let lines = report.alert_lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("❌"));
        assert!(lines[0].contains("connection refused"));
    }

    #[test]
    fn test_should_render_no_alert_when_all_healthy() {
        let report = ExpiryReport::new(5, vec![ok("a.example.com", 40), ok("b.example.com", 90)]);
        assert!(report.render_alert().is_none());
    }

    #[test]
    fn test_should_render_banner_with_threshold() {
        let report = ExpiryReport::new(5, vec![ok("a.example.com", 1)]);
        let message = report.render_alert().unwrap();
        assert!(message.starts_with("🔔 *CDN SSL expiry warning (≤5 days)*\n\n"));
    }
}
