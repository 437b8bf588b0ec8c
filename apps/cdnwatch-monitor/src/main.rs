//! cdnwatch-monitor - scheduled CDN certificate expiry monitor.
//!
//! Fetches the managed-domain inventory from the CDN management API using
//! the AKSK-signed request scheme, probes each domain's TLS certificate over
//! a live handshake, and posts a Telegram alert for anything unreachable or
//! expiring within the warning threshold.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `CDN_API_HOST` | `api.cdnetworks.com` | Management API host |
//! | `CDN_ACCESS_KEY` | *(required)* | API access key |
//! | `CDN_SECRET_KEY` | *(required)* | API secret key |
//! | `SSL_WARNING_DAYS` | `5` | Alert threshold in days |
//! | `CDN_BOT_TOKEN` | *(unset = alerts skipped)* | Telegram bot token |
//! | `CDN_CHAT_ID` | *(unset = alerts skipped)* | Telegram chat id |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

mod pipeline;
mod report;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use cdnwatch_core::MonitorConfig;
use cdnwatch_inventory::InventoryClient;
use cdnwatch_notify::TelegramNotifier;
use cdnwatch_tls::CertProbe;

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = MonitorConfig::from_env();
    init_tracing(&config.log_level)?;

    info!(
        api_host = %config.api_host,
        threshold_days = config.warning_days,
        "starting certificate expiry check",
    );

    if !config.telegram.is_configured() {
        warn!("bot token or chat id unset, alerts will be skipped");
    }

    let notifier =
        TelegramNotifier::from_config(&config.telegram).context("failed to build notifier")?;
    let inventory = InventoryClient::from_config(&config)
        .context("CDN_ACCESS_KEY and CDN_SECRET_KEY are required")?;
    let probe = CertProbe::new(config.probe_timeout);

    let report = pipeline::run(&inventory, &probe, &notifier, config.warning_days).await?;

    info!(
        domains = report.checks().len(),
        alerts = report.alert_lines().len(),
        "certificate expiry check complete",
    );

    Ok(())
}
