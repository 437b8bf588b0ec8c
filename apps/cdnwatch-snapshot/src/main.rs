//! cdnwatch-snapshot - scheduled store-page screenshot job.
//!
//! Drives a WebDriver-controlled browser to each configured store page,
//! screenshots a fixed page component, crops it to the banner region, writes
//! the result to disk, and posts it to a Telegram chat. Failures on one page
//! are reported individually and never stop the remaining pages.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `WEBDRIVER_URL` | `http://localhost:4444` | WebDriver endpoint |
//! | `SNAPSHOT_OUTPUT_DIR` | `./output_pics` | Directory for cropped PNGs |
//! | `TELEGRAM_BOT_TOKEN` | *(unset = delivery skipped)* | Telegram bot token |
//! | `TELEGRAM_CHAT_ID` | *(unset = delivery skipped)* | Telegram chat id |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

mod capture;
mod crop;

use std::path::Path;

use anyhow::{Context, Result};
use fantoccini::{Client, ClientBuilder};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use cdnwatch_core::SnapshotConfig;
use cdnwatch_notify::{NotifyStatus, TelegramNotifier};

use crate::capture::{SnapshotError, app_id_from_url, capture_component};
use crate::crop::crop_png;

/// Store pages to snapshot each run.
const TARGET_URLS: &[&str] = &[
    "https://play.google.com/store/apps/details?id=shop.kubon",
    "https://play.google.com/store/apps/details?id=io.gonative.android.pmrzyx",
];

/// 1-based index of the page component to capture.
const COMPONENT_INDEX: usize = 6;

/// Crop box applied to every capture, anchored top-left.
const CROP_WIDTH: u32 = 1280;
const CROP_HEIGHT: u32 = 355;

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

/// Snapshot one URL: capture, crop, persist, deliver.
async fn snapshot_url(
    client: &mut Client,
    notifier: &TelegramNotifier,
    url: &str,
    config: &SnapshotConfig,
) -> Result<(), SnapshotError> {
    let app_id = app_id_from_url(url);
    info!(url, app_id, "capturing store page");

    let raw = capture_component(client, url, COMPONENT_INDEX, config).await?;
    let cropped = crop_png(&raw, CROP_WIDTH, CROP_HEIGHT)?;

    let file_name = format!("{app_id}.png");
    let path = Path::new(&config.output_dir).join(&file_name);
    std::fs::write(&path, &cropped)?;
    info!(path = %path.display(), bytes = cropped.len(), "cropped screenshot written");

    let caption = format!("📱 Store banner for `{app_id}`");
    log_send(
        &app_id,
        notifier.send_photo(cropped, &file_name, Some(&caption)).await,
    );

    Ok(())
}

/// Log the outcome of a fire-and-forget send.
fn log_send(app_id: &str, status: NotifyStatus) {
    match status {
        NotifyStatus::Sent => info!(app_id, "screenshot delivered"),
        NotifyStatus::Skipped => warn!(app_id, "delivery skipped, bot target unconfigured"),
        NotifyStatus::Failed(e) => error!(app_id, error = %e, "screenshot delivery failed"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = SnapshotConfig::from_env();
    init_tracing(&config.log_level)?;

    info!(
        webdriver = %config.webdriver_url,
        output_dir = %config.output_dir,
        urls = TARGET_URLS.len(),
        "starting snapshot run",
    );

    if !config.telegram.is_configured() {
        warn!("bot token or chat id unset, delivery will be skipped");
    }

    std::fs::create_dir_all(&config.output_dir)
        .with_context(|| format!("failed to create output directory {}", config.output_dir))?;

    let notifier =
        TelegramNotifier::from_config(&config.telegram).context("failed to build notifier")?;

    let mut client = ClientBuilder::native()
        .connect(&config.webdriver_url)
        .await
        .with_context(|| format!("failed to connect to WebDriver at {}", config.webdriver_url))?;
    client
        .set_window_size(config.viewport_width, config.viewport_height)
        .await
        .context("failed to set browser window size")?;

    let mut failures = 0usize;
    for url in TARGET_URLS {
        if let Err(e) = snapshot_url(&mut client, &notifier, url, &config).await {
            failures += 1;
            let app_id = app_id_from_url(url);
            error!(url, error = %e, "snapshot failed");
            let alert = format!("❌ *Store snapshot failed* for `{app_id}`:\n{e}");
            log_send(&app_id, notifier.send_text(&alert).await);
        }
    }

    client.close().await.context("failed to close browser session")?;

    info!(
        captured = TARGET_URLS.len() - failures,
        failures,
        "snapshot run complete",
    );

    if failures == TARGET_URLS.len() {
        anyhow::bail!("every snapshot failed");
    }
    Ok(())
}
