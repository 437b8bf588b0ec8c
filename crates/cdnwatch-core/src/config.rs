//! Configuration for the cdnwatch binaries.
//!
//! All configuration is driven by environment variables, read once at
//! startup. Missing credentials leave the corresponding `Option` fields
//! unset; each consumer decides whether that is a hard error (the inventory
//! client) or a typed "skipped" status (the notifier).

use std::time::Duration;

/// Default management API host.
pub const DEFAULT_API_HOST: &str = "api.cdnetworks.com";

/// Default request URI for the domain inventory.
pub const DEFAULT_INVENTORY_URI: &str = "/api/domain";

/// Telegram bot target, shared by both binaries.
///
/// Either field may be absent; an unconfigured target turns every send into
/// a `Skipped` status rather than an error.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    /// Bot API token.
    pub bot_token: Option<String>,
    /// Destination chat id.
    pub chat_id: Option<String>,
    /// Per-call HTTP timeout.
    pub timeout: Duration,
}

impl TelegramConfig {
    /// Documented timeout for bot API calls.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Load the bot target from the named environment variables.
    ///
    /// The two binaries historically use different variable names for the
    /// same bot, so the names are parameters rather than constants.
    #[must_use]
    pub fn from_env(bot_token_var: &str, chat_id_var: &str) -> Self {
        Self {
            bot_token: std::env::var(bot_token_var).ok(),
            chat_id: std::env::var(chat_id_var).ok(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Whether both the token and the chat id are present.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.bot_token.is_some() && self.chat_id.is_some()
    }
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            chat_id: None,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }
}

/// Configuration for the certificate-expiry monitor.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Management API host.
    pub api_host: String,
    /// Request URI for the domain inventory.
    pub inventory_uri: String,
    /// API access key.
    pub access_key: Option<String>,
    /// API secret key.
    pub secret_key: Option<String>,
    /// Alert when a certificate has this many days or fewer remaining.
    pub warning_days: i64,
    /// Timeout for management API calls.
    pub api_timeout: Duration,
    /// Timeout for each phase of the TLS probe (connect, handshake).
    pub probe_timeout: Duration,
    /// Log level.
    pub log_level: String,
    /// Alert destination.
    pub telegram: TelegramConfig,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            api_host: DEFAULT_API_HOST.to_owned(),
            inventory_uri: DEFAULT_INVENTORY_URI.to_owned(),
            access_key: None,
            secret_key: None,
            warning_days: 5,
            api_timeout: Duration::from_secs(15),
            probe_timeout: Duration::from_secs(10),
            log_level: "info".to_owned(),
            telegram: TelegramConfig::default(),
        }
    }
}

impl MonitorConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(v) = std::env::var("CDN_API_HOST") {
            config.api_host = v;
        }
        if let Ok(v) = std::env::var("CDN_ACCESS_KEY") {
            config.access_key = Some(v);
        }
        if let Ok(v) = std::env::var("CDN_SECRET_KEY") {
            config.secret_key = Some(v);
        }
        if let Ok(v) = std::env::var("SSL_WARNING_DAYS") {
            if let Ok(days) = v.parse() {
                config.warning_days = days;
            }
        }
        if let Ok(v) = std::env::var("LOG_LEVEL") {
            config.log_level = v;
        }
        config.telegram = TelegramConfig::from_env("CDN_BOT_TOKEN", "CDN_CHAT_ID");

        config
    }
}

/// Configuration for the store-page snapshot job.
#[derive(Debug, Clone)]
pub struct SnapshotConfig {
    /// WebDriver endpoint the browser session is established against.
    pub webdriver_url: String,
    /// Directory cropped screenshots are written to.
    pub output_dir: String,
    /// Browser viewport width.
    pub viewport_width: u32,
    /// Browser viewport height.
    pub viewport_height: u32,
    /// How long to wait for the page to render its components.
    pub page_load_timeout: Duration,
    /// How long to wait for the target component to become visible.
    pub element_wait: Duration,
    /// Log level.
    pub log_level: String,
    /// Alert and image destination.
    pub telegram: TelegramConfig,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            webdriver_url: "http://localhost:4444".to_owned(),
            output_dir: "./output_pics".to_owned(),
            viewport_width: 1280,
            viewport_height: 900,
            page_load_timeout: Duration::from_secs(30),
            element_wait: Duration::from_secs(5),
            log_level: "info".to_owned(),
            telegram: TelegramConfig::default(),
        }
    }
}

impl SnapshotConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(v) = std::env::var("WEBDRIVER_URL") {
            config.webdriver_url = v;
        }
        if let Ok(v) = std::env::var("SNAPSHOT_OUTPUT_DIR") {
            config.output_dir = v;
        }
        if let Ok(v) = std::env::var("LOG_LEVEL") {
            config.log_level = v;
        }
        config.telegram = TelegramConfig::from_env("TELEGRAM_BOT_TOKEN", "TELEGRAM_CHAT_ID");

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_create_default_monitor_config() {
        let config = MonitorConfig::default();
        assert_eq!(config.api_host, "api.cdnetworks.com");
        assert_eq!(config.inventory_uri, "/api/domain");
        assert_eq!(config.warning_days, 5);
        assert_eq!(config.api_timeout, Duration::from_secs(15));
        assert_eq!(config.probe_timeout, Duration::from_secs(10));
        assert!(config.access_key.is_none());
    }

    #[test]
    fn test_should_create_default_snapshot_config() {
        let config = SnapshotConfig::default();
        assert_eq!(config.viewport_width, 1280);
        assert_eq!(config.viewport_height, 900);
        assert_eq!(config.page_load_timeout, Duration::from_secs(30));
        assert_eq!(config.element_wait, Duration::from_secs(5));
    }

    #[test]
    fn test_should_report_unconfigured_telegram_target() {
        let config = TelegramConfig::default();
        assert!(!config.is_configured());

        let config = TelegramConfig {
            bot_token: Some("token".to_owned()),
            chat_id: Some("42".to_owned()),
            ..TelegramConfig::default()
        };
        assert!(config.is_configured());
    }
}
