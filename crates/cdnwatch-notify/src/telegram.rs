//! The Telegram bot client.

use reqwest::multipart;
use serde::{Deserialize, Serialize};
use tracing::debug;

use cdnwatch_core::TelegramConfig;

use crate::error::NotifyError;

/// Base URL of the bot API. Overridable for tests.
const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// Outcome of a single send.
///
/// `Skipped` means the bot token or chat id was never configured; the call
/// was not attempted. Callers can therefore distinguish "sent", "skipped
/// (unconfigured)", and "failed" without inspecting the config themselves.
#[derive(Debug)]
pub enum NotifyStatus {
    /// The bot API accepted the message.
    Sent,
    /// No bot token or chat id is configured; nothing was attempted.
    Skipped,
    /// The call was attempted and failed.
    Failed(NotifyError),
}

impl NotifyStatus {
    /// Whether the message reached the bot API.
    #[must_use]
    pub fn is_sent(&self) -> bool {
        matches!(self, Self::Sent)
    }

    /// Whether the send was skipped because the target is unconfigured.
    #[must_use]
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped)
    }
}

/// Configured bot token + chat id pair.
#[derive(Debug, Clone)]
struct Target {
    bot_token: String,
    chat_id: String,
}

/// `sendMessage` request payload.
#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
}

/// The `{ok, description}` envelope every bot API response carries.
#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    description: Option<String>,
}

/// Telegram bot notifier.
#[derive(Debug, Clone)]
pub struct TelegramNotifier {
    http: reqwest::Client,
    api_base: String,
    target: Option<Target>,
}

impl TelegramNotifier {
    /// Build a notifier from the bot configuration.
    ///
    /// An unconfigured target (missing token or chat id) still yields a
    /// working notifier whose sends report [`NotifyStatus::Skipped`].
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Request`] if the HTTP client cannot be built.
    pub fn from_config(config: &TelegramConfig) -> Result<Self, NotifyError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        let target = match (&config.bot_token, &config.chat_id) {
            (Some(bot_token), Some(chat_id)) => Some(Target {
                bot_token: bot_token.clone(),
                chat_id: chat_id.clone(),
            }),
            _ => None,
        };

        Ok(Self {
            http,
            api_base: DEFAULT_API_BASE.to_owned(),
            target,
        })
    }

    /// Point the notifier at a different API base URL.
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Send a Markdown-formatted text alert.
    pub async fn send_text(&self, text: &str) -> NotifyStatus {
        let Some(target) = &self.target else {
            debug!("bot target unconfigured, skipping text alert");
            return NotifyStatus::Skipped;
        };

        match self.post_message(target, text).await {
            Ok(()) => NotifyStatus::Sent,
            Err(e) => NotifyStatus::Failed(e),
        }
    }

    /// Send a PNG photo with an optional caption.
    pub async fn send_photo(
        &self,
        png: Vec<u8>,
        file_name: &str,
        caption: Option<&str>,
    ) -> NotifyStatus {
        let Some(target) = &self.target else {
            debug!("bot target unconfigured, skipping photo");
            return NotifyStatus::Skipped;
        };

        match self.post_photo(target, png, file_name, caption).await {
            Ok(()) => NotifyStatus::Sent,
            Err(e) => NotifyStatus::Failed(e),
        }
    }

    async fn post_message(&self, target: &Target, text: &str) -> Result<(), NotifyError> {
        let url = self.method_url(target, "sendMessage");
        let payload = SendMessage {
            chat_id: &target.chat_id,
            text,
            parse_mode: "Markdown",
        };

        let response = self
            .http
            .post(&url)
            .json(&payload)
            .send()
            .await?
            .error_for_status()?;

        check_envelope(response.json().await?)
    }

    async fn post_photo(
        &self,
        target: &Target,
        png: Vec<u8>,
        file_name: &str,
        caption: Option<&str>,
    ) -> Result<(), NotifyError> {
        let url = self.method_url(target, "sendPhoto");

        let photo = multipart::Part::bytes(png)
            .file_name(file_name.to_owned())
            .mime_str("image/png")?;

        let mut form = multipart::Form::new()
            .text("chat_id", target.chat_id.clone())
            .part("photo", photo);
        if let Some(caption) = caption {
            form = form.text("caption", caption.to_owned());
        }

        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await?
            .error_for_status()?;

        check_envelope(response.json().await?)
    }

    fn method_url(&self, target: &Target, method: &str) -> String {
        format!("{}/bot{}/{method}", self.api_base, target.bot_token)
    }
}

/// Turn an `ok: false` envelope into a typed error.
fn check_envelope(response: ApiResponse) -> Result<(), NotifyError> {
    if response.ok {
        Ok(())
    } else {
        Err(NotifyError::Api(
            response
                .description
                .unwrap_or_else(|| "unknown error".to_owned()),
        ))
    }
}
