//! Notifier error types.

/// Errors that can occur while posting to the bot API.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// The HTTP call failed (connect, timeout, or non-success status).
    #[error("bot API request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The bot API answered `ok: false`.
    #[error("bot API rejected the call: {0}")]
    Api(String),
}
