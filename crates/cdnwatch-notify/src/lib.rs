//! Telegram bot notifications.
//!
//! Text alerts go to `sendMessage` as JSON; image alerts go to `sendPhoto`
//! as a multipart form. Both are fire-and-forget from the caller's
//! perspective: the result is a [`NotifyStatus`] that callers log, never
//! retry.
//!
//! A notifier built from an unconfigured [`TelegramConfig`] is valid and
//! returns [`NotifyStatus::Skipped`] from every send, so "credentials
//! absent" is observable instead of a silent no-op.

mod error;
mod telegram;

pub use error::NotifyError;
pub use telegram::{NotifyStatus, TelegramNotifier};
