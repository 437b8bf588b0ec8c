//! Configuration and shared error types for cdnwatch.
//!
//! Both binaries read their tunables from the process environment exactly
//! once at startup, into explicit config structs that are passed by reference
//! into whichever component needs them. Nothing in the workspace reads the
//! environment after startup.

mod config;
mod error;

pub use config::{
    DEFAULT_API_HOST, DEFAULT_INVENTORY_URI, MonitorConfig, SnapshotConfig, TelegramConfig,
};
pub use error::{CdnWatchError, CdnWatchResult};
