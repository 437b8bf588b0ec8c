//! Domain inventory retrieval from the CDN management API.
//!
//! The management API is queried with a single signed GET request. The
//! response body is either JSON or XML — the two formats are tried in
//! sequence, JSON first — and every `domain-name` field found is collected
//! into a deduplicated, ordered set.
//!
//! # Modules
//!
//! - [`client`] - The signed HTTP client
//! - [`parse`] - JSON/XML response parsing
//! - [`error`] - Inventory error type

pub mod client;
pub mod error;
pub mod parse;

pub use client::InventoryClient;
pub use error::InventoryError;
pub use parse::parse_domains;
