//! Error types for inventory retrieval.

/// Errors that can occur while fetching or parsing the domain inventory.
#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    /// The API access key or secret key is not configured.
    #[error("management API credentials are not configured")]
    MissingCredentials,

    /// The HTTP request failed (connect, timeout, or non-success status).
    #[error("inventory request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The response body is neither parsable JSON nor parsable XML.
    #[error("inventory response is neither parsable JSON nor XML")]
    UnparsableResponse,
}
