use thiserror::Error;

use super::Collection;

/// Errors from a single call to the remote store.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("Remote store not configured. Add remote.url and remote.api_key to config.")]
    NotConfigured,

    /// The request never produced a response.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The store answered with a non-2xx status.
    #[error("Remote store returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to encode row: {0}")]
    Encode(String),

    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("Created {0} row has no generated id")]
    MissingId(Collection),
}

/// PostgREST error code for a unique key violation.
const UNIQUE_VIOLATION: &str = "23505";

impl RemoteError {
    /// The store refused the row because its key already exists. Any other
    /// status (validation, auth) is a plain write failure.
    pub fn is_conflict(&self) -> bool {
        match self {
            RemoteError::Status { status, body } => {
                *status == 409 || body.contains(UNIQUE_VIOLATION)
            }
            _ => false,
        }
    }
}
