use thiserror::Error;
use tracing::error;

/// Error types for the client engine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    /// The request never produced a response (offline, CORS, aborted)
    #[error("Network error: {0}")]
    Network(String),

    /// A request did not finish within its time limit
    #[error("Timed out after {0} ms")]
    Timeout(u64),

    /// The backend answered with a non-success status
    #[error("HTTP error: {0}")]
    Http(u16),

    /// The response or a stored value could not be parsed
    #[error("Decode error: {0}")]
    Decode(String),

    /// Browser storage rejected a read or write
    #[error("Storage error: {0}")]
    Storage(String),

    /// No valid session for the current tab
    #[error("Not authenticated")]
    NotAuthenticated,

    /// The API base handle can no longer be published to
    #[error("API base unavailable")]
    BaseUnavailable,
}

impl From<serde_json::Error> for ClientError {
    fn from(error: serde_json::Error) -> Self {
        let err = ClientError::Decode(error.to_string());
        error!(?err, "JSON decode failed");
        err
    }
}

/// Type alias for Result with ClientError
pub type Result<T> = std::result::Result<T, ClientError>;
