//! Bridge-specific error types.

use std::io;
use thiserror::Error;

/// Result type for bridge operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur while talking to the cube bridge.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Failed to spawn the bridge process.
    #[error("failed to spawn cube bridge: {0}")]
    SpawnFailed(#[source] io::Error),

    /// Failed to write to bridge stdin.
    #[error("failed to write to cube bridge: {0}")]
    WriteFailed(#[source] io::Error),

    /// Failed to serialize a request to JSON.
    #[error("failed to serialize request: {0}")]
    SerializeFailed(#[source] serde_json::Error),

    /// Failed to deserialize a response from JSON.
    #[error("failed to deserialize response: {0}")]
    DeserializeFailed(#[source] serde_json::Error),

    /// Request timed out waiting for a response.
    #[error("request timed out after {0} seconds")]
    Timeout(u64),

    /// Bridge process exited unexpectedly.
    #[error("cube bridge exited unexpectedly")]
    BridgeExited,

    /// Response channel was closed (internal error).
    #[error("response channel closed unexpectedly")]
    ChannelClosed,

    /// Bridge returned an unclassified error response.
    #[error("cube engine error: {message} (code: {code})")]
    Remote {
        /// Error code from the bridge.
        code: String,
        /// Human-readable error message.
        message: String,
    },

    /// Could not connect to the cube server.
    #[error("cube connection failed: {0}")]
    ConnectionFailed(String),

    /// The configured catalog does not exist on the server.
    #[error("catalog not found: {0}")]
    CatalogNotFound(String),

    /// The engine rejected or failed to run the query.
    #[error("query execution failed: {0}")]
    QueryFailed(String),

    /// The bridge rejected the request envelope.
    #[error("invalid bridge request: {0}")]
    InvalidRequest(String),
}

impl EngineError {
    /// Create a remote error from an error response.
    pub fn remote(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Remote {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Check if this error indicates the bridge has exited.
    pub fn is_bridge_exited(&self) -> bool {
        matches!(self, Self::BridgeExited | Self::ChannelClosed)
    }
}

impl From<io::Error> for EngineError {
    fn from(err: io::Error) -> Self {
        Self::WriteFailed(err)
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        Self::DeserializeFailed(err)
    }
}

impl From<tokio::sync::oneshot::error::RecvError> for EngineError {
    fn from(_: tokio::sync::oneshot::error::RecvError) -> Self {
        Self::ChannelClosed
    }
}
