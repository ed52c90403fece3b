//! Transport-level error types.

use thiserror::Error;

/// Status code the transport reports when a stream or call was cancelled
/// by the caller. Matches the node channel's CANCELLED status.
pub const STATUS_CANCELLED: i32 = 1;

/// Errors that can occur during a transport operation.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection-level failure (refused, reset, DNS, TLS).
    #[error("connection error: {0}")]
    Connection(String),

    /// Request timed out after the caller-supplied duration.
    #[error("request timed out after {ms}ms")]
    Timeout { ms: u64 },

    /// Status reported by the node or the channel (deadline exceeded,
    /// cancelled, unavailable, ...).
    #[error("status {code}: {message}")]
    Status { code: i32, message: String },

    /// Wire payload could not be deserialized.
    #[error("deserialization error: {0}")]
    Deserialization(#[from] serde_json::Error),

    /// The transport's background task is gone and can no longer serve calls.
    #[error("transport channel closed")]
    ChannelClosed,
}

impl TransportError {
    /// Returns `true` if this is the cancellation status a transport emits
    /// after the caller tore down a stream. Subscriptions swallow it.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Status { code, .. } if *code == STATUS_CANCELLED)
    }

    /// Shorthand for a cancellation status.
    pub fn cancelled() -> Self {
        Self::Status {
            code: STATUS_CANCELLED,
            message: "cancelled".into(),
        }
    }
}
