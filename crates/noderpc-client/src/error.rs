//! Client-level error taxonomy.
//!
//! Every failure is either surfaced directly to the caller or, in the single
//! case of stream cancellation, deliberately suppressed at the subscription
//! boundary. No component recovers from another's failure and nothing is
//! retried internally.

use thiserror::Error;

use noderpc_core::TransportError;

/// Node-assigned commit error codes for submitted transactions.
pub const COMMIT_OK: i32 = 0;

/// Human-readable text for a node commit error code.
pub fn commit_status_message(code: i32) -> &'static str {
    match code {
        0 => "ok",
        1 => "nonce is too low",
        2 => "tx already exists",
        3 => "invalid argument",
        4 => "tx is too big",
        5 => "internal error",
        _ => "unknown commit error",
    }
}

/// A node-reported business rejection of a submitted transaction, or a
/// transport failure during submission. Both collapse into this one type so
/// callers have a single channel for "my transaction didn't go through".
#[derive(Debug, Error)]
#[error("transaction rejected ({}): {detail}", commit_status_message(*.code))]
pub struct TransactionError {
    /// Node-defined numeric code; `-1` for transport-level failures.
    pub code: i32,
    /// Free-text detail supplied by the node or the transport.
    pub detail: String,
}

impl TransactionError {
    pub fn new(code: i32, detail: impl Into<String>) -> Self {
        Self {
            code,
            detail: detail.into(),
        }
    }

    /// Wrap a transport failure into the submission error channel.
    pub fn from_transport(err: TransportError) -> Self {
        Self {
            code: -1,
            detail: err.to_string(),
        }
    }
}

/// Errors surfaced by client operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Malformed caller input, detected before any network access.
    #[error("validation error: {0}")]
    Validation(String),

    /// Transport-level failure, surfaced unchanged.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Malformed or unexpected response shape.
    #[error("decoding error: {0}")]
    Decoding(String),

    /// Queried entity proven absent by the node. A normal outcome, not a
    /// system fault.
    #[error("variable {key} does not exist in state at address {address}")]
    NotFound { key: String, address: String },

    /// Transaction submission failed (business rejection or transport).
    #[error(transparent)]
    Transaction(#[from] TransactionError),
}

impl ClientError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn decoding(msg: impl Into<String>) -> Self {
        Self::Decoding(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transaction_error_message_combines_lookup_and_detail() {
        let err = TransactionError::new(1, "expected nonce 5, got 3");
        let msg = err.to_string();
        assert!(msg.contains("nonce is too low"));
        assert!(msg.contains("expected nonce 5, got 3"));
    }

    #[test]
    fn unknown_code_still_renders() {
        let err = TransactionError::new(99, "");
        assert!(err.to_string().contains("unknown commit error"));
    }

    #[test]
    fn transport_errors_share_the_transaction_channel() {
        let err = TransactionError::from_transport(TransportError::Connection("refused".into()));
        assert_eq!(err.code, -1);
        assert!(err.detail.contains("refused"));
    }
}
