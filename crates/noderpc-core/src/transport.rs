//! The `NodeTransport` trait — the seam between the typed client and the wire.

use async_trait::async_trait;
use futures::stream::BoxStream;
use serde_json::Value;

use crate::error::TransportError;
use crate::request::RpcRequest;

/// A cancellable server-push stream of raw wire items.
///
/// Items arrive in the order the transport received them; no buffering or
/// reordering happens here. Calling [`RawStream::cancel`] asks the transport
/// to terminate the stream; the transport acknowledges by emitting a final
/// cancellation status (see [`TransportError::is_cancelled`]) before closing.
pub struct RawStream {
    items: BoxStream<'static, Result<Value, TransportError>>,
    canceller: Box<dyn Fn() + Send + Sync>,
}

impl RawStream {
    pub fn new(
        items: BoxStream<'static, Result<Value, TransportError>>,
        canceller: Box<dyn Fn() + Send + Sync>,
    ) -> Self {
        Self { items, canceller }
    }

    /// Request termination of the underlying stream. Returns immediately;
    /// the effect shows up asynchronously as the cancellation status.
    pub fn cancel(&self) {
        (self.canceller)();
    }

    /// Split into the item stream and the cancel handle.
    pub fn into_parts(
        self,
    ) -> (
        BoxStream<'static, Result<Value, TransportError>>,
        Box<dyn Fn() + Send + Sync>,
    ) {
        (self.items, self.canceller)
    }
}

impl std::fmt::Debug for RawStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawStream").finish_non_exhaustive()
    }
}

/// The central async trait every transport must implement.
///
/// # Thread safety
/// Implementations must be `Send + Sync` for use across Tokio tasks.
///
/// # Object safety
/// The trait is object-safe and is held by the client as
/// `Arc<dyn NodeTransport>`.
#[async_trait]
pub trait NodeTransport: Send + Sync + 'static {
    /// Invoke a unary procedure and return the raw response payload.
    ///
    /// Any transport-level failure (connection, deadline, server status) is
    /// surfaced unchanged; this layer never retries.
    async fn unary(&self, req: RpcRequest) -> Result<Value, TransportError>;

    /// Open a server-push stream for a streaming procedure.
    fn open_stream(&self, req: RpcRequest) -> Result<RawStream, TransportError>;

    /// The transport's target identifier (endpoint URL or name).
    fn target(&self) -> &str;
}
