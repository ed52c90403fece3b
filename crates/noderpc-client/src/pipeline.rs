//! The unary request pipeline: marshal → invoke → unmarshal.
//!
//! Every simple unary operation is this one composition with different
//! marshal/unmarshal stages. Stages run strictly in order; a failure at any
//! stage aborts the remaining stages and propagates untouched. No stage
//! swallows or retries on behalf of another.

use std::future::Future;

use serde::de::DeserializeOwned;
use serde_json::Value;

use noderpc_core::{RpcRequest, TransportError};

use crate::error::ClientError;

/// Run one unary call.
///
/// - `marshal` builds the wire request; it may validate the input and fail
///   with a validation error before any network access occurs.
/// - `invoke` delegates to the transport; transport failures surface
///   unchanged.
/// - `unmarshal` converts the raw reply into the domain value; it may fail
///   (malformed payload) and may carry side effects such as populating the
///   chain identity cache.
pub(crate) async fn run_unary<I, T, M, V, Fut, U>(
    input: I,
    marshal: M,
    invoke: V,
    unmarshal: U,
) -> Result<T, ClientError>
where
    M: FnOnce(I) -> Result<RpcRequest, ClientError>,
    V: FnOnce(RpcRequest) -> Fut,
    Fut: Future<Output = Result<Value, TransportError>>,
    U: FnOnce(Value) -> Result<T, ClientError>,
{
    let req = marshal(input)?;
    let method = req.method;
    tracing::debug!(%method, "invoking unary procedure");
    let reply = invoke(req).await.map_err(|e| {
        tracing::debug!(%method, error = %e, "unary procedure failed");
        ClientError::Transport(e)
    })?;
    unmarshal(reply)
}

/// Deserialize a raw reply into a wire mirror type.
pub(crate) fn decode_reply<T: DeserializeOwned>(value: Value) -> Result<T, ClientError> {
    serde_json::from_value(value).map_err(|e| ClientError::decoding(e.to_string()))
}
