//! noderpc-core — transport contract and wire types for noderpc.
//!
//! # Overview
//!
//! noderpc is a typed client for a blockchain node's fixed RPC surface.
//! The core crate defines the boundary between the typed client and
//! whatever carries bytes to the node:
//!
//! - [`NodeTransport`] — the central async trait every transport implements
//! - [`RpcRequest`] / [`RpcMethod`] — the request envelope
//! - [`RawStream`] — a cancellable server-push stream of wire items
//! - [`TransportError`] — structured transport error type
//! - [`wire`] module — serde mirror of the node's externally-defined messages
//!
//! Transport construction (channels, TLS, reconnect policy) lives outside
//! this workspace; the client only needs something that satisfies
//! [`NodeTransport`].

pub mod error;
pub mod request;
pub mod transport;
pub mod wire;

pub use error::{TransportError, STATUS_CANCELLED};
pub use request::{RpcMethod, RpcRequest};
pub use transport::{NodeTransport, RawStream};
