//! The request envelope handed to transports.

use std::time::Duration;

use serde_json::Value;

/// The node's fixed RPC surface.
///
/// The set of procedures is defined externally by the node; this enum only
/// names them so requests stay typo-proof on the client side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RpcMethod {
    Blockchain,
    GetChainInfo,
    NodeState,
    GetBlock,
    ListBlockHeaders,
    GetBlockTx,
    GetTx,
    GetState,
    GetStaking,
    GetVotes,
    GetReceipt,
    GetAbi,
    QueryContract,
    QueryContractState,
    ListEvents,
    GetPeers,
    GetNameInfo,
    GetConsensusInfo,
    GetServerInfo,
    CommitTx,
    ListBlockStream,
    ListBlockMetadataStream,
    ListEventStream,
}

impl RpcMethod {
    /// Wire-level procedure name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blockchain => "Blockchain",
            Self::GetChainInfo => "GetChainInfo",
            Self::NodeState => "NodeState",
            Self::GetBlock => "GetBlock",
            Self::ListBlockHeaders => "ListBlockHeaders",
            Self::GetBlockTx => "GetBlockTX",
            Self::GetTx => "GetTX",
            Self::GetState => "GetState",
            Self::GetStaking => "GetStaking",
            Self::GetVotes => "GetVotes",
            Self::GetReceipt => "GetReceipt",
            Self::GetAbi => "GetABI",
            Self::QueryContract => "QueryContract",
            Self::QueryContractState => "QueryContractState",
            Self::ListEvents => "ListEvents",
            Self::GetPeers => "GetPeers",
            Self::GetNameInfo => "GetNameInfo",
            Self::GetConsensusInfo => "GetConsensusInfo",
            Self::GetServerInfo => "GetServerInfo",
            Self::CommitTx => "CommitTX",
            Self::ListBlockStream => "ListBlockStream",
            Self::ListBlockMetadataStream => "ListBlockMetadataStream",
            Self::ListEventStream => "ListEventStream",
        }
    }

    /// Returns `true` for procedures that yield a server-push stream.
    pub fn is_streaming(&self) -> bool {
        matches!(
            self,
            Self::ListBlockStream | Self::ListBlockMetadataStream | Self::ListEventStream
        )
    }
}

impl std::fmt::Display for RpcMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single request to the node.
///
/// `params` is the serialized wire message for the procedure. `timeout` is
/// caller-supplied and passed through to the transport unchanged; this layer
/// imposes none of its own.
#[derive(Debug, Clone)]
pub struct RpcRequest {
    pub method: RpcMethod,
    pub params: Value,
    pub timeout: Option<Duration>,
}

impl RpcRequest {
    pub fn new(method: RpcMethod, params: Value) -> Self {
        Self {
            method,
            params,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn streaming_methods() {
        assert!(RpcMethod::ListBlockStream.is_streaming());
        assert!(RpcMethod::ListEventStream.is_streaming());
        assert!(!RpcMethod::GetBlock.is_streaming());
    }

    #[test]
    fn wire_names() {
        assert_eq!(RpcMethod::GetBlockTx.as_str(), "GetBlockTX");
        assert_eq!(RpcMethod::CommitTx.to_string(), "CommitTX");
    }
}
