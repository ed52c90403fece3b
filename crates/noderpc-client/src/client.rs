//! The typed node client.
//!
//! Every simple unary operation goes through the request pipeline with its
//! own marshal/unmarshal stages; streaming operations go through
//! [`Subscription`] directly. Two operations deviate from the generic
//! pipeline: transaction lookup (two-step fallback) and contract state
//! queries (response-shape branching).

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use noderpc_core::{wire, NodeTransport, RpcMethod, RpcRequest};

use crate::address::Address;
use crate::chainid::{ChainIdCache, ChainIdHash};
use crate::error::{ClientError, TransactionError};
use crate::filter::FilterQuery;
use crate::models::{
    decode_hash, encode_hash, Abi, AccountState, Block, BlockMetadata, BlockPosition,
    BlockchainStatus, ChainInfo, ConsensusInfo, ContractCall, ContractStateQuery, Event, NameInfo,
    Peer, Receipt, ServerInfo, StakingInfo, StateQueryResult, TxInfo, TxLookup, VoteInfo,
};
use crate::pipeline::{decode_reply, run_unary};
use crate::stream::Subscription;
use crate::submit::{singleton_batch, unmarshal_commit, SignedTransaction};

/// Client configuration.
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    /// Default per-call timeout, handed to the transport unchanged. `None`
    /// leaves deadlines entirely to the transport.
    pub request_timeout: Option<Duration>,
}

/// Reference to a block: by hash (canonical textual form) or by height.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockRef {
    Hash(String),
    Height(u64),
}

impl From<u64> for BlockRef {
    fn from(height: u64) -> Self {
        Self::Height(height)
    }
}

impl From<&str> for BlockRef {
    fn from(hash: &str) -> Self {
        Self::Hash(hash.to_string())
    }
}

impl BlockRef {
    /// The node accepts a 32-byte hash or an 8-byte little-endian height
    /// through the same bytes field.
    fn to_bytes(&self) -> Result<Vec<u8>, ClientError> {
        match self {
            Self::Hash(text) => decode_hash(text),
            Self::Height(height) => Ok(height.to_le_bytes().to_vec()),
        }
    }
}

/// Typed client for a blockchain node.
///
/// Holds the transport behind `Arc<dyn NodeTransport>` and an instance-scoped
/// chain identity cache; replacing the transport invalidates the cache so a
/// stale identity can never end up in a transaction meant for another
/// network.
pub struct NodeClient {
    transport: Arc<dyn NodeTransport>,
    chain_id: ChainIdCache,
    config: ClientConfig,
}

impl NodeClient {
    pub fn new(transport: Arc<dyn NodeTransport>) -> Self {
        Self::with_config(transport, ClientConfig::default())
    }

    pub fn with_config(transport: Arc<dyn NodeTransport>, config: ClientConfig) -> Self {
        Self {
            transport,
            chain_id: ChainIdCache::new(),
            config,
        }
    }

    /// The transport's target identifier.
    pub fn target(&self) -> &str {
        self.transport.target()
    }

    /// Replace the transport. Invalidates the chain identity cache so the
    /// next identity read re-queries the new target.
    pub fn set_transport(&mut self, transport: Arc<dyn NodeTransport>) {
        self.transport = transport;
        self.chain_id.invalidate();
    }

    fn request<P: Serialize>(&self, method: RpcMethod, params: &P) -> Result<RpcRequest, ClientError> {
        let params = serde_json::to_value(params)
            .map_err(|e| ClientError::validation(format!("unencodable request: {e}")))?;
        Ok(RpcRequest::new(method, params).with_timeout(self.config.request_timeout))
    }

    // ---- chain identity -------------------------------------------------

    /// The chain identity hash, fetched from the node on first use.
    pub async fn get_chain_id_hash(&self) -> Result<ChainIdHash, ClientError> {
        if let Some(hash) = self.chain_id.get() {
            return Ok(hash);
        }
        // The blockchain-status unmarshal populates the cache as a side
        // effect. Concurrent callers may both fetch; the call is idempotent.
        let status = self.blockchain().await?;
        Ok(status.best_chain_id_hash)
    }

    /// Set the chain identity from prior knowledge, skipping the round trip.
    pub fn set_chain_id_hash(&self, hash: ChainIdHash) {
        self.chain_id.set(hash);
    }

    // ---- status and info ------------------------------------------------

    /// Current blockchain status.
    pub async fn blockchain(&self) -> Result<BlockchainStatus, ClientError> {
        run_unary(
            (),
            |_| self.request(RpcMethod::Blockchain, &wire::Empty {}),
            |req| self.transport.unary(req),
            |reply| {
                let status: wire::BlockchainStatus = decode_reply(reply)?;
                let chain_id = ChainIdHash::from_bytes(status.best_chain_id_hash);
                self.chain_id.set_if_unset(chain_id.clone());
                Ok(BlockchainStatus {
                    best_block_hash: encode_hash(&status.best_block_hash),
                    best_height: status.best_height,
                    best_chain_id_hash: chain_id,
                })
            },
        )
        .await
    }

    /// Chain parameters and identity flags.
    pub async fn get_chain_info(&self) -> Result<ChainInfo, ClientError> {
        run_unary(
            (),
            |_| self.request(RpcMethod::GetChainInfo, &wire::Empty {}),
            |req| self.transport.unary(req),
            |reply| ChainInfo::from_wire(decode_reply(reply)?),
        )
        .await
    }

    /// Component state of the node itself. `timeout_secs` is a node-side
    /// option for how long the node may spend gathering component state.
    pub async fn get_node_state(
        &self,
        component: Option<&str>,
        timeout_secs: u64,
    ) -> Result<Value, ClientError> {
        run_unary(
            component,
            |component| {
                let params = wire::NodeReq {
                    timeout: timeout_secs.to_le_bytes().to_vec(),
                    component: component.map(|c| c.as_bytes().to_vec()).unwrap_or_default(),
                };
                self.request(RpcMethod::NodeState, &params)
            },
            |req| self.transport.unary(req),
            |reply| {
                let bytes: wire::SingleBytes = decode_reply(reply)?;
                parse_json_bytes(&bytes.value)
            },
        )
        .await
    }

    pub async fn get_consensus_info(&self) -> Result<ConsensusInfo, ClientError> {
        run_unary(
            (),
            |_| self.request(RpcMethod::GetConsensusInfo, &wire::Empty {}),
            |req| self.transport.unary(req),
            |reply| ConsensusInfo::from_wire(decode_reply(reply)?),
        )
        .await
    }

    /// Server configuration and status, optionally restricted to `keys`.
    pub async fn get_server_info(&self, keys: Option<Vec<String>>) -> Result<ServerInfo, ClientError> {
        run_unary(
            keys,
            |keys| {
                self.request(
                    RpcMethod::GetServerInfo,
                    &wire::KeyParams {
                        key: keys.unwrap_or_default(),
                    },
                )
            },
            |req| self.transport.unary(req),
            |reply| Ok(ServerInfo::from_wire(decode_reply(reply)?)),
        )
        .await
    }

    /// Peers of the connected node.
    pub async fn get_peers(&self, show_self: bool, show_hidden: bool) -> Result<Vec<Peer>, ClientError> {
        run_unary(
            (),
            |_| {
                self.request(
                    RpcMethod::GetPeers,
                    &wire::PeersParams {
                        no_hidden: !show_hidden,
                        show_self,
                    },
                )
            },
            |req| self.transport.unary(req),
            |reply| {
                let list: wire::PeerList = decode_reply(reply)?;
                Ok(list.peers.into_iter().map(Peer::from_wire).collect())
            },
        )
        .await
    }

    // ---- blocks -----------------------------------------------------------

    /// Retrieve a block by hash or height.
    pub async fn get_block(&self, block: impl Into<BlockRef>) -> Result<Block, ClientError> {
        run_unary(
            block.into(),
            |block| {
                let bytes = block.to_bytes()?;
                self.request(RpcMethod::GetBlock, &wire::SingleBytes::new(bytes))
            },
            |req| self.transport.unary(req),
            |reply| Block::from_wire(decode_reply(reply)?),
        )
        .await
    }

    /// List block headers starting from an anchor block.
    pub async fn get_block_headers(
        &self,
        block: impl Into<BlockRef>,
        size: u32,
        offset: u32,
        desc: bool,
    ) -> Result<Vec<Block>, ClientError> {
        run_unary(
            block.into(),
            |block| {
                let params = match block {
                    BlockRef::Hash(text) => wire::ListParams {
                        hash: decode_hash(&text)?,
                        size,
                        offset,
                        asc: !desc,
                        ..Default::default()
                    },
                    BlockRef::Height(height) => wire::ListParams {
                        height,
                        size,
                        offset,
                        asc: !desc,
                        ..Default::default()
                    },
                };
                self.request(RpcMethod::ListBlockHeaders, &params)
            },
            |req| self.transport.unary(req),
            |reply| {
                let list: wire::BlockHeaderList = decode_reply(reply)?;
                list.blocks.into_iter().map(Block::from_wire).collect()
            },
        )
        .await
    }

    /// Live stream of full blocks as they are produced.
    ///
    /// The subscription's dispatch task is spawned on the ambient Tokio
    /// runtime, so this must be called from within one.
    pub fn get_block_stream(&self) -> Result<Subscription<Block>, ClientError> {
        let req = self.request(RpcMethod::ListBlockStream, &wire::Empty {})?;
        let raw = self.transport.open_stream(req)?;
        Ok(Subscription::open(
            raw,
            Arc::new(|item| Block::from_wire(decode_reply(item)?)),
        ))
    }

    /// Live stream of block metadata (header + tx count). Must be called
    /// from within a Tokio runtime.
    pub fn get_block_metadata_stream(&self) -> Result<Subscription<BlockMetadata>, ClientError> {
        let req = self.request(RpcMethod::ListBlockMetadataStream, &wire::Empty {})?;
        let raw = self.transport.open_stream(req)?;
        Ok(Subscription::open(
            raw,
            Arc::new(|item| BlockMetadata::from_wire(decode_reply(item)?)),
        ))
    }

    // ---- transactions -----------------------------------------------------

    /// Look up a transaction by hash.
    ///
    /// Resolution is two-step: first by position within a block; if that
    /// fails at the transport level, fall back to the transaction pool. A
    /// block hit carries the block position, a pool hit does not. If both
    /// fail, the fallback's error propagates.
    pub async fn get_transaction(&self, tx_hash: &str) -> Result<TxLookup, ClientError> {
        let params = wire::SingleBytes::new(decode_hash(tx_hash)?);
        let req = self.request(RpcMethod::GetBlockTx, &params)?;
        match self.transport.unary(req).await {
            Ok(reply) => {
                let found: wire::TxInBlock = decode_reply(reply)?;
                Ok(TxLookup {
                    block: Some(BlockPosition {
                        block_hash: encode_hash(&found.tx_idx.block_hash),
                        index: found.tx_idx.idx,
                    }),
                    tx: TxInfo::from_wire(found.tx)?,
                })
            }
            Err(e) => {
                tracing::debug!(error = %e, "block lookup missed, trying the tx pool");
                let req = self.request(RpcMethod::GetTx, &params)?;
                let reply = self.transport.unary(req).await?;
                Ok(TxLookup {
                    block: None,
                    tx: TxInfo::from_wire(decode_reply(reply)?)?,
                })
            }
        }
    }

    /// Execution receipt for a transaction.
    pub async fn get_transaction_receipt(&self, tx_hash: &str) -> Result<Receipt, ClientError> {
        run_unary(
            tx_hash,
            |tx_hash| {
                let hash = decode_hash(tx_hash)?;
                self.request(RpcMethod::GetReceipt, &wire::SingleBytes::new(hash))
            },
            |req| self.transport.unary(req),
            |reply| Receipt::from_wire(decode_reply(reply)?),
        )
        .await
    }

    /// Submit a signed transaction. Returns the canonical hash on success;
    /// every rejection reason, business or transport, surfaces as a
    /// [`TransactionError`].
    pub async fn send_signed_transaction(&self, tx: &SignedTransaction) -> Result<String, ClientError> {
        let outcome = run_unary(
            tx,
            |tx| {
                tx.validate()?;
                self.request(RpcMethod::CommitTx, &singleton_batch(tx))
            },
            |req| self.transport.unary(req),
            unmarshal_commit,
        )
        .await;
        match outcome {
            Err(ClientError::Transport(e)) => Err(TransactionError::from_transport(e).into()),
            other => other,
        }
    }

    // ---- accounts ---------------------------------------------------------

    /// Account state: balance and nonce.
    pub async fn get_state(&self, address: &Address) -> Result<AccountState, ClientError> {
        run_unary(
            address,
            |address| {
                self.request(
                    RpcMethod::GetState,
                    &wire::SingleBytes::new(address.as_bytes().to_vec()),
                )
            },
            |req| self.transport.unary(req),
            |reply| AccountState::from_wire(decode_reply(reply)?),
        )
        .await
    }

    pub async fn get_nonce(&self, address: &Address) -> Result<u64, ClientError> {
        Ok(self.get_state(address).await?.nonce)
    }

    /// Top entries of a governance vote tally. `id` selects the vote
    /// (block producer election by default).
    pub async fn get_top_votes(
        &self,
        count: u32,
        id: Option<&str>,
    ) -> Result<Vec<VoteInfo>, ClientError> {
        run_unary(
            id,
            |id| {
                self.request(
                    RpcMethod::GetVotes,
                    &wire::VoteParams {
                        id: id.unwrap_or("voteBP").to_string(),
                        count,
                    },
                )
            },
            |req| self.transport.unary(req),
            |reply| {
                let list: wire::VoteList = decode_reply(reply)?;
                list.votes.into_iter().map(VoteInfo::from_wire).collect()
            },
        )
        .await
    }

    pub async fn get_staking(&self, address: &Address) -> Result<StakingInfo, ClientError> {
        run_unary(
            address,
            |address| {
                self.request(
                    RpcMethod::GetStaking,
                    &wire::SingleBytes::new(address.as_bytes().to_vec()),
                )
            },
            |req| self.transport.unary(req),
            |reply| StakingInfo::from_wire(decode_reply(reply)?),
        )
        .await
    }

    /// Resolve a human-readable account name.
    pub async fn get_name_info(&self, name: &str) -> Result<NameInfo, ClientError> {
        run_unary(
            name,
            |name| {
                if name.is_empty() {
                    return Err(ClientError::validation("missing account name"));
                }
                self.request(RpcMethod::GetNameInfo, &wire::Name { name: name.into() })
            },
            |req| self.transport.unary(req),
            |reply| Ok(NameInfo::from_wire(decode_reply(reply)?)),
        )
        .await
    }

    // ---- contracts ----------------------------------------------------------

    /// ABI of a deployed contract.
    pub async fn get_abi(&self, address: &Address) -> Result<Abi, ClientError> {
        run_unary(
            address,
            |address| {
                self.request(
                    RpcMethod::GetAbi,
                    &wire::SingleBytes::new(address.as_bytes().to_vec()),
                )
            },
            |req| self.transport.unary(req),
            decode_reply,
        )
        .await
    }

    /// Read-only contract call through an ABI getter.
    pub async fn query_contract(&self, call: &ContractCall) -> Result<Value, ClientError> {
        run_unary(
            call,
            |call| self.request(RpcMethod::QueryContract, &call.to_wire()?),
            |req| self.transport.unary(req),
            |reply| {
                let bytes: wire::SingleBytes = decode_reply(reply)?;
                parse_json_bytes(&bytes.value)
            },
        )
        .await
    }

    /// Query contract state variables directly.
    ///
    /// The result is tagged by the node's response shape: no proofs, one
    /// proven value, or one entry per queried key with explicit missing
    /// markers. A single non-included proof means the variable does not
    /// exist and surfaces as a not-found error naming the key and address.
    pub async fn query_contract_state(
        &self,
        query: &ContractStateQuery,
    ) -> Result<StateQueryResult, ClientError> {
        let first_key = query.storage_keys.first().cloned().unwrap_or_default();
        let address = query.address.encoded().to_string();
        run_unary(
            query,
            |query| self.request(RpcMethod::QueryContractState, &query.to_wire()?),
            |req| self.transport.unary(req),
            move |reply| {
                let proof: wire::StateQueryProof = decode_reply(reply)?;
                interpret_state_proofs(proof.var_proofs, &first_key, &address)
            },
        )
        .await
    }

    // ---- events -------------------------------------------------------------

    /// List past events matching a filter.
    pub async fn get_events(&self, filter: &FilterQuery) -> Result<Vec<Event>, ClientError> {
        run_unary(
            filter,
            |filter| self.request(RpcMethod::ListEvents, &filter.to_wire()),
            |req| self.transport.unary(req),
            |reply| {
                let list: wire::EventList = decode_reply(reply)?;
                list.events.into_iter().map(Event::from_wire).collect()
            },
        )
        .await
    }

    /// Live stream of events matching a filter, in real time. Must be called
    /// from within a Tokio runtime.
    pub fn get_event_stream(&self, filter: &FilterQuery) -> Result<Subscription<Event>, ClientError> {
        let req = self.request(RpcMethod::ListEventStream, &filter.to_wire())?;
        let raw = self.transport.open_stream(req)?;
        Ok(Subscription::open(
            raw,
            Arc::new(|item| Event::from_wire(decode_reply(item)?)),
        ))
    }
}

impl std::fmt::Debug for NodeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeClient")
            .field("target", &self.target())
            .finish_non_exhaustive()
    }
}

fn parse_json_bytes(bytes: &[u8]) -> Result<Value, ClientError> {
    serde_json::from_slice(bytes).map_err(|e| ClientError::decoding(format!("invalid payload: {e}")))
}

fn interpret_state_proofs(
    proofs: Vec<wire::ContractVarProof>,
    first_key: &str,
    address: &str,
) -> Result<StateQueryResult, ClientError> {
    if proofs.is_empty() {
        return Ok(StateQueryResult::Empty);
    }
    if proofs.len() == 1 {
        let proof = &proofs[0];
        if !proof.inclusion {
            return Err(ClientError::NotFound {
                key: first_key.to_string(),
                address: address.to_string(),
            });
        }
        if !proof.value.is_empty() {
            return Ok(StateQueryResult::Single(parse_json_bytes(&proof.value)?));
        }
        // Included but empty value: fall through to the positional form.
    }
    let values = proofs
        .iter()
        .map(|proof| {
            if proof.value.is_empty() {
                Ok(None)
            } else {
                parse_json_bytes(&proof.value).map(Some)
            }
        })
        .collect::<Result<_, ClientError>>()?;
    Ok(StateQueryResult::Many(values))
}
